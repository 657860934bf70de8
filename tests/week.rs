#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use dha::db::db::Db;
    use dha::db::habit_logs::HabitLogs;
    use dha::db::habits::Habits;
    use dha::libs::habit::{Habit, HabitDraft};
    use dha::libs::habit_log::{upsert_log, LogEntry};
    use dha::libs::week::{self, DayMark, WeekGrid};
    use test_context::{test_context, TestContext};

    struct WeekTestContext {
        db: Db,
    }

    impl TestContext for WeekTestContext {
        fn setup() -> Self {
            WeekTestContext {
                db: Db::open_in_memory().unwrap(),
            }
        }
    }

    impl WeekTestContext {
        fn habit(&self, name: &str) -> Habit {
            Habits::new(&self.db).create(&HabitDraft::new(name)).unwrap()
        }

        fn grid(&self, start: NaiveDate) -> WeekGrid {
            let habits = Habits::new(&self.db).list(None).unwrap();
            let logs = HabitLogs::new(&self.db)
                .in_range(start, week::week_end(start).unwrap())
                .unwrap();
            WeekGrid::build(start, &habits, &logs)
        }
    }

    fn day(d: u32) -> NaiveDate {
        // March 2024; the 4th is a Monday
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test_context(WeekTestContext)]
    #[test]
    fn test_grid_marks_done_missed_and_empty(ctx: &mut WeekTestContext) {
        let read = ctx.habit("Read");
        let walk = ctx.habit("Take a Walk");
        let logs = HabitLogs::new(&ctx.db);
        upsert_log(&logs, &LogEntry::new(read.id, day(4), true)).unwrap();
        upsert_log(&logs, &LogEntry::new(read.id, day(5), false)).unwrap();
        upsert_log(&logs, &LogEntry::new(walk.id, day(10), true)).unwrap();
        // outside the week
        upsert_log(&logs, &LogEntry::new(walk.id, day(11), true)).unwrap();

        let grid = ctx.grid(day(4));

        assert_eq!(grid.start, day(4));
        assert_eq!(grid.end(), day(10));
        assert_eq!(grid.rows.len(), 2);
        assert_eq!(grid.mark(read.id, day(4)), Some(DayMark::Done));
        assert_eq!(grid.mark(read.id, day(5)), Some(DayMark::Missed));
        assert_eq!(grid.mark(read.id, day(6)), Some(DayMark::Empty));
        assert_eq!(grid.mark(walk.id, day(10)), Some(DayMark::Done));
        assert_eq!(grid.mark(walk.id, day(11)), None);
        assert_eq!(grid.completed_count(), 2);
    }

    #[test_context(WeekTestContext)]
    #[test]
    fn test_grid_snaps_to_monday(ctx: &mut WeekTestContext) {
        ctx.habit("Stretch");
        let grid = WeekGrid::build(day(7), &Habits::new(&ctx.db).list(None).unwrap(), &[]);

        assert_eq!(grid.start, day(4));
        assert_eq!(grid.previous().unwrap(), NaiveDate::from_ymd_opt(2024, 2, 26).unwrap());
        assert_eq!(grid.next().unwrap(), day(11));
        assert!(grid.rows[0].marks.iter().all(|mark| *mark == DayMark::Empty));
    }

    #[test_context(WeekTestContext)]
    #[test]
    fn test_toggle_flips_completion_and_keeps_note(ctx: &mut WeekTestContext) {
        let habit = ctx.habit("Journal");
        let logs = HabitLogs::new(&ctx.db);

        let created = week::toggle(&logs, habit.id, day(6)).unwrap();
        assert!(created.was_created);
        assert!(created.record.completed);

        upsert_log(&logs, &LogEntry::new(habit.id, day(6), true).note("short entry")).unwrap();

        let flipped = week::toggle(&logs, habit.id, day(6)).unwrap();
        assert!(!flipped.was_created);
        assert!(!flipped.record.completed);
        assert_eq!(flipped.record.note.as_deref(), Some("short entry"));

        let back = week::toggle(&logs, habit.id, day(6)).unwrap();
        assert!(back.record.completed);
        assert_eq!(logs.for_habit(habit.id).unwrap().len(), 1);
    }

    #[test_context(WeekTestContext)]
    #[test]
    fn test_toggle_unknown_habit_fails(ctx: &mut WeekTestContext) {
        let logs = HabitLogs::new(&ctx.db);
        assert!(week::toggle(&logs, 404, day(6)).unwrap_err().is_not_found());
    }

    #[test_context(WeekTestContext)]
    #[test]
    fn test_range_query_validates_order(ctx: &mut WeekTestContext) {
        let logs = HabitLogs::new(&ctx.db);
        assert!(logs.in_range(day(10), day(4)).is_err());
        assert!(logs.in_range(day(4), day(4)).unwrap().is_empty());
    }
}
