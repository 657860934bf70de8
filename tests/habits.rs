#[cfg(test)]
mod tests {
    use dha::db::db::Db;
    use dha::db::habits::Habits;
    use dha::libs::error::DhaError;
    use dha::libs::habit::{HabitDraft, HabitPatch};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct HabitsTestContext {
        db: Db,
        temp_dir: TempDir,
    }

    impl TestContext for HabitsTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("dha.db")).unwrap();
            HabitsTestContext { temp_dir, db }
        }
    }

    #[test_context(HabitsTestContext)]
    #[test]
    fn test_create_trims_and_defaults_color(ctx: &mut HabitsTestContext) {
        let habits = Habits::new(&ctx.db);
        let habit = habits
            .create(&HabitDraft::new("  Morning run  ").description("  5 km before work "))
            .unwrap();

        assert_eq!(habit.name, "Morning run");
        assert_eq!(habit.description.as_deref(), Some("5 km before work"));
        assert_eq!(habit.color, "#3b82f6");
        assert_eq!(habit.created_at, habit.updated_at);
        assert_eq!(habits.fetch(habit.id).unwrap(), habit);
    }

    #[test_context(HabitsTestContext)]
    #[test]
    fn test_create_rejects_invalid_fields(ctx: &mut HabitsTestContext) {
        let habits = Habits::new(&ctx.db);

        let err = habits.create(&HabitDraft::new("   ")).unwrap_err();
        assert!(matches!(err, DhaError::Validation(_)));

        let err = habits.create(&HabitDraft::new("Read").color("blue")).unwrap_err();
        assert!(matches!(err, DhaError::Validation(_)));

        let err = habits.create(&HabitDraft::new("x".repeat(256))).unwrap_err();
        assert!(matches!(err, DhaError::Validation(_)));

        assert!(habits.list(None).unwrap().is_empty());
    }

    #[test_context(HabitsTestContext)]
    #[test]
    fn test_list_is_newest_first_and_searchable(ctx: &mut HabitsTestContext) {
        let habits = Habits::new(&ctx.db);
        habits.create(&HabitDraft::new("Read").description("Twenty pages")).unwrap();
        habits.create(&HabitDraft::new("Meditate")).unwrap();
        habits.create(&HabitDraft::new("Bedtime reading").color("#F59E0B")).unwrap();

        let names: Vec<String> = habits.list(None).unwrap().into_iter().map(|h| h.name).collect();
        assert_eq!(names, vec!["Bedtime reading", "Meditate", "Read"]);

        let found: Vec<String> = habits.list(Some("read")).unwrap().into_iter().map(|h| h.name).collect();
        assert_eq!(found, vec!["Bedtime reading", "Read"]);

        let by_description = habits.list(Some("pages")).unwrap();
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].name, "Read");

        assert_eq!(habits.list(Some("   ")).unwrap().len(), 3);
        assert!(habits.list(Some("swim")).unwrap().is_empty());
    }

    #[test_context(HabitsTestContext)]
    #[test]
    fn test_resolve_by_id_or_name(ctx: &mut HabitsTestContext) {
        let habits = Habits::new(&ctx.db);
        let habit = habits.create(&HabitDraft::new("Drink Water")).unwrap();

        assert_eq!(habits.resolve(&habit.id.to_string()).unwrap().id, habit.id);
        assert_eq!(habits.resolve("drink water").unwrap().id, habit.id);
        assert!(habits.resolve("Drink").unwrap_err().is_not_found());
        assert!(habits.resolve("42").unwrap_err().is_not_found());
    }

    #[test_context(HabitsTestContext)]
    #[test]
    fn test_search_ignores_case_beyond_ascii(ctx: &mut HabitsTestContext) {
        let habits = Habits::new(&ctx.db);
        habits.create(&HabitDraft::new("École de danse")).unwrap();
        habits.create(&HabitDraft::new("Swim").description("ÜBUNGEN im Becken")).unwrap();

        let found = habits.list(Some("école")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "École de danse");

        let found = habits.list(Some("übungen")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Swim");

        assert_eq!(habits.resolve("école de DANSE").unwrap().name, "École de danse");
    }

    #[test_context(HabitsTestContext)]
    #[test]
    fn test_numeric_name_resolves_when_no_such_id(ctx: &mut HabitsTestContext) {
        let habits = Habits::new(&ctx.db);
        let first = habits.create(&HabitDraft::new("Read")).unwrap();
        let year = habits.create(&HabitDraft::new("2024")).unwrap();

        assert_eq!(habits.resolve("2024").unwrap().id, year.id);
        // an existing id still takes precedence over a name
        let by_id = habits.resolve(&first.id.to_string()).unwrap();
        assert_eq!(by_id.id, first.id);
    }

    #[test_context(HabitsTestContext)]
    #[test]
    fn test_update_changes_only_given_fields(ctx: &mut HabitsTestContext) {
        let habits = Habits::new(&ctx.db);
        let habit = habits
            .create(&HabitDraft::new("Journal").description("Evening notes").color("#f59e0b"))
            .unwrap();

        let renamed = habits
            .update(
                habit.id,
                &HabitPatch {
                    name: Some("Gratitude journal".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(renamed.name, "Gratitude journal");
        assert_eq!(renamed.description.as_deref(), Some("Evening notes"));
        assert_eq!(renamed.color, "#f59e0b");
        assert!(renamed.updated_at >= habit.updated_at);
        assert_eq!(renamed.created_at, habit.created_at);

        let cleared = habits
            .update(
                habit.id,
                &HabitPatch {
                    description: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(cleared.description, None);
        assert_eq!(cleared.name, "Gratitude journal");
    }

    #[test_context(HabitsTestContext)]
    #[test]
    fn test_update_requires_a_field_and_an_existing_habit(ctx: &mut HabitsTestContext) {
        let habits = Habits::new(&ctx.db);
        let habit = habits.create(&HabitDraft::new("Stretch")).unwrap();

        let err = habits.update(habit.id, &HabitPatch::default()).unwrap_err();
        assert!(matches!(err, DhaError::Validation(_)));

        let patch = HabitPatch {
            color: Some("#10b981".into()),
            ..Default::default()
        };
        assert!(habits.update(habit.id + 100, &patch).unwrap_err().is_not_found());
    }

    #[test_context(HabitsTestContext)]
    #[test]
    fn test_delete_returns_habit_and_removes_it(ctx: &mut HabitsTestContext) {
        let habits = Habits::new(&ctx.db);
        let habit = habits.create(&HabitDraft::new("Limit Screen Time")).unwrap();

        let deleted = habits.delete(habit.id).unwrap();
        assert_eq!(deleted, habit);
        assert_eq!(habits.get(habit.id).unwrap(), None);
        assert!(habits.delete(habit.id).unwrap_err().is_not_found());
    }

    #[test_context(HabitsTestContext)]
    #[test]
    fn test_data_survives_reopen(ctx: &mut HabitsTestContext) {
        let path = ctx.temp_dir.path().join("dha.db");
        let id = Habits::new(&ctx.db).create(&HabitDraft::new("Plan Your Day")).unwrap().id;

        let reopened = Db::open(&path).unwrap();
        assert_eq!(Habits::new(&reopened).fetch(id).unwrap().name, "Plan Your Day");
    }
}
