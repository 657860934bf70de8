#[cfg(test)]
mod tests {
    use dha::db::db::Db;
    use dha::db::habits::Habits;
    use dha::db::migrations::PREDEFINED_HABITS;
    use dha::db::predefined::PredefinedHabits;
    use test_context::{test_context, TestContext};

    struct TemplateTestContext {
        db: Db,
    }

    impl TestContext for TemplateTestContext {
        fn setup() -> Self {
            TemplateTestContext {
                db: Db::open_in_memory().unwrap(),
            }
        }
    }

    #[test_context(TemplateTestContext)]
    #[test]
    fn test_seeded_templates_in_display_order(ctx: &mut TemplateTestContext) {
        let templates = PredefinedHabits::new(&ctx.db).list().unwrap();

        assert_eq!(templates.len(), PREDEFINED_HABITS.len());
        assert_eq!(templates.first().unwrap().name, "Exercise");
        assert_eq!(templates.last().unwrap().name, "Plan Your Day");

        let orders: Vec<i64> = templates.iter().map(|t| t.display_order).collect();
        assert_eq!(orders, (1..=15).collect::<Vec<i64>>());
    }

    #[test_context(TemplateTestContext)]
    #[test]
    fn test_get_by_name_ignores_case(ctx: &mut TemplateTestContext) {
        let predefined = PredefinedHabits::new(&ctx.db);

        let template = predefined.get_by_name("drink water").unwrap().unwrap();
        assert_eq!(template.name, "Drink Water");
        assert_eq!(template.color, "#06b6d4");

        assert_eq!(predefined.get_by_name("Skydiving").unwrap(), None);
    }

    #[test_context(TemplateTestContext)]
    #[test]
    fn test_adopt_creates_matching_habit(ctx: &mut TemplateTestContext) {
        let habit = PredefinedHabits::new(&ctx.db).adopt(" meditate ").unwrap();

        assert_eq!(habit.name, "Meditate");
        assert_eq!(habit.description.as_deref(), Some("Practice mindfulness and meditation for mental clarity"));
        assert_eq!(habit.color, "#8b5cf6");

        let habits = Habits::new(&ctx.db).list(None).unwrap();
        assert_eq!(habits, vec![habit]);
    }

    #[test_context(TemplateTestContext)]
    #[test]
    fn test_adopt_unknown_template_fails(ctx: &mut TemplateTestContext) {
        let err = PredefinedHabits::new(&ctx.db).adopt("Skydiving").unwrap_err();

        assert!(err.is_not_found());
        assert!(Habits::new(&ctx.db).list(None).unwrap().is_empty());
    }
}
