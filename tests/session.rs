#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use dha::libs::data_storage::DataStorage;
    use dha::libs::error::DhaError;
    use dha::libs::session::{SessionContext, SESSION_FILE_NAME};
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    const IDLE_LIMIT: Duration = Duration::from_secs(30 * 60);

    struct SessionTestContext {
        _temp_dir: TempDir,
        storage: DataStorage,
    }

    impl TestContext for SessionTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let storage = DataStorage::with_base(temp_dir.path().join("data"));
            SessionTestContext {
                _temp_dir: temp_dir,
                storage,
            }
        }
    }

    impl SessionTestContext {
        fn load(&self, now: NaiveDateTime) -> SessionContext {
            SessionContext::load(&self.storage, IDLE_LIMIT, now).unwrap()
        }
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_no_session_means_not_signed_in(ctx: &mut SessionTestContext) {
        let context = ctx.load(at(9, 0));

        assert!(context.current().is_none());
        assert!(!context.was_expired());
        assert!(matches!(context.require(), Err(DhaError::NotSignedIn)));
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_started_session_is_persisted(ctx: &mut SessionTestContext) {
        ctx.load(at(9, 0)).start("ana", at(9, 0)).unwrap();

        let context = ctx.load(at(9, 10));
        let session = context.require().unwrap();
        assert_eq!(session.user, "ana");
        assert_eq!(session.started_at, at(9, 0));
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_idle_session_expires_on_load(ctx: &mut SessionTestContext) {
        ctx.load(at(9, 0)).start("ana", at(9, 0)).unwrap();

        let context = ctx.load(at(9, 30));
        assert!(context.was_expired());
        assert!(matches!(context.require(), Err(DhaError::SessionExpired)));
        assert!(!ctx.storage.base_path().join(SESSION_FILE_NAME).exists());

        // the stale file is gone, so the next load is a plain sign-in prompt
        assert!(matches!(ctx.load(at(9, 31)).require(), Err(DhaError::NotSignedIn)));
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_touch_extends_the_session(ctx: &mut SessionTestContext) {
        ctx.load(at(9, 0)).start("ana", at(9, 0)).unwrap();

        ctx.load(at(9, 20)).touch(at(9, 20)).unwrap();

        let context = ctx.load(at(9, 45));
        assert_eq!(context.require().unwrap().last_seen, at(9, 20));
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_clear_signs_out(ctx: &mut SessionTestContext) {
        ctx.load(at(9, 0)).start("ana", at(9, 0)).unwrap();

        let mut context = ctx.load(at(9, 1));
        context.clear().unwrap();
        assert!(context.current().is_none());

        assert!(ctx.load(at(9, 2)).current().is_none());
        assert!(ctx.load(at(9, 2)).touch(at(9, 2)).is_err());
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_unreadable_session_file_is_discarded(ctx: &mut SessionTestContext) {
        let path = ctx.storage.get_path(SESSION_FILE_NAME).unwrap();
        fs::write(&path, "not json").unwrap();

        let context = ctx.load(at(9, 0));
        assert!(context.current().is_none());
        assert!(!context.was_expired());
        assert!(!path.exists());
    }
}
