#[cfg(test)]
mod tests {
    use dha::libs::data_storage::DataStorage;
    use dha::libs::secret::Secret;
    use std::fs;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct SecretTestContext {
        _temp_dir: TempDir,
        storage: DataStorage,
        secret_file_name: String,
    }

    impl TestContext for SecretTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let storage = DataStorage::with_base(temp_dir.path().join("data"));
            SecretTestContext {
                _temp_dir: temp_dir,
                storage,
                secret_file_name: ".test_secret".to_string(),
            }
        }
    }

    impl SecretTestContext {
        fn secret(&self) -> Secret {
            Secret::with_storage(&self.storage, &self.secret_file_name, "Enter test secret")
        }
    }

    #[test_context(SecretTestContext)]
    #[test]
    fn test_missing_secret_is_none(ctx: &mut SecretTestContext) {
        assert_eq!(ctx.secret().get(), None);
    }

    #[test_context(SecretTestContext)]
    #[test]
    fn test_store_then_get(ctx: &mut SecretTestContext) {
        let secret = ctx.secret();
        secret.store("sk-test-123").unwrap();

        let on_disk = fs::read_to_string(secret.path()).unwrap();
        assert!(!on_disk.contains("sk-test-123"));

        assert_eq!(ctx.secret().get().as_deref(), Some("sk-test-123"));
        assert_eq!(ctx.secret().get_or_prompt().unwrap(), "sk-test-123");
    }

    #[test_context(SecretTestContext)]
    #[test]
    fn test_store_overwrites(ctx: &mut SecretTestContext) {
        let secret = ctx.secret();
        secret.store("first").unwrap();
        secret.store("second").unwrap();

        assert_eq!(secret.get().as_deref(), Some("second"));
    }

    #[test_context(SecretTestContext)]
    #[test]
    fn test_clear_removes_file(ctx: &mut SecretTestContext) {
        let secret = ctx.secret();
        secret.store("value").unwrap();

        secret.clear().unwrap();
        assert!(!secret.path().exists());
        assert_eq!(secret.get(), None);

        // clearing twice is fine
        secret.clear().unwrap();
    }

    #[test_context(SecretTestContext)]
    #[test]
    fn test_corrupted_file_reads_as_none(ctx: &mut SecretTestContext) {
        let secret = ctx.secret();
        fs::write(secret.path(), "definitely not base64 ciphertext!").unwrap();

        assert_eq!(secret.get(), None);
    }
}
