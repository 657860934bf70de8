use super::data_storage::DataStorage;
use aes::Aes256;
use anyhow::Result;
use base64::prelude::*;
use block_modes::block_padding::Pkcs7;
use block_modes::{BlockMode, Cbc};
use dialoguer::{theme::ColorfulTheme, Password};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::PathBuf;

// Include generated metadata with encryption keys
include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));

type Aes256Cbc = Cbc<Aes256, Pkcs7>;

/// A value kept encrypted on disk next to the database, e.g. the OpenAI key.
#[derive(Clone, Debug)]
pub struct Secret {
    prompt: String,
    secret_file_path: PathBuf,
    key: Vec<u8>,
    iv: Vec<u8>,
}

impl Secret {
    pub fn new(secret_name: &str, prompt: &str) -> Self {
        Self::with_storage(&DataStorage::new(), secret_name, prompt)
    }

    pub fn with_storage(storage: &DataStorage, secret_name: &str, prompt: &str) -> Self {
        let secret_file_path = storage.get_path(secret_name).unwrap_or_else(|_| storage.base_path().join(secret_name));

        Self {
            prompt: prompt.to_owned(),
            secret_file_path,
            key: APP_METADATA_ENCRYPTION_KEY.to_vec(),
            iv: APP_METADATA_ENCRYPTION_IV.to_vec(),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.secret_file_path
    }

    /// Returns the stored value, if one exists and decrypts cleanly.
    pub fn get(&self) -> Option<String> {
        if fs::metadata(&self.secret_file_path).is_err() {
            return None;
        }
        self.decrypt().ok()
    }

    pub fn get_or_prompt(&self) -> Result<String> {
        match self.get() {
            Some(value) => Ok(value),
            None => self.prompt(),
        }
    }

    pub fn prompt(&self) -> Result<String> {
        let value = Password::with_theme(&ColorfulTheme::default()).with_prompt(&self.prompt).interact()?;
        self.store(&value)?;
        Ok(value)
    }

    pub fn store(&self, value: &str) -> Result<()> {
        let cipher = Aes256Cbc::new_from_slices(&self.key, &self.iv)?;
        let ciphertext = cipher.encrypt_vec(value.as_bytes());
        let encoded = BASE64_STANDARD.encode(&ciphertext);

        if let Some(parent) = self.secret_file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = File::create(&self.secret_file_path)?;
        file.write_all(encoded.as_bytes())?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.secret_file_path.exists() {
            fs::remove_file(&self.secret_file_path)?;
        }
        Ok(())
    }

    fn decrypt(&self) -> Result<String> {
        let mut file = File::open(&self.secret_file_path)?;
        let mut encoded = String::new();
        file.read_to_string(&mut encoded)?;
        let ciphertext = BASE64_STANDARD.decode(encoded.trim())?;
        let cipher = Aes256Cbc::new_from_slices(&self.key, &self.iv)?;
        let decrypted = cipher.decrypt_vec(&ciphertext)?;
        Ok(String::from_utf8(decrypted)?)
    }
}
