use dotenv::dotenv;
use std::env;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use toml::Value;

struct AppMetadata {
    file: std::fs::File,
}

impl AppMetadata {
    pub fn new() -> io::Result<Self> {
        let out_dir = env::var("OUT_DIR").map_err(io::Error::other)?;
        let dest_path = Path::new(&out_dir).join("app_metadata.rs");
        let file = File::create(&dest_path)?;
        Ok(Self { file })
    }

    pub fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        write!(
            self.file,
            "#[allow(unused)]\npub const APP_METADATA_{}: &str = \"{}\";\n",
            &key.to_uppercase(),
            &value
        )
    }

    pub fn write_bytes(&mut self, key: &str, value: &[u8]) -> io::Result<()> {
        write!(
            self.file,
            "#[allow(unused)]\npub const APP_METADATA_{}: &[u8; {}] = &[",
            &key.to_uppercase(),
            value.len()
        )?;

        for (i, byte) in value.iter().enumerate() {
            if i > 0 {
                write!(self.file, ", ")?;
            }
            write!(self.file, "{}", byte)?;
        }

        writeln!(self.file, "];")
    }
}

/// Pads or truncates a seed string to an exact byte length.
fn fixed_length(seed: String, len: usize) -> Vec<u8> {
    let mut bytes = seed.into_bytes();
    bytes.truncate(len);
    bytes.resize(len, b'!');
    bytes
}

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=DHA_ENCRYPTION_KEY");
    println!("cargo:rerun-if-env-changed=DHA_ENCRYPTION_IV");

    // Load .env file if it exists
    let _ = dotenv();

    let cargo_toml = fs::read_to_string("Cargo.toml")?;
    let cargo_toml: Value = toml::from_str(&cargo_toml).map_err(io::Error::other)?;

    let mut app_metadata = AppMetadata::new()?;
    app_metadata.write("NAME", &env::var("CARGO_PKG_NAME").unwrap_or_else(|_| "dha".to_string()))?;
    app_metadata.write("VERSION", &env::var("CARGO_PKG_VERSION").unwrap_or_default())?;

    if let Some(metadata) = cargo_toml.get("package").and_then(|pkg| pkg.get("metadata")).and_then(|meta| meta.as_table()) {
        for (key, value) in metadata {
            if let Some(value) = value.as_str() {
                app_metadata.write(key, value)?;
            }
        }
    }

    // Key material for the on-disk API key store
    let (encryption_key, encryption_iv) = match (env::var("DHA_ENCRYPTION_KEY"), env::var("DHA_ENCRYPTION_IV")) {
        (Ok(key), Ok(iv)) => {
            if key.len() != 32 {
                panic!("DHA_ENCRYPTION_KEY must be exactly 32 bytes long, got {} bytes", key.len());
            }
            if iv.len() != 16 {
                panic!("DHA_ENCRYPTION_IV must be exactly 16 bytes long, got {} bytes", iv.len());
            }

            (key.into_bytes(), iv.into_bytes())
        }
        _ => {
            let package_name = env::var("CARGO_PKG_NAME").unwrap_or_else(|_| "dha".to_string());

            println!("cargo:warning=DHA_ENCRYPTION_KEY or DHA_ENCRYPTION_IV not found in environment.");
            println!("cargo:warning=Using default keys. For production, create a .env file with:");
            println!("cargo:warning=DHA_ENCRYPTION_KEY=your_32_byte_key_here!!!!!!!!!");
            println!("cargo:warning=DHA_ENCRYPTION_IV=your_16_byte_iv!");

            (
                fixed_length(format!("{}_default_encryption_key_32b", package_name), 32),
                fixed_length(format!("{}_iv_16b", package_name), 16),
            )
        }
    };

    app_metadata.write_bytes("ENCRYPTION_KEY", &encryption_key)?;
    app_metadata.write_bytes("ENCRYPTION_IV", &encryption_iv)?;

    Ok(())
}
