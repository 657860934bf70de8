//! Configuration management for the dha application.
//!
//! Settings live in `config.json` inside the per-user data directory and are
//! split into optional modules:
//!
//! - **Login**: the credentials a local sign-in is compared against
//! - **Session**: inactivity warning and sign-out thresholds
//! - **AI**: endpoint and sampling parameters for the insights assistant
//!
//! Login credentials can also come from the environment (`DHA_LOGIN_USERNAME`,
//! `DHA_LOGIN_PASSWORD`, `DHA_LOGIN_PHONE`), typically through a `.env` file
//! loaded at startup. Environment values win over the file.
//!
//! ```rust,no_run
//! use dha::libs::config::Config;
//!
//! let config = Config::read()?;
//! let session = config.session_settings();
//! println!("warning after {}s", session.warning_after_secs);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use super::error::DhaError;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Password};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "config.json";

pub const LOGIN_USERNAME_ENV: &str = "DHA_LOGIN_USERNAME";
pub const LOGIN_PASSWORD_ENV: &str = "DHA_LOGIN_PASSWORD";
pub const LOGIN_PHONE_ENV: &str = "DHA_LOGIN_PHONE";

#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

/// Credentials for the local sign-in.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct LoginConfig {
    pub username: String,
    pub password: String,
    pub phone: String,
}

impl LoginConfig {
    /// All three fields must be present for sign-in to be possible.
    pub fn is_configured(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.is_empty() && !self.phone.trim().is_empty()
    }
}

/// Inactivity policy for signed-in sessions.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Inactivity before the sign-out warning is shown.
    pub warning_after_secs: u64,

    /// Inactivity before the forced sign-out, measured from the same origin.
    pub logout_after_secs: u64,

    /// Window in which bursts of activity are coalesced into one reset.
    pub debounce_ms: u64,

    /// Countdown refresh interval while the warning is shown.
    pub tick_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            warning_after_secs: 25 * 60,
            logout_after_secs: 30 * 60,
            debounce_ms: 1000,
            tick_ms: 1000,
        }
    }
}

impl SessionConfig {
    pub fn warning_delay(&self) -> Duration {
        Duration::from_secs(self.warning_after_secs)
    }

    pub fn total_timeout(&self) -> Duration {
        Duration::from_secs(self.logout_after_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn validate(&self) -> Result<(), DhaError> {
        if self.logout_after_secs <= self.warning_after_secs {
            return Err(DhaError::Config(format!(
                "logout_after_secs ({}) must be greater than warning_after_secs ({})",
                self.logout_after_secs, self.warning_after_secs
            )));
        }
        if self.tick_ms == 0 {
            return Err(DhaError::Config("tick_ms must be greater than zero".to_string()));
        }
        Ok(())
    }
}

/// OpenAI-compatible chat completion settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AiConfig {
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig {
            api_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 500,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<LoginConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai: Option<AiConfig>,
}

impl Config {
    pub fn read() -> Result<Config> {
        Self::read_from(&DataStorage::new())
    }

    /// Reads the configuration file, or the defaults when there is none yet.
    pub fn read_from(storage: &DataStorage) -> Result<Config> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        if let Some(session) = &config.session {
            session.validate()?;
        }
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&DataStorage::new())
    }

    pub fn save_to(&self, storage: &DataStorage) -> Result<()> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Login credentials after applying environment overrides.
    pub fn login_credentials(&self) -> LoginConfig {
        let mut login = self.login.clone().unwrap_or_default();
        if let Ok(username) = env::var(LOGIN_USERNAME_ENV) {
            login.username = username;
        }
        if let Ok(password) = env::var(LOGIN_PASSWORD_ENV) {
            login.password = password;
        }
        if let Ok(phone) = env::var(LOGIN_PHONE_ENV) {
            login.phone = phone;
        }
        login
    }

    pub fn session_settings(&self) -> SessionConfig {
        self.session.clone().unwrap_or_default()
    }

    pub fn ai_settings(&self) -> AiConfig {
        self.ai.clone().unwrap_or_default()
    }

    /// Runs the interactive setup wizard, starting from the saved values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = vec![
            ConfigModule {
                key: "login".to_string(),
                name: Message::ConfigModuleLogin.to_string(),
            },
            ConfigModule {
                key: "session".to_string(),
                name: Message::ConfigModuleSession.to_string(),
            },
            ConfigModule {
                key: "ai".to_string(),
                name: Message::ConfigModuleAi.to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "login" => {
                    let default = config.login.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleLogin);
                    config.login = Some(LoginConfig {
                        username: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptUsername.to_string())
                            .default(default.username)
                            .interact_text()?,
                        password: Password::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptPassword.to_string())
                            .interact()?,
                        phone: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptPhone.to_string())
                            .default(default.phone)
                            .interact_text()?,
                    });
                }
                "session" => {
                    let default = config.session.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleSession);
                    let session = SessionConfig {
                        warning_after_secs: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptWarningAfter.to_string())
                            .default(default.warning_after_secs)
                            .interact_text()?,
                        logout_after_secs: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptLogoutAfter.to_string())
                            .default(default.logout_after_secs)
                            .interact_text()?,
                        debounce_ms: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptDebounce.to_string())
                            .default(default.debounce_ms)
                            .interact_text()?,
                        tick_ms: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptTick.to_string())
                            .default(default.tick_ms)
                            .interact_text()?,
                    };
                    session.validate()?;
                    config.session = Some(session);
                }
                "ai" => {
                    let default = config.ai.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleAi);
                    config.ai = Some(AiConfig {
                        api_url: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptAiUrl.to_string())
                            .default(default.api_url)
                            .interact_text()?,
                        model: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptAiModel.to_string())
                            .default(default.model)
                            .interact_text()?,
                        temperature: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptAiTemperature.to_string())
                            .default(default.temperature)
                            .interact_text()?,
                        max_tokens: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptAiMaxTokens.to_string())
                            .default(default.max_tokens)
                            .interact_text()?,
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
