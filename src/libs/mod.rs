//! Core library modules for dha: configuration, storage paths, messages,
//! domain types, the idle-session state machine and console rendering.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use dha::libs::habit_log::{upsert_log, LogEntry, MemoryLogStore};
//!
//! let store = MemoryLogStore::with_habits([1]);
//! let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! assert!(upsert_log(&store, &LogEntry::new(1, day, true))?.was_created);
//! # Ok::<(), dha::libs::error::DhaError>(())
//! ```

pub mod config;
pub mod data_storage;
pub mod error;
pub mod habit;
pub mod habit_log;
pub mod idle;
pub mod idle_session;
#[cfg(feature = "input-hooks")]
pub mod input_hooks;
pub mod insight;
pub mod messages;
pub mod secret;
pub mod session;
pub mod validation;
pub mod view;
pub mod week;
