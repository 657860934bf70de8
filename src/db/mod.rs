//! SQLite persistence for habits, their daily logs and the built-in
//! templates.
//!
//! [`db::Db`] opens the connection, enables foreign keys and applies pending
//! migrations. The table managers borrow that connection, so several of them
//! can work inside one command without reopening the file.
//!
//! ```rust
//! use dha::db::{db::Db, habits::Habits};
//! use dha::libs::habit::HabitDraft;
//!
//! let db = Db::open_in_memory()?;
//! let habit = Habits::new(&db).create(&HabitDraft::new("Read"))?;
//! assert_eq!(habit.color, "#3b82f6");
//! # Ok::<(), dha::libs::error::DhaError>(())
//! ```

pub mod db;
pub mod habit_logs;
pub mod habits;
pub mod migrations;
pub mod predefined;
