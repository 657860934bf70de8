//! # dha - Daily Habits & Activities
//!
//! A command-line habit tracker backed by SQLite.
//!
//! ## Features
//!
//! - **Habits**: create, search, edit and delete the habits you track
//! - **Daily logs**: one record per habit and day, written through an upsert
//! - **Weekly grid**: Monday-to-Sunday overview with one-step toggling
//! - **Predefined habits**: a built-in catalogue to adopt from
//! - **Sessions**: local sign-in with an inactivity warning and automatic sign-out
//! - **Insights**: ask an OpenAI-compatible assistant about your own data
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dha::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
