//! # carnet-store
//!
//! SQLite persistence for the carnet address book.
//!
//! The crate exposes a synchronous [`Database`] handle that wraps a
//! `rusqlite::Connection` and provides typed CRUD helpers for users and
//! their contacts. Every contact helper is scoped to the owning user.

pub mod contacts;
pub mod database;
pub mod migrations;
pub mod models;
pub mod users;

mod error;

pub use database::Database;
pub use error::StoreError;
pub use models::*;
