//! # carnet-shared
//!
//! Domain logic shared by the store and the HTTP server: request schemas
//! and their validation, the upcoming-birthday filter, avatar naming and
//! bearer-token hashing. Nothing in this crate performs I/O.

pub mod avatar;
pub mod birthday;
pub mod constants;
pub mod error;
pub mod schemas;
pub mod token;
