//! Domain rules for Let's See.
//!
//! This crate has no IO. It holds the identifiers, validation helpers and
//! small state machines shared by the database and API layers.

pub mod episodes;
pub mod error;
pub mod lists;
pub mod media;
pub mod messaging;
pub mod preferences;
pub mod profiles;
pub mod search;
pub mod types;
pub mod watched;
