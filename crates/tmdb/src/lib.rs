//! Gateway to the TMDB catalog.
//!
//! [`TmdbClient`] performs read-only REST calls with a per-attempt timeout
//! and bounded retry. [`shape`] turns TMDB payloads into the shapes the API
//! returns to clients.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod retry;
pub mod shape;

pub use client::TmdbClient;
pub use config::{TmdbConfig, TmdbCredential};
pub use error::TmdbError;
