//! Authentication primitives.
//!
//! - [`jwt`] -- verification of access tokens issued by the auth provider.

pub mod jwt;
