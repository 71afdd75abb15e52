//! Request extractors.
//!
//! - [`auth::AuthUser`] -- the authenticated user, from a Bearer header or
//!   the provider's session cookie.

pub mod auth;
