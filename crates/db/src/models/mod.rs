//! Row structs and DTOs.
//!
//! Each submodule contains `FromRow` + `Serialize` structs matching database
//! rows (or joined projections) and the input structs repositories accept.

pub mod episode;
pub mod follow;
pub mod list;
pub mod media;
pub mod message;
pub mod profile;
pub mod watched;
