//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or any Postgres executor) as the first argument.

pub mod episode_repo;
pub mod follow_repo;
pub mod list_repo;
pub mod media_repo;
pub mod message_repo;
pub mod preference_repo;
pub mod profile_repo;
pub mod watched_repo;

pub use episode_repo::EpisodeRepo;
pub use follow_repo::FollowRepo;
pub use list_repo::ListRepo;
pub use media_repo::MediaRepo;
pub use message_repo::MessageRepo;
pub use preference_repo::PreferenceRepo;
pub use profile_repo::ProfileRepo;
pub use watched_repo::WatchedRepo;

/// Split a tri-state patch value into `(write, value)` bind parameters.
pub(crate) fn patch_bind<T: Clone>(value: &Option<Option<T>>) -> (bool, Option<T>) {
    match value {
        None => (false, None),
        Some(inner) => (true, inner.clone()),
    }
}
