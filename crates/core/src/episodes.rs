//! TV episode progress: key validation and backfill planning.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Rows per bulk insert statement when backfilling watched episodes.
pub const BACKFILL_CHUNK_SIZE: usize = 200;

/// Season number TMDB uses for specials.
pub const SPECIALS_SEASON: i32 = 0;

/// Upper bound on season numbers accepted from clients.
pub const MAX_SEASON_NUMBER: i32 = 1_000;

/// Upper bound on episode numbers accepted from clients.
pub const MAX_EPISODE_NUMBER: i32 = 10_000;

/// `(season, episode)` position inside a show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EpisodeKey {
    pub season_number: i32,
    pub episode_number: i32,
}

impl EpisodeKey {
    pub fn new(season_number: i32, episode_number: i32) -> Result<Self, CoreError> {
        validate_season_number(season_number)?;
        if !(1..=MAX_EPISODE_NUMBER).contains(&episode_number) {
            return Err(CoreError::Validation(format!(
                "episode_number must be between 1 and {MAX_EPISODE_NUMBER}, got {episode_number}"
            )));
        }
        Ok(Self {
            season_number,
            episode_number,
        })
    }
}

pub fn validate_season_number(season_number: i32) -> Result<(), CoreError> {
    if !(0..=MAX_SEASON_NUMBER).contains(&season_number) {
        return Err(CoreError::Validation(format!(
            "season_number must be between 0 and {MAX_SEASON_NUMBER}, got {season_number}"
        )));
    }
    Ok(())
}

/// Which part of a show a backfill marks as watched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum BackfillScope {
    /// Every regular season. Specials are skipped.
    All,
    /// A single season, specials included when asked for explicitly.
    Season { season: i32 },
    /// Every regular episode up to and including the given one.
    Through { season: i32, episode: i32 },
}

impl BackfillScope {
    pub fn validate(&self) -> Result<(), CoreError> {
        match *self {
            BackfillScope::All => Ok(()),
            BackfillScope::Season { season } => validate_season_number(season),
            BackfillScope::Through { season, episode } => {
                EpisodeKey::new(season, episode)?;
                // Specials have no place in the regular running order.
                if season == SPECIALS_SEASON {
                    return Err(CoreError::Validation(
                        "A \"through\" backfill must end in a regular season; \
                         use {\"scope\":\"season\",\"season\":0} for specials"
                            .into(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Whether episodes of `season_number` can be part of this backfill.
    pub fn includes_season(&self, season_number: i32) -> bool {
        match *self {
            BackfillScope::All => season_number != SPECIALS_SEASON,
            BackfillScope::Season { season } => season_number == season,
            BackfillScope::Through { season, .. } => {
                season_number != SPECIALS_SEASON && season_number <= season
            }
        }
    }

    pub fn includes(&self, key: EpisodeKey) -> bool {
        if !self.includes_season(key.season_number) {
            return false;
        }
        match *self {
            BackfillScope::Through { season, episode } if key.season_number == season => {
                key.episode_number <= episode
            }
            _ => true,
        }
    }
}

/// Season numbers that must be fetched for `scope`, in ascending order.
///
/// Fails when the scope names a season the show does not have.
pub fn seasons_to_fetch(
    scope: &BackfillScope,
    available: &[i32],
) -> Result<Vec<i32>, CoreError> {
    let mut seasons: Vec<i32> = available
        .iter()
        .copied()
        .filter(|s| scope.includes_season(*s))
        .collect();
    seasons.sort_unstable();
    seasons.dedup();

    let named = match *scope {
        BackfillScope::All => None,
        BackfillScope::Season { season } | BackfillScope::Through { season, .. } => Some(season),
    };
    if let Some(season) = named {
        if !available.contains(&season) {
            return Err(CoreError::Validation(format!(
                "Show has no season {season}"
            )));
        }
    }

    Ok(seasons)
}

/// Enumerate the episode keys of one fetched season that fall inside `scope`.
pub fn episodes_in_scope(
    scope: &BackfillScope,
    season_number: i32,
    episode_numbers: &[i32],
) -> Vec<EpisodeKey> {
    let mut keys: Vec<EpisodeKey> = episode_numbers
        .iter()
        .filter(|n| **n >= 1)
        .map(|n| EpisodeKey {
            season_number,
            episode_number: *n,
        })
        .filter(|key| scope.includes(*key))
        .collect();
    keys.sort_unstable();
    keys.dedup();
    keys
}

/// Per-season watched counts for a progress summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonProgress {
    pub season_number: i32,
    pub watched_count: usize,
}

pub fn summarize_progress(keys: &[EpisodeKey]) -> Vec<SeasonProgress> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for key in keys {
        *counts.entry(key.season_number).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(season_number, watched_count)| SeasonProgress {
            season_number,
            watched_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn episode_key_bounds() {
        assert!(EpisodeKey::new(1, 1).is_ok());
        assert!(EpisodeKey::new(0, 3).is_ok());
        assert_matches!(EpisodeKey::new(1, 0), Err(CoreError::Validation(_)));
        assert_matches!(EpisodeKey::new(-1, 2), Err(CoreError::Validation(_)));
    }

    #[test]
    fn all_scope_skips_specials() {
        let seasons = seasons_to_fetch(&BackfillScope::All, &[0, 1, 2, 3]).unwrap();
        assert_eq!(seasons, vec![1, 2, 3]);
    }

    #[test]
    fn season_scope_can_target_specials() {
        let scope = BackfillScope::Season { season: 0 };
        assert_eq!(seasons_to_fetch(&scope, &[0, 1]).unwrap(), vec![0]);
    }

    #[test]
    fn missing_season_is_rejected() {
        let scope = BackfillScope::Season { season: 7 };
        assert_matches!(seasons_to_fetch(&scope, &[1, 2]), Err(CoreError::Validation(_)));
    }

    #[test]
    fn through_scope_cuts_last_season() {
        let scope = BackfillScope::Through {
            season: 2,
            episode: 3,
        };
        assert_eq!(seasons_to_fetch(&scope, &[0, 1, 2, 3]).unwrap(), vec![1, 2]);

        let first = episodes_in_scope(&scope, 1, &[1, 2, 3, 4, 5]);
        assert_eq!(first.len(), 5);

        let second = episodes_in_scope(&scope, 2, &[1, 2, 3, 4, 5]);
        assert_eq!(
            second,
            vec![
                EpisodeKey { season_number: 2, episode_number: 1 },
                EpisodeKey { season_number: 2, episode_number: 2 },
                EpisodeKey { season_number: 2, episode_number: 3 },
            ]
        );
    }

    #[test]
    fn through_scope_cannot_end_in_specials() {
        let scope = BackfillScope::Through {
            season: 0,
            episode: 3,
        };
        assert_matches!(scope.validate(), Err(CoreError::Validation(_)));
        assert!(BackfillScope::Season { season: 0 }.validate().is_ok());
    }

    #[test]
    fn enumeration_drops_duplicates_and_zero() {
        let keys = episodes_in_scope(&BackfillScope::All, 1, &[2, 1, 2, 0]);
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].episode_number, 1);
    }

    #[test]
    fn scope_deserializes_from_tagged_json() {
        let scope: BackfillScope =
            serde_json::from_str(r#"{"scope":"through","season":2,"episode":4}"#).unwrap();
        assert_eq!(scope, BackfillScope::Through { season: 2, episode: 4 });

        let scope: BackfillScope = serde_json::from_str(r#"{"scope":"all"}"#).unwrap();
        assert_eq!(scope, BackfillScope::All);
    }

    #[test]
    fn progress_summary_groups_by_season() {
        let keys = [
            EpisodeKey { season_number: 1, episode_number: 1 },
            EpisodeKey { season_number: 1, episode_number: 2 },
            EpisodeKey { season_number: 2, episode_number: 1 },
        ];
        let summary = summarize_progress(&keys);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].watched_count, 2);
        assert_eq!(summary[1].season_number, 2);
    }
}
