//! Per-user preference state machine.
//!
//! A title can sit in four personal collections: watched, favorite,
//! watchlist and currently-watching. Turning one on evicts the collections
//! it competes with:
//!
//! | Turned on  | Evicts                      |
//! |------------|-----------------------------|
//! | watched    | watchlist, watching         |
//! | watching   | watchlist, watched          |
//! | watchlist  | watched, watching, favorite |
//! | favorite   | watchlist                   |
//!
//! Turning one off touches nothing else, so dropping a favorite keeps the
//! title watched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One of the four personal collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferenceKind {
    Watched,
    Favorite,
    Watchlist,
    Watching,
}

impl PreferenceKind {
    pub const ALL: [PreferenceKind; 4] = [
        PreferenceKind::Watched,
        PreferenceKind::Favorite,
        PreferenceKind::Watchlist,
        PreferenceKind::Watching,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PreferenceKind::Watched => "watched",
            PreferenceKind::Favorite => "favorite",
            PreferenceKind::Watchlist => "watchlist",
            PreferenceKind::Watching => "watching",
        }
    }

    /// Collections evicted when this one is turned on.
    pub fn conflicts(self) -> &'static [PreferenceKind] {
        match self {
            PreferenceKind::Watched => &[PreferenceKind::Watchlist, PreferenceKind::Watching],
            PreferenceKind::Watching => &[PreferenceKind::Watchlist, PreferenceKind::Watched],
            PreferenceKind::Watchlist => &[
                PreferenceKind::Watched,
                PreferenceKind::Watching,
                PreferenceKind::Favorite,
            ],
            PreferenceKind::Favorite => &[PreferenceKind::Watchlist],
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        value.parse()
    }
}

impl fmt::Display for PreferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreferenceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "watched" => Ok(PreferenceKind::Watched),
            "favorite" | "favorites" => Ok(PreferenceKind::Favorite),
            "watchlist" => Ok(PreferenceKind::Watchlist),
            "watching" => Ok(PreferenceKind::Watching),
            other => Err(CoreError::Validation(format!(
                "Invalid list '{other}'. Must be one of: watched, favorite, watchlist, watching"
            ))),
        }
    }
}

/// Membership of one title across the four collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceState {
    pub watched: bool,
    pub favorite: bool,
    pub watchlist: bool,
    pub watching: bool,
}

impl PreferenceState {
    pub fn get(&self, kind: PreferenceKind) -> bool {
        match kind {
            PreferenceKind::Watched => self.watched,
            PreferenceKind::Favorite => self.favorite,
            PreferenceKind::Watchlist => self.watchlist,
            PreferenceKind::Watching => self.watching,
        }
    }

    pub fn set(&mut self, kind: PreferenceKind, value: bool) {
        match kind {
            PreferenceKind::Watched => self.watched = value,
            PreferenceKind::Favorite => self.favorite = value,
            PreferenceKind::Watchlist => self.watchlist = value,
            PreferenceKind::Watching => self.watching = value,
        }
    }

    /// State after the plan has been executed.
    pub fn apply(mut self, plan: &TogglePlan) -> Self {
        for kind in &plan.remove {
            self.set(*kind, false);
        }
        if let Some(kind) = plan.insert {
            self.set(kind, true);
        }
        self
    }
}

/// Row-level changes needed to move from one state to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TogglePlan {
    pub insert: Option<PreferenceKind>,
    pub remove: Vec<PreferenceKind>,
}

impl TogglePlan {
    pub fn is_noop(&self) -> bool {
        self.insert.is_none() && self.remove.is_empty()
    }
}

/// Flip `target`: remove it when present, otherwise turn it on.
pub fn plan_toggle(state: PreferenceState, target: PreferenceKind) -> TogglePlan {
    if state.get(target) {
        TogglePlan {
            insert: None,
            remove: vec![target],
        }
    } else {
        plan_enable(state, target)
    }
}

/// Turn `target` on, evicting the collections it competes with.
///
/// Only memberships that currently exist are listed for removal, so the
/// plan maps one-to-one onto counter adjustments. A target that is already
/// on yields an empty plan.
pub fn plan_enable(state: PreferenceState, target: PreferenceKind) -> TogglePlan {
    if state.get(target) {
        return TogglePlan::default();
    }
    let remove = target
        .conflicts()
        .iter()
        .copied()
        .filter(|kind| state.get(*kind))
        .collect();
    TogglePlan {
        insert: Some(target),
        remove,
    }
}

/// Turn `target` off without touching the other collections.
pub fn plan_disable(state: PreferenceState, target: PreferenceKind) -> TogglePlan {
    if state.get(target) {
        TogglePlan {
            insert: None,
            remove: vec![target],
        }
    } else {
        TogglePlan::default()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn state(watched: bool, favorite: bool, watchlist: bool, watching: bool) -> PreferenceState {
        PreferenceState {
            watched,
            favorite,
            watchlist,
            watching,
        }
    }

    #[test]
    fn watched_evicts_watchlist() {
        let before = state(false, false, true, false);
        let plan = plan_toggle(before, PreferenceKind::Watched);

        assert_eq!(plan.insert, Some(PreferenceKind::Watched));
        assert_eq!(plan.remove, vec![PreferenceKind::Watchlist]);
        assert_eq!(before.apply(&plan), state(true, false, false, false));
    }

    #[test]
    fn watched_evicts_watching_but_keeps_favorite() {
        let before = state(false, true, false, true);
        let after = before.apply(&plan_toggle(before, PreferenceKind::Watched));
        assert_eq!(after, state(true, true, false, false));
    }

    #[test]
    fn removing_favorite_keeps_watched() {
        let before = state(true, true, false, false);
        let plan = plan_toggle(before, PreferenceKind::Favorite);

        assert_eq!(plan.insert, None);
        assert_eq!(plan.remove, vec![PreferenceKind::Favorite]);
        assert_eq!(before.apply(&plan), state(true, false, false, false));
    }

    #[test]
    fn watchlist_evicts_everything_else() {
        let before = state(true, true, false, false);
        let after = before.apply(&plan_toggle(before, PreferenceKind::Watchlist));
        assert_eq!(after, state(false, false, true, false));
    }

    #[test]
    fn watching_evicts_watched_and_watchlist() {
        let before = state(true, false, true, false);
        let plan = plan_toggle(before, PreferenceKind::Watching);
        assert!(plan.remove.contains(&PreferenceKind::Watched));
        assert!(plan.remove.contains(&PreferenceKind::Watchlist));
        assert_eq!(before.apply(&plan), state(false, false, false, true));
    }

    #[test]
    fn favorite_evicts_only_watchlist() {
        let before = state(false, false, true, true);
        let after = before.apply(&plan_toggle(before, PreferenceKind::Favorite));
        assert_eq!(after, state(false, true, false, true));
    }

    #[test]
    fn plan_lists_only_existing_memberships() {
        let plan = plan_toggle(PreferenceState::default(), PreferenceKind::Watchlist);
        assert_eq!(plan.insert, Some(PreferenceKind::Watchlist));
        assert!(plan.remove.is_empty());
    }

    #[test]
    fn toggle_twice_restores_target() {
        let start = state(false, true, false, false);
        let once = start.apply(&plan_toggle(start, PreferenceKind::Watched));
        let twice = once.apply(&plan_toggle(once, PreferenceKind::Watched));
        assert_eq!(twice, start);
    }

    #[test]
    fn enable_and_disable_are_idempotent() {
        let on = state(true, false, false, false);
        assert!(plan_enable(on, PreferenceKind::Watched).is_noop());
        assert!(plan_disable(PreferenceState::default(), PreferenceKind::Watched).is_noop());
    }

    #[test]
    fn no_kind_conflicts_with_itself() {
        for kind in PreferenceKind::ALL {
            assert!(!kind.conflicts().contains(&kind), "{kind} conflicts with itself");
        }
    }

    #[test]
    fn parse_accepts_plural_favorites() {
        assert_eq!(PreferenceKind::parse("favorites").unwrap(), PreferenceKind::Favorite);
        assert_matches!(PreferenceKind::parse("liked"), Err(CoreError::Validation(_)));
    }
}
