//! Support preferences parsed from raw comma-separated settings.
//!
//! # Syntax
//!
//! | Setting | Example | Result |
//! |---------|---------|--------|
//! | Friend names | `"Alice, any, Bob"` | `["Alice", "Bob"]` |
//! | Servants | `"Merlin,Skadi"` | `["Merlin", "Skadi"]` |
//! | Craft essences | `"*Kaleidoscope, Black Grail"` | see below |
//!
//! A leading `*` on a craft essence asks for a limit-broken copy, so the last
//! example yields `("Kaleidoscope", true)` then `("Black Grail", false)`.
//!
//! `any` (in any casing) means "no preference" and is never kept as a name.
//! Order is match priority.

use serde::{Deserialize, Serialize};

use crate::selector::SelectionMode;

/// Leading marker on a craft essence entry requesting a limit-broken copy.
pub const LIMIT_BROKEN_MARKER: char = '*';

const ANY: &str = "any";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftEssencePreference {
    pub name: String,
    pub prefer_limit_broken: bool,
}

/// Numeric and boolean knobs of the search loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Only accept supports owned by a friend.
    pub friends_only: bool,
    /// Swipes before the list is refreshed.
    pub swipes_per_refresh: u32,
    /// Refreshes before giving up on the current mode.
    pub max_refreshes: u32,
    /// Mode used once swipes and refreshes are exhausted.
    pub fallback_mode: SelectionMode,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            friends_only: false,
            swipes_per_refresh: 10,
            max_refreshes: 3,
            fallback_mode: SelectionMode::First,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreferenceSet {
    pub friend_names: Vec<String>,
    pub preferred_servants: Vec<String>,
    pub preferred_craft_essences: Vec<CraftEssencePreference>,
    pub options: SearchOptions,
}

impl PreferenceSet {
    /// Parse the three raw lists. Options start at their defaults.
    #[must_use]
    pub fn parse(raw_friends: &str, raw_servants: &str, raw_craft_essences: &str) -> Self {
        Self {
            friend_names: split_names(raw_friends).collect(),
            preferred_servants: split_names(raw_servants).collect(),
            preferred_craft_essences: split_names(raw_craft_essences)
                .filter_map(parse_craft_essence)
                .collect(),
            options: SearchOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn has_friends(&self) -> bool {
        !self.friend_names.is_empty()
    }

    pub fn has_servants(&self) -> bool {
        !self.preferred_servants.is_empty()
    }

    pub fn has_craft_essences(&self) -> bool {
        !self.preferred_craft_essences.is_empty()
    }
}

/// Split on commas, trim, and drop blanks and `any`.
fn split_names(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty() && !token.eq_ignore_ascii_case(ANY))
        .map(String::from)
}

fn parse_craft_essence(token: String) -> Option<CraftEssencePreference> {
    let prefer_limit_broken = token.starts_with(LIMIT_BROKEN_MARKER);
    let name = token.replace(LIMIT_BROKEN_MARKER, "").trim().to_string();
    if name.is_empty() {
        return None;
    }
    Some(CraftEssencePreference {
        name,
        prefer_limit_broken,
    })
}
