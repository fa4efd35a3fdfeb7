//! Raw support configuration as stored on disk.
//!
//! ```json
//! {
//!   "friend_names": "Alice, Bob",
//!   "preferred_servants": "Merlin, Skadi",
//!   "preferred_craft_essences": "*Kaleidoscope, Black Grail",
//!   "friends_only": true,
//!   "swipes_per_refresh": 10,
//!   "max_refreshes": 3,
//!   "fallback_to": "first"
//! }
//! ```
//!
//! Every field is optional.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::layout::SupportLayout;
use crate::preferences::{PreferenceSet, SearchOptions};
use crate::selector::{Deadlines, SelectionMode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportConfig {
    pub mode: SelectionMode,
    pub friend_names: String,
    pub preferred_servants: String,
    pub preferred_craft_essences: String,
    pub friends_only: bool,
    pub swipes_per_refresh: u32,
    pub max_refreshes: u32,
    pub fallback_to: SelectionMode,
    pub screen_timeout_ms: u64,
    pub first_slot_retries: u32,
    pub layout: SupportLayout,
}

impl Default for SupportConfig {
    fn default() -> Self {
        let options = SearchOptions::default();
        let deadlines = Deadlines::default();
        Self {
            mode: SelectionMode::First,
            friend_names: String::new(),
            preferred_servants: String::new(),
            preferred_craft_essences: String::new(),
            friends_only: options.friends_only,
            swipes_per_refresh: options.swipes_per_refresh,
            max_refreshes: options.max_refreshes,
            fallback_to: options.fallback_mode,
            screen_timeout_ms: deadlines.screen_timeout.as_millis() as u64,
            first_slot_retries: deadlines.first_slot_retries,
            layout: SupportLayout::default(),
        }
    }
}

impl SupportConfig {
    /// Parse the raw lists and attach the search knobs.
    pub fn preferences(&self) -> PreferenceSet {
        PreferenceSet::parse(
            &self.friend_names,
            &self.preferred_servants,
            &self.preferred_craft_essences,
        )
        .with_options(SearchOptions {
            friends_only: self.friends_only,
            swipes_per_refresh: self.swipes_per_refresh,
            max_refreshes: self.max_refreshes,
            fallback_mode: self.fallback_to,
        })
    }

    pub fn deadlines(&self) -> Deadlines {
        Deadlines {
            screen_timeout: Duration::from_millis(self.screen_timeout_ms),
            first_slot_retries: self.first_slot_retries,
        }
    }
}
