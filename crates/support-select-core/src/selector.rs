//! Support selection state machine.
//!
//! ```text
//!  select_support(mode)
//!        │ validate mode (no device access)
//!        ▼
//!  WaitingForScreen ──timeout──▶ error
//!        │
//!        ├─ First ─▶ click first slot ─▶ done
//!        │     (still on screen: refresh and re-click)
//!        ▼
//!    Searching ──Found──▶ click ─▶ done
//!        │ NotFound / NoFriendsVisible
//!        ├─ swipes left ──▶ Scrolling ──▶ Searching
//!        ├─ refreshes left ─▶ Refreshing ─▶ Searching
//!        └─ GaveUp ─▶ list top ─▶ select_support(fallback)
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::bounds::resolve_row_bounds;
use crate::device::Device;
use crate::error::{Result, SelectError};
use crate::layout::SupportLayout;
use crate::pattern::PatternKey;
use crate::preferences::PreferenceSet;
use crate::region::Region;
use crate::snapshot::with_same_snapshot;
use crate::strategy::SearchMethod;
use crate::verify::is_friend;

/// Re-entries through the fallback mode before giving up for good.
pub const MAX_FALLBACK_DEPTH: usize = 8;

pub const REFRESH_NOTICE: &str = "Support list will be updated in 3 seconds.";

const SCREEN_POLL_INTERVAL: Duration = Duration::from_millis(100);
const AFTER_SWIPE: Duration = Duration::from_millis(300);
const BEFORE_REFRESH: Duration = Duration::from_secs(3);
const AFTER_REFRESH_CLICK: Duration = Duration::from_secs(1);
const AFTER_REFRESH_CONFIRM: Duration = Duration::from_secs(3);
const BEFORE_FIRST_CLICK: Duration = Duration::from_secs(1);
const FIRST_RECOVERY_SETTLE: Duration = Duration::from_secs(2);
const FIRST_RECOVERY_COOLDOWN: Duration = Duration::from_secs(10);
const AFTER_FIRST_CLICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Take whatever is in the first slot.
    First,
    /// Let the user pick. Not implemented.
    Manual,
    /// Search by friend name.
    Friend,
    /// Search by preferred servants and craft essences.
    Preferred,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::First => write!(f, "first"),
            SelectionMode::Manual => write!(f, "manual"),
            SelectionMode::Friend => write!(f, "friend"),
            SelectionMode::Preferred => write!(f, "preferred"),
        }
    }
}

impl FromStr for SelectionMode {
    type Err = SelectError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(SelectionMode::First),
            "manual" => Ok(SelectionMode::Manual),
            "friend" => Ok(SelectionMode::Friend),
            "preferred" => Ok(SelectionMode::Preferred),
            _ => Err(SelectError::invalid_mode(s)),
        }
    }
}

/// Result of searching one viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Region),
    NotFound,
    /// No friend badge anywhere on screen; nothing here can qualify.
    NoFriendsVisible,
}

/// Limits that keep the controller from waiting forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadlines {
    /// How long to wait for the support screen to appear.
    pub screen_timeout: Duration,
    /// Refresh-and-reclick attempts when the first slot click does not register.
    pub first_slot_retries: u32,
}

impl Default for Deadlines {
    fn default() -> Self {
        Self {
            screen_timeout: Duration::from_secs(30),
            first_slot_retries: 10,
        }
    }
}

/// Drives a [`Device`] until a support is selected.
pub struct SupportSelector<'a, D: Device> {
    device: &'a mut D,
    prefs: &'a PreferenceSet,
    layout: &'a SupportLayout,
    deadlines: Deadlines,
}

impl<'a, D: Device> SupportSelector<'a, D> {
    pub fn new(device: &'a mut D, prefs: &'a PreferenceSet, layout: &'a SupportLayout) -> Self {
        Self {
            device,
            prefs,
            layout,
            deadlines: Deadlines::default(),
        }
    }

    #[must_use]
    pub fn with_deadlines(mut self, deadlines: Deadlines) -> Self {
        self.deadlines = deadlines;
        self
    }

    /// Select a support using `mode`.
    ///
    /// Configuration errors surface before the device is touched. Every other
    /// path either selects something and returns `true` or fails with an error.
    pub fn select_support(&mut self, mode: SelectionMode) -> Result<bool> {
        self.select_at_depth(mode, 0)
    }

    fn select_at_depth(&mut self, mode: SelectionMode, depth: usize) -> Result<bool> {
        if depth > MAX_FALLBACK_DEPTH {
            return Err(SelectError::fallback_limit(MAX_FALLBACK_DEPTH));
        }

        let method = SearchMethod::decide(mode, self.prefs)?;
        info!(%mode, depth, "Selecting support");

        self.wait_for_screen()?;

        match method {
            None => self.select_first(),
            Some(method) => self.select_preferred(method, depth),
        }
    }

    fn support_screen_visible(&mut self) -> Result<bool> {
        let pattern = self.device.load_pattern(&PatternKey::SupportScreen)?;
        self.device.exists(self.layout.screen_region, &pattern)
    }

    fn wait_for_screen(&mut self) -> Result<()> {
        debug!("state: waiting_for_screen");
        let timeout = self.deadlines.screen_timeout;
        let attempts = (timeout.as_millis() / SCREEN_POLL_INTERVAL.as_millis()).max(1);

        for _ in 0..attempts {
            if self.support_screen_visible()? {
                return Ok(());
            }
            self.device.sleep(SCREEN_POLL_INTERVAL);
        }
        if self.support_screen_visible()? {
            return Ok(());
        }
        Err(SelectError::screen_timeout(
            "the support selection screen",
            timeout.as_millis(),
        ))
    }

    fn select_first(&mut self) -> Result<bool> {
        self.device.sleep(BEFORE_FIRST_CLICK);
        self.device.click(self.layout.first_slot)?;

        if !self.support_screen_visible()? {
            info!("state: found (first slot)");
            return Ok(true);
        }

        // The first click is sometimes swallowed right after the list loads.
        warn!("First support click did not register, refreshing the list");
        self.device.sleep(FIRST_RECOVERY_SETTLE);

        let mut attempts = 0;
        while self.support_screen_visible()? {
            if attempts >= self.deadlines.first_slot_retries {
                return Err(SelectError::first_slot_not_registered(attempts));
            }
            attempts += 1;

            self.device.sleep(FIRST_RECOVERY_COOLDOWN);
            self.refresh_list()?;
            self.device.click(self.layout.first_slot)?;
            self.device.sleep(AFTER_FIRST_CLICK);
        }

        info!(attempts, "state: found (first slot after refresh)");
        Ok(true)
    }

    fn select_preferred(&mut self, method: SearchMethod, depth: usize) -> Result<bool> {
        let options = self.prefs.options;
        let mut swipes = 0;
        let mut refreshes = 0;

        loop {
            debug!(?method, swipes, refreshes, "state: searching");

            match self.search_visible(method)? {
                SearchOutcome::Found(support) => {
                    info!(?support, swipes, refreshes, "state: found");
                    self.device.click(support.center())?;
                    return Ok(true);
                }
                SearchOutcome::NotFound if swipes < options.swipes_per_refresh => {
                    debug!("state: scrolling");
                    self.scroll_list()?;
                    swipes += 1;
                    self.device.sleep(AFTER_SWIPE);
                }
                _ if refreshes < options.max_refreshes => {
                    debug!("state: refreshing");
                    self.device.notify(REFRESH_NOTICE);
                    self.device.sleep(BEFORE_REFRESH);
                    self.refresh_list()?;
                    refreshes += 1;
                    swipes = 0;
                }
                _ => {
                    info!(fallback = %options.fallback_mode, "state: gave_up");
                    self.device.click(self.layout.list_top)?;
                    return self.select_at_depth(options.fallback_mode, depth + 1);
                }
            }
        }
    }

    /// Friend check and candidate search against a single frame.
    fn search_visible(&mut self, method: SearchMethod) -> Result<SearchOutcome> {
        let prefs = self.prefs;
        let layout = self.layout;

        with_same_snapshot(&mut *self.device, |device| {
            if !is_friend(device, &prefs.options, layout.friend_marker_region)? {
                return Ok(SearchOutcome::NoFriendsVisible);
            }

            let Some(candidate) = method.search(device, prefs, layout)? else {
                return Ok(SearchOutcome::NotFound);
            };

            let bounds = match candidate.bounds {
                Some(bounds) => bounds,
                None => resolve_row_bounds(device, layout, candidate.support)?,
            };

            // A friend badge elsewhere on screen says nothing about this row.
            if !is_friend(device, &prefs.options, bounds)? {
                debug!(?bounds, "Candidate row is not a friend");
                return Ok(SearchOutcome::NotFound);
            }

            Ok(SearchOutcome::Found(candidate.support))
        })
    }

    fn scroll_list(&mut self) -> Result<()> {
        let (from, to) = (self.layout.swipe_start, self.layout.swipe_end);
        self.device.scroll(from, to)
    }

    fn refresh_list(&mut self) -> Result<()> {
        self.device.click(self.layout.refresh_button)?;
        self.device.sleep(AFTER_REFRESH_CLICK);
        self.device.click(self.layout.refresh_confirm)?;
        self.device.sleep(AFTER_REFRESH_CONFIRM);
        Ok(())
    }
}
