//! Scripted support list simulator.
//!
//! Renders a scene (pages of support entries) onto the stock layout and
//! answers template queries from it. Lets the selector run end to end without
//! a phone attached.
//!
//! # Rendering
//!
//! Rows are stacked at the row template height from the top of the list
//! region. Within each row:
//!
//! | Sprite | Position (relative to row top) |
//! |--------|--------------------------------|
//! | servant | list column, +40, 300x200 |
//! | craft essence | list column, +260, 270x90 |
//! | limit-break overlay | limit-break column, aligned with the craft essence |
//! | friend badge | friend column, +60 |
//! | friend name | friend-name column, +40 |
//! | anchor | anchor strip, +anchor_offset |
//!
//! A query matches sprites fully contained in the query region.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use support_select_core::device::{Gestures, Notifier, Screen, Sleeper};
use support_select_core::layout::{SupportLayout, CRAFT_ESSENCE_HEIGHT};
use support_select_core::pattern::PatternKey;
use support_select_core::selector::SelectionMode;
use support_select_core::{Point, Region, Result, SelectError};

const SERVANT_SIZE: (i32, i32) = (300, 200);
const CRAFT_ESSENCE_WIDTH: i32 = 270;
const BADGE_SIZE: (i32, i32) = (100, 60);
const NAME_SIZE: (i32, i32) = (400, 60);
const ANCHOR_SIZE: (i32, i32) = (60, 40);

/// One support entry in the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneEntry {
    pub servant: Option<String>,
    pub craft_essence: Option<String>,
    pub limit_broken: bool,
    pub friend: bool,
    pub friend_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    /// One list per refresh; the last list repeats.
    pub pages: Vec<Vec<SceneEntry>>,
    /// First-slot clicks that do not register.
    pub ignored_first_clicks: u32,
    /// Support-screen checks that fail before the screen shows up.
    pub screen_delay_polls: u32,
}

/// What happened during a simulated run.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub success: bool,
    pub mode: SelectionMode,
    pub selected: Option<SceneEntry>,
    pub scrolls: u32,
    pub refreshes: u32,
    pub clicks: u32,
    pub waited_secs: f64,
    pub notices: Vec<String>,
}

type Sprite = (PatternKey, Region);

pub struct SimDevice {
    layout: SupportLayout,
    scene: Scene,
    page: usize,
    offset: i32,
    on_support_screen: bool,
    confirm_pending: bool,
    ignored_first_clicks: u32,
    screen_delay_polls: u32,
    held: Option<Vec<Sprite>>,
    selected: Option<SceneEntry>,
    scrolls: u32,
    refreshes: u32,
    clicks: u32,
    waited: Duration,
    notices: Vec<String>,
}

impl SimDevice {
    pub fn new(scene: Scene, layout: SupportLayout) -> Self {
        Self {
            ignored_first_clicks: scene.ignored_first_clicks,
            screen_delay_polls: scene.screen_delay_polls,
            layout,
            scene,
            page: 0,
            offset: 0,
            on_support_screen: true,
            confirm_pending: false,
            held: None,
            selected: None,
            scrolls: 0,
            refreshes: 0,
            clicks: 0,
            waited: Duration::ZERO,
            notices: Vec::new(),
        }
    }

    pub fn selected(&self) -> Option<&SceneEntry> {
        self.selected.as_ref()
    }

    pub fn report(&self, mode: SelectionMode, success: bool) -> SimReport {
        SimReport {
            success,
            mode,
            selected: self.selected.clone(),
            scrolls: self.scrolls,
            refreshes: self.refreshes,
            clicks: self.clicks,
            waited_secs: self.waited.as_secs_f64(),
            notices: self.notices.clone(),
        }
    }

    fn entries(&self) -> &[SceneEntry] {
        self.scene
            .pages
            .get(self.page)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn row(&self, index: usize) -> Region {
        let template = self.layout.row_template;
        let top = self.layout.list_region.y + index as i32 * template.height - self.offset;
        template.with_y(top)
    }

    fn max_offset(&self) -> i32 {
        let content = self.entries().len() as i32 * self.layout.row_template.height;
        (content - self.layout.list_region.height).max(0)
    }

    fn render(&self) -> Vec<Sprite> {
        let layout = &self.layout;
        let mut sprites = Vec::new();

        for (index, entry) in self.entries().iter().enumerate() {
            let top = self.row(index).y;
            let list_x = layout.list_region.x + 30;

            sprites.push((
                PatternKey::RegionAnchor,
                Region::new(
                    layout.anchor_strip.x + 10,
                    top + layout.anchor_offset,
                    ANCHOR_SIZE.0,
                    ANCHOR_SIZE.1,
                ),
            ));
            if let Some(servant) = &entry.servant {
                sprites.push((
                    PatternKey::support_image(servant),
                    Region::new(list_x, top + 40, SERVANT_SIZE.0, SERVANT_SIZE.1),
                ));
            }
            if let Some(craft_essence) = &entry.craft_essence {
                let tile = Region::new(
                    list_x,
                    top + 260,
                    CRAFT_ESSENCE_WIDTH,
                    CRAFT_ESSENCE_HEIGHT,
                );
                sprites.push((PatternKey::support_image(craft_essence), tile));
                if entry.limit_broken {
                    sprites.push((
                        PatternKey::LimitBroken,
                        layout.limit_break_region.with_y(tile.y),
                    ));
                }
            }
            if entry.friend {
                sprites.push((
                    PatternKey::FriendMarker,
                    Region::new(
                        layout.friend_marker_region.x + 10,
                        top + 60,
                        BADGE_SIZE.0,
                        BADGE_SIZE.1,
                    ),
                ));
            }
            if let Some(name) = &entry.friend_name {
                sprites.push((
                    PatternKey::support_image(name),
                    Region::new(
                        layout.friends_region.x + 52,
                        top + 40,
                        NAME_SIZE.0,
                        NAME_SIZE.1,
                    ),
                ));
            }
        }
        sprites
    }

    fn matches(&self, region: Region, pattern: &PatternKey) -> Vec<Region> {
        let fresh;
        let sprites = match &self.held {
            Some(held) => held,
            None => {
                fresh = self.render();
                &fresh
            }
        };

        let mut found: Vec<Region> = sprites
            .iter()
            .filter(|(key, at)| key == pattern && region.contains(at))
            .map(|(_, at)| *at)
            .collect();
        found.sort_by_key(|r| (r.y, r.x));
        found
    }

    /// Select the row under `at`, if it is inside the visible list.
    fn select_at(&mut self, at: Point) {
        let list = self.layout.list_region;
        if at.y < list.y || at.y >= list.bottom() {
            return;
        }
        let hit = (0..self.entries().len()).find(|&i| self.row(i).contains_point(at));
        let Some(index) = hit else {
            debug!(?at, "Click hit no row");
            return;
        };

        let entry = self.entries()[index].clone();
        info!(?entry, "Support selected");
        self.selected = Some(entry);
        self.on_support_screen = false;
    }
}

impl Screen for SimDevice {
    type Pattern = PatternKey;

    fn load_pattern(&mut self, key: &PatternKey) -> Result<PatternKey> {
        if let PatternKey::SupportImage(name) = key {
            if name.trim().is_empty() {
                return Err(SelectError::device_with_suggestion(
                    "No template for an empty support name",
                    "Remove empty entries from the preference lists",
                ));
            }
        }
        Ok(key.clone())
    }

    fn exists(&mut self, region: Region, pattern: &PatternKey) -> Result<bool> {
        if *pattern == PatternKey::SupportScreen {
            if self.screen_delay_polls > 0 {
                self.screen_delay_polls -= 1;
                return Ok(false);
            }
            return Ok(self.on_support_screen);
        }
        Ok(!self.matches(region, pattern).is_empty())
    }

    fn find_all(&mut self, region: Region, pattern: &PatternKey) -> Result<Vec<Region>> {
        let found = self.matches(region, pattern);
        trace!(%pattern, ?region, matches = found.len(), "find_all");
        Ok(found)
    }

    fn hold_snapshot(&mut self) -> Result<()> {
        self.held = Some(self.render());
        Ok(())
    }

    fn release_snapshot(&mut self) {
        self.held = None;
    }
}

impl Gestures for SimDevice {
    fn click(&mut self, at: Point) -> Result<()> {
        self.clicks += 1;
        debug!(?at, "click");

        if at == self.layout.refresh_button {
            self.confirm_pending = true;
        } else if at == self.layout.refresh_confirm && self.confirm_pending {
            self.confirm_pending = false;
            self.refreshes += 1;
            if self.page + 1 < self.scene.pages.len() {
                self.page += 1;
            }
            self.offset = 0;
        } else if at == self.layout.list_top {
            self.offset = 0;
        } else if at == self.layout.first_slot && self.ignored_first_clicks > 0 {
            self.ignored_first_clicks -= 1;
            debug!("First slot click ignored");
        } else {
            self.select_at(at);
        }
        Ok(())
    }

    fn scroll(&mut self, from: Point, to: Point) -> Result<()> {
        self.scrolls += 1;
        self.offset = (self.offset + from.y - to.y).clamp(0, self.max_offset());
        debug!(offset = self.offset, "scroll");
        Ok(())
    }
}

impl Sleeper for SimDevice {
    fn sleep(&mut self, duration: Duration) {
        self.waited += duration;
    }
}

impl Notifier for SimDevice {
    fn notify(&mut self, message: &str) {
        info!("{}", message);
        self.notices.push(message.to_string());
    }
}
