//! Fixed geometry of the support selection screen.
//!
//! Defaults are measured on a 2560x1440 canvas. Every entry can be overridden
//! from configuration; missing fields keep their default.

use serde::{Deserialize, Serialize};

use crate::region::{Point, Region};

/// Height of a craft essence tile, used for the limit-break check.
pub const CRAFT_ESSENCE_HEIGHT: i32 = 90;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportLayout {
    /// Where the support-screen marker renders.
    pub screen_region: Region,
    /// Search area for servant and craft essence images.
    pub list_region: Region,
    /// Column of friend badges over the visible list.
    pub friend_marker_region: Region,
    /// Search area for friend name images.
    pub friends_region: Region,
    /// Limit-break overlay region; only `y` is moved per craft essence.
    pub limit_break_region: Region,
    /// One full row with `y = 0`, moved onto each anchor.
    pub row_template: Region,
    /// Column where row anchors render.
    pub anchor_strip: Region,
    /// Distance from a row's top edge down to its anchor.
    pub anchor_offset: i32,
    pub first_slot: Point,
    pub refresh_button: Point,
    pub refresh_confirm: Point,
    pub list_top: Point,
    pub swipe_start: Point,
    pub swipe_end: Point,
}

impl Default for SupportLayout {
    fn default() -> Self {
        let list_region = Region::new(70, 332, 378, 1091);
        Self {
            screen_region: Region::new(0, 0, 110, 332),
            list_region,
            friend_marker_region: Region::new(2140, list_region.y, 120, list_region.height),
            friends_region: Region::new(448, 332, 1132, 1090),
            limit_break_region: Region::new(376, 0, 20, CRAFT_ESSENCE_HEIGHT),
            row_template: Region::new(76, 0, 2356, 428),
            anchor_strip: Region::new(1670, 0, 90, 1440),
            anchor_offset: 156,
            first_slot: Point::new(1900, 500),
            refresh_button: Point::new(1670, 250),
            refresh_confirm: Point::new(1480, 1110),
            list_top: Point::new(2480, 360),
            swipe_start: Point::new(35, 1190),
            swipe_end: Point::new(5, 660),
        }
    }
}
