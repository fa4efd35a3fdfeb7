//! Row bounds resolution.
//!
//! Every support row renders an anchor marker at a fixed column. Sliding the
//! row template onto each anchor gives the candidate rows; the first one that
//! fully encloses a matched image is that image's row.

use tracing::{debug, warn};

use crate::device::{Notifier, Screen};
use crate::error::Result;
use crate::layout::SupportLayout;
use crate::pattern::PatternKey;
use crate::region::Region;

pub const DEFAULT_BOUNDS_NOTICE: &str =
    "Default support region used; the row containing the match could not be found";

/// Find the row enclosing `matched`.
///
/// Falls back to the untouched row template (with a notice) when no anchor
/// row contains the match.
pub fn resolve_row_bounds<D>(
    device: &mut D,
    layout: &SupportLayout,
    matched: Region,
) -> Result<Region>
where
    D: Screen + Notifier + ?Sized,
{
    let anchor = device.load_pattern(&PatternKey::RegionAnchor)?;
    let anchors = device.find_all(layout.anchor_strip, &anchor)?;

    let template = layout.row_template;
    for found in &anchors {
        let row = template.with_y(found.y - layout.anchor_offset);
        if row.contains(&matched) {
            debug!(?matched, ?row, "Resolved support row bounds");
            return Ok(row);
        }
    }

    warn!(
        ?matched,
        anchors = anchors.len(),
        "No anchor row contains the match, using default bounds"
    );
    device.notify(DEFAULT_BOUNDS_NOTICE);
    Ok(template)
}
