//! Friend and limit-break checks.

use crate::device::Screen;
use crate::error::Result;
use crate::layout::SupportLayout;
use crate::pattern::PatternKey;
use crate::preferences::SearchOptions;
use crate::region::Region;

/// Whether `region` belongs to a friend.
///
/// Always true when the search is not restricted to friends; the screen is
/// not queried in that case.
pub fn is_friend<S>(screen: &mut S, options: &SearchOptions, region: Region) -> Result<bool>
where
    S: Screen + ?Sized,
{
    if !options.friends_only {
        return Ok(true);
    }
    let marker = screen.load_pattern(&PatternKey::FriendMarker)?;
    screen.exists(region, &marker)
}

/// Whether the craft essence at `craft_essence` shows the limit-broken overlay.
pub fn is_limit_broken<S>(
    screen: &mut S,
    layout: &SupportLayout,
    craft_essence: Region,
) -> Result<bool>
where
    S: Screen + ?Sized,
{
    let overlay = layout.limit_break_region.with_y(craft_essence.y);
    let marker = screen.load_pattern(&PatternKey::LimitBroken)?;
    screen.exists(overlay, &marker)
}
