//! Search strategies over the visible part of the support list.
//!
//! A strategy looks at the current viewport only. It never scrolls; the
//! selector decides what happens when nothing is found.
//!
//! - `Friend` (mode `friend`): first match of the first friend name that
//!   matches.
//! - `Servants` (`preferred`, servants only): first servant match.
//! - `CraftEssences` (`preferred`, craft essences only): first acceptable
//!   craft essence.
//! - `ServantsAndCraftEssences` (`preferred`, both): craft essence paired
//!   below a servant, with its row.

use tracing::debug;

use crate::bounds::resolve_row_bounds;
use crate::device::{Notifier, Screen};
use crate::error::{Result, SelectError};
use crate::layout::SupportLayout;
use crate::pattern::PatternKey;
use crate::preferences::PreferenceSet;
use crate::region::Region;
use crate::selector::SelectionMode;
use crate::verify::is_limit_broken;

/// A match found by a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Where to click.
    pub support: Region,
    /// Row bounds, when the strategy already had to compute them.
    pub bounds: Option<Region>,
}

impl Candidate {
    fn at(support: Region) -> Self {
        Self {
            support,
            bounds: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMethod {
    Friend,
    Servants,
    CraftEssences,
    ServantsAndCraftEssences,
}

impl SearchMethod {
    /// Pick the strategy for `mode`, or `None` when the mode is not a search.
    ///
    /// Misconfiguration is reported here, before the device is touched.
    pub fn decide(mode: SelectionMode, prefs: &PreferenceSet) -> Result<Option<Self>> {
        match mode {
            SelectionMode::First => Ok(None),
            SelectionMode::Manual => Err(SelectError::manual_not_implemented()),
            SelectionMode::Friend if prefs.has_friends() => Ok(Some(SearchMethod::Friend)),
            SelectionMode::Friend => Err(SelectError::no_friend_names()),
            SelectionMode::Preferred => Self::for_preferences(prefs).map(Some),
        }
    }

    fn for_preferences(prefs: &PreferenceSet) -> Result<Self> {
        match (prefs.has_servants(), prefs.has_craft_essences()) {
            (true, true) => Ok(SearchMethod::ServantsAndCraftEssences),
            (true, false) => Ok(SearchMethod::Servants),
            (false, true) => Ok(SearchMethod::CraftEssences),
            (false, false) => Err(SelectError::no_preferences()),
        }
    }

    /// Search the current viewport.
    pub fn search<D>(
        self,
        device: &mut D,
        prefs: &PreferenceSet,
        layout: &SupportLayout,
    ) -> Result<Option<Candidate>>
    where
        D: Screen + Notifier + ?Sized,
    {
        let support = match self {
            SearchMethod::Friend => find_friend_name(device, prefs, layout)?,
            SearchMethod::Servants => {
                let servants = find_servants(device, prefs, layout, true)?;
                servants.first().copied()
            }
            SearchMethod::CraftEssences => {
                find_craft_essence(device, prefs, layout, layout.list_region)?
            }
            SearchMethod::ServantsAndCraftEssences => {
                return find_servant_with_craft_essence(device, prefs, layout);
            }
        };
        Ok(support.map(Candidate::at))
    }
}

fn find_friend_name<S: Screen + ?Sized>(
    screen: &mut S,
    prefs: &PreferenceSet,
    layout: &SupportLayout,
) -> Result<Option<Region>> {
    for name in &prefs.friend_names {
        let pattern = screen.load_pattern(&PatternKey::support_image(name))?;
        if let Some(found) = screen.find_all(layout.friends_region, &pattern)?.first() {
            debug!(friend = %name, region = ?found, "Found friend");
            return Ok(Some(*found));
        }
    }
    Ok(None)
}

/// Servant matches in preference order, then render order.
///
/// With `first_only` the scan stops at the first name that matches.
fn find_servants<S: Screen + ?Sized>(
    screen: &mut S,
    prefs: &PreferenceSet,
    layout: &SupportLayout,
    first_only: bool,
) -> Result<Vec<Region>> {
    let mut servants = Vec::new();
    for name in &prefs.preferred_servants {
        let pattern = screen.load_pattern(&PatternKey::support_image(name))?;
        let found = screen.find_all(layout.list_region, &pattern)?;
        if !found.is_empty() {
            debug!(servant = %name, matches = found.len(), "Found servant");
        }
        servants.extend(found);
        if first_only && !servants.is_empty() {
            break;
        }
    }
    Ok(servants)
}

/// First preferred craft essence inside `search_region`.
///
/// Entries that ask for a limit-broken copy skip matches without the overlay.
fn find_craft_essence<S: Screen + ?Sized>(
    screen: &mut S,
    prefs: &PreferenceSet,
    layout: &SupportLayout,
    search_region: Region,
) -> Result<Option<Region>> {
    for preferred in &prefs.preferred_craft_essences {
        let pattern = screen.load_pattern(&PatternKey::support_image(&preferred.name))?;
        for found in screen.find_all(search_region, &pattern)? {
            if !preferred.prefer_limit_broken || is_limit_broken(screen, layout, found)? {
                debug!(craft_essence = %preferred.name, region = ?found, "Found craft essence");
                return Ok(Some(found));
            }
        }
    }
    Ok(None)
}

fn find_servant_with_craft_essence<D>(
    device: &mut D,
    prefs: &PreferenceSet,
    layout: &SupportLayout,
) -> Result<Option<Candidate>>
where
    D: Screen + Notifier + ?Sized,
{
    for servant in find_servants(device, prefs, layout, false)? {
        let bounds = resolve_row_bounds(device, layout, servant)?;
        let Some(craft_essence) = find_craft_essence(device, prefs, layout, bounds)? else {
            continue;
        };

        // Craft essences render below their servant. One above it belongs to
        // the previous row that leaked into these bounds.
        if craft_essence.y > servant.y {
            return Ok(Some(Candidate {
                support: craft_essence,
                bounds: Some(bounds),
            }));
        }
        debug!(?servant, ?craft_essence, "Rejected craft essence above servant");
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::{Event, FakeDevice, Frame};
    use proptest::prelude::*;

    /// Row `i` of the stock layout, starting at the top of the list.
    fn row(i: i32) -> Region {
        Region::new(76, 332 + i * 428, 2356, 428)
    }

    fn servant_in(row: Region) -> Region {
        Region::new(100, row.y + 40, 300, 200)
    }

    fn craft_essence_in(row: Region) -> Region {
        Region::new(100, row.y + 260, 270, 90)
    }

    fn anchor_of(row: Region) -> Region {
        Region::new(1680, row.y + 156, 60, 40)
    }

    fn overlay_for(craft_essence: Region) -> Region {
        Region::new(376, craft_essence.y, 20, 90)
    }

    #[test]
    fn decide_picks_method_from_preferences() {
        let both = PreferenceSet::parse("", "Merlin", "Kaleidoscope");
        let servants = PreferenceSet::parse("", "Merlin", "");
        let ces = PreferenceSet::parse("", "", "Kaleidoscope");
        let friends = PreferenceSet::parse("Alice", "", "");

        assert_eq!(
            SearchMethod::decide(SelectionMode::Preferred, &both).unwrap(),
            Some(SearchMethod::ServantsAndCraftEssences)
        );
        assert_eq!(
            SearchMethod::decide(SelectionMode::Preferred, &servants).unwrap(),
            Some(SearchMethod::Servants)
        );
        assert_eq!(
            SearchMethod::decide(SelectionMode::Preferred, &ces).unwrap(),
            Some(SearchMethod::CraftEssences)
        );
        assert_eq!(
            SearchMethod::decide(SelectionMode::Friend, &friends).unwrap(),
            Some(SearchMethod::Friend)
        );
        assert_eq!(
            SearchMethod::decide(SelectionMode::First, &friends).unwrap(),
            None
        );
    }

    #[test]
    fn decide_rejects_missing_preferences() {
        let empty = PreferenceSet::default();

        let err = SearchMethod::decide(SelectionMode::Friend, &empty).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfig);

        let err = SearchMethod::decide(SelectionMode::Preferred, &empty).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfig);

        let err = SearchMethod::decide(SelectionMode::Manual, &empty).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotImplemented);
    }

    #[test]
    fn friend_search_follows_name_priority() {
        let layout = SupportLayout::default();
        let prefs = PreferenceSet::parse("Bob, Alice", "", "");
        let alice = Region::new(500, 380, 400, 60);
        let bob = Region::new(500, 810, 400, 60);
        let frame = Frame::new()
            .with_image("Alice", alice)
            .with_image("Bob", bob);
        let mut device = FakeDevice::with_frames(vec![frame]);

        let found = SearchMethod::Friend
            .search(&mut device, &prefs, &layout)
            .unwrap()
            .unwrap();

        assert_eq!(found.support, bob);
        assert_eq!(found.bounds, None);
    }

    #[test]
    fn servant_search_returns_first_match_of_first_matching_name() {
        let layout = SupportLayout::default();
        let prefs = PreferenceSet::parse("", "Skadi, Merlin", "");
        let frame = Frame::new()
            .with_image("Merlin", servant_in(row(0)))
            .with_image("Merlin", servant_in(row(1)));
        let mut device = FakeDevice::with_frames(vec![frame]);

        let found = SearchMethod::Servants
            .search(&mut device, &prefs, &layout)
            .unwrap()
            .unwrap();
        assert_eq!(found.support, servant_in(row(0)));
    }

    #[test]
    fn servant_search_reports_not_found() {
        let layout = SupportLayout::default();
        let prefs = PreferenceSet::parse("", "Skadi", "");
        let mut device = FakeDevice::new();

        let found = SearchMethod::Servants.search(&mut device, &prefs, &layout);
        assert_eq!(found.unwrap(), None);
    }

    #[test]
    fn craft_essence_search_requires_limit_break_when_marked() {
        let layout = SupportLayout::default();
        let prefs = PreferenceSet::parse("", "", "*Kaleidoscope");
        let plain = craft_essence_in(row(0));
        let broken = craft_essence_in(row(1));
        let frame = Frame::new()
            .with_image("Kaleidoscope", plain)
            .with_image("Kaleidoscope", broken)
            .with(PatternKey::LimitBroken, overlay_for(broken));
        let mut device = FakeDevice::with_frames(vec![frame]);

        let found = SearchMethod::CraftEssences
            .search(&mut device, &prefs, &layout)
            .unwrap()
            .unwrap();
        assert_eq!(found.support, broken);
    }

    #[test]
    fn craft_essence_search_moves_to_next_entry() {
        let layout = SupportLayout::default();
        let prefs = PreferenceSet::parse("", "", "*Kaleidoscope, Black Grail");
        let kaleido = craft_essence_in(row(0));
        let grail = craft_essence_in(row(1));
        let frame = Frame::new()
            .with_image("Kaleidoscope", kaleido)
            .with_image("Black Grail", grail);
        let mut device = FakeDevice::with_frames(vec![frame]);

        let found = SearchMethod::CraftEssences
            .search(&mut device, &prefs, &layout)
            .unwrap()
            .unwrap();
        assert_eq!(found.support, grail);
    }

    #[test]
    fn unmarked_craft_essence_skips_limit_break_check() {
        let layout = SupportLayout::default();
        let prefs = PreferenceSet::parse("", "", "Black Grail");
        let frame = Frame::new().with_image("Black Grail", craft_essence_in(row(0)));
        let mut device = FakeDevice::with_frames(vec![frame]);

        SearchMethod::CraftEssences
            .search(&mut device, &prefs, &layout)
            .unwrap()
            .unwrap();
        let checked = device
            .events
            .iter()
            .any(|e| matches!(e, Event::Exists(name, _) if name == "limit-broken-marker"));
        assert!(!checked);
    }

    #[test]
    fn paired_search_returns_craft_essence_with_bounds() {
        let layout = SupportLayout::default();
        let prefs = PreferenceSet::parse("", "Merlin", "Kaleidoscope");
        let frame = Frame::new()
            .with(PatternKey::RegionAnchor, anchor_of(row(0)))
            .with(PatternKey::RegionAnchor, anchor_of(row(1)))
            .with_image("Merlin", servant_in(row(1)))
            .with_image("Kaleidoscope", craft_essence_in(row(0)))
            .with_image("Kaleidoscope", craft_essence_in(row(1)));
        let mut device = FakeDevice::with_frames(vec![frame]);

        let found = SearchMethod::ServantsAndCraftEssences
            .search(&mut device, &prefs, &layout)
            .unwrap()
            .unwrap();

        assert_eq!(found.support, craft_essence_in(row(1)));
        assert_eq!(found.bounds, Some(row(1)));
    }

    #[test]
    fn paired_search_tries_next_servant() {
        let layout = SupportLayout::default();
        let prefs = PreferenceSet::parse("", "Merlin", "Kaleidoscope");
        let frame = Frame::new()
            .with(PatternKey::RegionAnchor, anchor_of(row(0)))
            .with(PatternKey::RegionAnchor, anchor_of(row(1)))
            .with_image("Merlin", servant_in(row(0)))
            .with_image("Merlin", servant_in(row(1)))
            .with_image("Kaleidoscope", craft_essence_in(row(1)));
        let mut device = FakeDevice::with_frames(vec![frame]);

        let found = SearchMethod::ServantsAndCraftEssences
            .search(&mut device, &prefs, &layout)
            .unwrap()
            .unwrap();
        assert_eq!(found.bounds, Some(row(1)));
    }

    #[test]
    fn paired_search_rejects_craft_essence_above_servant() {
        let layout = SupportLayout::default();
        let prefs = PreferenceSet::parse("", "X", "*Y");
        // The anchor is off, so the resolved row spans the bottom of the
        // previous entry, Y included.
        let skewed_row = Region::new(76, 500, 2356, 428);
        let servant = Region::new(100, 700, 300, 200);
        let craft_essence = Region::new(100, 550, 270, 90);
        let frame = Frame::new()
            .with(PatternKey::RegionAnchor, anchor_of(skewed_row))
            .with_image("X", servant)
            .with_image("Y", craft_essence)
            .with(PatternKey::LimitBroken, overlay_for(craft_essence));
        let mut device = FakeDevice::with_frames(vec![frame]);

        let found = SearchMethod::ServantsAndCraftEssences
            .search(&mut device, &prefs, &layout)
            .unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn paired_search_never_falls_back_to_servant_only() {
        let layout = SupportLayout::default();
        let prefs = PreferenceSet::parse("", "Merlin", "Kaleidoscope");
        let frame = Frame::new()
            .with(PatternKey::RegionAnchor, anchor_of(row(0)))
            .with_image("Merlin", servant_in(row(0)));
        let mut device = FakeDevice::with_frames(vec![frame]);

        let found = SearchMethod::ServantsAndCraftEssences.search(&mut device, &prefs, &layout);
        assert_eq!(found.unwrap(), None);
    }

    /// Servant and craft essence placed `servant_dy` and `craft_essence_dy`
    /// below the top of an anchored first row.
    fn paired_search_in_row(servant_dy: i32, craft_essence_dy: i32) -> Option<Candidate> {
        let layout = SupportLayout::default();
        let prefs = PreferenceSet::parse("", "Merlin", "Kaleidoscope");
        let top = row(0);
        let servant = Region::new(100, top.y + servant_dy, 300, 200);
        let craft_essence = Region::new(100, top.y + craft_essence_dy, 270, 90);
        let frame = Frame::new()
            .with(PatternKey::RegionAnchor, anchor_of(top))
            .with_image("Merlin", servant)
            .with_image("Kaleidoscope", craft_essence);
        let mut device = FakeDevice::with_frames(vec![frame]);

        SearchMethod::ServantsAndCraftEssences
            .search(&mut device, &prefs, &layout)
            .unwrap()
    }

    #[test]
    fn paired_search_rejects_craft_essence_level_with_servant() {
        assert_eq!(paired_search_in_row(100, 100), None);
        assert!(paired_search_in_row(100, 101).is_some());
    }

    proptest! {
        #[test]
        fn paired_craft_essence_is_always_below_servant(
            servant_dy in 0..=228i32,
            craft_essence_dy in 0..=338i32,
        ) {
            let servant_y = row(0).y + servant_dy;
            let found = paired_search_in_row(servant_dy, craft_essence_dy);

            prop_assert!(found.map_or(true, |c| c.support.y > servant_y));
            prop_assert_eq!(found.is_some(), craft_essence_dy > servant_dy);
            if let Some(candidate) = found {
                prop_assert_eq!(candidate.bounds, Some(row(0)));
            }
        }
    }
}
