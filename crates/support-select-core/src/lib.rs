//! Core types and logic for support-select.
//!
//! This crate picks a support entry from the scrollable, refreshable support
//! list and commits it with a click. Screen capture, template matching and
//! input injection are provided by the host through the [`device`] traits.
//!
//! # Modules
//!
//! - [`config`]: Raw on-disk configuration
//! - [`preferences`]: Parsed friend, servant and craft essence preferences
//! - [`layout`]: Fixed support screen geometry
//! - [`bounds`]: Row bounds resolution from anchor markers
//! - [`verify`]: Friend and limit-break checks
//! - [`strategy`]: Search strategies over the visible viewport
//! - [`selector`]: The selection state machine
//!
//! # Selection Modes
//!
//! | Mode | Behaviour |
//! |------|-----------|
//! | **first** | Click the first slot, refreshing if the click is swallowed |
//! | **friend** | Search friend names, scrolling and refreshing |
//! | **preferred** | Search servants and/or craft essences, scrolling and refreshing |
//! | **manual** | Not implemented |
//!
//! When a search exhausts its swipes and refreshes, the selector scrolls back
//! to the top and starts over in the configured fallback mode.

pub mod bounds;
pub mod config;
pub mod device;
pub mod error;
pub mod layout;
pub mod pattern;
pub mod preferences;
pub mod region;
pub mod selector;
pub mod snapshot;
pub mod strategy;
pub mod verify;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::SupportConfig;
pub use error::{ErrorCode, Result, SelectError};
pub use preferences::PreferenceSet;
pub use region::{Point, Region};
pub use selector::{SearchOutcome, SelectionMode, SupportSelector};
