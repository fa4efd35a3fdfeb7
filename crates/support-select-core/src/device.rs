//! Ports to the automation environment.
//!
//! The selector drives a device through four narrow traits. Template
//! matching, capture, input injection, delays and toasts all live behind
//! them, so any backend (a phone over a debug bridge, an emulator, a
//! scripted simulator) can host the selector.

use std::time::Duration;

use crate::error::Result;
use crate::pattern::PatternKey;
use crate::region::{Point, Region};

/// Read access to the captured screen.
pub trait Screen {
    /// Opaque template handle; the implementation owns its match threshold.
    type Pattern;

    fn load_pattern(&mut self, key: &PatternKey) -> Result<Self::Pattern>;

    /// Does `pattern` appear anywhere inside `region`?
    fn exists(&mut self, region: Region, pattern: &Self::Pattern) -> Result<bool>;

    /// Every occurrence of `pattern` inside `region`, top to bottom as rendered.
    fn find_all(&mut self, region: Region, pattern: &Self::Pattern) -> Result<Vec<Region>>;

    /// Capture one frame and answer every query from it until released.
    fn hold_snapshot(&mut self) -> Result<()>;

    fn release_snapshot(&mut self);
}

/// Input injection.
pub trait Gestures {
    /// Tap at `at`.
    fn click(&mut self, at: Point) -> Result<()>;

    /// Drag from `from` to `to`.
    fn scroll(&mut self, from: Point, to: Point) -> Result<()>;
}

pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Non-blocking user-facing notice (toast).
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Everything the selector needs from its environment.
pub trait Device: Screen + Gestures + Sleeper + Notifier {}

impl<T> Device for T where T: Screen + Gestures + Sleeper + Notifier {}
