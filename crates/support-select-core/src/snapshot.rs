//! Single-frame query scopes.
//!
//! Scrolling lists move under the selector's feet. Checks that must agree
//! with each other (the viewport friend check and the candidate search) run
//! inside one held snapshot:
//!
//! ```ignore
//! let outcome = with_same_snapshot(device, |device| search(device))?;
//! ```

use crate::device::Screen;
use crate::error::Result;

/// Run `f` against one captured frame.
///
/// The snapshot is released whether `f` succeeds or fails.
pub fn with_same_snapshot<S, T, F>(screen: &mut S, f: F) -> Result<T>
where
    S: Screen + ?Sized,
    F: FnOnce(&mut S) -> Result<T>,
{
    screen.hold_snapshot()?;
    let result = f(screen);
    screen.release_snapshot();
    result
}
