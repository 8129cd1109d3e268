//! Button input
//!
//! The scheduler only needs to know whether the user asked to advance to
//! the next plugin since the last poll. [`AdvanceSource`] is that seam;
//! [`ButtonInput`] implements it over a debounced GPIO pin.

pub mod debounce;

pub use debounce::{ButtonInput, Debouncer, DEFAULT_DEBOUNCE_MS};

/// Source of "advance to next plugin" events
pub trait AdvanceSource {
    /// Returns true at most once per debounced press
    fn poll_advance(&mut self, now_ms: u32) -> bool;

    /// Check if the button is currently held down
    fn is_held(&self) -> bool {
        false
    }
}

/// Source that never advances (no button fitted)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoButton;

impl AdvanceSource for NoButton {
    fn poll_advance(&mut self, _now_ms: u32) -> bool {
        false
    }
}
