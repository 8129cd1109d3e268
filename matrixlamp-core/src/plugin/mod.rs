//! Plugin contract
//!
//! A plugin is one self-contained visual program: a game, a generative
//! animation, a drawing canvas. Exactly one plugin is active at a time.
//! The scheduler drives it through three lifecycle calls:
//!
//! ```text
//!   setup() ──► tick() ──► tick() ──► ... ──► teardown()
//! ```
//!
//! `setup` runs once per activation and must reinitialize all state from
//! scratch. `tick` runs once per control-loop iteration, must not block and
//! must return within the tick budget. `teardown` runs once when the plugin
//! is switched away from and must be safe even if `setup` gave up early.
//!
//! Plugins have no way to report failure. A plugin that cannot do its job
//! draws a blank or neutral frame instead.

pub mod registry;

pub use registry::{PluginDirectory, Registry, RegistryError, SelectError};

use matrixlamp_display::Frame;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum number of registered plugins
pub const MAX_PLUGINS: usize = 16;

/// Maximum plugin id length in bytes
pub const MAX_ID_LEN: usize = 16;

/// Maximum remote inputs buffered for one tick
pub const MAX_PENDING_INPUT: usize = 16;

/// Steering direction for plugins that accept one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Row/column step for one move in this direction
    pub fn delta(self) -> (i16, i16) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Remote input addressed to the active plugin
///
/// Plugins ignore inputs they have no use for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PluginInput {
    /// Set one pixel of a drawing canvas
    SetPixel { row: u8, col: u8, value: u8 },
    /// Wipe a drawing canvas
    ClearCanvas,
    /// Change heading
    Steer(Direction),
}

/// Input visible to a plugin during one tick
#[derive(Debug, Clone, Copy)]
pub struct InputSnapshot<'a> {
    /// Monotonic time in milliseconds (wraps)
    pub now_ms: u32,
    /// Button currently pressed
    pub button_held: bool,
    /// Remote inputs received since the previous tick, oldest first
    pub commands: &'a [PluginInput],
}

impl<'a> InputSnapshot<'a> {
    /// Snapshot with no input
    pub fn idle(now_ms: u32) -> Self {
        Self {
            now_ms,
            button_held: false,
            commands: &[],
        }
    }
}

/// Plugin trait
///
/// Implementations own all their state. They never keep a reference to the
/// frame beyond one `tick` call.
pub trait Plugin {
    /// Stable short id used for remote selection and logging
    fn id(&self) -> &'static str;

    /// Prepare for activation
    fn setup(&mut self);

    /// Advance one step and draw into `frame`
    ///
    /// The frame still holds whatever the plugin drew last tick (or is
    /// blank right after `setup`).
    fn tick(&mut self, frame: &mut Frame, input: &InputSnapshot<'_>);

    /// Release anything held since `setup`
    fn teardown(&mut self);
}
