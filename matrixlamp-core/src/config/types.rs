//! Configuration type definitions

use core::fmt;

use heapless::{String, Vec};
use matrixlamp_display::{PixelOrder, Rotation};

use crate::input::DEFAULT_DEBOUNCE_MS;
use crate::plugin::{MAX_ID_LEN, MAX_PLUGINS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `frame_interval_ms` outside 1..=1000
    FrameInterval,
    /// `tick_budget_ms` is zero
    TickBudget,
    /// `debounce_ms` outside 50..=1000
    Debounce,
    /// `on_threshold` is zero
    OnThreshold,
    /// Plugin id listed twice in `[plugins] order`
    DuplicatePlugin,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConfigError::FrameInterval => "frame_interval_ms must be 1..=1000",
            ConfigError::TickBudget => "tick_budget_ms must be > 0",
            ConfigError::Debounce => "debounce_ms must be 50..=1000",
            ConfigError::OnThreshold => "on_threshold must be 1..=255",
            ConfigError::DuplicatePlugin => "plugin listed twice in order",
        };
        f.write_str(msg)
    }
}

/// `[scheduler]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SchedulerConfig {
    /// Control-loop period
    pub frame_interval_ms: u32,
    /// Soft per-tick budget; overruns are logged
    pub tick_budget_ms: u32,
    /// Button debounce window
    pub debounce_ms: u32,
    /// Switch to the next plugin after this long (0 = never)
    pub auto_cycle_s: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 20,
            tick_budget_ms: 5,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            auto_cycle_s: 0,
        }
    }
}

/// `[display]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    pub rotation: Rotation,
    pub wiring: PixelOrder,
    /// Intensity at which a pixel is shown as lit
    pub on_threshold: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            rotation: Rotation::Deg0,
            wiring: PixelOrder::RowMajor,
            on_threshold: 1,
        }
    }
}

/// `[plugins]` section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PluginsConfig {
    /// Plugin ids in cycling order; empty means built-in order
    pub order: Vec<String<MAX_ID_LEN>, MAX_PLUGINS>,
}

impl PluginsConfig {
    pub fn contains(&self, id: &str) -> bool {
        self.order.iter().any(|s| s.as_str() == id)
    }
}

/// Complete lamp configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LampConfig {
    pub scheduler: SchedulerConfig,
    pub display: DisplayConfig,
    pub plugins: PluginsConfig,
}

impl LampConfig {
    /// Check value ranges and cross-field rules
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.scheduler;
        if !(1..=1000).contains(&s.frame_interval_ms) {
            return Err(ConfigError::FrameInterval);
        }
        if s.tick_budget_ms == 0 {
            return Err(ConfigError::TickBudget);
        }
        if !(50..=1000).contains(&s.debounce_ms) {
            return Err(ConfigError::Debounce);
        }
        if self.display.on_threshold == 0 {
            return Err(ConfigError::OnThreshold);
        }

        let order = &self.plugins.order;
        for (i, id) in order.iter().enumerate() {
            if order[..i].contains(id) {
                return Err(ConfigError::DuplicatePlugin);
            }
        }
        Ok(())
    }
}
