//! Panel trait
//!
//! Defines the interface for different LED panel types.

use core::fmt;

use crate::frame::Frame;

/// Panel errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError {
    /// Transfer to the panel failed
    Communication,
    /// Panel not initialized or powered down
    NotReady,
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelError::Communication => f.write_str("panel transfer failed"),
            PanelError::NotReady => f.write_str("panel not ready"),
        }
    }
}

/// Panel trait
///
/// Provides a hardware-agnostic interface for pushing whole frames to an
/// LED matrix. Implementations handle bit ordering, latching and any
/// output-enable line.
pub trait Panel {
    /// Transfer a complete frame and make it visible
    fn write_frame(&mut self, frame: &Frame) -> Result<(), PanelError>;

    /// Turn every LED off without touching the transfer path
    ///
    /// Used between one plugin's teardown and the next plugin's setup so
    /// the old plugin's last frame does not linger on the panel.
    fn blank(&mut self) -> Result<(), PanelError>;

    /// Check if the panel is ready for a transfer
    fn is_ready(&self) -> bool {
        true
    }
}

impl<P: Panel + ?Sized> Panel for &mut P {
    fn write_frame(&mut self, frame: &Frame) -> Result<(), PanelError> {
        (**self).write_frame(frame)
    }

    fn blank(&mut self) -> Result<(), PanelError> {
        (**self).blank()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}
