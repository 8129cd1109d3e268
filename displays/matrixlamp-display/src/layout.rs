//! Panel mounting and wiring
//!
//! [`Rotation`] corrects for how the panel is hung on the wall.
//! [`PixelOrder`] describes how the LEDs are chained through the shift
//! registers.

use crate::frame::{PANEL_COLS, PANEL_ROWS, PIXEL_COUNT};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Clockwise rotation applied when a frame is committed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Parse from degrees (0, 90, 180, 270)
    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// Rotation in degrees
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Map a logical (row, col) to the physical position on the panel
    ///
    /// The panel is square, so every rotation stays in bounds.
    pub fn map(self, row: usize, col: usize) -> (usize, usize) {
        let last_row = PANEL_ROWS - 1;
        let last_col = PANEL_COLS - 1;
        match self {
            Rotation::Deg0 => (row, col),
            Rotation::Deg90 => (col, last_row - row),
            Rotation::Deg180 => (last_row - row, last_col - col),
            Rotation::Deg270 => (last_col - col, row),
        }
    }
}

/// Order in which pixels sit along the shift-register chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PixelOrder {
    /// Every row runs left to right
    #[default]
    RowMajor,
    /// Even rows run left to right, odd rows right to left
    Serpentine,
}

impl PixelOrder {
    /// Parse from the config file spelling
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "row_major" => Some(PixelOrder::RowMajor),
            "serpentine" => Some(PixelOrder::Serpentine),
            _ => None,
        }
    }

    /// Position of the `index`-th LED in the chain
    pub fn position(self, index: usize) -> (usize, usize) {
        let index = index % PIXEL_COUNT;
        let row = index / PANEL_COLS;
        let col = index % PANEL_COLS;
        match self {
            PixelOrder::RowMajor => (row, col),
            PixelOrder::Serpentine if row % 2 == 1 => (row, PANEL_COLS - 1 - col),
            PixelOrder::Serpentine => (row, col),
        }
    }
}
