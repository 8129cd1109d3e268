//! Shift-register panel driver
//!
//! Drives a matrix built from daisy-chained serial-in/parallel-out LED
//! drivers (one output per LED, 256 outputs for a 16x16 panel) through
//! four GPIO lines:
//!
//! - DATA: bit to shift in
//! - CLOCK: rising edge shifts DATA into the chain
//! - LATCH: rising edge copies the chain to the LED outputs
//! - ENABLE: output enable, wrap in [`ActiveLow`](matrixlamp_hal::ActiveLow)
//!   for the usual active-low OE pin
//!
//! The chain is on/off per LED. Pixel intensity is reduced to a single bit
//! with a configurable threshold.

use matrixlamp_hal::OutputPin;

use crate::frame::{Frame, PIXEL_COUNT};
use crate::layout::PixelOrder;
use crate::panel::{Panel, PanelError};

/// Default intensity at which a pixel is considered lit
pub const DEFAULT_ON_THRESHOLD: u8 = 1;

/// Bit-banged shift-register panel
pub struct ShiftRegisterPanel<D, C, L, E> {
    data: D,
    clock: C,
    latch: L,
    enable: E,
    order: PixelOrder,
    on_threshold: u8,
    enabled: bool,
}

impl<D, C, L, E> ShiftRegisterPanel<D, C, L, E>
where
    D: OutputPin,
    C: OutputPin,
    L: OutputPin,
    E: OutputPin,
{
    /// Create a new panel driver
    ///
    /// Outputs start disabled until the first frame is written.
    pub fn new(data: D, clock: C, latch: L, enable: E, order: PixelOrder) -> Self {
        let mut panel = Self {
            data,
            clock,
            latch,
            enable,
            order,
            on_threshold: DEFAULT_ON_THRESHOLD,
            enabled: false,
        };
        panel.data.set_low();
        panel.clock.set_low();
        panel.latch.set_low();
        panel.enable.set_low();
        panel
    }

    /// Set the intensity at which a pixel is shifted out as lit
    ///
    /// Zero would light every LED, so it is raised to 1.
    pub fn with_on_threshold(mut self, threshold: u8) -> Self {
        self.on_threshold = threshold.max(1);
        self
    }

    /// Current wiring order
    pub fn order(&self) -> PixelOrder {
        self.order
    }

    /// Check if the outputs are enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Release the pins
    pub fn release(self) -> (D, C, L, E) {
        (self.data, self.clock, self.latch, self.enable)
    }

    fn is_on(&self, frame: &Frame, index: usize) -> bool {
        let (row, col) = self.order.position(index);
        frame.get(row as i16, col as i16) >= self.on_threshold
    }
}

impl<D, C, L, E> Panel for ShiftRegisterPanel<D, C, L, E>
where
    D: OutputPin,
    C: OutputPin,
    L: OutputPin,
    E: OutputPin,
{
    fn write_frame(&mut self, frame: &Frame) -> Result<(), PanelError> {
        // The first bit shifted in travels to the far end of the chain, so
        // shift the last LED first.
        for index in (0..PIXEL_COUNT).rev() {
            let on = self.is_on(frame, index);
            self.data.set_state(on);
            self.clock.pulse();
        }
        self.latch.pulse();

        if !self.enabled {
            self.enable.set_high();
            self.enabled = true;
        }
        Ok(())
    }

    fn blank(&mut self) -> Result<(), PanelError> {
        self.enable.set_low();
        self.enabled = false;
        Ok(())
    }
}
