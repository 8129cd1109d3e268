//! `embedded-hal` 1.0 adapter
//!
//! Wraps any `embedded_hal::digital` pin so it satisfies the Matrixlamp
//! pin traits. Pin errors are discarded: on every supported chip the error
//! type is `Infallible`, and a stuck GPIO is not something the render loop
//! could recover from anyway.

use embedded_hal::digital;

use crate::gpio::{InputPin, OutputPin};

/// Newtype over an `embedded-hal` pin
pub struct EhPin<P>(pub P);

impl<P> EhPin<P> {
    /// Wrap an `embedded-hal` pin
    pub const fn new(pin: P) -> Self {
        Self(pin)
    }
}

impl<P: digital::OutputPin> OutputPin for EhPin<P> {
    fn set_high(&mut self) {
        let _ = digital::OutputPin::set_high(&mut self.0);
    }

    fn set_low(&mut self) {
        let _ = digital::OutputPin::set_low(&mut self.0);
    }
}

impl<P: digital::InputPin> InputPin for EhPin<P> {
    fn is_high(&mut self) -> bool {
        digital::InputPin::is_high(&mut self.0).unwrap_or(false)
    }
}
