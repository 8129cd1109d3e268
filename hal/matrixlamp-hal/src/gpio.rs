//! GPIO pin abstractions
//!
//! The panel is driven by bit-banging four lines (data, clock, latch,
//! output-enable) and the button is a single pulled-up input, so plain
//! digital pins are all the firmware needs.

/// Digital output pin
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Emit a single high-then-low pulse (clock or latch strobe)
    fn pulse(&mut self) {
        self.set_high();
        self.set_low();
    }
}

/// Digital input pin
///
/// Reading takes `&mut self` because some HALs sample through a shared
/// peripheral register block.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&mut self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&mut self) -> bool {
        !self.is_high()
    }
}

/// Logical inversion of a pin
///
/// The lamp button is wired to ground with a pull-up, and the panel's
/// output-enable line is active low. Wrapping those pins lets the rest of
/// the code think in terms of "pressed" and "enabled".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveLow<P>(pub P);

impl<P> ActiveLow<P> {
    /// Wrap a pin
    pub const fn new(pin: P) -> Self {
        Self(pin)
    }

    /// Release the wrapped pin
    pub fn into_inner(self) -> P {
        self.0
    }
}

impl<P: InputPin> InputPin for ActiveLow<P> {
    fn is_high(&mut self) -> bool {
        self.0.is_low()
    }
}

impl<P: OutputPin> OutputPin for ActiveLow<P> {
    fn set_high(&mut self) {
        self.0.set_low();
    }

    fn set_low(&mut self) {
        self.0.set_high();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakePin {
        high: bool,
        pulses: u32,
    }

    impl OutputPin for FakePin {
        fn set_high(&mut self) {
            if !self.high {
                self.pulses += 1;
            }
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }
    }

    impl InputPin for FakePin {
        fn is_high(&mut self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_set_state() {
        let mut pin = FakePin { high: false, pulses: 0 };
        pin.set_state(true);
        assert!(pin.high);
        pin.set_state(false);
        assert!(!pin.high);
    }

    #[test]
    fn test_pulse_leaves_pin_low() {
        let mut pin = FakePin { high: false, pulses: 0 };
        pin.pulse();
        pin.pulse();
        assert!(!pin.high);
        assert_eq!(pin.pulses, 2);
    }

    #[test]
    fn test_active_low_input() {
        let mut button = ActiveLow::new(FakePin { high: true, pulses: 0 });
        // Pulled up, not pressed
        assert!(!button.is_high());

        button.0.high = false;
        assert!(button.is_high());
        assert!(!button.is_low());
    }

    #[test]
    fn test_active_low_output() {
        let mut enable = ActiveLow::new(FakePin { high: true, pulses: 0 });
        enable.set_high();
        assert!(!enable.0.high);
        enable.set_low();
        assert!(enable.into_inner().high);
    }
}
