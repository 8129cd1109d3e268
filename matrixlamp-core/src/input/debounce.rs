//! Edge-triggered button debouncing
//!
//! The debounced level follows the raw line only once the line has been
//! quiet for the debounce window. A clean edge after a quiet spell is
//! accepted at once, so a press reports without delay; any edge closer than
//! the window to the previous one is contact bounce and waits for the line
//! to settle. A press is reported on the debounced released → pressed
//! transition. Holding the button never repeats.

use matrixlamp_hal::InputPin;

use super::AdvanceSource;

/// Default debounce window
pub const DEFAULT_DEBOUNCE_MS: u32 = 200;

/// Debounce state for one momentary signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    window_ms: u32,
    /// Last raw level seen
    raw: bool,
    /// Debounced level
    stable: bool,
    last_edge_ms: Option<u32>,
}

impl Debouncer {
    pub const fn new(window_ms: u32) -> Self {
        Self {
            window_ms,
            raw: false,
            stable: false,
            last_edge_ms: None,
        }
    }

    /// Feed the raw level; returns true on a debounced press
    pub fn update(&mut self, pressed: bool, now_ms: u32) -> bool {
        // Measured before this sample moves the last edge
        let quiet = self.quiet_since_edge(now_ms);
        if pressed != self.raw {
            self.raw = pressed;
            self.last_edge_ms = Some(now_ms);
        }

        if pressed == self.stable || !quiet {
            return false;
        }
        self.stable = pressed;
        pressed
    }

    /// Whether the window has passed since the last raw edge
    fn quiet_since_edge(&self, now_ms: u32) -> bool {
        match self.last_edge_ms {
            // wrapping_sub keeps this correct across the u32 rollover
            Some(last) => now_ms.wrapping_sub(last) >= self.window_ms,
            None => true,
        }
    }

    /// Debounced level
    pub fn is_pressed(&self) -> bool {
        self.stable
    }

    pub fn window_ms(&self) -> u32 {
        self.window_ms
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

/// Debounced push button on a GPIO pin
///
/// The pin reads high while pressed. Wrap pull-up buttons in
/// [`ActiveLow`](matrixlamp_hal::ActiveLow).
pub struct ButtonInput<P> {
    pin: P,
    debouncer: Debouncer,
}

impl<P: InputPin> ButtonInput<P> {
    pub fn new(pin: P, window_ms: u32) -> Self {
        Self {
            pin,
            debouncer: Debouncer::new(window_ms),
        }
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin> AdvanceSource for ButtonInput<P> {
    fn poll_advance(&mut self, now_ms: u32) -> bool {
        let level = self.pin.is_high();
        self.debouncer.update(level, now_ms)
    }

    fn is_held(&self) -> bool {
        self.debouncer.is_pressed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrixlamp_hal::ActiveLow;

    #[test]
    fn test_single_press() {
        let mut d = Debouncer::new(200);
        assert!(!d.update(false, 0));
        assert!(d.update(true, 10));
        // Held: no repeat
        assert!(!d.update(true, 500));
        assert!(!d.update(true, 5000));
        assert!(!d.update(false, 5010));
    }

    #[test]
    fn test_bounce_within_window_yields_one_event() {
        let mut d = Debouncer::new(200);
        let mut events = 0;
        // press, bounce open, bounce closed, all within 30 ms
        for (level, t) in [(true, 100), (false, 105), (true, 112), (false, 125), (true, 130)] {
            if d.update(level, t) {
                events += 1;
            }
        }
        assert_eq!(events, 1);
    }

    #[test]
    fn test_release_bounce_after_hold() {
        let mut d = Debouncer::new(200);
        let mut events = 0;
        // held for a second, then the release bounces once
        for (level, t) in [(true, 0), (false, 1000), (true, 1003), (false, 1008)] {
            if d.update(level, t) {
                events += 1;
            }
        }
        for t in [1050, 1300, 2000] {
            if d.update(false, t) {
                events += 1;
            }
        }
        assert_eq!(events, 1);
        assert!(!d.is_pressed());
    }

    #[test]
    fn test_press_right_after_release_reports_once_settled() {
        let mut d = Debouncer::new(200);
        assert!(d.update(true, 0));
        assert!(!d.update(false, 500));
        // Pressed again 50 ms after the release, still inside the window
        assert!(!d.update(true, 550));
        assert!(!d.update(true, 700));
        assert!(d.update(true, 750));
        assert!(!d.update(true, 900));
    }

    #[test]
    fn test_second_press_after_window() {
        let mut d = Debouncer::new(200);
        assert!(d.update(true, 0));
        assert!(!d.update(false, 50));
        // Release settles once the line has been quiet for the window
        assert!(!d.update(false, 260));
        assert!(!d.is_pressed());
        assert!(d.update(true, 300));
    }

    #[test]
    fn test_window_across_timer_wrap() {
        let mut d = Debouncer::new(200);
        assert!(d.update(true, u32::MAX - 50));
        assert!(!d.update(false, u32::MAX - 40));
        // 90 ms later, after the counter wrapped
        assert!(!d.update(true, 49));
        assert!(!d.update(false, 60));
        assert!(!d.update(false, 270));
        assert!(d.update(true, 300));
    }

    struct FakePin {
        high: bool,
    }

    impl InputPin for FakePin {
        fn is_high(&mut self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_button_input_active_low() {
        // Pull-up button: pin reads low while pressed
        let mut button = ButtonInput::new(ActiveLow(FakePin { high: true }), 200);
        assert!(!button.poll_advance(0));
        assert!(!button.is_held());

        button = {
            let mut pin = button.release();
            pin.0.high = false;
            ButtonInput::new(pin, 200)
        };
        assert!(button.poll_advance(10));
        assert!(button.is_held());
        assert!(!button.poll_advance(20));
    }
}
