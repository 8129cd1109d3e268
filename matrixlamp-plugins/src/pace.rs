//! Frame pacing
//!
//! Plugins tick at the control-loop rate but most animate slower.

#[derive(Debug, Clone, Copy)]
pub struct Pace {
    interval_ms: u32,
    last_ms: Option<u32>,
}

impl Pace {
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// Forget the last step so the next call to `ready` fires
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    /// True when at least one interval passed since the last true
    pub fn ready(&mut self, now_ms: u32) -> bool {
        let due = match self.last_ms {
            Some(last) => now_ms.wrapping_sub(last) >= self.interval_ms,
            None => true,
        };
        if due {
            self.last_ms = Some(now_ms);
        }
        due
    }
}
