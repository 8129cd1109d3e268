//! Twinkling star field
//!
//! Relies on the staging frame keeping its content between ticks: every
//! tick dims what is there and occasionally lights a new star.

use matrixlamp_core::plugin::{InputSnapshot, Plugin};
use matrixlamp_display::{Frame, PIXEL_ON};

use crate::pace::Pace;
use crate::rng::Rng;

const SPAWN_MS: u32 = 60;
const FADE_PER_TICK: u8 = 6;

pub struct StarsPlugin {
    pace: Pace,
    rng: Rng,
}

impl StarsPlugin {
    pub fn new(seed: u32) -> Self {
        Self {
            pace: Pace::new(SPAWN_MS),
            rng: Rng::new(seed),
        }
    }
}

impl Plugin for StarsPlugin {
    fn id(&self) -> &'static str {
        "stars"
    }

    fn setup(&mut self) {
        self.pace.reset();
    }

    fn tick(&mut self, frame: &mut Frame, input: &InputSnapshot<'_>) {
        frame.fade(FADE_PER_TICK);
        if self.pace.ready(input.now_ms) {
            let (row, col) = self.rng.cell();
            frame.set(row, col, PIXEL_ON);
        }
    }

    fn teardown(&mut self) {}
}
