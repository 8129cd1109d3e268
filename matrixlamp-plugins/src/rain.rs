//! Falling rain
//!
//! Each drop falls at its own speed. The trail comes from fading the
//! previous frame rather than tracking old positions.

use heapless::Vec;
use matrixlamp_core::plugin::{InputSnapshot, Plugin};
use matrixlamp_display::{Frame, PANEL_COLS, PANEL_ROWS, PIXEL_ON};

use crate::pace::Pace;
use crate::rng::Rng;

const STEP_MS: u32 = 40;
const MAX_DROPS: usize = 12;
const SPAWN_PERCENT: u32 = 30;
const TRAIL_FADE: u8 = 64;

#[derive(Debug, Clone, Copy)]
struct Raindrop {
    row: i16,
    col: i16,
    /// Steps between moves (1 = every step)
    period: u8,
    wait: u8,
}

pub struct RainPlugin {
    drops: Vec<Raindrop, MAX_DROPS>,
    pace: Pace,
    rng: Rng,
}

impl RainPlugin {
    pub fn new(seed: u32) -> Self {
        Self {
            drops: Vec::new(),
            pace: Pace::new(STEP_MS),
            rng: Rng::new(seed),
        }
    }

    pub fn drop_count(&self) -> usize {
        self.drops.len()
    }

    fn spawn(&mut self) {
        if self.drops.is_full() || !self.rng.chance(SPAWN_PERCENT) {
            return;
        }
        let col = self.rng.below(PANEL_COLS as u32) as i16;
        let period = 1 + self.rng.below(3) as u8;
        let _ = self.drops.push(Raindrop {
            row: 0,
            col,
            period,
            wait: period,
        });
    }

    fn fall(&mut self) {
        for drop in self.drops.iter_mut() {
            drop.wait -= 1;
            if drop.wait == 0 {
                drop.row += 1;
                drop.wait = drop.period;
            }
        }
        self.drops.retain(|d| d.row < PANEL_ROWS as i16);
    }
}

impl Plugin for RainPlugin {
    fn id(&self) -> &'static str {
        "rain"
    }

    fn setup(&mut self) {
        self.drops.clear();
        self.pace.reset();
    }

    fn tick(&mut self, frame: &mut Frame, input: &InputSnapshot<'_>) {
        if !self.pace.ready(input.now_ms) {
            return;
        }
        frame.fade(TRAIL_FADE);
        self.fall();
        self.spawn();
        for drop in self.drops.iter() {
            frame.set(drop.row, drop.col, PIXEL_ON);
        }
    }

    fn teardown(&mut self) {
        self.drops.clear();
    }
}
