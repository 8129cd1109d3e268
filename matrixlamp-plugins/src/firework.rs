//! Fireworks
//!
//! Rockets climb from the bottom edge and burst into sparks that fly out,
//! sag under gravity and burn out. Positions are kept in sixteenths of a
//! pixel so sparks can move slower than one cell per step.

use heapless::Vec;
use matrixlamp_core::plugin::{InputSnapshot, Plugin};
use matrixlamp_display::{Frame, PANEL_COLS, PANEL_ROWS, PIXEL_ON};

use crate::pace::Pace;
use crate::rng::Rng;

const STEP_MS: u32 = 50;
/// Fixed-point shift: 16 sub-steps per pixel
const SUB: u32 = 4;
const MAX_ROCKETS: usize = 2;
const MAX_SPARKS: usize = 32;
const LAUNCH_PERCENT: u32 = 8;
const SPARK_SPEED: i16 = 10;
const GRAVITY: i16 = 1;
const SPARK_LIFE: u8 = 14;
const TRAIL_FADE: u8 = 48;

/// Burst directions, one spark each
const BURST: [(i16, i16); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

#[derive(Debug, Clone, Copy)]
struct Rocket {
    row: i16,
    col: i16,
    /// Row at which the rocket bursts
    apex: i16,
}

#[derive(Debug, Clone, Copy)]
struct Spark {
    /// Row and column in sixteenths of a pixel
    row: i16,
    col: i16,
    vr: i16,
    vc: i16,
    life: u8,
}

impl Spark {
    fn cell(&self) -> (i16, i16) {
        (self.row >> SUB, self.col >> SUB)
    }
}

pub struct FireworkPlugin {
    rockets: Vec<Rocket, MAX_ROCKETS>,
    sparks: Vec<Spark, MAX_SPARKS>,
    pace: Pace,
    rng: Rng,
}

impl FireworkPlugin {
    pub fn new(seed: u32) -> Self {
        Self {
            rockets: Vec::new(),
            sparks: Vec::new(),
            pace: Pace::new(STEP_MS),
            rng: Rng::new(seed),
        }
    }

    pub fn rocket_count(&self) -> usize {
        self.rockets.len()
    }

    pub fn spark_count(&self) -> usize {
        self.sparks.len()
    }

    fn launch(&mut self) {
        if self.rockets.is_full() || !self.rng.chance(LAUNCH_PERCENT) {
            return;
        }
        let col = 2 + self.rng.below(PANEL_COLS as u32 - 4) as i16;
        let apex = 2 + self.rng.below(5) as i16;
        let _ = self.rockets.push(Rocket {
            row: PANEL_ROWS as i16 - 1,
            col,
            apex,
        });
    }

    /// Sparks that do not fit are dropped
    fn burst(&mut self, row: i16, col: i16) {
        for (dr, dc) in BURST {
            let _ = self.sparks.push(Spark {
                row: row << SUB,
                col: col << SUB,
                vr: dr * SPARK_SPEED,
                vc: dc * SPARK_SPEED,
                life: SPARK_LIFE,
            });
        }
    }

    fn advance(&mut self) {
        let mut index = 0;
        while index < self.rockets.len() {
            let rocket = &mut self.rockets[index];
            rocket.row -= 1;
            if rocket.row <= rocket.apex {
                let Rocket { row, col, .. } = self.rockets.swap_remove(index);
                self.burst(row, col);
            } else {
                index += 1;
            }
        }

        for spark in self.sparks.iter_mut() {
            spark.row += spark.vr;
            spark.col += spark.vc;
            spark.vr += GRAVITY;
            spark.life -= 1;
        }
        self.sparks.retain(|s| {
            let (row, col) = s.cell();
            s.life > 0 && row < PANEL_ROWS as i16 && (0..PANEL_COLS as i16).contains(&col)
        });
    }
}

impl Plugin for FireworkPlugin {
    fn id(&self) -> &'static str {
        "firework"
    }

    fn setup(&mut self) {
        self.rockets.clear();
        self.sparks.clear();
        self.pace.reset();
    }

    fn tick(&mut self, frame: &mut Frame, input: &InputSnapshot<'_>) {
        if !self.pace.ready(input.now_ms) {
            return;
        }
        frame.fade(TRAIL_FADE);
        self.advance();
        self.launch();
        for rocket in self.rockets.iter() {
            frame.set(rocket.row, rocket.col, PIXEL_ON);
        }
        for spark in self.sparks.iter() {
            let (row, col) = spark.cell();
            frame.set(row, col, PIXEL_ON);
        }
    }

    fn teardown(&mut self) {
        self.rockets.clear();
        self.sparks.clear();
    }
}
