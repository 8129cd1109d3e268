//! Sweeping scan lines
//!
//! A horizontal line runs top to bottom, then a vertical line runs left to
//! right, and so on.

use matrixlamp_core::plugin::{InputSnapshot, Plugin};
use matrixlamp_display::{Frame, PANEL_COLS, PANEL_ROWS, PIXEL_ON};

use crate::pace::Pace;

const STEP_MS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

pub struct LinesPlugin {
    axis: Axis,
    position: usize,
    pace: Pace,
}

impl LinesPlugin {
    pub const fn new() -> Self {
        Self {
            axis: Axis::Horizontal,
            position: 0,
            pace: Pace::new(STEP_MS),
        }
    }

    fn advance(&mut self) {
        self.position += 1;
        let end = match self.axis {
            Axis::Horizontal => PANEL_ROWS,
            Axis::Vertical => PANEL_COLS,
        };
        if self.position >= end {
            self.position = 0;
            self.axis = match self.axis {
                Axis::Horizontal => Axis::Vertical,
                Axis::Vertical => Axis::Horizontal,
            };
        }
    }
}

impl Default for LinesPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for LinesPlugin {
    fn id(&self) -> &'static str {
        "lines"
    }

    fn setup(&mut self) {
        self.axis = Axis::Horizontal;
        self.position = 0;
        self.pace.reset();
    }

    fn tick(&mut self, frame: &mut Frame, input: &InputSnapshot<'_>) {
        if self.pace.ready(input.now_ms) {
            frame.clear();
            let p = self.position as i16;
            for i in 0..PANEL_COLS.max(PANEL_ROWS) as i16 {
                match self.axis {
                    Axis::Horizontal => frame.set(p, i, PIXEL_ON),
                    Axis::Vertical => frame.set(i, p, PIXEL_ON),
                };
            }
            self.advance();
        }
    }

    fn teardown(&mut self) {}
}
