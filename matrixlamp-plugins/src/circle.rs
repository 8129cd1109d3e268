//! Expanding rings from the panel centre

use matrixlamp_core::plugin::{InputSnapshot, Plugin};
use matrixlamp_display::{Frame, PIXEL_ON};

use crate::pace::Pace;

const STEP_MS: u32 = 80;
/// Radius at which a ring has left the panel from the centre
const MAX_RADIUS: i16 = 11;
const CENTRE: (i16, i16) = (8, 8);

/// Midpoint circle outline; points off the panel are dropped by the frame
pub fn draw_circle(frame: &mut Frame, centre: (i16, i16), radius: i16) {
    let (cr, cc) = centre;
    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;
    while x >= y {
        for (dr, dc) in [
            (y, x),
            (x, y),
            (x, -y),
            (y, -x),
            (-y, -x),
            (-x, -y),
            (-x, y),
            (-y, x),
        ] {
            frame.set(cr + dr, cc + dc, PIXEL_ON);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

pub struct CirclePlugin {
    radius: i16,
    pace: Pace,
}

impl CirclePlugin {
    pub const fn new() -> Self {
        Self {
            radius: 0,
            pace: Pace::new(STEP_MS),
        }
    }
}

impl Default for CirclePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for CirclePlugin {
    fn id(&self) -> &'static str {
        "circle"
    }

    fn setup(&mut self) {
        self.radius = 0;
        self.pace.reset();
    }

    fn tick(&mut self, frame: &mut Frame, input: &InputSnapshot<'_>) {
        if self.pace.ready(input.now_ms) {
            frame.clear();
            draw_circle(frame, CENTRE, self.radius);
            self.radius = if self.radius >= MAX_RADIUS {
                0
            } else {
                self.radius + 1
            };
        }
    }

    fn teardown(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_zero_is_a_dot() {
        let mut frame = Frame::new();
        draw_circle(&mut frame, CENTRE, 0);
        assert_eq!(frame.lit_count(1), 1);
        assert!(frame.is_lit(8, 8));
    }

    #[test]
    fn test_ring_is_symmetric() {
        let mut frame = Frame::new();
        draw_circle(&mut frame, (7, 7), 4);
        for (r, c) in [(3, 7), (11, 7), (7, 3), (7, 11)] {
            assert!(frame.is_lit(r, c));
        }
        assert!(!frame.is_lit(7, 7));
    }

    #[test]
    fn test_radius_cycles() {
        let mut plugin = CirclePlugin::new();
        plugin.setup();
        let mut frame = Frame::new();
        for step in 0..=MAX_RADIUS as u32 {
            plugin.tick(&mut frame, &InputSnapshot::idle(step * STEP_MS));
        }
        assert_eq!(plugin.radius, 0);
    }
}
