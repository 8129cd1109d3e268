//! Self-playing Breakout
//!
//! A wall of bricks across the top rows and a paddle on the bottom row that
//! chases the ball. The paddle hesitates now and then, so it sometimes
//! misses; the ball is then served again. A cleared wall is rebuilt.

use matrixlamp_core::plugin::{InputSnapshot, Plugin};
use matrixlamp_display::{Frame, PANEL_COLS, PANEL_ROWS, PIXEL_ON};

use crate::pace::Pace;
use crate::rng::Rng;

const STEP_MS: u32 = 70;
const BRICK_ROWS: usize = 4;
/// One bit per column
const FULL_ROW: u16 = u16::MAX;
const PADDLE_ROW: i16 = PANEL_ROWS as i16 - 1;
const PADDLE_WIDTH: i16 = 4;
const HESITATE_PERCENT: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ball {
    row: i16,
    col: i16,
    dr: i16,
    dc: i16,
}

pub struct BreakoutPlugin {
    bricks: [u16; BRICK_ROWS],
    ball: Ball,
    /// Leftmost paddle column
    paddle: i16,
    misses: u32,
    pace: Pace,
    rng: Rng,
}

impl BreakoutPlugin {
    pub fn new(seed: u32) -> Self {
        let mut plugin = Self {
            bricks: [FULL_ROW; BRICK_ROWS],
            ball: Ball {
                row: PADDLE_ROW - 1,
                col: 0,
                dr: -1,
                dc: 1,
            },
            paddle: 0,
            misses: 0,
            pace: Pace::new(STEP_MS),
            rng: Rng::new(seed),
        };
        plugin.serve();
        plugin
    }

    pub fn bricks_left(&self) -> u32 {
        self.bricks.iter().map(|row| row.count_ones()).sum()
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    /// Put the ball on the paddle, heading up
    fn serve(&mut self) {
        self.paddle = self.rng.below((PANEL_COLS as i16 - PADDLE_WIDTH + 1) as u32) as i16;
        self.ball = Ball {
            row: PADDLE_ROW - 1,
            col: self.paddle + PADDLE_WIDTH / 2,
            dr: -1,
            dc: if self.rng.chance(50) { 1 } else { -1 },
        };
    }

    fn is_brick(&self, row: i16, col: i16) -> bool {
        (0..BRICK_ROWS as i16).contains(&row)
            && (0..PANEL_COLS as i16).contains(&col)
            && self.bricks[row as usize] & (1 << col) != 0
    }

    fn paddle_covers(&self, col: i16) -> bool {
        (self.paddle..self.paddle + PADDLE_WIDTH).contains(&col)
    }

    fn move_paddle(&mut self) {
        if self.rng.chance(HESITATE_PERCENT) {
            return;
        }
        let target =
            (self.ball.col - PADDLE_WIDTH / 2).clamp(0, PANEL_COLS as i16 - PADDLE_WIDTH);
        self.paddle += (target - self.paddle).signum();
    }

    /// Move the ball one cell, bouncing off walls, bricks and the paddle
    fn advance(&mut self) {
        let Ball { row, col, mut dr, mut dc } = self.ball;
        if !(0..PANEL_COLS as i16).contains(&(col + dc)) {
            dc = -dc;
        }
        if row + dr < 0 {
            dr = 1;
        }
        let (next_row, next_col) = (row + dr, col + dc);

        if self.is_brick(next_row, next_col) {
            self.bricks[next_row as usize] &= !(1 << next_col);
            self.ball = Ball { row, col, dr: -dr, dc };
            if self.bricks_left() == 0 {
                self.bricks = [FULL_ROW; BRICK_ROWS];
            }
            return;
        }

        if next_row == PADDLE_ROW {
            if self.paddle_covers(next_col) {
                self.ball = Ball { row, col, dr: -1, dc };
            } else {
                self.misses += 1;
                self.serve();
            }
            return;
        }

        self.ball = Ball {
            row: next_row,
            col: next_col,
            dr,
            dc,
        };
    }

    fn draw(&self, frame: &mut Frame) {
        frame.clear();
        for row in 0..BRICK_ROWS as i16 {
            for col in 0..PANEL_COLS as i16 {
                if self.is_brick(row, col) {
                    frame.set(row, col, PIXEL_ON);
                }
            }
        }
        for col in self.paddle..self.paddle + PADDLE_WIDTH {
            frame.set(PADDLE_ROW, col, PIXEL_ON);
        }
        frame.set(self.ball.row, self.ball.col, PIXEL_ON);
    }
}

impl Plugin for BreakoutPlugin {
    fn id(&self) -> &'static str {
        "breakout"
    }

    fn setup(&mut self) {
        self.bricks = [FULL_ROW; BRICK_ROWS];
        self.misses = 0;
        self.serve();
        self.pace.reset();
    }

    fn tick(&mut self, frame: &mut Frame, input: &InputSnapshot<'_>) {
        if !self.pace.ready(input.now_ms) {
            return;
        }
        self.move_paddle();
        self.advance();
        self.draw(frame);
    }

    fn teardown(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ball_stays_on_panel_and_clears_bricks() {
        let mut game = BreakoutPlugin::new(5);
        game.setup();
        let mut frame = Frame::new();
        let full = game.bricks_left();
        let mut fewest = full;
        for step in 0..2000 {
            game.tick(&mut frame, &InputSnapshot::idle(step * STEP_MS));
            assert!((0..PADDLE_ROW).contains(&game.ball.row));
            assert!((0..16).contains(&game.ball.col));
            assert!((0..=16 - PADDLE_WIDTH).contains(&game.paddle));
            fewest = fewest.min(game.bricks_left());
        }
        assert!(fewest < full);
        assert!(frame.is_lit(game.ball.row, game.ball.col));
    }

    #[test]
    fn test_brick_hit_reverses_ball() {
        let mut game = BreakoutPlugin::new(5);
        game.setup();
        game.ball = Ball {
            row: 4,
            col: 3,
            dr: -1,
            dc: 1,
        };
        let before = game.bricks_left();

        game.advance();
        assert!(!game.is_brick(3, 4));
        assert_eq!(game.bricks_left(), before - 1);
        assert_eq!(
            game.ball,
            Ball {
                row: 4,
                col: 3,
                dr: 1,
                dc: 1
            }
        );
    }

    #[test]
    fn test_side_wall_and_paddle_bounce() {
        let mut game = BreakoutPlugin::new(5);
        game.setup();
        game.paddle = 12;
        game.ball = Ball {
            row: PADDLE_ROW - 1,
            col: 15,
            dr: 1,
            dc: 1,
        };

        game.advance();
        assert_eq!(game.ball.dr, -1);
        assert_eq!(game.ball.dc, -1);
        assert_eq!(game.misses(), 0);
    }

    #[test]
    fn test_miss_serves_again() {
        let mut game = BreakoutPlugin::new(5);
        game.setup();
        game.paddle = 0;
        game.ball = Ball {
            row: PADDLE_ROW - 1,
            col: 10,
            dr: 1,
            dc: 1,
        };

        game.advance();
        assert_eq!(game.misses(), 1);
        assert_eq!(game.ball.row, PADDLE_ROW - 1);
        assert_eq!(game.ball.dr, -1);
        assert!(game.paddle_covers(game.ball.col));
    }

    #[test]
    fn test_last_brick_rebuilds_wall() {
        let mut game = BreakoutPlugin::new(5);
        game.setup();
        game.bricks = [0, 0, 0, 1 << 6];
        game.ball = Ball {
            row: 5,
            col: 7,
            dr: -1,
            dc: -1,
        };
        // Row 4 is empty, so the ball moves up first
        game.advance();
        assert_eq!((game.ball.row, game.ball.col), (4, 6));
        game.ball.col = 5;
        game.ball.dc = 1;
        game.advance();
        assert_eq!(game.bricks_left(), (BRICK_ROWS * PANEL_COLS) as u32);
    }
}
