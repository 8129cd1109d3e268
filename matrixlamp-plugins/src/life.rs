//! Conway's Game of Life
//!
//! The board is a torus. Each row is a 16-bit mask. The board reseeds
//! when it dies out, freezes, settles into a period-2 blinker or runs for
//! too many generations.

use matrixlamp_core::plugin::{InputSnapshot, Plugin};
use matrixlamp_display::{Frame, PANEL_COLS, PANEL_ROWS, PIXEL_ON};

use crate::pace::Pace;
use crate::rng::Rng;

const GENERATION_MS: u32 = 200;
const MAX_GENERATIONS: u16 = 300;
/// Initial fill, in percent
const DENSITY: u32 = 35;

type Board = [u16; PANEL_ROWS];

pub struct LifePlugin {
    board: Board,
    previous: Board,
    generation: u16,
    /// Set by `setup`, cleared by the first tick
    fresh: bool,
    pace: Pace,
    rng: Rng,
}

fn alive(board: &Board, row: usize, col: usize) -> bool {
    board[row] & (1 << col) != 0
}

fn neighbours(board: &Board, row: usize, col: usize) -> u8 {
    let mut count = 0;
    for dr in [PANEL_ROWS - 1, 0, 1] {
        for dc in [PANEL_COLS - 1, 0, 1] {
            if dr == 0 && dc == 0 {
                continue;
            }
            let r = (row + dr) % PANEL_ROWS;
            let c = (col + dc) % PANEL_COLS;
            count += alive(board, r, c) as u8;
        }
    }
    count
}

/// Compute the next generation
pub fn evolve(board: &Board) -> Board {
    let mut next = [0u16; PANEL_ROWS];
    for (row, bits) in next.iter_mut().enumerate() {
        for col in 0..PANEL_COLS {
            let n = neighbours(board, row, col);
            if n == 3 || (n == 2 && alive(board, row, col)) {
                *bits |= 1 << col;
            }
        }
    }
    next
}

impl LifePlugin {
    pub fn new(seed: u32) -> Self {
        Self {
            board: [0; PANEL_ROWS],
            previous: [0; PANEL_ROWS],
            generation: 0,
            fresh: false,
            pace: Pace::new(GENERATION_MS),
            rng: Rng::new(seed),
        }
    }

    pub fn population(&self) -> u32 {
        self.board.iter().map(|row| row.count_ones()).sum()
    }

    pub fn generation(&self) -> u16 {
        self.generation
    }

    fn reseed(&mut self) {
        for bits in self.board.iter_mut() {
            *bits = 0;
            for col in 0..PANEL_COLS {
                if self.rng.chance(DENSITY) {
                    *bits |= 1 << col;
                }
            }
        }
        self.previous = [0; PANEL_ROWS];
        self.generation = 0;
    }

    fn step(&mut self) {
        let next = evolve(&self.board);
        let stale = next == self.board || next == self.previous;
        self.previous = self.board;
        self.board = next;
        self.generation += 1;

        if stale || self.population() == 0 || self.generation >= MAX_GENERATIONS {
            self.reseed();
        }
    }
}

impl Plugin for LifePlugin {
    fn id(&self) -> &'static str {
        "life"
    }

    fn setup(&mut self) {
        self.pace.reset();
        self.reseed();
        self.fresh = true;
    }

    fn tick(&mut self, frame: &mut Frame, input: &InputSnapshot<'_>) {
        let due = self.pace.ready(input.now_ms);
        // The first tick after setup shows the seed itself
        if due && !self.fresh {
            self.step();
        }
        self.fresh = false;

        frame.clear();
        for row in 0..PANEL_ROWS {
            for col in 0..PANEL_COLS {
                if alive(&self.board, row, col) {
                    frame.set(row as i16, col as i16, PIXEL_ON);
                }
            }
        }
    }

    fn teardown(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(cells: &[(usize, usize)]) -> Board {
        let mut board = [0u16; PANEL_ROWS];
        for &(r, c) in cells {
            board[r] |= 1 << c;
        }
        board
    }

    #[test]
    fn test_blinker_oscillates() {
        let horizontal = board_from(&[(5, 4), (5, 5), (5, 6)]);
        let vertical = board_from(&[(4, 5), (5, 5), (6, 5)]);
        assert_eq!(evolve(&horizontal), vertical);
        assert_eq!(evolve(&vertical), horizontal);
    }

    #[test]
    fn test_block_is_still() {
        let block = board_from(&[(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_eq!(evolve(&block), block);
    }

    #[test]
    fn test_neighbours_wrap() {
        // A block straddling all four corners is still a block
        let block = board_from(&[(0, 0), (0, 15), (15, 0), (15, 15)]);
        assert_eq!(neighbours(&block, 0, 0), 3);
        assert_eq!(evolve(&block), block);
    }

    #[test]
    fn test_stale_board_reseeds() {
        let mut life = LifePlugin::new(5);
        life.setup();
        life.board = board_from(&[(0, 0), (0, 1), (1, 0), (1, 1)]);
        life.generation = 10;
        life.step();
        assert_eq!(life.generation(), 0);
    }

    #[test]
    fn test_setup_seeds_board() {
        let mut life = LifePlugin::new(5);
        life.setup();
        assert!(life.population() > 0);

        let mut frame = Frame::new();
        life.tick(&mut frame, &InputSnapshot::idle(0));
        assert_eq!(frame.lit_count(1), life.population() as usize);
    }
}
