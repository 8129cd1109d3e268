//! Snake
//!
//! Plays itself by heading for the food. Once the remote link sends a
//! `Steer` the autopilot switches off for the rest of the activation.
//! The board wraps at the edges. Hitting its own body ends the round; the
//! snake blinks and a new round starts.

use heapless::Deque;
use matrixlamp_core::plugin::{Direction, InputSnapshot, Plugin, PluginInput};
use matrixlamp_display::{Frame, PANEL_COLS, PANEL_ROWS, PIXEL_COUNT, PIXEL_ON};

use crate::pace::Pace;
use crate::rng::Rng;

const STEP_MS: u32 = 150;
const START_LEN: i16 = 3;
/// Blink steps after a crash
const DEATH_BLINKS: u8 = 8;

type Cell = (i16, i16);

fn wrap(cell: Cell) -> Cell {
    (
        cell.0.rem_euclid(PANEL_ROWS as i16),
        cell.1.rem_euclid(PANEL_COLS as i16),
    )
}

fn moved(cell: Cell, direction: Direction) -> Cell {
    let (dr, dc) = direction.delta();
    wrap((cell.0 + dr, cell.1 + dc))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Round {
    Playing,
    Crashed { blinks_left: u8 },
}

pub struct SnakePlugin {
    /// Tail at the front, head at the back
    body: Deque<Cell, PIXEL_COUNT>,
    heading: Direction,
    queued: Option<Direction>,
    autopilot: bool,
    food: Cell,
    round: Round,
    pace: Pace,
    rng: Rng,
}

impl SnakePlugin {
    pub fn new(seed: u32) -> Self {
        Self {
            body: Deque::new(),
            heading: Direction::Right,
            queued: None,
            autopilot: true,
            food: (0, 0),
            round: Round::Playing,
            pace: Pace::new(STEP_MS),
            rng: Rng::new(seed),
        }
    }

    /// Snake length
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn head(&self) -> Option<Cell> {
        self.body.back().copied()
    }

    fn occupied(&self, cell: Cell) -> bool {
        self.body.iter().any(|&c| c == cell)
    }

    fn new_round(&mut self) {
        self.body.clear();
        let row = PANEL_ROWS as i16 / 2;
        for col in 0..START_LEN {
            // Capacity is the whole board
            let _ = self.body.push_back((row, col + 2));
        }
        self.heading = Direction::Right;
        self.queued = None;
        self.round = Round::Playing;
        self.place_food();
    }

    fn place_food(&mut self) {
        for _ in 0..32 {
            let cell = self.rng.cell();
            if !self.occupied(cell) {
                self.food = cell;
                return;
            }
        }
        // Crowded board: take the first free cell
        for index in 0..PIXEL_COUNT {
            let cell = ((index / PANEL_COLS) as i16, (index % PANEL_COLS) as i16);
            if !self.occupied(cell) {
                self.food = cell;
                return;
            }
        }
        // Board full; start over
        self.round = Round::Crashed {
            blinks_left: DEATH_BLINKS,
        };
    }

    /// Direction the autopilot would take from `head`
    fn autopilot_heading(&self, head: Cell) -> Direction {
        let mut preferred = [self.heading; 4];
        let mut n = 0;
        let mut prefer = |d: Direction| {
            if !preferred[..n].contains(&d) {
                preferred[n] = d;
                n += 1;
            }
        };
        if self.food.0 < head.0 {
            prefer(Direction::Up);
        } else if self.food.0 > head.0 {
            prefer(Direction::Down);
        }
        if self.food.1 < head.1 {
            prefer(Direction::Left);
        } else if self.food.1 > head.1 {
            prefer(Direction::Right);
        }
        prefer(self.heading);
        for d in [Direction::Up, Direction::Right, Direction::Down, Direction::Left] {
            prefer(d);
        }

        preferred
            .iter()
            .copied()
            .filter(|&d| d != self.heading.opposite())
            .find(|&d| !self.occupied(moved(head, d)))
            .unwrap_or(self.heading)
    }

    fn advance(&mut self) {
        let Some(head) = self.head() else {
            self.new_round();
            return;
        };

        self.heading = match self.queued.take() {
            Some(d) => d,
            None if self.autopilot => self.autopilot_heading(head),
            None => self.heading,
        };

        let next = moved(head, self.heading);
        let eating = next == self.food;
        if !eating {
            self.body.pop_front();
        }
        if self.occupied(next) {
            self.round = Round::Crashed {
                blinks_left: DEATH_BLINKS,
            };
            return;
        }
        let _ = self.body.push_back(next);
        if eating {
            self.place_food();
        }
    }

    fn draw(&self, frame: &mut Frame) {
        frame.clear();
        let show_body = match self.round {
            Round::Playing => true,
            Round::Crashed { blinks_left } => blinks_left % 2 == 0,
        };
        if show_body {
            for &(r, c) in self.body.iter() {
                frame.set(r, c, PIXEL_ON);
            }
        }
        if self.round == Round::Playing {
            frame.set(self.food.0, self.food.1, PIXEL_ON);
        }
    }
}

impl Plugin for SnakePlugin {
    fn id(&self) -> &'static str {
        "snake"
    }

    fn setup(&mut self) {
        self.autopilot = true;
        self.pace.reset();
        self.new_round();
    }

    fn tick(&mut self, frame: &mut Frame, input: &InputSnapshot<'_>) {
        for command in input.commands {
            if let PluginInput::Steer(d) = *command {
                self.autopilot = false;
                if d != self.heading.opposite() {
                    self.queued = Some(d);
                }
            }
        }

        if self.pace.ready(input.now_ms) {
            match self.round {
                Round::Playing => self.advance(),
                Round::Crashed { blinks_left: 0 } => self.new_round(),
                Round::Crashed { blinks_left } => {
                    self.round = Round::Crashed {
                        blinks_left: blinks_left - 1,
                    }
                }
            }
        }
        self.draw(frame);
    }

    fn teardown(&mut self) {
        self.body.clear();
        self.queued = None;
    }
}
