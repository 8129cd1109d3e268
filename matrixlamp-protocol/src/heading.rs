//! Steering values carried by the STEER command

/// Direction requested by the remote for steerable plugins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

// Wire format values
const HEADING_UP: u8 = 0x01;
const HEADING_DOWN: u8 = 0x02;
const HEADING_LEFT: u8 = 0x03;
const HEADING_RIGHT: u8 = 0x04;

impl Heading {
    /// Parse a heading from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            HEADING_UP => Some(Heading::Up),
            HEADING_DOWN => Some(Heading::Down),
            HEADING_LEFT => Some(Heading::Left),
            HEADING_RIGHT => Some(Heading::Right),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            Heading::Up => HEADING_UP,
            Heading::Down => HEADING_DOWN,
            Heading::Left => HEADING_LEFT,
            Heading::Right => HEADING_RIGHT,
        }
    }
}
