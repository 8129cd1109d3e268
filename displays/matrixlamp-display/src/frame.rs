//! Frame buffer
//!
//! A fixed 16x16 grid of pixel intensities. Writes addressed outside the
//! grid are dropped, never reported: a plugin with an off-by-one in its
//! drawing code must not be able to take the lamp down.

/// Number of pixel rows on the panel
pub const PANEL_ROWS: usize = 16;

/// Number of pixel columns on the panel
pub const PANEL_COLS: usize = 16;

/// Total number of pixels
pub const PIXEL_COUNT: usize = PANEL_ROWS * PANEL_COLS;

/// Intensity of an unlit pixel
pub const PIXEL_OFF: u8 = 0;

/// Intensity of a fully lit pixel
pub const PIXEL_ON: u8 = 255;

/// Pixel frame buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pixels: [[u8; PANEL_COLS]; PANEL_ROWS],
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    /// Create a blank frame
    pub const fn new() -> Self {
        Self {
            pixels: [[PIXEL_OFF; PANEL_COLS]; PANEL_ROWS],
        }
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        self.fill(PIXEL_OFF);
    }

    /// Set every pixel to the same intensity
    pub fn fill(&mut self, value: u8) {
        for row in &mut self.pixels {
            row.fill(value);
        }
    }

    /// Set a pixel
    ///
    /// Returns `false` (and writes nothing) if the coordinates are outside
    /// the panel. Signed coordinates let games compute positions that
    /// wander off-screen without pre-clamping.
    pub fn set(&mut self, row: i16, col: i16, value: u8) -> bool {
        match Self::index(row, col) {
            Some((r, c)) => {
                self.pixels[r][c] = value;
                true
            }
            None => false,
        }
    }

    /// Read a pixel, `PIXEL_OFF` outside the panel
    pub fn get(&self, row: i16, col: i16) -> u8 {
        Self::index(row, col)
            .map(|(r, c)| self.pixels[r][c])
            .unwrap_or(PIXEL_OFF)
    }

    /// Check whether a pixel is lit at all
    pub fn is_lit(&self, row: i16, col: i16) -> bool {
        self.get(row, col) != PIXEL_OFF
    }

    /// Dim every pixel by `amount`, saturating at off
    pub fn fade(&mut self, amount: u8) {
        for row in &mut self.pixels {
            for px in row.iter_mut() {
                *px = px.saturating_sub(amount);
            }
        }
    }

    /// Overwrite this frame with another
    pub fn copy_from(&mut self, other: &Frame) {
        self.pixels = other.pixels;
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[u8; PANEL_COLS]> {
        self.pixels.iter()
    }

    /// Check if every pixel is off
    pub fn is_blank(&self) -> bool {
        self.pixels
            .iter()
            .all(|row| row.iter().all(|&px| px == PIXEL_OFF))
    }

    /// Count pixels at or above `threshold`
    pub fn lit_count(&self, threshold: u8) -> usize {
        self.pixels
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&px| px >= threshold && px != PIXEL_OFF)
            .count()
    }

    fn index(row: i16, col: i16) -> Option<(usize, usize)> {
        if row < 0 || col < 0 {
            return None;
        }
        let (r, c) = (row as usize, col as usize);
        if r < PANEL_ROWS && c < PANEL_COLS {
            Some((r, c))
        } else {
            None
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Frame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Frame[lit={}]", self.lit_count(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_frame_is_blank() {
        let frame = Frame::new();
        assert!(frame.is_blank());
        assert_eq!(frame.lit_count(1), 0);
    }

    #[test]
    fn test_set_and_get() {
        let mut frame = Frame::new();
        assert!(frame.set(3, 7, 200));
        assert_eq!(frame.get(3, 7), 200);
        assert!(frame.is_lit(3, 7));
        assert!(!frame.is_lit(7, 3));
    }

    #[test]
    fn test_out_of_range_is_dropped() {
        let mut frame = Frame::new();
        assert!(!frame.set(-1, 0, PIXEL_ON));
        assert!(!frame.set(0, 16, PIXEL_ON));
        assert!(!frame.set(16, 16, PIXEL_ON));
        assert!(frame.is_blank());
        assert_eq!(frame.get(-5, 100), PIXEL_OFF);
    }

    #[test]
    fn test_fade_saturates() {
        let mut frame = Frame::new();
        frame.set(0, 0, 10);
        frame.set(0, 1, 100);
        frame.fade(40);
        assert_eq!(frame.get(0, 0), 0);
        assert_eq!(frame.get(0, 1), 60);
    }

    #[test]
    fn test_fill_and_clear() {
        let mut frame = Frame::new();
        frame.fill(PIXEL_ON);
        assert_eq!(frame.lit_count(1), PIXEL_COUNT);
        frame.clear();
        assert!(frame.is_blank());
    }

    #[test]
    fn test_lit_count_threshold() {
        let mut frame = Frame::new();
        frame.set(0, 0, 50);
        frame.set(1, 1, 200);
        assert_eq!(frame.lit_count(1), 2);
        assert_eq!(frame.lit_count(128), 1);
    }

    proptest! {
        #[test]
        fn prop_writes_never_panic(row in any::<i16>(), col in any::<i16>(), value in any::<u8>()) {
            let mut frame = Frame::new();
            let written = frame.set(row, col, value);
            let inside = (0..PANEL_ROWS as i16).contains(&row) && (0..PANEL_COLS as i16).contains(&col);
            prop_assert_eq!(written, inside);
            if !inside {
                prop_assert!(frame.is_blank());
            }
        }
    }
}
