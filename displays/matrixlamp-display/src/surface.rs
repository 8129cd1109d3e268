//! Display surface
//!
//! Owns the staging [`Frame`] and the [`Panel`]. Plugins draw into the
//! staging buffer during a tick; nothing reaches the panel until
//! [`Surface::commit_frame`] is called after the tick returns.

use crate::frame::{Frame, PANEL_COLS, PANEL_ROWS};
use crate::layout::Rotation;
use crate::panel::{Panel, PanelError};

/// Staging buffer plus commit boundary
pub struct Surface<P> {
    panel: P,
    staging: Frame,
    /// Scratch buffer for rotated output
    output: Frame,
    rotation: Rotation,
    frame_open: bool,
    commits: u32,
}

impl<P: Panel> Surface<P> {
    /// Create a surface over a panel
    pub fn new(panel: P, rotation: Rotation) -> Self {
        Self {
            panel,
            staging: Frame::new(),
            output: Frame::new(),
            rotation,
            frame_open: false,
            commits: 0,
        }
    }

    /// Open a frame for drawing
    ///
    /// The staging buffer is not cleared: plugins that redraw incrementally
    /// (trails, fades, canvases) build on the previous frame. Plugins that
    /// need a fresh frame call [`Frame::clear`] themselves.
    pub fn begin_frame(&mut self) -> &mut Frame {
        self.frame_open = true;
        &mut self.staging
    }

    /// Push the staged frame to the panel
    ///
    /// On failure the frame is dropped; the staging buffer keeps its
    /// content so the next tick can build on it.
    pub fn commit_frame(&mut self) -> Result<(), PanelError> {
        self.frame_open = false;
        if !self.panel.is_ready() {
            return Err(PanelError::NotReady);
        }

        let frame = match self.rotation {
            Rotation::Deg0 => &self.staging,
            rotation => {
                for row in 0..PANEL_ROWS {
                    for col in 0..PANEL_COLS {
                        let (r, c) = rotation.map(row, col);
                        self.output.set(
                            r as i16,
                            c as i16,
                            self.staging.get(row as i16, col as i16),
                        );
                    }
                }
                &self.output
            }
        };

        self.panel.write_frame(frame)?;
        self.commits = self.commits.wrapping_add(1);
        Ok(())
    }

    /// Blank the staging buffer and the panel
    ///
    /// Called between one plugin's teardown and the next plugin's setup.
    /// The staging buffer is always cleared, even if blanking the panel
    /// fails.
    pub fn clear(&mut self) -> Result<(), PanelError> {
        self.staging.clear();
        self.frame_open = false;
        self.panel.blank()
    }

    /// Staged frame (what the next commit would show, before rotation)
    pub fn frame(&self) -> &Frame {
        &self.staging
    }

    /// Check if a frame was opened but not yet committed
    pub fn is_frame_open(&self) -> bool {
        self.frame_open
    }

    /// Number of successful commits since creation
    pub fn commit_count(&self) -> u32 {
        self.commits
    }

    /// Current rotation
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Change the rotation for subsequent commits
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Access the panel
    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Mutable access to the panel
    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }
}
