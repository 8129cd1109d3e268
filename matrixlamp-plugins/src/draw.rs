//! Remote drawing canvas
//!
//! Shows whatever the remote side paints with `SetPixel`. The canvas lives
//! in the plugin, not in the staging frame, so it survives a failed commit
//! and is wiped on every activation.

use matrixlamp_core::plugin::{InputSnapshot, Plugin, PluginInput};
use matrixlamp_display::Frame;

pub struct DrawPlugin {
    canvas: Frame,
}

impl DrawPlugin {
    pub const fn new() -> Self {
        Self {
            canvas: Frame::new(),
        }
    }

    pub fn canvas(&self) -> &Frame {
        &self.canvas
    }
}

impl Default for DrawPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for DrawPlugin {
    fn id(&self) -> &'static str {
        "draw"
    }

    fn setup(&mut self) {
        self.canvas.clear();
    }

    fn tick(&mut self, frame: &mut Frame, input: &InputSnapshot<'_>) {
        for command in input.commands {
            match *command {
                PluginInput::SetPixel { row, col, value } => {
                    // Out-of-range pixels are dropped by the frame
                    self.canvas.set(row as i16, col as i16, value);
                }
                PluginInput::ClearCanvas => self.canvas.clear(),
                PluginInput::Steer(_) => {}
            }
        }
        frame.copy_from(&self.canvas);
    }

    fn teardown(&mut self) {}
}
