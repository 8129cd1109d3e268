//! Display surface and panel drivers for Matrixlamp
//!
//! This crate provides:
//! - [`Frame`]: the 16x16 staging buffer plugins draw into
//! - [`Surface`]: the commit boundary between a plugin's tick and the hardware
//! - [`Panel`] trait for different LED panel types
//! - [`ShiftRegisterPanel`]: bit-banged driver for daisy-chained
//!   shift-register matrices
//! - [`Rotation`] and [`PixelOrder`] for mounting and wiring variations
//!
//! # Architecture
//!
//! Plugins never see the panel. They receive `&mut Frame` for the duration
//! of one tick. The scheduler owns the [`Surface`] and decides when the
//! staged frame is pushed to hardware:
//!
//! ```text
//!   plugin.tick(&mut Frame)  ──►  Surface::commit_frame()  ──►  Panel::write_frame()
//!                                        │
//!                              rotation applied here
//! ```
//!
//! A frame drawn by one plugin is therefore never mixed with another
//! plugin's partial writes on the physical display.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod layout;
pub mod panel;
pub mod shift;
pub mod surface;

// Re-export key types
pub use frame::{Frame, PANEL_COLS, PANEL_ROWS, PIXEL_COUNT, PIXEL_OFF, PIXEL_ON};
pub use layout::{PixelOrder, Rotation};
pub use panel::{Panel, PanelError};
pub use shift::ShiftRegisterPanel;
pub use surface::Surface;
