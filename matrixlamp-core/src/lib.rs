//! Board-agnostic core logic for the lamp firmware
//!
//! This crate contains everything between the button, the remote link and
//! the panel that does not depend on specific hardware:
//!
//! - The [`Plugin`](plugin::Plugin) contract and the plugin registry
//! - Button debouncing
//! - The plugin scheduler (activation, switching, per-tick execution)
//! - Configuration types and the `lamp.toml` parser
//!
//! # Control loop
//!
//! ```text
//!   button ──► AdvanceSource ─┐
//!                             ├─► Scheduler::step() ──► plugin.tick(&mut Frame)
//!   remote ──► RequestSlot ───┘          │                       │
//!                                        └──── Surface::commit_frame() ◄─┘
//! ```
//!
//! One call to [`Scheduler::step`](scheduler::Scheduler::step) performs at
//! most one plugin switch or one tick followed by one commit.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to every module
mod fmt;

pub mod config;
pub mod input;
pub mod plugin;
pub mod scheduler;

pub use plugin::{Plugin, PluginInput, Registry};
pub use scheduler::Scheduler;
