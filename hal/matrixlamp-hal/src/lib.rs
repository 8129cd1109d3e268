//! Matrixlamp Hardware Abstraction Layer
//!
//! This crate defines the digital I/O traits the panel driver and the button
//! debouncer are written against. Chip support comes from the
//! `embedded-hal` adapter, so any HAL implementing `embedded-hal` 1.0
//! (embassy-rp, rp2040-hal, esp-hal, ...) can drive a lamp.
//!
//! `matrixlamp-display` drives the panel through [`OutputPin`] and
//! `matrixlamp-core` reads the button through [`InputPin`]. Neither crate
//! names a chip; the firmware wraps embassy-rp pins in [`EhPin`] (feature
//! `embedded-hal`) and hands them over.
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`]: digital I/O
//! - [`gpio::ActiveLow`]: inverting wrapper for pulled-up buttons and
//!   active-low enable lines

#![no_std]
#![deny(unsafe_code)]

#[cfg(feature = "embedded-hal")]
pub mod adapter;
pub mod gpio;

pub use gpio::{ActiveLow, InputPin, OutputPin};

#[cfg(feature = "embedded-hal")]
pub use adapter::EhPin;
