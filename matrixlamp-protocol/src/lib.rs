//! Matrixlamp Remote Control Protocol
//!
//! This crate defines the serial protocol between a remote controller (a
//! network bridge, a phone app relay, a host script) and the lamp. The
//! remote side may pick the active plugin by id, cycle to the next one,
//! and feed input to plugins that accept it (the drawing canvas, the
//! snake game).
//!
//! # Messages
//!
//! | Host → lamp | Lamp → host |
//! |---|---|
//! | `SELECT(id)`, `NEXT` | `ACK` or `NOT_FOUND` |
//! | `PING` | `PONG` |
//! | `QUERY` | `ACTIVE(id)` or `ERROR(NotStarted)` |
//! | `PIXEL`, `CLEAR`, `STEER` | `ACK` |
//!
//! Framing is described in [`frame`]. Malformed frames are answered with
//! `ERROR`.
//!
//! Every host request gets exactly one response frame.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod heading;
pub mod frame;
pub mod messages;

pub use heading::Heading;
pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_PAYLOAD_SIZE};
pub use messages::{ErrorCode, LampResponse, RemoteCommand};
