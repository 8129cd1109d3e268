//! Configuration
//!
//! Lamp settings loaded from `lamp.toml`. The file is embedded in the
//! firmware image and parsed at boot with [`parse_config`]; the build script
//! checks the same file on the host so most mistakes never reach a device.

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError};
pub use types::*;
