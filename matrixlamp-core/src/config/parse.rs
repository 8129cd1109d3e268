//! Minimal TOML reader for `lamp.toml`
//!
//! Handles only the subset the lamp needs, not full TOML.
//!
//! Supported:
//! - `[section]` headers (`scheduler`, `display`, `plugins`)
//! - `key = value` with strings, integers and booleans
//! - String arrays, on one line or spread over several
//! - Comments (`# ...`), whole-line or trailing
//!
//! Unknown keys are ignored so newer files still load on older firmware.

use core::fmt;

use heapless::String;
use matrixlamp_display::{PixelOrder, Rotation};

use super::types::{LampConfig, PluginsConfig};
use crate::plugin::MAX_ID_LEN;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value has the wrong type or is out of its representable range
    InvalidValue,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// Array never closed
    UnterminatedArray,
    /// More entries than fit
    TooManyItems,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ParseError::InvalidSection => "invalid section header",
            ParseError::InvalidValue => "invalid value",
            ParseError::InvalidLine => "expected key = value",
            ParseError::UnterminatedArray => "unterminated array",
            ParseError::TooManyItems => "too many items",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Scheduler,
    Display,
    Plugins,
}

/// Parse `lamp.toml` content
///
/// Missing sections and keys keep their defaults. The result is not
/// validated; call [`LampConfig::validate`] afterwards.
pub fn parse_config(input: &str) -> Result<LampConfig, ParseError> {
    let mut config = LampConfig::default();
    let mut section = Section::Root;
    // Set while inside a multi-line `order = [` array
    let mut in_order_array = false;

    for line in input.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if in_order_array {
            in_order_array = !push_array_items(line, &mut config.plugins)?;
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        match (section, key) {
            (Section::Scheduler, "frame_interval_ms") => {
                config.scheduler.frame_interval_ms = parse_int(value)?;
            }
            (Section::Scheduler, "tick_budget_ms") => {
                config.scheduler.tick_budget_ms = parse_int(value)?;
            }
            (Section::Scheduler, "debounce_ms") => {
                config.scheduler.debounce_ms = parse_int(value)?;
            }
            (Section::Scheduler, "auto_cycle_s") => {
                config.scheduler.auto_cycle_s = parse_int(value)?;
            }
            (Section::Display, "rotation") => {
                config.display.rotation =
                    Rotation::from_degrees(parse_int(value)?).ok_or(ParseError::InvalidValue)?;
            }
            (Section::Display, "wiring") => {
                config.display.wiring =
                    PixelOrder::from_name(parse_string(value)?).ok_or(ParseError::InvalidValue)?;
            }
            (Section::Display, "on_threshold") => {
                config.display.on_threshold = parse_int(value)?;
            }
            (Section::Plugins, "order") => {
                let rest = value.strip_prefix('[').ok_or(ParseError::InvalidValue)?;
                config.plugins.order.clear();
                in_order_array = !push_array_items(rest, &mut config.plugins)?;
            }
            _ => {}
        }
    }

    if in_order_array {
        return Err(ParseError::UnterminatedArray);
    }
    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "scheduler" => Ok(Section::Scheduler),
        "display" => Ok(Section::Display),
        "plugins" => Ok(Section::Plugins),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Drop a trailing `# comment` that is not inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Split "key = value"
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Parse a quoted string value
fn parse_string(value: &str) -> Result<&str, ParseError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ParseError::InvalidValue)
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Append the quoted items in `text` to the plugin order
///
/// Returns true once the closing `]` has been seen.
fn push_array_items(text: &str, plugins: &mut PluginsConfig) -> Result<bool, ParseError> {
    let (items, closed) = match text.find(']') {
        Some(end) => {
            if !text[end + 1..].trim().is_empty() {
                return Err(ParseError::InvalidValue);
            }
            (&text[..end], true)
        }
        None => (text, false),
    };

    for item in items.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let id = parse_string(item)?;
        let id: String<MAX_ID_LEN> = String::try_from(id).map_err(|_| ParseError::InvalidValue)?;
        plugins.order.push(id).map_err(|_| ParseError::TooManyItems)?;
    }
    Ok(closed)
}
