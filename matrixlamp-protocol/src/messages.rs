//! Message types for the remote link
//!
//! - Host → Lamp: plugin selection, cycling, queries and plugin input
//! - Lamp → Host: one response per request

use crate::heading::Heading;
use crate::frame::{Frame, FrameError};

// Message type IDs: Host → Lamp
pub const MSG_SELECT: u8 = 0x01;
pub const MSG_NEXT: u8 = 0x02;
pub const MSG_PING: u8 = 0x03;
pub const MSG_QUERY: u8 = 0x04;
pub const MSG_PIXEL: u8 = 0x10;
pub const MSG_CLEAR: u8 = 0x11;
pub const MSG_STEER: u8 = 0x12;

// Message type IDs: Lamp → Host
pub const MSG_ACK: u8 = 0x80;
pub const MSG_NOT_FOUND: u8 = 0x81;
pub const MSG_PONG: u8 = 0x82;
pub const MSG_ACTIVE: u8 = 0x83;
pub const MSG_ERROR: u8 = 0x8F;

/// Requests from the remote controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RemoteCommand<'a> {
    /// Activate the plugin with this id
    Select { id: &'a str },
    /// Cycle to the next plugin
    Next,
    /// Link check
    Ping,
    /// Ask which plugin is active
    Query,
    /// Set one pixel on plugins that accept drawing
    Pixel { row: u8, col: u8, value: u8 },
    /// Clear the canvas of plugins that accept drawing
    Clear,
    /// Steer plugins that accept a direction
    Steer(Heading),
}

impl<'a> RemoteCommand<'a> {
    /// Parse a command from a frame
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        let payload = frame.payload.as_slice();
        match frame.msg_type {
            MSG_SELECT => {
                if payload.is_empty() {
                    return Err(FrameError::InvalidFrame);
                }
                let id = core::str::from_utf8(payload).map_err(|_| FrameError::InvalidFrame)?;
                Ok(RemoteCommand::Select { id })
            }
            MSG_NEXT => Ok(RemoteCommand::Next),
            MSG_PING => Ok(RemoteCommand::Ping),
            MSG_QUERY => Ok(RemoteCommand::Query),
            MSG_PIXEL => match *payload {
                [row, col, value] => Ok(RemoteCommand::Pixel { row, col, value }),
                _ => Err(FrameError::InvalidFrame),
            },
            MSG_CLEAR => Ok(RemoteCommand::Clear),
            MSG_STEER => {
                let byte = payload.first().ok_or(FrameError::InvalidFrame)?;
                let heading = Heading::from_byte(*byte).ok_or(FrameError::InvalidFrame)?;
                Ok(RemoteCommand::Steer(heading))
            }
            _ => Err(FrameError::UnknownType),
        }
    }

    /// Encode this command into a frame (host side and tests)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            RemoteCommand::Select { id } => Frame::new(MSG_SELECT, id.as_bytes()),
            RemoteCommand::Next => Ok(Frame::empty(MSG_NEXT)),
            RemoteCommand::Ping => Ok(Frame::empty(MSG_PING)),
            RemoteCommand::Query => Ok(Frame::empty(MSG_QUERY)),
            RemoteCommand::Pixel { row, col, value } => {
                Frame::new(MSG_PIXEL, &[*row, *col, *value])
            }
            RemoteCommand::Clear => Ok(Frame::empty(MSG_CLEAR)),
            RemoteCommand::Steer(heading) => Frame::new(MSG_STEER, &[heading.to_byte()]),
        }
    }
}

/// Reason codes carried by the ERROR response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ErrorCode {
    /// Frame failed checksum or had a bad payload
    Malformed = 0x01,
    /// Message type not understood
    Unsupported = 0x02,
    /// Lamp has no active plugin yet
    NotStarted = 0x03,
}

impl ErrorCode {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(ErrorCode::Malformed),
            0x02 => Some(ErrorCode::Unsupported),
            0x03 => Some(ErrorCode::NotStarted),
            _ => None,
        }
    }
}

impl From<FrameError> for ErrorCode {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::UnknownType => ErrorCode::Unsupported,
            _ => ErrorCode::Malformed,
        }
    }
}

/// Responses from the lamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LampResponse<'a> {
    /// Request accepted
    Ack,
    /// SELECT named an unknown plugin id
    NotFound,
    /// Reply to PING
    Pong,
    /// Reply to QUERY
    Active { id: &'a str },
    /// Request rejected
    Error(ErrorCode),
}

impl<'a> LampResponse<'a> {
    /// Encode this response into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            LampResponse::Ack => Ok(Frame::empty(MSG_ACK)),
            LampResponse::NotFound => Ok(Frame::empty(MSG_NOT_FOUND)),
            LampResponse::Pong => Ok(Frame::empty(MSG_PONG)),
            LampResponse::Active { id } => Frame::new(MSG_ACTIVE, id.as_bytes()),
            LampResponse::Error(code) => Frame::new(MSG_ERROR, &[*code as u8]),
        }
    }

    /// Parse a response from a frame (host side and tests)
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        let payload = frame.payload.as_slice();
        match frame.msg_type {
            MSG_ACK => Ok(LampResponse::Ack),
            MSG_NOT_FOUND => Ok(LampResponse::NotFound),
            MSG_PONG => Ok(LampResponse::Pong),
            MSG_ACTIVE => {
                let id = core::str::from_utf8(payload).map_err(|_| FrameError::InvalidFrame)?;
                Ok(LampResponse::Active { id })
            }
            MSG_ERROR => {
                let byte = payload.first().ok_or(FrameError::InvalidFrame)?;
                let code = ErrorCode::from_byte(*byte).ok_or(FrameError::InvalidFrame)?;
                Ok(LampResponse::Error(code))
            }
            _ => Err(FrameError::UnknownType),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_parses_id() {
        let frame = Frame::new(MSG_SELECT, b"life").unwrap();
        let cmd = RemoteCommand::from_frame(&frame).unwrap();
        assert_eq!(cmd, RemoteCommand::Select { id: "life" });
    }

    #[test]
    fn test_select_rejects_empty_and_invalid_utf8() {
        let empty = Frame::empty(MSG_SELECT);
        assert_eq!(
            RemoteCommand::from_frame(&empty),
            Err(FrameError::InvalidFrame)
        );

        let bad = Frame::new(MSG_SELECT, &[0xFF, 0xFE]).unwrap();
        assert_eq!(RemoteCommand::from_frame(&bad), Err(FrameError::InvalidFrame));
    }

    #[test]
    fn test_pixel_needs_three_bytes() {
        let frame = Frame::new(MSG_PIXEL, &[1, 2, 200]).unwrap();
        assert_eq!(
            RemoteCommand::from_frame(&frame),
            Ok(RemoteCommand::Pixel {
                row: 1,
                col: 2,
                value: 200
            })
        );

        let short = Frame::new(MSG_PIXEL, &[1, 2]).unwrap();
        assert_eq!(RemoteCommand::from_frame(&short), Err(FrameError::InvalidFrame));
    }

    #[test]
    fn test_steer() {
        let cmd = RemoteCommand::Steer(Heading::Left);
        let frame = cmd.to_frame().unwrap();
        assert_eq!(frame.msg_type, MSG_STEER);
        assert_eq!(RemoteCommand::from_frame(&frame), Ok(cmd));
    }

    #[test]
    fn test_unknown_type() {
        let frame = Frame::empty(0x7E);
        let err = RemoteCommand::from_frame(&frame).unwrap_err();
        assert_eq!(err, FrameError::UnknownType);
        assert_eq!(ErrorCode::from(err), ErrorCode::Unsupported);
    }

    #[test]
    fn test_active_response() {
        let frame = LampResponse::Active { id: "rain" }.to_frame().unwrap();
        assert_eq!(frame.msg_type, MSG_ACTIVE);
        assert_eq!(frame.payload.as_slice(), b"rain");
        assert_eq!(
            LampResponse::from_frame(&frame),
            Ok(LampResponse::Active { id: "rain" })
        );
    }

    #[test]
    fn test_error_response() {
        let frame = LampResponse::Error(ErrorCode::NotStarted).to_frame().unwrap();
        assert_eq!(frame.payload.as_slice(), &[0x03]);
        assert_eq!(
            LampResponse::from_frame(&frame),
            Ok(LampResponse::Error(ErrorCode::NotStarted))
        );
    }
}
