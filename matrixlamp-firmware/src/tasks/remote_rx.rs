//! Remote UART receive task
//!
//! Receives frames from the remote controller and turns them into
//! scheduler requests or plugin input. Every complete frame is answered.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use matrixlamp_core::plugin::{Direction, PluginDirectory, PluginInput, SelectError};
use matrixlamp_core::scheduler::{CommandSink, RemoteRequest};
use matrixlamp_protocol::{ErrorCode, FrameParser, Heading, LampResponse, RemoteCommand};

use crate::channels::{active_index, PLUGIN_INPUT, REMOTE_REQUEST, RESPONSES};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Remote side of the scheduler
///
/// Ids are resolved here against the directory taken at boot, so the
/// control task only ever sees indices.
pub struct RemoteLink {
    directory: &'static PluginDirectory,
}

impl CommandSink for RemoteLink {
    fn select_plugin(&mut self, id: &str) -> Result<(), SelectError> {
        let index = self.directory.resolve(id)?;
        REMOTE_REQUEST.signal(RemoteRequest::Select(index));
        Ok(())
    }

    fn request_next(&mut self) {
        REMOTE_REQUEST.signal(RemoteRequest::Next);
    }
}

impl RemoteLink {
    pub fn new(directory: &'static PluginDirectory) -> Self {
        Self { directory }
    }

    fn handle(&mut self, command: RemoteCommand<'_>) -> LampResponse<'static> {
        match command {
            RemoteCommand::Select { id } => match self.select_plugin(id) {
                Ok(()) => LampResponse::Ack,
                Err(_) => {
                    warn!("Remote select of unknown plugin '{}'", id);
                    LampResponse::NotFound
                }
            },
            RemoteCommand::Next => {
                self.request_next();
                LampResponse::Ack
            }
            RemoteCommand::Ping => LampResponse::Pong,
            RemoteCommand::Query => match active_index().and_then(|i| self.directory.id(i)) {
                Some(id) => LampResponse::Active { id },
                None => LampResponse::Error(ErrorCode::NotStarted),
            },
            RemoteCommand::Pixel { row, col, value } => {
                forward(PluginInput::SetPixel { row, col, value })
            }
            RemoteCommand::Clear => forward(PluginInput::ClearCanvas),
            RemoteCommand::Steer(heading) => forward(PluginInput::Steer(direction(heading))),
        }
    }
}

fn direction(heading: Heading) -> Direction {
    match heading {
        Heading::Up => Direction::Up,
        Heading::Down => Direction::Down,
        Heading::Left => Direction::Left,
        Heading::Right => Direction::Right,
    }
}

fn forward(input: PluginInput) -> LampResponse<'static> {
    if PLUGIN_INPUT.try_send(input).is_err() {
        warn!("Plugin input channel full, dropping {}", input);
    }
    LampResponse::Ack
}

fn respond(response: LampResponse<'static>) {
    if RESPONSES.try_send(response).is_err() {
        warn!("Response channel full, dropping {}", response);
    }
}

/// Remote RX task - receives and parses frames from the remote controller
#[embassy_executor::task]
pub async fn remote_rx_task(mut rx: BufferedUartRx, directory: &'static PluginDirectory) {
    info!("Remote RX task started, {} plugins", directory.len());

    let mut link = RemoteLink::new(directory);
    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        let n = match rx.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                warn!("UART read error: {:?}", e);
                continue;
            }
        };
        trace!("RX: {} bytes", n);

        for &byte in &buf[..n] {
            match parser.feed(byte) {
                Ok(Some(frame)) => match RemoteCommand::from_frame(&frame) {
                    Ok(command) => {
                        debug!("Remote command: {}", command);
                        respond(link.handle(command));
                    }
                    Err(e) => {
                        warn!("Bad remote command: {}", e);
                        respond(LampResponse::Error(ErrorCode::from(e)));
                    }
                },
                Ok(None) => {}
                Err(e) => {
                    warn!("Frame parse error: {}", e);
                    respond(LampResponse::Error(ErrorCode::from(e)));
                }
            }
        }
    }
}
