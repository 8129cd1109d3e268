//! Inter-task communication channels
//!
//! The control task owns the scheduler. The remote link talks to it only
//! through the statics below.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicUsize, Ordering};

use matrixlamp_core::plugin::PluginInput;
use matrixlamp_core::scheduler::RemoteRequest;
use matrixlamp_protocol::LampResponse;

/// Channel capacity for plugin input from the remote link
const PLUGIN_INPUT_SIZE: usize = 16;

/// Channel capacity for responses to the remote host
const RESPONSE_CHANNEL_SIZE: usize = 8;

/// Latest remote switch request; a newer one replaces an unread older one
pub static REMOTE_REQUEST: Signal<CriticalSectionRawMutex, RemoteRequest> = Signal::new();

/// Input for the active plugin
pub static PLUGIN_INPUT: Channel<CriticalSectionRawMutex, PluginInput, PLUGIN_INPUT_SIZE> =
    Channel::new();

/// Responses waiting to be sent to the remote host
pub static RESPONSES: Channel<CriticalSectionRawMutex, LampResponse<'static>, RESPONSE_CHANNEL_SIZE> =
    Channel::new();

const NO_ACTIVE: usize = usize::MAX;

/// Index of the active plugin, published by the control task
static ACTIVE_INDEX: AtomicUsize = AtomicUsize::new(NO_ACTIVE);

pub fn publish_active(index: Option<usize>) {
    ACTIVE_INDEX.store(index.unwrap_or(NO_ACTIVE), Ordering::Relaxed);
}

pub fn active_index() -> Option<usize> {
    match ACTIVE_INDEX.load(Ordering::Relaxed) {
        NO_ACTIVE => None,
        index => Some(index),
    }
}
