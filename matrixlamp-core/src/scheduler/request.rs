//! Pending switch requests
//!
//! The button and the remote link are two producers of one logical stream
//! of switch requests. Remote requests are parked in a [`RequestSlot`] and
//! picked up at the top of the next scheduler step; they never call into
//! the scheduler re-entrantly.

use crate::plugin::SelectError;

/// Switch request from the remote link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RemoteRequest {
    /// Activate the plugin at this registry index
    Select(usize),
    /// Activate the next plugin in cycling order
    Next,
}

/// Single-entry request slot
///
/// A burst of requests between two steps collapses to the latest one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestSlot {
    pending: Option<RemoteRequest>,
}

impl RequestSlot {
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Park a request, replacing any earlier one
    ///
    /// Returns the request that was replaced.
    pub fn post(&mut self, request: RemoteRequest) -> Option<RemoteRequest> {
        self.pending.replace(request)
    }

    pub fn take(&mut self) -> Option<RemoteRequest> {
        self.pending.take()
    }

    pub fn peek(&self) -> Option<RemoteRequest> {
        self.pending
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

/// The only way the remote layer may change which plugin is active
pub trait CommandSink {
    /// Request the plugin with this id
    ///
    /// Unknown ids are rejected with [`SelectError::NotFound`] and change
    /// nothing.
    fn select_plugin(&mut self, id: &str) -> Result<(), SelectError>;

    /// Request the next plugin in cycling order
    fn request_next(&mut self);
}
