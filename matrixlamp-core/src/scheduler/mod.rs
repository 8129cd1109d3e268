//! Plugin scheduler
//!
//! Decides which plugin is active, runs its tick once per control-loop
//! iteration and performs switches between plugins.

pub mod executor;
pub mod machine;
pub mod request;

pub use executor::{Clock, FrameOutcome, Scheduler, StartError, StepError, StepReport};
pub use machine::{SchedulerState, SwitchCause, Transition};
pub use request::{CommandSink, RemoteRequest, RequestSlot};
