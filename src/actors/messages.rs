//! Message types for actor communication

use tokio::sync::oneshot;

use crate::{monitor::TickReport, source::SampleError, state::AlertStates};

/// Commands that can be sent to a MonitorActor
#[derive(Debug)]
pub enum MonitorCommand {
    /// Run a tick immediately (bypassing the interval timer)
    ///
    /// Used for testing and for one-off checks.
    TickNow {
        respond_to: oneshot::Sender<Result<TickReport, SampleError>>,
    },

    /// Get a snapshot of the current alert states
    GetState {
        respond_to: oneshot::Sender<AlertStates>,
    },

    /// Gracefully shut down the monitor
    ///
    /// A tick that is already running finishes first.
    Shutdown,
}
