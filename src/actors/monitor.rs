//! MonitorActor - ticks a [`Monitor`] on an interval
//!
//! ## Message Flow
//!
//! ```text
//! Timer tick → Monitor::tick → sample → evaluate → dispatch
//!     ↑
//!     └─── Commands (TickNow, GetState, Shutdown)
//! ```
//!
//! A failed tick is logged and the actor simply waits for the next one.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, instrument, warn};

use crate::{
    monitor::{Monitor, TickReport},
    source::MetricsSource,
    state::AlertStates,
};

use super::messages::MonitorCommand;

/// Shortest time between two scheduled ticks
pub const MINIMUM_INTERVAL: Duration = Duration::from_secs(1);

/// Actor owning the monitor and therefore the alert state
pub struct MonitorActor<S> {
    monitor: Monitor<S>,

    /// Command receiver for control messages
    command_rx: mpsc::Receiver<MonitorCommand>,

    /// Time between two ticks
    interval_duration: Duration,
}

impl<S> MonitorActor<S>
where
    S: MetricsSource + 'static,
{
    /// Intervals shorter than [`MINIMUM_INTERVAL`] are raised to it.
    pub fn new(
        monitor: Monitor<S>,
        command_rx: mpsc::Receiver<MonitorCommand>,
        interval_duration: Duration,
    ) -> Self {
        if interval_duration < MINIMUM_INTERVAL {
            warn!("interval {interval_duration:?} is too short, using {MINIMUM_INTERVAL:?}");
        }

        Self {
            monitor,
            command_rx,
            interval_duration: interval_duration.max(MINIMUM_INTERVAL),
        }
    }

    /// Run the actor's main loop
    ///
    /// Runs until a Shutdown command is received or every handle is dropped.
    #[instrument(skip(self), fields(interval = ?self.interval_duration))]
    pub async fn run(mut self) {
        debug!("starting monitor actor");

        let mut ticker = interval(self.interval_duration);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.scheduled_tick().await;
                }

                cmd = self.command_rx.recv() => {
                    let Some(cmd) = cmd else {
                        warn!("command channel closed, shutting down");
                        break;
                    };

                    match cmd {
                        MonitorCommand::TickNow { respond_to } => {
                            debug!("received TickNow command");
                            let result = self.monitor.tick().await;
                            let _ = respond_to.send(result);
                        }

                        MonitorCommand::GetState { respond_to } => {
                            let _ = respond_to.send(self.monitor.states());
                        }

                        MonitorCommand::Shutdown => {
                            debug!("received shutdown command");
                            break;
                        }
                    }
                }
            }
        }

        debug!("monitor actor stopped");
    }

    async fn scheduled_tick(&mut self) {
        match self.monitor.tick().await {
            Ok(report) => {
                let failed = report.failed_deliveries();
                if failed > 0 {
                    warn!("{failed} notification(s) could not be delivered");
                }
            }
            Err(e) => error!("failed to sample metrics: {e}"),
        }
    }
}

/// Handle for controlling a MonitorActor
///
/// It can be cloned and shared across tasks.
#[derive(Clone)]
pub struct MonitorHandle {
    sender: mpsc::Sender<MonitorCommand>,
}

impl MonitorHandle {
    /// Spawn a new monitor actor ticking every `interval_duration`
    ///
    /// The first tick happens immediately.
    pub fn spawn<S>(monitor: Monitor<S>, interval_duration: Duration) -> Self
    where
        S: MetricsSource + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let actor = MonitorActor::new(monitor, cmd_rx, interval_duration);

        tokio::spawn(actor.run());

        Self { sender: cmd_tx }
    }

    /// Run a tick right away and return its report
    pub async fn tick_now(&self) -> Result<TickReport> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(MonitorCommand::TickNow { respond_to: tx })
            .await
            .context("failed to send TickNow command")?;

        let report = rx.await.context("failed to receive response")??;
        Ok(report)
    }

    /// Current alert states, `None` if the actor is gone
    pub async fn get_state(&self) -> Option<AlertStates> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(MonitorCommand::GetState { respond_to: tx })
            .await
            .ok()?;

        rx.await.ok()
    }

    /// Gracefully shut down the monitor
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(MonitorCommand::Shutdown)
            .await
            .context("failed to send Shutdown command")?;
        Ok(())
    }
}
