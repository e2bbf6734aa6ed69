//! One monitoring tick: sample → evaluate → dispatch
//!
//! The monitor has no scheduling of its own. A driver (the [`MonitorActor`] or a one-shot
//! run from the binary) calls [`Monitor::tick`] once per interval.
//!
//! [`MonitorActor`]: crate::actors::monitor::MonitorActor

use tracing::{debug, instrument};

use crate::{
    MetricSample,
    alerts::{DispatchReport, Dispatcher},
    config::Config,
    evaluator::{AlertEvaluator, AlertEvent},
    notifiers,
    source::{MetricsSource, SampleError, SysinfoSource},
    state::AlertStates,
};

/// Everything that happened during one tick
#[derive(Debug)]
pub struct TickReport {
    pub sample: MetricSample,
    pub events: Vec<AlertEvent>,
    /// One report per dispatched event, in event order
    pub dispatches: Vec<DispatchReport>,
}

impl TickReport {
    pub fn raised(&self) -> impl Iterator<Item = &AlertEvent> {
        self.events.iter().filter(|event| event.is_raised())
    }

    pub fn failed_deliveries(&self) -> usize {
        self.dispatches.iter().map(DispatchReport::failed).sum()
    }
}

pub struct Monitor<S> {
    source: S,
    evaluator: AlertEvaluator,
    dispatcher: Dispatcher,
}

impl<S> Monitor<S>
where
    S: MetricsSource,
{
    pub fn new(source: S, dispatcher: Dispatcher) -> Self {
        Self {
            source,
            evaluator: AlertEvaluator::new(),
            dispatcher,
        }
    }

    /// Run a single tick.
    ///
    /// Sampling failures abort the tick and leave the alert state untouched. Notification
    /// failures are part of the returned report and never fail the tick.
    #[instrument(skip(self))]
    pub async fn tick(&mut self) -> Result<TickReport, SampleError> {
        let sample = self.source.sample().await?;
        debug!(
            "cpu {}%, memory {}%, disk {}%",
            sample.cpu_percent, sample.memory_percent, sample.disk_percent
        );

        let events = self.evaluator.evaluate(&sample);

        let mut dispatches = vec![];
        for event in events.iter().filter(|e| self.dispatcher.should_dispatch(e)) {
            dispatches.push(self.dispatcher.send(event).await);
        }

        Ok(TickReport {
            sample,
            events,
            dispatches,
        })
    }

    pub fn states(&self) -> AlertStates {
        self.evaluator.states()
    }

    pub fn channels(&self) -> Vec<&str> {
        self.dispatcher.channels()
    }
}

impl Monitor<SysinfoSource> {
    /// Build a monitor for the local host from configuration
    pub fn from_config(config: &Config) -> Self {
        let mut source = SysinfoSource::new(&config.disk_path, config.cpu_sample_window());
        if let Some(hostname) = &config.hostname {
            source = source.with_hostname(hostname);
        }

        let dispatcher = Dispatcher::new(
            notifiers::from_config(&config.notifiers),
            config.notify_timeout(),
        )
        .notify_on_recovery(config.notify_on_recovery);

        Monitor::new(source, dispatcher)
    }
}
