//! Dispatcher - fans alert events out to the configured notifiers
//!
//! Every notifier is attempted for every dispatched event. The attempts run concurrently and
//! each one is bounded by a timeout, so a hanging or failing channel never holds back the
//! others. Failures are logged and recorded in the [`DispatchReport`] but are neither retried
//! nor escalated.

use std::{sync::Arc, time::Duration};

use futures::future::join_all;
use tracing::{error, info, instrument, trace, warn};

use crate::{
    evaluator::AlertEvent,
    notifiers::{Notifier, NotifyError},
};

/// Result of one notification attempt
#[derive(Debug)]
pub struct Delivery {
    pub channel: String,
    pub result: Result<(), NotifyError>,
}

impl Delivery {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcome of dispatching a single event
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub deliveries: Vec<Delivery>,
}

impl DispatchReport {
    pub fn succeeded(&self) -> usize {
        self.deliveries.iter().filter(|d| d.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.deliveries.len() - self.succeeded()
    }

    /// Names of channels that did not deliver
    pub fn failed_channels(&self) -> Vec<&str> {
        self.deliveries
            .iter()
            .filter(|d| !d.is_success())
            .map(|d| d.channel.as_str())
            .collect()
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    notifiers: Vec<Arc<dyn Notifier>>,
    timeout: Duration,
    notify_on_recovery: bool,
}

impl Dispatcher {
    pub fn new(notifiers: Vec<Arc<dyn Notifier>>, timeout: Duration) -> Self {
        Self {
            notifiers,
            timeout,
            notify_on_recovery: false,
        }
    }

    /// Also deliver cleared events, not only raised ones
    pub fn notify_on_recovery(mut self, enabled: bool) -> Self {
        self.notify_on_recovery = enabled;
        self
    }

    pub fn channels(&self) -> Vec<&str> {
        self.notifiers.iter().map(|n| n.name()).collect()
    }

    /// Whether this event is delivered to the notifiers at all
    pub fn should_dispatch(&self, event: &AlertEvent) -> bool {
        event.is_raised() || self.notify_on_recovery
    }

    #[instrument(skip_all, fields(metric = %event.kind, direction = %event.direction))]
    pub async fn send(&self, event: &AlertEvent) -> DispatchReport {
        if !self.should_dispatch(event) {
            trace!("not dispatching {} event", event.direction);
            return DispatchReport::default();
        }

        if self.notifiers.is_empty() {
            warn!("no notifiers configured, alert is only logged: {}", event.message);
            return DispatchReport::default();
        }

        let attempts = self
            .notifiers
            .iter()
            .map(|notifier| self.attempt(notifier.as_ref(), event));

        DispatchReport {
            deliveries: join_all(attempts).await,
        }
    }

    async fn attempt(&self, notifier: &dyn Notifier, event: &AlertEvent) -> Delivery {
        let channel = notifier.name().to_string();

        let result = match tokio::time::timeout(
            self.timeout,
            notifier.send(&event.subject, &event.message),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(NotifyError::Timeout(self.timeout)),
        };

        match &result {
            Ok(()) => info!(channel = %channel, "{} alert sent: {}", event.kind, event.subject),
            Err(e) => error!(channel = %channel, "failed to send {} alert: {e}", event.kind),
        }

        Delivery { channel, result }
    }
}
