//! AlertEvaluator - maps samples to alert transitions
//!
//! The evaluator owns the [`AlertStates`] of the process and turns each [`MetricSample`] into
//! zero or more [`AlertEvent`]s. Each metric kind is evaluated on its own; a kind only produces
//! an event when it crosses its threshold in either direction, so a metric that stays high
//! raises exactly one alert per excursion.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, trace, warn};

use crate::{
    MetricKind, MetricSample,
    state::{AlertStates, ResourceEvaluation},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    Raised,
    Cleared,
}

impl fmt::Display for AlertDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertDirection::Raised => f.write_str("raised"),
            AlertDirection::Cleared => f.write_str("cleared"),
        }
    }
}

/// A threshold crossing of a single metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub kind: MetricKind,
    pub direction: AlertDirection,
    pub value: f32,
    pub hostname: String,
    pub subject: String,
    pub message: String,
}

impl AlertEvent {
    pub fn raised(kind: MetricKind, value: f32, hostname: &str) -> Self {
        let label = kind.label();
        Self {
            kind,
            direction: AlertDirection::Raised,
            value,
            hostname: hostname.to_string(),
            subject: format!("High {label} Usage Alert"),
            message: format!(
                "High {label} Usage Alert on {hostname}: {label} usage is at {value}%"
            ),
        }
    }

    pub fn cleared(kind: MetricKind, value: f32, hostname: &str) -> Self {
        let label = kind.label();
        Self {
            kind,
            direction: AlertDirection::Cleared,
            value,
            hostname: hostname.to_string(),
            subject: format!("{label} Usage Back To Normal"),
            message: format!("{label} usage back to normal on {hostname}: {value}%"),
        }
    }

    pub fn is_raised(&self) -> bool {
        self.direction == AlertDirection::Raised
    }
}

/// Evaluate a sample against the given states, updating them in place.
///
/// Events are returned in CPU, memory, disk order.
pub fn evaluate_sample(sample: &MetricSample, states: &mut AlertStates) -> Vec<AlertEvent> {
    MetricKind::ALL
        .into_iter()
        .filter_map(|kind| evaluate_kind(kind, sample, states))
        .collect()
}

fn evaluate_kind(
    kind: MetricKind,
    sample: &MetricSample,
    states: &mut AlertStates,
) -> Option<AlertEvent> {
    let value = sample.value(kind);
    let threshold = kind.threshold();
    let state = states.get_mut(kind);

    let evaluation = ResourceEvaluation::evaluate(value, threshold, state.active);
    state.apply(evaluation);

    trace!("{kind} evaluation: {value}% vs {threshold}% → {evaluation:?}");

    match evaluation {
        ResourceEvaluation::Ok | ResourceEvaluation::Exceeding => None,
        ResourceEvaluation::StartsToExceed => {
            warn!(
                metric = %kind,
                value,
                threshold,
                "{kind} usage is above threshold: {value}%"
            );
            Some(AlertEvent::raised(kind, value, &sample.hostname))
        }
        ResourceEvaluation::BackToOk => {
            info!(
                metric = %kind,
                value,
                threshold,
                "{kind} usage back to normal: {value}%"
            );
            Some(AlertEvent::cleared(kind, value, &sample.hostname))
        }
    }
}

/// Evaluator owning the alert state of a monitoring process
#[derive(Debug, Clone, Default)]
pub struct AlertEvaluator {
    states: AlertStates,
}

impl AlertEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from previously captured states
    pub fn with_states(states: AlertStates) -> Self {
        Self { states }
    }

    #[instrument(skip_all, fields(hostname = %sample.hostname))]
    pub fn evaluate(&mut self, sample: &MetricSample) -> Vec<AlertEvent> {
        evaluate_sample(sample, &mut self.states)
    }

    /// Snapshot of the current states
    pub fn states(&self) -> AlertStates {
        self.states
    }
}
