//! Per-metric alert state
//!
//! Every [`MetricKind`] has its own [`AlertState`]. The state only records whether an alert
//! is currently outstanding; the transition rules live in [`ResourceEvaluation::evaluate`]:
//!
//! ```text
//! resource > threshold:
//!   inactive → ResourceEvaluation::StartsToExceed (raise, becomes active)
//!   active   → ResourceEvaluation::Exceeding      (suppressed)
//!
//! resource <= threshold:
//!   active   → ResourceEvaluation::BackToOk       (clear, becomes inactive)
//!   inactive → ResourceEvaluation::Ok
//! ```

use serde::{Deserialize, Serialize};

use crate::MetricKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceEvaluation {
    Ok,
    Exceeding,
    StartsToExceed,
    BackToOk,
}

impl ResourceEvaluation {
    pub fn evaluate(resource: f32, threshold: f32, active: bool) -> ResourceEvaluation {
        // equal to the threshold is still considered normal
        if resource > threshold {
            if active {
                return ResourceEvaluation::Exceeding;
            }
            return ResourceEvaluation::StartsToExceed;
        }

        if active {
            return ResourceEvaluation::BackToOk;
        }
        ResourceEvaluation::Ok
    }

    /// Whether the alert is outstanding after this evaluation
    pub fn is_active(self) -> bool {
        matches!(
            self,
            ResourceEvaluation::Exceeding | ResourceEvaluation::StartsToExceed
        )
    }

    /// Whether this evaluation is an edge (raise or clear)
    pub fn is_transition(self) -> bool {
        matches!(
            self,
            ResourceEvaluation::StartsToExceed | ResourceEvaluation::BackToOk
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertState {
    pub active: bool,
}

impl AlertState {
    /// Apply an evaluation result to this state
    pub fn apply(&mut self, evaluation: ResourceEvaluation) {
        self.active = evaluation.is_active();
    }
}

/// Alert state for all metric kinds, starting out with every metric normal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertStates {
    states: [AlertState; 3],
}

impl AlertStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: MetricKind) -> AlertState {
        self.states[kind.index()]
    }

    pub fn get_mut(&mut self, kind: MetricKind) -> &mut AlertState {
        &mut self.states[kind.index()]
    }

    pub fn is_active(&self, kind: MetricKind) -> bool {
        self.get(kind).active
    }

    /// Metric kinds that currently have an outstanding alert
    pub fn active_kinds(&self) -> Vec<MetricKind> {
        MetricKind::ALL
            .into_iter()
            .filter(|kind| self.is_active(*kind))
            .collect()
    }
}
