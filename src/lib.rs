pub mod actors;
pub mod alerts;
pub mod config;
pub mod evaluator;
pub mod monitor;
pub mod notifiers;
pub mod source;
pub mod state;
pub mod util;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the host's resource utilization, taken once per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub cpu_percent: f32,
    pub memory_percent: f32,
    pub disk_percent: f32,
    pub hostname: String,
    pub timestamp: DateTime<Utc>,
}

impl MetricSample {
    pub fn new(
        hostname: impl ToString,
        cpu_percent: f32,
        memory_percent: f32,
        disk_percent: f32,
    ) -> Self {
        Self {
            cpu_percent,
            memory_percent,
            disk_percent,
            hostname: hostname.to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Value of the given metric in this sample
    pub fn value(&self, kind: MetricKind) -> f32 {
        match kind {
            MetricKind::Cpu => self.cpu_percent,
            MetricKind::Memory => self.memory_percent,
            MetricKind::Disk => self.disk_percent,
        }
    }
}

/// The three resources the monitor watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Cpu,
    Memory,
    Disk,
}

impl MetricKind {
    pub const ALL: [MetricKind; 3] = [MetricKind::Cpu, MetricKind::Memory, MetricKind::Disk];

    /// Usage percentage above which the metric is considered high
    pub fn threshold(self) -> f32 {
        match self {
            MetricKind::Cpu => 80.0,
            MetricKind::Memory => 75.0,
            MetricKind::Disk => 80.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MetricKind::Cpu => "CPU",
            MetricKind::Memory => "Memory",
            MetricKind::Disk => "Disk",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            MetricKind::Cpu => 0,
            MetricKind::Memory => 1,
            MetricKind::Disk => 2,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
