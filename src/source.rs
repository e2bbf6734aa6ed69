//! Metric sources
//!
//! [`MetricsSource`] is the seam between the monitor and the operating system. The
//! [`SysinfoSource`] reads the local host; tests substitute scripted sources.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sysinfo::{Disks, System};
use tracing::{instrument, trace};

use crate::{
    MetricSample,
    util::{percent_of, round_percent},
};

#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("no disk mounted at {0}")]
    DiskNotFound(PathBuf),

    #[error("disk mounted at {0} reports no capacity")]
    EmptyDisk(PathBuf),

    #[error("total memory is reported as zero")]
    MemoryUnavailable,

    #[error("no CPUs detected")]
    NoCpus,

    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait MetricsSource: Send {
    async fn sample(&mut self) -> Result<MetricSample, SampleError>;
}

/// Samples the local host through `sysinfo`
pub struct SysinfoSource {
    system: System,
    hostname: String,
    disk_path: PathBuf,
    cpu_window: Duration,
}

impl SysinfoSource {
    pub fn new(disk_path: impl Into<PathBuf>, cpu_window: Duration) -> Self {
        Self {
            system: System::new(),
            hostname: System::host_name().unwrap_or_else(|| String::from("unknown")),
            disk_path: disk_path.into(),
            cpu_window: cpu_window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
        }
    }

    pub fn with_hostname(mut self, hostname: impl ToString) -> Self {
        self.hostname = hostname.to_string();
        self
    }

    async fn cpu_percent(&mut self) -> Result<f32, SampleError> {
        // usage is computed between two refreshes
        self.system.refresh_cpu_usage();
        tokio::time::sleep(self.cpu_window).await;
        self.system.refresh_cpu_usage();

        if self.system.cpus().is_empty() {
            return Err(SampleError::NoCpus);
        }
        Ok(round_percent(self.system.global_cpu_usage()))
    }

    fn memory_percent(&mut self) -> Result<f32, SampleError> {
        self.system.refresh_memory();

        let total = self.system.total_memory();
        let available = self.system.available_memory();
        percent_of(total.saturating_sub(available), total).ok_or(SampleError::MemoryUnavailable)
    }

    fn disk_percent(&self) -> Result<f32, SampleError> {
        disk_usage(&self.disk_path)
    }
}

fn disk_usage(mount_point: &Path) -> Result<f32, SampleError> {
    let disks = Disks::new_with_refreshed_list();
    let disk = disks
        .iter()
        .find(|disk| disk.mount_point() == mount_point)
        .ok_or_else(|| SampleError::DiskNotFound(mount_point.to_path_buf()))?;

    let total = disk.total_space();
    let available = disk.available_space();
    percent_of(total.saturating_sub(available), total)
        .ok_or_else(|| SampleError::EmptyDisk(mount_point.to_path_buf()))
}

#[async_trait]
impl MetricsSource for SysinfoSource {
    #[instrument(skip(self), fields(hostname = %self.hostname))]
    async fn sample(&mut self) -> Result<MetricSample, SampleError> {
        let cpu_percent = self.cpu_percent().await?;
        let memory_percent = self.memory_percent()?;
        let disk_percent = self.disk_percent()?;

        let sample = MetricSample {
            cpu_percent,
            memory_percent,
            disk_percent,
            hostname: self.hostname.clone(),
            timestamp: Utc::now(),
        };
        trace!("sampled {sample:?}");

        Ok(sample)
    }
}
