//! Actor-based driver for the monitor
//!
//! The [`MonitorActor`](monitor::MonitorActor) owns a [`Monitor`](crate::monitor::Monitor)
//! and ticks it on an interval. It runs as an independent async task and is controlled
//! through a [`MonitorHandle`](monitor::MonitorHandle).
//!
//! ## Communication Patterns
//!
//! 1. **Commands**: the handle sends control messages over an mpsc channel
//! 2. **Request/Response**: oneshot channels for queries and manual ticks

pub mod messages;
pub mod monitor;
