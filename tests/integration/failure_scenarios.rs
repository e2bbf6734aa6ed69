//! Failure handling of the monitoring pipeline
//!
//! These tests verify that:
//! - A failing channel never prevents delivery on the others
//! - Notification failures never fail the tick
//! - Sampling failures fail the tick without touching alert state

use std::sync::Arc;

use resource_monitor::{MetricKind, notifiers::Notifier};

use crate::helpers::*;

#[tokio::test]
async fn test_failing_email_does_not_block_sms() {
    let email = RecordingNotifier::failing("email");
    let sms = RecordingNotifier::new("sms");
    let notifiers: Vec<Arc<dyn Notifier>> = vec![email.clone(), sms.clone()];
    let mut monitor = monitor_with(ScriptedSource::new(&[(50.0, 50.0, 95.0)]), notifiers);

    let report = monitor.tick().await.expect("notification failures must not fail the tick");

    assert_eq!(email.sent().len(), 1);
    assert_eq!(sms.sent().len(), 1);
    assert_eq!(report.failed_deliveries(), 1);
    assert_eq!(report.dispatches[0].failed_channels(), vec!["email"]);
}

#[tokio::test]
async fn test_failed_notification_is_not_retried() {
    let email = RecordingNotifier::failing("email");
    let mut monitor = monitor_with(
        ScriptedSource::new(&[(95.0, 50.0, 50.0), (95.0, 50.0, 50.0)]),
        vec![email.clone()],
    );

    monitor.tick().await.unwrap();
    monitor.tick().await.unwrap();

    // the alert is considered raised even though nobody received it
    assert_eq!(email.sent().len(), 1);
    assert!(monitor.states().is_active(MetricKind::Cpu));
}

#[tokio::test]
async fn test_all_channels_failing_keeps_monitoring() {
    let email = RecordingNotifier::failing("email");
    let sms = RecordingNotifier::failing("sms");
    let notifiers: Vec<Arc<dyn Notifier>> = vec![email.clone(), sms.clone()];
    let mut monitor = monitor_with(
        ScriptedSource::new(&[(95.0, 50.0, 50.0), (10.0, 50.0, 50.0), (95.0, 50.0, 50.0)]),
        notifiers,
    );

    for _ in 0..3 {
        monitor.tick().await.unwrap();
    }

    assert_eq!(email.sent().len(), 2);
    assert_eq!(sms.sent().len(), 2);
}

#[tokio::test]
async fn test_sampling_failure_propagates_and_preserves_state() {
    let email = RecordingNotifier::new("email");
    let source = ScriptedSource::new(&[(95.0, 50.0, 50.0), (95.0, 50.0, 50.0)]).with_failure_at(1);
    let mut monitor = monitor_with(source, vec![email.clone()]);

    monitor.tick().await.unwrap();
    let before = monitor.states();

    assert!(monitor.tick().await.is_err());
    assert_eq!(monitor.states(), before);

    // still suppressed after the failed tick
    monitor.tick().await.unwrap();
    assert_eq!(email.sent().len(), 1);
}
