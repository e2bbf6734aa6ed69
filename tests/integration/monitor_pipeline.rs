//! End-to-end ticks through sampling, evaluation and dispatch
//!
//! These tests verify that:
//! - A threshold crossing is delivered to every channel exactly once
//! - Sustained excursions do not produce further notifications
//! - Recoveries are logged but not delivered
//! - A new excursion after recovery alerts again

use std::sync::Arc;

use pretty_assertions::assert_eq;
use resource_monitor::{
    MetricKind,
    evaluator::AlertDirection,
    notifiers::Notifier,
};

use crate::helpers::*;

#[tokio::test]
async fn test_cpu_alert_reaches_every_channel() {
    let email = RecordingNotifier::new("email");
    let sms = RecordingNotifier::new("sms");
    let notifiers: Vec<Arc<dyn Notifier>> = vec![email.clone(), sms.clone()];
    let mut monitor = monitor_with(ScriptedSource::new(&[(85.0, 50.0, 50.0)]), notifiers);

    let report = monitor.tick().await.unwrap();

    assert_eq!(report.events.len(), 1);
    assert_eq!(report.events[0].kind, MetricKind::Cpu);
    assert_eq!(report.dispatches.len(), 1);
    assert_eq!(report.dispatches[0].succeeded(), 2);

    let expected = (
        "High CPU Usage Alert".to_string(),
        "High CPU Usage Alert on test-host: CPU usage is at 85%".to_string(),
    );
    assert_eq!(email.sent(), vec![expected.clone()]);
    assert_eq!(sms.sent(), vec![expected]);

    let states = monitor.states();
    assert!(states.is_active(MetricKind::Cpu));
    assert!(!states.is_active(MetricKind::Memory));
    assert!(!states.is_active(MetricKind::Disk));
}

#[tokio::test]
async fn test_sustained_excursion_notifies_once() {
    let email = RecordingNotifier::new("email");
    let mut monitor = monitor_with(
        ScriptedSource::new(&[(90.0, 50.0, 50.0), (90.0, 50.0, 50.0), (97.5, 50.0, 50.0)]),
        vec![email.clone()],
    );

    for _ in 0..3 {
        monitor.tick().await.unwrap();
    }

    assert_eq!(email.sent().len(), 1);
}

#[tokio::test]
async fn test_recovery_is_not_delivered() {
    let email = RecordingNotifier::new("email");
    let mut monitor = monitor_with(
        ScriptedSource::new(&[(85.0, 50.0, 50.0), (60.0, 50.0, 50.0)]),
        vec![email.clone()],
    );

    monitor.tick().await.unwrap();
    let report = monitor.tick().await.unwrap();

    assert_eq!(report.events.len(), 1);
    assert_eq!(report.events[0].direction, AlertDirection::Cleared);
    assert!(report.dispatches.is_empty());
    assert_eq!(email.sent().len(), 1);
    assert!(!monitor.states().is_active(MetricKind::Cpu));
}

#[tokio::test]
async fn test_re_excursion_alerts_again() {
    let sms = RecordingNotifier::new("sms");
    let mut monitor = monitor_with(
        ScriptedSource::new(&[
            (50.0, 80.0, 50.0),
            (50.0, 75.0, 50.0),
            (50.0, 76.0, 50.0),
        ]),
        vec![sms.clone()],
    );

    for _ in 0..3 {
        monitor.tick().await.unwrap();
    }

    let messages: Vec<_> = sms.sent().into_iter().map(|(_, message)| message).collect();
    assert_eq!(
        messages,
        vec![
            "High Memory Usage Alert on test-host: Memory usage is at 80%".to_string(),
            "High Memory Usage Alert on test-host: Memory usage is at 76%".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_independent_metrics_alert_in_same_tick() {
    let email = RecordingNotifier::new("email");
    let mut monitor = monitor_with(
        ScriptedSource::new(&[(81.0, 10.0, 99.0)]),
        vec![email.clone()],
    );

    let report = monitor.tick().await.unwrap();

    let kinds: Vec<_> = report.raised().map(|event| event.kind).collect();
    assert_eq!(kinds, vec![MetricKind::Cpu, MetricKind::Disk]);
    assert_eq!(report.dispatches.len(), 2);

    let subjects: Vec<_> = email.sent().into_iter().map(|(subject, _)| subject).collect();
    assert_eq!(
        subjects,
        vec![
            "High CPU Usage Alert".to_string(),
            "High Disk Usage Alert".to_string()
        ]
    );
}
