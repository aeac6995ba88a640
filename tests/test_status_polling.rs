use std::sync::Arc;
use std::time::Duration;

use aqualite_client::auth::AuthContext;
use aqualite_client::domain::poller::{JobStatus, StatusPoller};
use aqualite_client::domain::portal::PortalDomain;
use aqualite_client::transport::transport_mock::MockTransport;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

fn poller(transport: Arc<MockTransport>) -> StatusPoller {
    StatusPoller::new(transport, AuthContext::new("test-token", 1, 1), PortalDomain::Forecasting, POLL_INTERVAL)
}

/// Polls the condition for up to two seconds; the poller runs on real time
/// with a short interval.
async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("Condition not met within two seconds");
}

#[tokio::test]
async fn poller_converges_on_the_terminal_status() {
    let transport = Arc::new(MockTransport::new());
    transport.script_statuses(17, &["pending", "pending", "running", "completed"]);
    let poller = poller(transport.clone());

    poller.watch(17);
    wait_until(|| !poller.is_polling(17)).await;

    assert_eq!(transport.status_read_count(17), 4);
    assert_eq!(poller.latest(17).unwrap().status, JobStatus::Completed);
    assert_eq!(poller.active_count(), 0);
}

#[tokio::test]
async fn watchers_observe_the_descriptor_snapshots() {
    let transport = Arc::new(MockTransport::new());
    transport.script_statuses(3, &["running", "completed"]);
    let poller = poller(transport.clone());

    let mut updates = poller.watch(3);
    let mut observed = Vec::new();
    while updates.changed().await.is_ok() {
        if let Some(descriptor) = updates.borrow_and_update().clone() {
            observed.push(descriptor.status);
        }
    }

    // A watch channel only retains the latest value, so intermediate
    // snapshots may be skipped; the terminal one must always arrive last.
    assert_eq!(observed.last(), Some(&JobStatus::Completed));
    assert!(observed.iter().all(|s| *s == JobStatus::Running || *s == JobStatus::Completed));
}

#[tokio::test]
async fn read_failures_do_not_cancel_the_schedule() {
    let transport = Arc::new(MockTransport::new());
    transport.script_statuses(5, &["pending"]);
    transport.script_read_failure(5, "connection reset");
    transport.script_statuses(5, &["failed"]);
    let poller = poller(transport.clone());

    poller.watch(5);
    wait_until(|| !poller.is_polling(5)).await;

    assert_eq!(transport.status_read_count(5), 3);
    assert_eq!(poller.latest(5).unwrap().status, JobStatus::Failed);
}

#[tokio::test]
async fn unknown_status_strings_are_tolerated() {
    let transport = Arc::new(MockTransport::new());
    transport.script_statuses(6, &["pending", "exploded", "completed"]);
    let poller = poller(transport.clone());

    poller.watch(6);
    wait_until(|| !poller.is_polling(6)).await;

    assert_eq!(transport.status_read_count(6), 3);
    assert_eq!(poller.latest(6).unwrap().status, JobStatus::Completed);
}

#[tokio::test]
async fn watching_twice_registers_a_single_recurring_read() {
    let transport = Arc::new(MockTransport::new());
    let poller = poller(transport.clone());

    // No script: the job stays pending forever
    let _first = poller.watch(8);
    let _second = poller.watch(8);

    assert_eq!(poller.active_count(), 1);
    wait_until(|| transport.status_read_count(8) >= 2).await;
    assert_eq!(poller.active_count(), 1);

    poller.shutdown();
}

#[tokio::test]
async fn cancellation_is_immediate_and_idempotent() {
    let transport = Arc::new(MockTransport::new());
    let poller = poller(transport.clone());

    poller.watch(9);
    wait_until(|| transport.status_read_count(9) >= 1).await;

    poller.cancel(9);
    assert!(!poller.is_polling(9));

    // Idempotent: a second cancel and a cancel for an unknown job are no-ops
    poller.cancel(9);
    poller.cancel(1234);

    let reads_after_cancel = transport.status_read_count(9);
    tokio::time::sleep(POLL_INTERVAL * 5).await;
    assert_eq!(transport.status_read_count(9), reads_after_cancel);
}

#[tokio::test]
async fn shutdown_cancels_every_active_poll() {
    let transport = Arc::new(MockTransport::new());
    let poller = poller(transport.clone());

    poller.watch(1);
    poller.watch(2);
    poller.watch(3);
    assert_eq!(poller.active_count(), 3);

    poller.shutdown();
    assert_eq!(poller.active_count(), 0);
}

#[tokio::test]
async fn listed_jobs_seed_the_registry_and_terminal_jobs_leave_it() {
    use aqualite_client::api::job_dto::JobRecordDto;

    let transport = Arc::new(MockTransport::new());
    transport.set_job_records(vec![
        JobRecordDto { id: 1, model: Some("W".to_string()), mode: Some("C".to_string()), optimizer: Some("P".to_string()) },
        JobRecordDto { id: 2, model: Some("S".to_string()), mode: Some("F".to_string()), optimizer: None },
    ]);
    transport.script_statuses(1, &["completed"]);
    transport.script_statuses(2, &["running", "failed"]);
    let poller = poller(transport.clone());

    let ids = poller.watch_listed_jobs().await.unwrap();
    assert_eq!(ids, vec![1, 2]);

    wait_until(|| poller.active_count() == 0).await;
    assert_eq!(poller.latest(1).unwrap().status, JobStatus::Completed);
    assert_eq!(poller.latest(2).unwrap().status, JobStatus::Failed);
}
