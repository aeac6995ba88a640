use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::status_dto::JobStatusDto;
use crate::auth::AuthContext;
use crate::domain::portal::{JobId, JobKind, PortalDomain};
use crate::error::{Error, Result};
use crate::transport::portal::SharedTransport;

/// Lifecycle of a job as reported by `check_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    /// Terminal statuses never transition again; the poller stops on them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl FromStr for JobStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<JobStatus> {
        match s {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(Error::PollReadError(format!("Unknown job status '{}'", other))),
        }
    }
}

/// One status snapshot of a job. Replaced wholesale on every successful
/// read; never partially merged.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDescriptor {
    pub job_id: JobId,
    pub kind: JobKind,
    pub status: JobStatus,
    pub result_links: HashMap<String, String>,
    pub error_message: Option<String>,
}

impl JobDescriptor {
    pub fn from_status_dto(job_id: JobId, kind: JobKind, dto: &JobStatusDto) -> Result<JobDescriptor> {
        Ok(JobDescriptor {
            job_id,
            kind,
            status: dto.status.parse()?,
            result_links: dto.result_links(),
            error_message: dto.error_message.clone(),
        })
    }
}

#[derive(Debug)]
struct AppliedSnapshot {
    sequence: u64,
    descriptor: JobDescriptor,
}

#[derive(Debug)]
struct PollHandle {
    task: JoinHandle<()>,
    updates: Arc<watch::Sender<Option<JobDescriptor>>>,
}

type Registry = Arc<Mutex<HashMap<JobId, PollHandle>>>;
type SnapshotStore = Arc<Mutex<HashMap<JobId, AppliedSnapshot>>>;

/// Brings each watched job to a terminal state through recurring status
/// reads on a fixed interval.
///
/// At most one recurring read exists per job id; a second `watch` call
/// subscribes to the existing one. Read failures are logged and the next
/// tick retries, without bound. Snapshots carry a per-job sequence number
/// and a stale snapshot is discarded if a newer one already applied, so a
/// late response can never overwrite fresher state. Cancellation aborts
/// the job's task immediately and is idempotent.
#[derive(Debug)]
pub struct StatusPoller {
    transport: SharedTransport,
    auth: AuthContext,
    domain: PortalDomain,
    poll_interval: Duration,
    registry: Registry,
    snapshots: SnapshotStore,
}

/// Production poll interval of the portal.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

impl StatusPoller {
    pub fn new(transport: SharedTransport, auth: AuthContext, domain: PortalDomain, poll_interval: Duration) -> StatusPoller {
        StatusPoller {
            transport,
            auth,
            domain,
            poll_interval,
            registry: Arc::new(Mutex::new(HashMap::new())),
            snapshots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Registers a recurring status read for the job and returns a receiver
    /// of its descriptor snapshots. The first read is issued immediately.
    /// Calling this again for an already-watched job returns a second
    /// subscription to the same read, never a second read.
    pub fn watch(&self, job_id: JobId) -> watch::Receiver<Option<JobDescriptor>> {
        let mut registry = self.registry.lock().unwrap();

        if let Some(handle) = registry.get(&job_id) {
            return handle.updates.subscribe();
        }

        let (tx, rx) = watch::channel(None);
        let updates = Arc::new(tx);

        // A cancelled and re-watched job continues its sequence so stale
        // snapshots from the earlier poll stay unappliable.
        let start_sequence = self.snapshots.lock().unwrap().get(&job_id).map(|s| s.sequence).unwrap_or(0);

        let context = PollContext {
            transport: self.transport.clone(),
            auth: self.auth.clone(),
            domain: self.domain,
            job_id,
            poll_interval: self.poll_interval,
            registry: self.registry.clone(),
            snapshots: self.snapshots.clone(),
            updates: updates.clone(),
            start_sequence,
        };
        let task = tokio::spawn(poll_loop(context));

        registry.insert(job_id, PollHandle { task, updates });
        log::info!("Started status polling for job {}", job_id);

        rx
    }

    /// Seeds watches for every job currently listed in the domain's jobs
    /// resource. Jobs that are already terminal deregister themselves after
    /// their first read.
    pub async fn watch_listed_jobs(&self) -> Result<Vec<JobId>> {
        let records = self.transport.list_jobs(&self.auth, self.domain).await?;
        let ids: Vec<JobId> = records.iter().map(|r| r.id).collect();
        for id in &ids {
            self.watch(*id);
        }
        Ok(ids)
    }

    /// Cancels the job's recurring read, if one is active. A no-op for
    /// unknown or already-terminal jobs; cancelling twice is harmless.
    pub fn cancel(&self, job_id: JobId) {
        if let Some(handle) = self.registry.lock().unwrap().remove(&job_id) {
            handle.task.abort();
            log::info!("Cancelled status polling for job {}", job_id);
        }
    }

    /// Tears down every active recurring read, regardless of job status.
    pub fn shutdown(&self) {
        let mut registry = self.registry.lock().unwrap();
        for (job_id, handle) in registry.drain() {
            handle.task.abort();
            log::debug!("Cancelled status polling for job {}", job_id);
        }
    }

    pub fn is_polling(&self, job_id: JobId) -> bool {
        self.registry.lock().unwrap().contains_key(&job_id)
    }

    pub fn active_count(&self) -> usize {
        self.registry.lock().unwrap().len()
    }

    /// Most recently applied snapshot for the job. Snapshots survive the
    /// end of polling; terminal descriptors stay readable.
    pub fn latest(&self, job_id: JobId) -> Option<JobDescriptor> {
        self.snapshots.lock().unwrap().get(&job_id).map(|s| s.descriptor.clone())
    }
}

struct PollContext {
    transport: SharedTransport,
    auth: AuthContext,
    domain: PortalDomain,
    job_id: JobId,
    poll_interval: Duration,
    registry: Registry,
    snapshots: SnapshotStore,
    updates: Arc<watch::Sender<Option<JobDescriptor>>>,
    start_sequence: u64,
}

async fn poll_loop(context: PollContext) {
    let mut ticker = tokio::time::interval(context.poll_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut sequence = context.start_sequence;

    loop {
        ticker.tick().await;
        sequence += 1;

        let read = context.transport.check_status(&context.auth, context.domain, context.job_id).await;

        let descriptor = match read.and_then(|dto| JobDescriptor::from_status_dto(context.job_id, context.domain.job_kind(), &dto)) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                // Transient by policy: keep the schedule, the next tick retries.
                log::warn!("Status read {} for job {} failed: {}", sequence, context.job_id, e);
                continue;
            }
        };

        let terminal = descriptor.status.is_terminal();

        if apply_snapshot(&context.snapshots, context.job_id, sequence, descriptor.clone()) {
            let _ = context.updates.send(Some(descriptor));
        }

        if terminal {
            context.registry.lock().unwrap().remove(&context.job_id);
            log::info!("Job {} reached a terminal state after {} reads; polling stopped", context.job_id, sequence);
            return;
        }
    }
}

/// Applies a snapshot unless a newer one is already present. Returns whether
/// the snapshot was applied.
fn apply_snapshot(snapshots: &SnapshotStore, job_id: JobId, sequence: u64, descriptor: JobDescriptor) -> bool {
    let mut store = snapshots.lock().unwrap();
    match store.get(&job_id) {
        Some(applied) if applied.sequence >= sequence => {
            log::debug!("Discarding stale snapshot {} for job {} (applied: {})", sequence, job_id, applied.sequence);
            false
        }
        _ => {
            store.insert(job_id, AppliedSnapshot { sequence, descriptor });
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn unknown_status_is_a_read_error() {
        let result = "exploded".parse::<JobStatus>();
        assert!(matches!(result, Err(Error::PollReadError(_))));
    }

    #[test]
    fn stale_snapshot_is_discarded() {
        let snapshots: SnapshotStore = Arc::new(Mutex::new(HashMap::new()));
        let descriptor = JobDescriptor {
            job_id: 7,
            kind: JobKind::Simulation,
            status: JobStatus::Running,
            result_links: HashMap::new(),
            error_message: None,
        };

        assert!(apply_snapshot(&snapshots, 7, 2, descriptor.clone()));
        assert!(!apply_snapshot(&snapshots, 7, 1, JobDescriptor { status: JobStatus::Pending, ..descriptor.clone() }));
        assert_eq!(snapshots.lock().unwrap().get(&7).unwrap().descriptor.status, JobStatus::Running);

        assert!(apply_snapshot(&snapshots, 7, 3, JobDescriptor { status: JobStatus::Completed, ..descriptor }));
    }
}
