use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;

use crate::api::job_dto::{JobPayloadDto, JobRecordDto};
use crate::api::status_dto::JobStatusDto;
use crate::auth::AuthContext;
use crate::domain::artifact::{ArtifactKind, LocalFile};
use crate::domain::portal::{JobId, PortalDomain, ResourceId};
use crate::domain::settings::{ForwardParameters, OptimizerSettings};
use crate::error::{Error, Result};
use crate::transport::portal::PortalTransport;

/// One observed transport call, in issue order. Tests assert on these to
/// verify sequencing and abort behavior without a network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    UploadArtifact { kind: ArtifactKind, file_name: String },
    SubmitForwardParameters,
    CreateJob,
    CreateOptimizerSettings { job_id: JobId },
    TriggerRun { job_id: JobId },
    CheckStatus { job_id: JobId },
    ListJobs,
}

#[derive(Debug)]
enum ScriptedStatus {
    Status(String),
    ReadFailure(String),
}

/// Scripted stand-in for the portal backend.
///
/// Ids are handed out sequentially. Each endpoint family can be told to
/// reject its next calls, and `check_status` plays back a per-job script;
/// an exhausted script keeps answering `pending`.
#[derive(Debug, Default)]
pub struct MockTransport {
    calls: Mutex<Vec<RecordedCall>>,
    next_id: AtomicI64,
    fail_uploads: Mutex<HashSet<ArtifactKind>>,
    fail_forward_parameters: AtomicBool,
    fail_job_creation: AtomicBool,
    fail_optimizer_settings: AtomicBool,
    fail_run_trigger: AtomicBool,
    created_payloads: Mutex<Vec<JobPayloadDto>>,
    created_settings: Mutex<Vec<OptimizerSettings>>,
    status_scripts: Mutex<HashMap<JobId, VecDeque<ScriptedStatus>>>,
    job_records: Mutex<Vec<JobRecordDto>>,
}

impl MockTransport {
    pub fn new() -> MockTransport {
        MockTransport::default()
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn status_read_count(&self, job_id: JobId) -> usize {
        self.calls().iter().filter(|c| **c == RecordedCall::CheckStatus { job_id }).count()
    }

    pub fn created_payloads(&self) -> Vec<JobPayloadDto> {
        self.created_payloads.lock().unwrap().clone()
    }

    pub fn created_settings(&self) -> Vec<OptimizerSettings> {
        self.created_settings.lock().unwrap().clone()
    }

    pub fn reject_upload(&self, kind: ArtifactKind) {
        self.fail_uploads.lock().unwrap().insert(kind);
    }

    pub fn reject_forward_parameters(&self) {
        self.fail_forward_parameters.store(true, Ordering::SeqCst);
    }

    pub fn reject_job_creation(&self) {
        self.fail_job_creation.store(true, Ordering::SeqCst);
    }

    pub fn reject_optimizer_settings(&self) {
        self.fail_optimizer_settings.store(true, Ordering::SeqCst);
    }

    pub fn reject_run_trigger(&self) {
        self.fail_run_trigger.store(true, Ordering::SeqCst);
    }

    /// Appends statuses to the job's playback script.
    pub fn script_statuses(&self, job_id: JobId, statuses: &[&str]) {
        let mut scripts = self.status_scripts.lock().unwrap();
        let script = scripts.entry(job_id).or_default();
        for status in statuses {
            script.push_back(ScriptedStatus::Status(status.to_string()));
        }
    }

    /// Appends one failing read to the job's playback script.
    pub fn script_read_failure(&self, job_id: JobId, message: &str) {
        self.status_scripts.lock().unwrap().entry(job_id).or_default().push_back(ScriptedStatus::ReadFailure(message.to_string()));
    }

    pub fn set_job_records(&self, records: Vec<JobRecordDto>) {
        *self.job_records.lock().unwrap() = records;
    }
}

#[async_trait]
impl PortalTransport for MockTransport {
    async fn upload_artifact(
        &self,
        _auth: &AuthContext,
        _domain: PortalDomain,
        kind: ArtifactKind,
        file: &LocalFile,
        _description: &str,
    ) -> Result<ResourceId> {
        self.record(RecordedCall::UploadArtifact { kind, file_name: file.file_name.clone() });
        if self.fail_uploads.lock().unwrap().contains(&kind) {
            return Err(Error::UploadRejected { status: 400, message: format!("scripted rejection of {:?} upload", kind) });
        }
        Ok(self.allocate_id())
    }

    async fn submit_forward_parameters(&self, _auth: &AuthContext, _parameters: &ForwardParameters) -> Result<ResourceId> {
        self.record(RecordedCall::SubmitForwardParameters);
        if self.fail_forward_parameters.load(Ordering::SeqCst) {
            return Err(Error::UploadRejected { status: 400, message: "scripted rejection of forward parameters".to_string() });
        }
        Ok(self.allocate_id())
    }

    async fn create_job(&self, _auth: &AuthContext, _domain: PortalDomain, payload: &JobPayloadDto) -> Result<JobId> {
        self.record(RecordedCall::CreateJob);
        if self.fail_job_creation.load(Ordering::SeqCst) {
            return Err(Error::JobCreationRejected { status: 400, message: "scripted rejection of job creation".to_string() });
        }
        self.created_payloads.lock().unwrap().push(payload.clone());
        Ok(self.allocate_id())
    }

    async fn create_optimizer_settings(&self, _auth: &AuthContext, job_id: JobId, settings: &OptimizerSettings) -> Result<()> {
        self.record(RecordedCall::CreateOptimizerSettings { job_id });
        if self.fail_optimizer_settings.load(Ordering::SeqCst) {
            return Err(Error::SettingsRejected { status: 400, message: "scripted rejection of optimizer settings".to_string() });
        }
        self.created_settings.lock().unwrap().push(settings.clone());
        Ok(())
    }

    async fn trigger_run(&self, _auth: &AuthContext, _domain: PortalDomain, job_id: JobId) -> Result<()> {
        self.record(RecordedCall::TriggerRun { job_id });
        if self.fail_run_trigger.load(Ordering::SeqCst) {
            return Err(Error::RunTriggerRejected { status: 500, message: "scripted rejection of run trigger".to_string() });
        }
        Ok(())
    }

    async fn check_status(&self, _auth: &AuthContext, _domain: PortalDomain, job_id: JobId) -> Result<JobStatusDto> {
        self.record(RecordedCall::CheckStatus { job_id });
        let next = self.status_scripts.lock().unwrap().get_mut(&job_id).and_then(|script| script.pop_front());
        match next {
            Some(ScriptedStatus::Status(status)) => Ok(JobStatusDto::with_status(status)),
            Some(ScriptedStatus::ReadFailure(message)) => Err(Error::PollReadError(message)),
            None => Ok(JobStatusDto::with_status("pending")),
        }
    }

    async fn list_jobs(&self, _auth: &AuthContext, _domain: PortalDomain) -> Result<Vec<JobRecordDto>> {
        self.record(RecordedCall::ListJobs);
        Ok(self.job_records.lock().unwrap().clone())
    }
}
