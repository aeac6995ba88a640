use std::sync::Arc;

use async_trait::async_trait;

use crate::api::job_dto::{JobPayloadDto, JobRecordDto};
use crate::api::status_dto::JobStatusDto;
use crate::auth::AuthContext;
use crate::domain::artifact::{ArtifactKind, LocalFile};
use crate::domain::portal::{JobId, PortalDomain, ResourceId};
use crate::domain::settings::{ForwardParameters, OptimizerSettings};
use crate::error::Result;

/// The REST surface of the portal backend, as the client consumes it.
///
/// One method per endpoint family; implementations own the HTTP status to
/// error mapping so callers only see the crate error taxonomy. Injected as
/// `Arc<dyn PortalTransport>` so the orchestrator and poller can run against
/// a scripted mock in tests.
#[async_trait]
pub trait PortalTransport: std::fmt::Debug + Send + Sync {
    /// Multipart POST of one artifact file. Resolves to the server-assigned id.
    async fn upload_artifact(
        &self,
        auth: &AuthContext,
        domain: PortalDomain,
        kind: ArtifactKind,
        file: &LocalFile,
        description: &str,
    ) -> Result<ResourceId>;

    /// POST of the eight manual forward parameters as form fields.
    async fn submit_forward_parameters(&self, auth: &AuthContext, parameters: &ForwardParameters) -> Result<ResourceId>;

    /// POST of the assembled job payload to the domain's jobs resource.
    async fn create_job(&self, auth: &AuthContext, domain: PortalDomain, payload: &JobPayloadDto) -> Result<JobId>;

    /// POST of the mode-specific settings record, tagged with the job id.
    async fn create_optimizer_settings(&self, auth: &AuthContext, job_id: JobId, settings: &OptimizerSettings) -> Result<()>;

    /// POST of the run trigger for an already-created job.
    async fn trigger_run(&self, auth: &AuthContext, domain: PortalDomain, job_id: JobId) -> Result<()>;

    /// GET of the job's `check_status` endpoint.
    async fn check_status(&self, auth: &AuthContext, domain: PortalDomain, job_id: JobId) -> Result<JobStatusDto>;

    /// GET of the domain's jobs listing.
    async fn list_jobs(&self, auth: &AuthContext, domain: PortalDomain) -> Result<Vec<JobRecordDto>>;
}

pub type SharedTransport = Arc<dyn PortalTransport>;
