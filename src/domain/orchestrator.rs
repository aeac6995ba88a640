use std::collections::HashMap;

use crate::auth::AuthContext;
use crate::domain::artifact::{ArtifactKind, ArtifactReference};
use crate::domain::codes::{CalibrationMode, ParameterInput};
use crate::domain::poller::{JobDescriptor, JobStatus};
use crate::domain::portal::PortalDomain;
use crate::domain::upload::UploadClient;
use crate::domain::wizard::WizardSession;
use crate::error::{Error, Result};
use crate::transport::portal::SharedTransport;

/// Sequences the dependent portal calls that turn one completed wizard
/// session into a running job.
///
/// Steps within one submission are strictly sequential; every later call
/// consumes an identifier returned by an earlier one. The first failing
/// step aborts the remainder and is surfaced as-is. Records already created
/// server-side are not rolled back; the backend owns their lifetime.
#[derive(Debug)]
pub struct SubmissionOrchestrator {
    transport: SharedTransport,
    uploads: UploadClient,
    auth: AuthContext,
    domain: PortalDomain,
}

impl SubmissionOrchestrator {
    pub fn new(transport: SharedTransport, auth: AuthContext, domain: PortalDomain) -> SubmissionOrchestrator {
        let uploads = UploadClient::new(transport.clone(), auth.clone(), domain);
        SubmissionOrchestrator { transport, uploads, auth, domain }
    }

    /// Uploads the staged time-series file, the prerequisite for every later
    /// wizard step. Records the resulting reference into the session.
    pub async fn upload_primary(&self, session: &mut WizardSession) -> Result<ArtifactReference> {
        let file = session
            .pending_file(ArtifactKind::Timeseries)
            .ok_or_else(|| Error::MissingArtifact("time series file was not staged".to_string()))?
            .clone();

        let reference = self.uploads.upload(ArtifactKind::Timeseries, &file, "").await?;
        session.record_artifact(reference.clone());
        Ok(reference)
    }

    /// Uploads the staged parameters file for a forward run configured with
    /// file-based parameter input.
    pub async fn upload_parameter_file(&self, session: &mut WizardSession) -> Result<ArtifactReference> {
        let file = session
            .pending_file(ArtifactKind::Parameters)
            .ok_or_else(|| Error::MissingArtifact("parameters file was not staged".to_string()))?
            .clone();

        let reference = self.uploads.upload(ArtifactKind::Parameters, &file, "").await?;
        session.record_artifact(reference.clone());
        Ok(reference)
    }

    /// Runs the full submission sequence: secondary uploads in dependency
    /// order, the job record, the mode-specific settings record, and the
    /// run trigger. On success the session is terminal and the returned
    /// descriptor is the pending job the status poller takes over.
    pub async fn submit(&self, session: &mut WizardSession) -> Result<JobDescriptor> {
        // Re-validated here defensively; the wizard gates should have
        // enforced this before the final step was reachable.
        if session.artifact(ArtifactKind::Timeseries).is_none() {
            return Err(Error::MissingArtifact("time series upload must precede submission".to_string()));
        }
        let mode = session.mode().ok_or_else(|| Error::InvalidTransition("No calibration mode selected".to_string()))?;

        if mode == CalibrationMode::Forward && session.parameter_input() == Some(ParameterInput::Manual) {
            let server_id = self.transport.submit_forward_parameters(&self.auth, session.forward_parameters()).await?;
            session.record_artifact(ArtifactReference {
                kind: ArtifactKind::ForwardParameters,
                server_id,
                source_file: "manual entry".to_string(),
            });
        }

        if mode.is_calibration() {
            if let Some(file) = session.pending_file(ArtifactKind::ParameterRanges).cloned() {
                let reference = self.uploads.upload(ArtifactKind::ParameterRanges, &file, "Parameter ranges file").await?;
                session.record_artifact(reference);
            }
        }

        if let Some(file) = session.pending_file(ArtifactKind::Validation).cloned() {
            let reference = self.uploads.upload(ArtifactKind::Validation, &file, "").await?;
            session.record_artifact(reference);
        }

        let payload = session.build_submission_payload(&self.auth)?;
        let job_id = self.transport.create_job(&self.auth, self.domain, &payload).await?;

        if let Some(settings) = session.optimizer_settings() {
            self.transport.create_optimizer_settings(&self.auth, job_id, &settings).await?;
        }

        self.transport.trigger_run(&self.auth, self.domain, job_id).await?;

        session.mark_submitted();
        log::info!("Session {} submitted as {:?} job {}", session.session_id, self.domain.job_kind(), job_id);

        Ok(JobDescriptor {
            job_id,
            kind: self.domain.job_kind(),
            status: JobStatus::Pending,
            result_links: HashMap::new(),
            error_message: None,
        })
    }
}
