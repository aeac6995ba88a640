use crate::auth::AuthContext;
use crate::domain::codes::{CalibrationMode, ParameterInput};
use crate::domain::orchestrator::SubmissionOrchestrator;
use crate::domain::poller::JobDescriptor;
use crate::error::Result;
use crate::loader::parser::parse_json_file;
use crate::loader::plan_dto::SubmissionPlanDto;
use crate::transport::portal::SharedTransport;

pub mod api;
pub mod auth;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;
pub mod transport;

/// Loads a submission plan from a JSON file, walks the wizard through its
/// steps, and submits the job. Returns the pending descriptor to hand to a
/// `StatusPoller`.
pub async fn submit_from_plan(plan_path: &str, transport: SharedTransport, auth: AuthContext) -> Result<JobDescriptor> {
    let plan: SubmissionPlanDto = parse_json_file(plan_path)?;
    let mut session = plan.into_session()?;
    log::info!("Submission plan '{}' loaded for session {}", plan_path, session.session_id);

    let orchestrator = SubmissionOrchestrator::new(transport, auth, session.domain());

    orchestrator.upload_primary(&mut session).await?;
    session.advance()?;

    // Forward runs with file-based parameters upload that file before the
    // mode step can complete.
    if session.mode() == Some(CalibrationMode::Forward) && session.parameter_input() == Some(ParameterInput::Upload) {
        orchestrator.upload_parameter_file(&mut session).await?;
    }
    session.advance()?;
    session.advance()?;

    orchestrator.submit(&mut session).await
}
