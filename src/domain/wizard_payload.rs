use crate::api::job_dto::JobPayloadDto;
use crate::auth::AuthContext;
use crate::domain::artifact::ArtifactKind;
use crate::domain::codes::CalibrationMode;
use crate::domain::wizard::WizardSession;
use crate::error::{Error, Result};

// Constant job-record fields the portal backend expects on every submission.
const METHOD: &str = "S";
const N_DATA_INTERPOLATE: u32 = 7;
const CORE: u32 = 1;
const DEPTH: f64 = 14.0;
const COMPILER: &str = "C";
const DATABASE_FORMAT: &str = "C";
const RESAMPLING_FREQUENCY_DAYS: u32 = 1;
const RESAMPLING_FREQUENCY_WEEKS: u32 = 1;

impl WizardSession {
    /// Maps the accumulated session state into the job-creation payload,
    /// translating selections into the backend's single-letter codes.
    /// Deterministic: identical sessions yield identical payloads. The
    /// payload shape is the forecasting job record regardless of domain;
    /// see `JobPayloadDto`.
    pub fn build_submission_payload(&self, auth: &AuthContext) -> Result<JobPayloadDto> {
        let timeseries = self
            .artifact(ArtifactKind::Timeseries)
            .ok_or_else(|| Error::MissingArtifact("time series".to_string()))?
            .server_id;

        let mode = self.mode().ok_or_else(|| Error::InvalidTransition("No calibration mode selected".to_string()))?;
        let error_metric = self.error_metric().ok_or_else(|| Error::InvalidTransition("No error metric selected".to_string()))?;
        let solver = self.solver().ok_or_else(|| Error::InvalidTransition("No solver selected".to_string()))?;

        let forward = mode == CalibrationMode::Forward;
        let parameter_input = self.parameter_input();

        Ok(JobPayloadDto {
            user: auth.user_id,
            group: auth.group_id,
            timeseries,
            model: self.model().code().to_string(),
            mode: mode.mode_code().to_string(),
            method: METHOD.to_string(),
            optimizer: mode.optimizer_code().map(str::to_string),
            error_metric: error_metric.code().to_string(),
            parameter_ranges_file: self.artifact(ArtifactKind::ParameterRanges).map(|r| r.server_id),
            validation_required: self.validation_required().code().to_string(),
            percent: self.validation_percent(),
            user_validation_file: self.artifact(ArtifactKind::Validation).map(|r| r.server_id),
            parameters_file: if forward { self.artifact(ArtifactKind::Parameters).map(|r| r.server_id) } else { None },
            parameters_forward: if forward { self.artifact(ArtifactKind::ForwardParameters).map(|r| r.server_id) } else { None },
            forward_options: if forward { parameter_input.map(|p| p.forward_options_code().to_string()) } else { None },
            solver: solver.code().to_string(),
            interpolate: true,
            n_data_interpolate: N_DATA_INTERPOLATE,
            core: CORE,
            depth: DEPTH,
            compiler: COMPILER.to_string(),
            databaseformat: DATABASE_FORMAT.to_string(),
            computeparameterranges: true,
            computeparameters: false,
            log_flag: true,
            resampling_frequency_days: RESAMPLING_FREQUENCY_DAYS,
            resampling_frequency_weeks: RESAMPLING_FREQUENCY_WEEKS,
            email_send: false,
            email_list: String::new(),
        })
    }
}
