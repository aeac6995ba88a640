use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::domain::artifact::{ArtifactKind, LocalFile};
use crate::domain::codes::{CalibrationMode, ParameterInput, ValidationRequired};
use crate::domain::settings::{LatinSettings, MonteCarloSettings, PsoSettings};
use crate::domain::wizard::WizardSession;
use crate::error::{Error, Result};

/// A complete wizard run described as a JSON file, for the CLI. Selection
/// fields use the spelled-out names (`"pso"`, `"rmse"`, `"rk4"`, ...) or
/// the backend's single-letter codes; file fields are paths on disk.
#[derive(Debug, Deserialize)]
pub struct SubmissionPlanDto {
    pub domain: String,
    pub model: String,
    pub mode: String,
    pub parameter_input: Option<String>,
    pub forward_parameters: Option<Vec<String>>,

    pub timeseries_file: String,
    pub parameters_file: Option<String>,
    pub parameter_ranges_file: Option<String>,
    pub validation_file: Option<String>,

    pub validation_required: Option<String>,
    pub validation_percent: Option<u8>,

    pub error_metric: String,
    pub solver: String,

    #[serde(default)]
    pub pso: Option<PsoSettings>,
    #[serde(default)]
    pub latin: Option<LatinSettings>,
    #[serde(default)]
    pub monte_carlo: Option<MonteCarloSettings>,
}

impl SubmissionPlanDto {
    /// Builds a wizard session with every selection applied and every named
    /// file read from disk and staged. The session still starts at step one;
    /// walking the steps (and uploading) is the orchestrator's business.
    pub fn into_session(self) -> Result<WizardSession> {
        let mut session = WizardSession::new(self.domain.parse()?);

        session.select_model(self.model.parse()?);

        let mode: CalibrationMode = self.mode.parse()?;
        session.select_mode(mode);

        if let Some(parameter_input) = &self.parameter_input {
            let parameter_input: ParameterInput = parameter_input.parse()?;
            session.select_parameter_input(parameter_input);

            if parameter_input == ParameterInput::Manual {
                let values = self
                    .forward_parameters
                    .as_ref()
                    .ok_or_else(|| Error::InvalidPlan("Manual parameter input requires 'forward_parameters'".to_string()))?;
                for (index, value) in values.iter().enumerate() {
                    session.set_forward_parameter(index, value.clone())?;
                }
            }
        } else if mode == CalibrationMode::Forward {
            return Err(Error::InvalidPlan("Forward mode requires 'parameter_input' (upload or manual)".to_string()));
        }

        if let Some(validation_required) = &self.validation_required {
            let validation_required: ValidationRequired = validation_required.parse()?;
            session.set_validation_required(validation_required);
            if let Some(percent) = self.validation_percent {
                session.set_validation_percent(percent);
            }
        }

        session.select_error_metric(self.error_metric.parse()?);
        session.select_solver(self.solver.parse()?);

        if let Some(settings) = self.pso {
            session.pso_settings = settings;
        }
        if let Some(settings) = self.latin {
            session.latin_settings = settings;
        }
        if let Some(settings) = self.monte_carlo {
            session.monte_carlo_settings = settings;
        }

        session.stage_file(ArtifactKind::Timeseries, read_local_file(&self.timeseries_file)?);
        if let Some(path) = &self.parameters_file {
            session.stage_file(ArtifactKind::Parameters, read_local_file(path)?);
        }
        if let Some(path) = &self.parameter_ranges_file {
            session.stage_file(ArtifactKind::ParameterRanges, read_local_file(path)?);
        }
        if let Some(path) = &self.validation_file {
            session.stage_file(ArtifactKind::Validation, read_local_file(path)?);
        }

        Ok(session)
    }
}

fn read_local_file(path: &str) -> Result<LocalFile> {
    let contents = fs::read(path)?;
    let file_name = Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| Error::InvalidPlan(format!("'{}' is not a file path", path)))?;
    Ok(LocalFile::new(file_name, contents))
}
