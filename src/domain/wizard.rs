use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::artifact::{ArtifactKind, ArtifactReference, LocalFile};
use crate::domain::codes::{CalibrationMode, ErrorMetric, Model, ParameterInput, Solver, ValidationRequired};
use crate::domain::portal::PortalDomain;
use crate::domain::settings::{ForwardParameters, LatinSettings, MonteCarloSettings, OptimizerSettings, PsoSettings};
use crate::error::{Error, Result};

/// The linear wizard steps, identical in shape across all portal domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    InputSelection,
    ModeAndOptions,
    ErrorMetric,
    SolverAndSubmit,
}

impl WizardStep {
    pub fn index(&self) -> u8 {
        match self {
            Self::InputSelection => 1,
            Self::ModeAndOptions => 2,
            Self::ErrorMetric => 3,
            Self::SolverAndSubmit => 4,
        }
    }

    fn next(&self) -> Option<WizardStep> {
        match self {
            Self::InputSelection => Some(Self::ModeAndOptions),
            Self::ModeAndOptions => Some(Self::ErrorMetric),
            Self::ErrorMetric => Some(Self::SolverAndSubmit),
            Self::SolverAndSubmit => None,
        }
    }

    fn previous(&self) -> Option<WizardStep> {
        match self {
            Self::InputSelection => None,
            Self::ModeAndOptions => Some(Self::InputSelection),
            Self::ErrorMetric => Some(Self::ModeAndOptions),
            Self::SolverAndSubmit => Some(Self::ErrorMetric),
        }
    }
}

const DEFAULT_VALIDATION_PERCENT: u8 = 10;

/// Transient state of one pass through the new-job wizard.
///
/// All transitions are synchronous and local; the orchestrator performs the
/// network work and records the resulting artifact references back into the
/// session. Back-navigation keeps every entered value. Switching calibration
/// mode clears the fields and artifacts that belong to the abandoned mode,
/// so the session never carries a reference irrelevant to the current mode.
#[derive(Debug, Clone)]
pub struct WizardSession {
    pub session_id: Uuid,
    domain: PortalDomain,
    step: WizardStep,
    submitted: bool,

    model: Model,
    mode: Option<CalibrationMode>,
    parameter_input: Option<ParameterInput>,
    forward_parameters: ForwardParameters,
    validation_required: ValidationRequired,
    validation_percent: u8,
    pub pso_settings: PsoSettings,
    pub latin_settings: LatinSettings,
    pub monte_carlo_settings: MonteCarloSettings,
    error_metric: Option<ErrorMetric>,
    solver: Option<Solver>,

    pending_files: HashMap<ArtifactKind, LocalFile>,
    artifacts: HashMap<ArtifactKind, ArtifactReference>,
}

impl WizardSession {
    pub fn new(domain: PortalDomain) -> WizardSession {
        WizardSession {
            session_id: Uuid::new_v4(),
            domain,
            step: WizardStep::InputSelection,
            submitted: false,
            model: Model::Lake,
            mode: None,
            parameter_input: None,
            forward_parameters: ForwardParameters::default(),
            validation_required: ValidationRequired::False,
            validation_percent: DEFAULT_VALIDATION_PERCENT,
            pso_settings: PsoSettings::default(),
            latin_settings: LatinSettings::default(),
            monte_carlo_settings: MonteCarloSettings::default(),
            error_metric: None,
            solver: None,
            pending_files: HashMap::new(),
            artifacts: HashMap::new(),
        }
    }

    pub fn domain(&self) -> PortalDomain {
        self.domain
    }

    pub fn current_step(&self) -> WizardStep {
        self.step
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn mode(&self) -> Option<CalibrationMode> {
        self.mode
    }

    pub fn parameter_input(&self) -> Option<ParameterInput> {
        self.parameter_input
    }

    pub fn forward_parameters(&self) -> &ForwardParameters {
        &self.forward_parameters
    }

    pub fn validation_required(&self) -> ValidationRequired {
        self.validation_required
    }

    pub fn validation_percent(&self) -> u8 {
        self.validation_percent
    }

    pub fn error_metric(&self) -> Option<ErrorMetric> {
        self.error_metric
    }

    pub fn solver(&self) -> Option<Solver> {
        self.solver
    }

    pub fn artifact(&self, kind: ArtifactKind) -> Option<&ArtifactReference> {
        self.artifacts.get(&kind)
    }

    pub fn pending_file(&self, kind: ArtifactKind) -> Option<&LocalFile> {
        self.pending_files.get(&kind)
    }

    pub fn select_model(&mut self, model: Model) {
        self.model = model;
    }

    /// Selects the calibration mode and clears everything gathered for a
    /// previously selected, now-irrelevant mode. Leaving forward drops the
    /// manual parameter values and any parameters/forward-parameter records;
    /// entering forward drops the parameter-ranges reference and its pending
    /// file. The parameter-input choice resets on every actual switch.
    pub fn select_mode(&mut self, mode: CalibrationMode) {
        if self.mode == Some(mode) {
            return;
        }

        if mode == CalibrationMode::Forward {
            self.artifacts.remove(&ArtifactKind::ParameterRanges);
            self.pending_files.remove(&ArtifactKind::ParameterRanges);
        } else {
            self.forward_parameters = ForwardParameters::default();
            self.artifacts.remove(&ArtifactKind::ForwardParameters);
            self.artifacts.remove(&ArtifactKind::Parameters);
            self.pending_files.remove(&ArtifactKind::Parameters);
        }

        self.parameter_input = None;
        self.mode = Some(mode);
        log::debug!("Session {}: calibration mode set to {:?}", self.session_id, mode);
    }

    pub fn select_parameter_input(&mut self, parameter_input: ParameterInput) {
        self.parameter_input = Some(parameter_input);
    }

    pub fn set_forward_parameter(&mut self, index: usize, value: impl Into<String>) -> Result<()> {
        let slot = self
            .forward_parameters
            .values
            .get_mut(index)
            .ok_or_else(|| Error::InvalidTransition(format!("Forward parameter index {} out of range", index)))?;
        *slot = value.into();
        Ok(())
    }

    /// Returning to `False` resets the percentage to its default.
    pub fn set_validation_required(&mut self, validation_required: ValidationRequired) {
        self.validation_required = validation_required;
        if validation_required == ValidationRequired::False {
            self.validation_percent = DEFAULT_VALIDATION_PERCENT;
        }
    }

    /// Accepts values in [1, 50], clamping like the portal form does.
    pub fn set_validation_percent(&mut self, percent: u8) {
        self.validation_percent = percent.clamp(1, 50);
    }

    pub fn select_error_metric(&mut self, error_metric: ErrorMetric) {
        self.error_metric = Some(error_metric);
    }

    pub fn select_solver(&mut self, solver: Solver) {
        self.solver = Some(solver);
    }

    /// Stages a picked file for upload by the orchestrator.
    pub fn stage_file(&mut self, kind: ArtifactKind, file: LocalFile) {
        self.pending_files.insert(kind, file);
    }

    /// Records a successful upload. Replaces any previous reference of the
    /// same kind and drops the pending file it came from.
    pub fn record_artifact(&mut self, reference: ArtifactReference) {
        self.pending_files.remove(&reference.kind);
        self.artifacts.insert(reference.kind, reference);
    }

    /// Per-step validation gate. Pure: no side effects, stable for unchanged
    /// session state.
    pub fn can_advance(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::InputSelection => self.artifacts.contains_key(&ArtifactKind::Timeseries),
            WizardStep::ModeAndOptions => match self.mode {
                None => false,
                Some(CalibrationMode::Forward) => match self.parameter_input {
                    Some(ParameterInput::Manual) => self.forward_parameters.has_any_value(),
                    Some(ParameterInput::Upload) => self.artifacts.contains_key(&ArtifactKind::Parameters),
                    None => false,
                },
                Some(_) => true,
            },
            WizardStep::ErrorMetric => self.error_metric.is_some(),
            WizardStep::SolverAndSubmit => self.solver.is_some(),
        }
    }

    pub fn advance(&mut self) -> Result<()> {
        if self.submitted {
            return Err(Error::InvalidTransition("Session is already submitted".to_string()));
        }
        if !self.can_advance(self.step) {
            return Err(Error::InvalidTransition(format!("Step {:?} is not complete", self.step)));
        }
        match self.step.next() {
            Some(next) => {
                self.step = next;
                Ok(())
            }
            None => Err(Error::InvalidTransition("Already at the final step; submit instead".to_string())),
        }
    }

    pub fn back(&mut self) -> Result<()> {
        if self.submitted {
            return Err(Error::InvalidTransition("Session is already submitted".to_string()));
        }
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                Ok(())
            }
            None => Err(Error::InvalidTransition("Already at the first step".to_string())),
        }
    }

    /// Called by the orchestrator once the run trigger succeeded. Terminal:
    /// no further transitions are accepted.
    pub fn mark_submitted(&mut self) {
        self.submitted = true;
    }

    /// The settings record the selected mode requires, if any.
    pub fn optimizer_settings(&self) -> Option<OptimizerSettings> {
        match self.mode? {
            CalibrationMode::Forward => None,
            CalibrationMode::Pso => Some(OptimizerSettings::Pso(self.pso_settings.clone())),
            CalibrationMode::LatinHypercube => Some(OptimizerSettings::LatinHypercube(self.latin_settings.clone())),
            CalibrationMode::MonteCarlo => Some(OptimizerSettings::MonteCarlo(self.monte_carlo_settings.clone())),
        }
    }
}
