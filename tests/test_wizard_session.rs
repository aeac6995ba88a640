use aqualite_client::auth::AuthContext;
use aqualite_client::domain::artifact::{ArtifactKind, ArtifactReference};
use aqualite_client::domain::codes::{CalibrationMode, ErrorMetric, Model, ParameterInput, Solver, ValidationRequired};
use aqualite_client::domain::portal::PortalDomain;
use aqualite_client::domain::wizard::{WizardSession, WizardStep};
use aqualite_client::error::Error;

fn reference(kind: ArtifactKind, id: i64) -> ArtifactReference {
    ArtifactReference { kind, server_id: id, source_file: format!("{:?}.dat", kind) }
}

fn auth() -> AuthContext {
    AuthContext::new("test-token", 42, 7)
}

#[test]
fn switching_away_from_forward_clears_forward_artifacts() {
    let mut session = WizardSession::new(PortalDomain::Forecasting);
    session.select_mode(CalibrationMode::Forward);
    session.select_parameter_input(ParameterInput::Manual);
    session.set_forward_parameter(0, "1.5").unwrap();
    session.record_artifact(reference(ArtifactKind::ForwardParameters, 11));
    session.record_artifact(reference(ArtifactKind::Parameters, 12));

    session.select_mode(CalibrationMode::Pso);

    assert!(session.artifact(ArtifactKind::ForwardParameters).is_none());
    assert!(session.artifact(ArtifactKind::Parameters).is_none());
    assert!(session.parameter_input().is_none());
    // Manually entered values are discarded along with the record
    assert_eq!(session.forward_parameters().values[0], "0.021233");
}

#[test]
fn switching_to_forward_clears_parameter_ranges() {
    let mut session = WizardSession::new(PortalDomain::Forecasting);
    session.select_mode(CalibrationMode::LatinHypercube);
    session.record_artifact(reference(ArtifactKind::ParameterRanges, 21));

    session.select_mode(CalibrationMode::Forward);

    assert!(session.artifact(ArtifactKind::ParameterRanges).is_none());
}

#[test]
fn switching_between_calibration_modes_keeps_parameter_ranges() {
    let mut session = WizardSession::new(PortalDomain::Forecasting);
    session.select_mode(CalibrationMode::Pso);
    session.record_artifact(reference(ArtifactKind::ParameterRanges, 21));

    session.select_mode(CalibrationMode::MonteCarlo);

    assert_eq!(session.artifact(ArtifactKind::ParameterRanges).map(|r| r.server_id), Some(21));
}

#[test]
fn reselecting_the_same_mode_is_a_no_op() {
    let mut session = WizardSession::new(PortalDomain::Forecasting);
    session.select_mode(CalibrationMode::Forward);
    session.select_parameter_input(ParameterInput::Upload);
    session.record_artifact(reference(ArtifactKind::Parameters, 12));

    session.select_mode(CalibrationMode::Forward);

    assert_eq!(session.parameter_input(), Some(ParameterInput::Upload));
    assert!(session.artifact(ArtifactKind::Parameters).is_some());
}

#[test]
fn can_advance_is_idempotent() {
    let mut session = WizardSession::new(PortalDomain::Forecasting);
    session.select_mode(CalibrationMode::Pso);

    let first = session.can_advance(WizardStep::ModeAndOptions);
    let second = session.can_advance(WizardStep::ModeAndOptions);
    assert_eq!(first, second);
    assert!(first);

    assert!(!session.can_advance(WizardStep::InputSelection));
    assert!(!session.can_advance(WizardStep::InputSelection));
}

#[test]
fn advance_is_gated_per_step() {
    let mut session = WizardSession::new(PortalDomain::Forecasting);

    // No time series uploaded yet
    assert!(matches!(session.advance(), Err(Error::InvalidTransition(_))));

    session.record_artifact(reference(ArtifactKind::Timeseries, 1));
    session.advance().unwrap();
    assert_eq!(session.current_step(), WizardStep::ModeAndOptions);

    // No mode selected yet
    assert!(matches!(session.advance(), Err(Error::InvalidTransition(_))));

    session.select_mode(CalibrationMode::MonteCarlo);
    session.advance().unwrap();

    assert!(matches!(session.advance(), Err(Error::InvalidTransition(_))));
    session.select_error_metric(ErrorMetric::Kge);
    session.advance().unwrap();
    assert_eq!(session.current_step(), WizardStep::SolverAndSubmit);
}

#[test]
fn back_fails_at_the_first_step_and_preserves_values() {
    let mut session = WizardSession::new(PortalDomain::Forecasting);
    assert!(matches!(session.back(), Err(Error::InvalidTransition(_))));

    session.record_artifact(reference(ArtifactKind::Timeseries, 1));
    session.select_model(Model::Stream);
    session.advance().unwrap();
    session.select_mode(CalibrationMode::Pso);
    session.pso_settings.swarm_size = 500;

    session.back().unwrap();
    assert_eq!(session.current_step(), WizardStep::InputSelection);
    assert_eq!(session.model(), Model::Stream);
    assert_eq!(session.mode(), Some(CalibrationMode::Pso));
    assert_eq!(session.pso_settings.swarm_size, 500);
}

#[test]
fn forward_manual_requires_at_least_one_parameter_value() {
    let mut session = WizardSession::new(PortalDomain::Forecasting);
    session.select_mode(CalibrationMode::Forward);
    session.select_parameter_input(ParameterInput::Manual);

    for index in 0..8 {
        session.set_forward_parameter(index, "").unwrap();
    }
    assert!(!session.can_advance(WizardStep::ModeAndOptions));

    session.set_forward_parameter(3, "3.459309").unwrap();
    assert!(session.can_advance(WizardStep::ModeAndOptions));
}

#[test]
fn forward_upload_requires_the_parameters_artifact() {
    let mut session = WizardSession::new(PortalDomain::Forecasting);
    session.select_mode(CalibrationMode::Forward);
    session.select_parameter_input(ParameterInput::Upload);

    assert!(!session.can_advance(WizardStep::ModeAndOptions));
    session.record_artifact(reference(ArtifactKind::Parameters, 12));
    assert!(session.can_advance(WizardStep::ModeAndOptions));
}

#[test]
fn validation_percent_is_clamped_and_reset() {
    let mut session = WizardSession::new(PortalDomain::Forecasting);
    session.set_validation_required(ValidationRequired::RandomPercent);

    session.set_validation_percent(80);
    assert_eq!(session.validation_percent(), 50);
    session.set_validation_percent(0);
    assert_eq!(session.validation_percent(), 1);
    session.set_validation_percent(25);
    assert_eq!(session.validation_percent(), 25);

    session.set_validation_required(ValidationRequired::False);
    assert_eq!(session.validation_percent(), 10);
}

fn calibration_session() -> WizardSession {
    let mut session = WizardSession::new(PortalDomain::Forecasting);
    session.record_artifact(reference(ArtifactKind::Timeseries, 1));
    session.select_mode(CalibrationMode::Pso);
    session.record_artifact(reference(ArtifactKind::ParameterRanges, 2));
    session.select_error_metric(ErrorMetric::Nse);
    session.select_solver(Solver::RungeKutta4);
    session
}

#[test]
fn payload_is_deterministic() {
    let session = calibration_session();

    let first = session.build_submission_payload(&auth()).unwrap();
    let second = session.build_submission_payload(&auth()).unwrap();

    assert_eq!(first, second);
    assert_eq!(serde_json::to_string(&first).unwrap(), serde_json::to_string(&second).unwrap());
}

#[test]
fn payload_translates_selections_into_backend_codes() {
    let payload = calibration_session().build_submission_payload(&auth()).unwrap();

    assert_eq!(payload.user, 42);
    assert_eq!(payload.group, 7);
    assert_eq!(payload.timeseries, 1);
    assert_eq!(payload.model, "W");
    assert_eq!(payload.mode, "C");
    assert_eq!(payload.method, "S");
    assert_eq!(payload.optimizer.as_deref(), Some("P"));
    assert_eq!(payload.error_metric, "N");
    assert_eq!(payload.solver, "F");
    assert_eq!(payload.parameter_ranges_file, Some(2));
    assert_eq!(payload.validation_required, "F");
    assert_eq!(payload.percent, 10);
    assert_eq!(payload.forward_options, None);
    assert_eq!(payload.parameters_file, None);
    assert_eq!(payload.parameters_forward, None);
    assert_eq!(payload.n_data_interpolate, 7);
    assert_eq!(payload.depth, 14.0);
    assert_eq!(payload.compiler, "C");
}

#[test]
fn forward_manual_payload_sets_forward_options_w() {
    let mut session = WizardSession::new(PortalDomain::Forecasting);
    session.record_artifact(reference(ArtifactKind::Timeseries, 1));
    session.select_mode(CalibrationMode::Forward);
    session.select_parameter_input(ParameterInput::Manual);
    session.record_artifact(reference(ArtifactKind::ForwardParameters, 9));
    session.select_error_metric(ErrorMetric::Rmse);
    session.select_solver(Solver::Euler);

    let payload = session.build_submission_payload(&auth()).unwrap();

    assert_eq!(payload.mode, "F");
    assert_eq!(payload.optimizer, None);
    assert_eq!(payload.forward_options.as_deref(), Some("W"));
    assert_eq!(payload.parameters_forward, Some(9));
    assert_eq!(payload.parameters_file, None);
}

#[test]
fn forward_upload_payload_sets_forward_options_u() {
    let mut session = WizardSession::new(PortalDomain::Forecasting);
    session.record_artifact(reference(ArtifactKind::Timeseries, 1));
    session.select_mode(CalibrationMode::Forward);
    session.select_parameter_input(ParameterInput::Upload);
    session.record_artifact(reference(ArtifactKind::Parameters, 4));
    session.select_error_metric(ErrorMetric::Rmse);
    session.select_solver(Solver::CrankNicolson);

    let payload = session.build_submission_payload(&auth()).unwrap();

    assert_eq!(payload.forward_options.as_deref(), Some("U"));
    assert_eq!(payload.parameters_file, Some(4));
    assert_eq!(payload.parameters_forward, None);
    assert_eq!(payload.solver, "C");
}

#[test]
fn payload_requires_the_time_series_artifact() {
    let mut session = WizardSession::new(PortalDomain::Forecasting);
    session.select_mode(CalibrationMode::Pso);
    session.select_error_metric(ErrorMetric::Nse);
    session.select_solver(Solver::Euler);

    let result = session.build_submission_payload(&auth());
    assert!(matches!(result, Err(Error::MissingArtifact(_))));
}
