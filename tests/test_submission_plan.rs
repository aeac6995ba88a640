use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use aqualite_client::auth::AuthContext;
use aqualite_client::domain::artifact::ArtifactKind;
use aqualite_client::domain::poller::JobStatus;
use aqualite_client::error::Error;
use aqualite_client::loader::parser::parse_json_file;
use aqualite_client::loader::plan_dto::SubmissionPlanDto;
use aqualite_client::submit_from_plan;
use aqualite_client::transport::transport_mock::{MockTransport, RecordedCall};

/// Writes a plan plus its input files into a scratch directory and returns
/// the plan path. Cleaned up by the OS; names are unique per test.
fn write_plan(test_name: &str, plan_json: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("aqualite_plan_{}_{}", test_name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    fs::write(dir.join("flow.txt"), "1 2 3\n").unwrap();
    fs::write(dir.join("ranges.yaml"), "a1: [0, 1]\n").unwrap();

    let plan_path = dir.join("plan.json");
    fs::write(&plan_path, plan_json.replace("{dir}", &dir.to_string_lossy())).unwrap();
    plan_path
}

#[tokio::test]
async fn plan_submission_walks_the_wizard_end_to_end() {
    let plan_path = write_plan(
        "pso",
        r#"{
            "domain": "forecasting",
            "model": "lake",
            "mode": "pso",
            "timeseries_file": "{dir}/flow.txt",
            "parameter_ranges_file": "{dir}/ranges.yaml",
            "error_metric": "nse",
            "solver": "rk4",
            "pso": { "swarm_size": 500 }
        }"#,
    );

    let transport = Arc::new(MockTransport::new());
    let job = submit_from_plan(plan_path.to_str().unwrap(), transport.clone(), AuthContext::new("test-token", 42, 7))
        .await
        .unwrap();

    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(
        transport.calls(),
        vec![
            RecordedCall::UploadArtifact { kind: ArtifactKind::Timeseries, file_name: "flow.txt".to_string() },
            RecordedCall::UploadArtifact { kind: ArtifactKind::ParameterRanges, file_name: "ranges.yaml".to_string() },
            RecordedCall::CreateJob,
            RecordedCall::CreateOptimizerSettings { job_id: job.job_id },
            RecordedCall::TriggerRun { job_id: job.job_id },
        ]
    );

    let payload = &transport.created_payloads()[0];
    assert_eq!(payload.model, "W");
    assert_eq!(payload.optimizer.as_deref(), Some("P"));
    assert_eq!(payload.error_metric, "N");
    assert_eq!(payload.solver, "F");
}

#[test]
fn plan_with_forward_mode_requires_a_parameter_input() {
    let plan_path = write_plan(
        "forward_invalid",
        r#"{
            "domain": "forecasting",
            "model": "stream",
            "mode": "forward",
            "timeseries_file": "{dir}/flow.txt",
            "error_metric": "rmse",
            "solver": "euler"
        }"#,
    );

    let plan: SubmissionPlanDto = parse_json_file(&plan_path).unwrap();
    let result = plan.into_session();
    assert!(matches!(result, Err(Error::InvalidPlan(_))));
}

#[test]
fn plan_with_an_unknown_code_is_rejected() {
    let plan_path = write_plan(
        "bad_solver",
        r#"{
            "domain": "forecasting",
            "model": "lake",
            "mode": "pso",
            "timeseries_file": "{dir}/flow.txt",
            "error_metric": "nse",
            "solver": "leapfrog"
        }"#,
    );

    let plan: SubmissionPlanDto = parse_json_file(&plan_path).unwrap();
    assert!(matches!(plan.into_session(), Err(Error::InvalidPlan(_))));
}

#[test]
fn missing_plan_file_is_an_io_error() {
    let result: aqualite_client::error::Result<SubmissionPlanDto> = parse_json_file("does_not_exist.json");
    assert!(matches!(result, Err(Error::IoError(_))));
}
