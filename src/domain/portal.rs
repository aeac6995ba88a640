use std::str::FromStr;

use crate::error::Error;

/// Identifier the backend assigns to an uploaded artifact or sub-record.
pub type ResourceId = i64;

/// Identifier the backend assigns to a job record.
pub type JobId = i64;

/// The three portal areas sharing one wizard shape. Each area exposes the
/// same REST surface under its own path segment and jobs resource; the
/// wizard is parameterized by this value instead of being duplicated per
/// area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortalDomain {
    Forecasting,
    Monitoring,
    MachineLearning,
}

impl PortalDomain {
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Forecasting => "forecasting",
            Self::Monitoring => "monitoring",
            Self::MachineLearning => "machinelearning",
        }
    }

    /// Collection resource holding this domain's job records.
    pub fn jobs_resource(&self) -> &'static str {
        match self {
            Self::Forecasting => "simulations",
            Self::Monitoring => "compute",
            Self::MachineLearning => "ml_analysis",
        }
    }

    /// Action segment of the run-trigger endpoint, e.g. `run_simulation`.
    pub fn run_action(&self) -> &'static str {
        match self {
            Self::Forecasting => "run_simulation",
            Self::Monitoring => "run_monitoring",
            Self::MachineLearning => "run_analysis",
        }
    }

    pub fn job_kind(&self) -> JobKind {
        match self {
            Self::Forecasting => JobKind::Simulation,
            Self::Monitoring => JobKind::MonitoringRun,
            Self::MachineLearning => JobKind::MlAnalysis,
        }
    }
}

impl FromStr for PortalDomain {
    type Err = Error;

    fn from_str(s: &str) -> Result<PortalDomain, Error> {
        match s.to_ascii_lowercase().as_str() {
            "forecasting" => Ok(Self::Forecasting),
            "monitoring" => Ok(Self::Monitoring),
            "machinelearning" | "ml" => Ok(Self::MachineLearning),
            other => Err(Error::InvalidPlan(format!("Unknown portal domain '{}'", other))),
        }
    }
}

/// Kind of server-side work a job record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Simulation,
    MonitoringRun,
    MlAnalysis,
}

impl JobKind {
    pub fn domain(&self) -> PortalDomain {
        match self {
            Self::Simulation => PortalDomain::Forecasting,
            Self::MonitoringRun => PortalDomain::Monitoring,
            Self::MlAnalysis => PortalDomain::MachineLearning,
        }
    }
}
