//! Enumerated wizard selections and the single-letter codes the job-creation
//! endpoint expects. The code tables must match the backend exactly; they are
//! the one mapping carried verbatim from the portal contract.

use std::str::FromStr;

use crate::error::Error;

/// Physical model the simulation runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    /// air2water
    Lake,
    /// air2stream
    Stream,
}

impl Model {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Lake => "W",
            Self::Stream => "S",
        }
    }
}

impl FromStr for Model {
    type Err = Error;

    fn from_str(s: &str) -> Result<Model, Error> {
        match s.to_ascii_lowercase().as_str() {
            "lake" | "air2water" | "w" => Ok(Self::Lake),
            "stream" | "air2stream" | "s" => Ok(Self::Stream),
            other => Err(Error::InvalidPlan(format!("Unknown model '{}'", other))),
        }
    }
}

/// Calibration strategy. `Forward` runs the model with fixed parameters;
/// the remaining variants are stochastic optimizers executed server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationMode {
    Forward,
    Pso,
    LatinHypercube,
    MonteCarlo,
}

impl CalibrationMode {
    /// Payload `mode` field: forward runs are "F", everything else is a calibration "C".
    pub fn mode_code(&self) -> &'static str {
        match self {
            Self::Forward => "F",
            _ => "C",
        }
    }

    /// Payload `optimizer` field. Forward runs carry no optimizer.
    pub fn optimizer_code(&self) -> Option<&'static str> {
        match self {
            Self::Forward => None,
            Self::Pso => Some("P"),
            Self::LatinHypercube => Some("L"),
            Self::MonteCarlo => Some("M"),
        }
    }

    pub fn is_calibration(&self) -> bool {
        *self != Self::Forward
    }
}

impl FromStr for CalibrationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<CalibrationMode, Error> {
        match s.to_ascii_lowercase().as_str() {
            "forward" => Ok(Self::Forward),
            "pso" => Ok(Self::Pso),
            "latin" | "latinhypercube" | "latin_hypercube" => Ok(Self::LatinHypercube),
            "montecarlo" | "monte_carlo" => Ok(Self::MonteCarlo),
            other => Err(Error::InvalidPlan(format!("Unknown calibration mode '{}'", other))),
        }
    }
}

/// How forward-run parameters are provided: an uploaded parameters file or
/// eight manually entered values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterInput {
    Upload,
    Manual,
}

impl ParameterInput {
    /// Payload `forward_options` field.
    pub fn forward_options_code(&self) -> &'static str {
        match self {
            Self::Upload => "U",
            Self::Manual => "W",
        }
    }
}

impl FromStr for ParameterInput {
    type Err = Error;

    fn from_str(s: &str) -> Result<ParameterInput, Error> {
        match s.to_ascii_lowercase().as_str() {
            "upload" => Ok(Self::Upload),
            "manual" => Ok(Self::Manual),
            other => Err(Error::InvalidPlan(format!("Unknown parameter input method '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMetric {
    Rmse,
    Nse,
    Kge,
}

impl ErrorMetric {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Rmse => "R",
            Self::Nse => "N",
            Self::Kge => "K",
        }
    }
}

impl FromStr for ErrorMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<ErrorMetric, Error> {
        match s.to_ascii_lowercase().as_str() {
            "rmse" | "r" => Ok(Self::Rmse),
            "nse" | "n" => Ok(Self::Nse),
            "kge" | "k" => Ok(Self::Kge),
            other => Err(Error::InvalidPlan(format!("Unknown error metric '{}'", other))),
        }
    }
}

/// Numerical integration scheme the backend solver uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solver {
    Euler,
    RungeKutta2,
    RungeKutta4,
    CrankNicolson,
}

impl Solver {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Euler => "E",
            Self::RungeKutta2 => "T",
            Self::RungeKutta4 => "F",
            Self::CrankNicolson => "C",
        }
    }
}

impl FromStr for Solver {
    type Err = Error;

    fn from_str(s: &str) -> Result<Solver, Error> {
        match s.to_ascii_lowercase().as_str() {
            "euler" => Ok(Self::Euler),
            "rk2" | "rungekutta2" => Ok(Self::RungeKutta2),
            "rk4" | "rungekutta4" => Ok(Self::RungeKutta4),
            "cranknicolson" | "crank_nicolson" => Ok(Self::CrankNicolson),
            other => Err(Error::InvalidPlan(format!("Unknown solver '{}'", other))),
        }
    }
}

/// Whether and how the backend holds data back for validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRequired {
    False,
    RandomPercent,
    UniformPercent,
    UniformNumber,
}

impl ValidationRequired {
    pub fn code(&self) -> &'static str {
        match self {
            Self::False => "F",
            Self::RandomPercent => "R",
            Self::UniformPercent => "U",
            Self::UniformNumber => "N",
        }
    }
}

impl FromStr for ValidationRequired {
    type Err = Error;

    fn from_str(s: &str) -> Result<ValidationRequired, Error> {
        match s.to_ascii_lowercase().as_str() {
            "false" | "f" => Ok(Self::False),
            "randompercent" | "random_percent" | "r" => Ok(Self::RandomPercent),
            "uniformpercent" | "uniform_percent" | "u" => Ok(Self::UniformPercent),
            "uniformnumber" | "uniform_number" | "n" => Ok(Self::UniformNumber),
            other => Err(Error::InvalidPlan(format!("Unknown validation setting '{}'", other))),
        }
    }
}
