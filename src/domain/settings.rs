use serde::Deserialize;

/// Particle swarm settings. Defaults match the portal form's prefilled values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PsoSettings {
    pub swarm_size: u32,
    pub phi1: f64,
    pub phi2: f64,
    pub omega1: f64,
    pub omega2: f64,
    pub max_iterations: u32,
}

impl Default for PsoSettings {
    fn default() -> PsoSettings {
        PsoSettings { swarm_size: 2000, phi1: 2.0, phi2: 2.0, omega1: 0.9, omega2: 0.4, max_iterations: 1000 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LatinSettings {
    pub num_samples: u32,
}

impl Default for LatinSettings {
    fn default() -> LatinSettings {
        LatinSettings { num_samples: 2000 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MonteCarloSettings {
    pub num_iterations: u32,
}

impl Default for MonteCarloSettings {
    fn default() -> MonteCarloSettings {
        MonteCarloSettings { num_iterations: 2000 }
    }
}

/// Mode-specific settings record created after the job record, tagged with
/// the job id as a foreign key.
#[derive(Debug, Clone, PartialEq)]
pub enum OptimizerSettings {
    Pso(PsoSettings),
    LatinHypercube(LatinSettings),
    MonteCarlo(MonteCarloSettings),
}

impl OptimizerSettings {
    /// Endpoint resource under `forecasting/` that stores this record.
    pub fn endpoint_resource(&self) -> &'static str {
        match self {
            Self::Pso(_) => "psoparameter",
            Self::LatinHypercube(_) => "latinparameter",
            Self::MonteCarlo(_) => "montecarloparameter",
        }
    }

    /// Field name/value pairs for the multipart settings form, excluding the
    /// `simulation` foreign key which the transport adds.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Pso(s) => vec![
                ("swarm_size", s.swarm_size.to_string()),
                ("phi1", s.phi1.to_string()),
                ("phi2", s.phi2.to_string()),
                ("omega1", s.omega1.to_string()),
                ("omega2", s.omega2.to_string()),
                ("max_iterations", s.max_iterations.to_string()),
            ],
            Self::LatinHypercube(s) => vec![("num_samples", s.num_samples.to_string())],
            Self::MonteCarlo(s) => vec![("num_iterations", s.num_iterations.to_string())],
        }
    }
}

/// The eight manually entered forward-run parameters, kept as strings the
/// way the form collects them. Defaults are the portal form's prefill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardParameters {
    pub values: [String; 8],
}

impl Default for ForwardParameters {
    fn default() -> ForwardParameters {
        ForwardParameters {
            values: [
                "0.021233".to_string(),
                "0.006620".to_string(),
                "0.009015".to_string(),
                "3.459309".to_string(),
                "0.018934".to_string(),
                "0.448172".to_string(),
                "0.000000".to_string(),
                "0.000000".to_string(),
            ],
        }
    }
}

impl ForwardParameters {
    pub fn has_any_value(&self) -> bool {
        self.values.iter().any(|v| !v.is_empty())
    }

    /// `parameter1`..`parameter8` form fields, empty values included.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, value)| (format!("parameter{}", i + 1), value.clone()))
            .collect()
    }
}
