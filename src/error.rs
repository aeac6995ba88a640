use thiserror::Error;

use crate::domain::artifact::ArtifactKind;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File '{file_name}' is not accepted for {kind:?} uploads. Allowed extensions: {allowed}")]
    InvalidExtension { kind: ArtifactKind, file_name: String, allowed: String },

    #[error("Invalid wizard transition: {0}")]
    InvalidTransition(String),

    #[error("Required artifact is missing: {0}")]
    MissingArtifact(String),

    #[error("Upload was rejected by the portal (HTTP {status}): {message}")]
    UploadRejected { status: u16, message: String },

    #[error("Job creation was rejected by the portal (HTTP {status}): {message}")]
    JobCreationRejected { status: u16, message: String },

    #[error("Optimizer settings record was rejected by the portal (HTTP {status}): {message}")]
    SettingsRejected { status: u16, message: String },

    #[error("Run trigger was rejected by the portal (HTTP {status}): {message}")]
    RunTriggerRejected { status: u16, message: String },

    #[error("Transport failure, no response received: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Status read failed: {0}")]
    PollReadError(String),

    #[error("Submission plan is invalid: {0}")]
    InvalidPlan(String),

    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
