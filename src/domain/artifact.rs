use crate::domain::portal::{PortalDomain, ResourceId};

/// The kinds of user-supplied inputs a job can reference. All but
/// `ForwardParameters` are file uploads; forward parameters are submitted
/// as plain form fields and only exist here so the session can track the
/// created record like any other artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Timeseries,
    Parameters,
    ParameterRanges,
    Validation,
    ForwardParameters,
}

impl ArtifactKind {
    /// Upload endpoint resource under the domain's path segment, or `None`
    /// for kinds that are not file uploads.
    pub fn upload_resource(&self) -> Option<&'static str> {
        match self {
            Self::Timeseries => Some("timeseries"),
            Self::Parameters => Some("parameters"),
            Self::ParameterRanges => Some("parameterranges"),
            Self::Validation => Some("uservalidation"),
            Self::ForwardParameters => None,
        }
    }

    /// Client-side extension whitelist, checked before any network call.
    /// The accepted formats differ per portal domain.
    pub fn allowed_extensions(&self, domain: PortalDomain) -> &'static [&'static str] {
        match (domain, self) {
            (PortalDomain::Monitoring, Self::Timeseries) => &["json"],
            (_, Self::Timeseries) => &["txt"],
            (_, Self::Validation) => &["txt"],
            (_, Self::Parameters) => &["yaml"],
            (_, Self::ParameterRanges) => &["yaml"],
            (_, Self::ForwardParameters) => &[],
        }
    }
}

/// A file the user picked, held in memory until the orchestrator uploads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub file_name: String,
    pub contents: Vec<u8>,
}

impl LocalFile {
    pub fn new(file_name: impl Into<String>, contents: Vec<u8>) -> LocalFile {
        LocalFile { file_name: file_name.into(), contents }
    }

    pub fn extension(&self) -> Option<&str> {
        let (stem, extension) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() { None } else { Some(extension) }
    }
}

/// Server-assigned handle for a successfully uploaded artifact. Immutable;
/// a re-upload produces a new reference which replaces the old one in the
/// owning session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactReference {
    pub kind: ArtifactKind,
    pub server_id: ResourceId,
    pub source_file: String,
}
