use crate::auth::AuthContext;
use crate::domain::artifact::{ArtifactKind, ArtifactReference, LocalFile};
use crate::domain::portal::PortalDomain;
use crate::error::{Error, Result};
use crate::transport::portal::SharedTransport;

/// Performs one named multipart upload and resolves it to an artifact
/// reference. The per-kind extension whitelist is checked locally first;
/// a mismatch fails without touching the network. No retries: a failed
/// upload must be re-initiated by the caller.
#[derive(Debug, Clone)]
pub struct UploadClient {
    transport: SharedTransport,
    auth: AuthContext,
    domain: PortalDomain,
}

impl UploadClient {
    pub fn new(transport: SharedTransport, auth: AuthContext, domain: PortalDomain) -> UploadClient {
        UploadClient { transport, auth, domain }
    }

    pub async fn upload(&self, kind: ArtifactKind, file: &LocalFile, description: &str) -> Result<ArtifactReference> {
        validate_extension(self.domain, kind, file)?;

        let server_id = self.transport.upload_artifact(&self.auth, self.domain, kind, file, description).await?;
        log::info!("Upload of {:?} file '{}' accepted, server id {}", kind, file.file_name, server_id);

        Ok(ArtifactReference { kind, server_id, source_file: file.file_name.clone() })
    }
}

/// Pre-flight extension check against the domain's whitelist for the kind.
pub fn validate_extension(domain: PortalDomain, kind: ArtifactKind, file: &LocalFile) -> Result<()> {
    let allowed = kind.allowed_extensions(domain);
    let accepted = match file.extension() {
        Some(extension) => allowed.iter().any(|a| a.eq_ignore_ascii_case(extension)),
        None => false,
    };

    if accepted {
        Ok(())
    } else {
        Err(Error::InvalidExtension { kind, file_name: file.file_name.clone(), allowed: allowed.join(", ") })
    }
}
