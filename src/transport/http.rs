use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};

use crate::api::job_dto::{JobPayloadDto, JobRecordDto};
use crate::api::resource_dto::ResourceCreatedDto;
use crate::api::status_dto::JobStatusDto;
use crate::auth::AuthContext;
use crate::domain::artifact::{ArtifactKind, LocalFile};
use crate::domain::portal::{JobId, PortalDomain, ResourceId};
use crate::domain::settings::{ForwardParameters, OptimizerSettings};
use crate::error::{Error, Result};
use crate::transport::portal::PortalTransport;

/// `reqwest`-backed transport against a configurable portal base URL.
///
/// Multipart bodies never set Content-Type themselves; the client inserts
/// the boundary. The token travels as an `Authorization: Token <..>` header
/// on every request.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Result<HttpTransport> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder().default_headers(headers).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(HttpTransport { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Multipart skeleton shared by all uploads: group and user ownership
    /// fields plus the token are attached the same way everywhere.
    fn ownership_form(auth: &AuthContext) -> Form {
        Form::new().text("group", auth.group_id.to_string()).text("user", auth.user_id.to_string())
    }

    async fn rejection_body(response: reqwest::Response) -> (u16, String) {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_else(|_| "<unreadable response body>".to_string());
        (status, message)
    }
}

#[async_trait]
impl PortalTransport for HttpTransport {
    async fn upload_artifact(
        &self,
        auth: &AuthContext,
        domain: PortalDomain,
        kind: ArtifactKind,
        file: &LocalFile,
        description: &str,
    ) -> Result<ResourceId> {
        let resource = kind
            .upload_resource()
            .ok_or_else(|| Error::InvalidTransition(format!("{:?} is not a file upload", kind)))?;

        let part = Part::bytes(file.contents.clone()).file_name(file.file_name.clone());
        let form = Self::ownership_form(auth).text("description", description.to_string()).part("file", part);

        let response = self
            .client
            .post(self.url(&format!("{}/{}/", domain.path_segment(), resource)))
            .header("Authorization", auth.authorization_header())
            .multipart(form)
            .send()
            .await?;

        if response.status().is_success() {
            let created: ResourceCreatedDto = response.json().await?;
            log::info!("Uploaded {:?} file '{}', received id {}", kind, file.file_name, created.id);
            Ok(created.id)
        } else {
            let (status, message) = Self::rejection_body(response).await;
            Err(Error::UploadRejected { status, message })
        }
    }

    async fn submit_forward_parameters(&self, auth: &AuthContext, parameters: &ForwardParameters) -> Result<ResourceId> {
        let mut form = Self::ownership_form(auth);
        for (name, value) in parameters.form_fields() {
            form = form.text(name, value);
        }

        let response = self
            .client
            .post(self.url("forecasting/parameterforward/"))
            .header("Authorization", auth.authorization_header())
            .multipart(form)
            .send()
            .await?;

        if response.status().is_success() {
            let created: ResourceCreatedDto = response.json().await?;
            Ok(created.id)
        } else {
            let (status, message) = Self::rejection_body(response).await;
            Err(Error::UploadRejected { status, message })
        }
    }

    async fn create_job(&self, auth: &AuthContext, domain: PortalDomain, payload: &JobPayloadDto) -> Result<JobId> {
        let response = self
            .client
            .post(self.url(&format!("{}/{}/", domain.path_segment(), domain.jobs_resource())))
            .header("Authorization", auth.authorization_header())
            .json(payload)
            .send()
            .await?;

        if response.status().is_success() {
            let created: ResourceCreatedDto = response.json().await?;
            log::info!("Created {:?} job {}", domain.job_kind(), created.id);
            Ok(created.id)
        } else {
            let (status, message) = Self::rejection_body(response).await;
            Err(Error::JobCreationRejected { status, message })
        }
    }

    async fn create_optimizer_settings(&self, auth: &AuthContext, job_id: JobId, settings: &OptimizerSettings) -> Result<()> {
        let mut form = Form::new().text("simulation", job_id.to_string());
        for (name, value) in settings.form_fields() {
            form = form.text(name, value);
        }

        let response = self
            .client
            .post(self.url(&format!("forecasting/{}/", settings.endpoint_resource())))
            .header("Authorization", auth.authorization_header())
            .multipart(form)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let (status, message) = Self::rejection_body(response).await;
            Err(Error::SettingsRejected { status, message })
        }
    }

    async fn trigger_run(&self, auth: &AuthContext, domain: PortalDomain, job_id: JobId) -> Result<()> {
        let response = self
            .client
            .post(self.url(&format!("{}/{}/{}/{}/", domain.path_segment(), domain.jobs_resource(), job_id, domain.run_action())))
            .header("Authorization", auth.authorization_header())
            .send()
            .await?;

        if response.status().is_success() {
            log::info!("Triggered {} for job {}", domain.run_action(), job_id);
            Ok(())
        } else {
            let (status, message) = Self::rejection_body(response).await;
            Err(Error::RunTriggerRejected { status, message })
        }
    }

    async fn check_status(&self, auth: &AuthContext, domain: PortalDomain, job_id: JobId) -> Result<JobStatusDto> {
        let response = self
            .client
            .get(self.url(&format!("{}/{}/{}/check_status/", domain.path_segment(), domain.jobs_resource(), job_id)))
            .header("Authorization", auth.authorization_header())
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let (status, message) = Self::rejection_body(response).await;
            Err(Error::PollReadError(format!("HTTP {}: {}", status, message)))
        }
    }

    async fn list_jobs(&self, auth: &AuthContext, domain: PortalDomain) -> Result<Vec<JobRecordDto>> {
        let response = self
            .client
            .get(self.url(&format!("{}/{}/", domain.path_segment(), domain.jobs_resource())))
            .header("Authorization", auth.authorization_header())
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let (status, message) = Self::rejection_body(response).await;
            Err(Error::PollReadError(format!("HTTP {}: {}", status, message)))
        }
    }
}
