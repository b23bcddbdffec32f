use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tokio_util::io::ReaderStream;
use tracing::debug;

use super::types::{
    ImportResource, ImportStatus, ImportStatusResource, ListResponse, Machine, MachineResource,
    SingleResponse, Team, TeamResource, TokenResponse,
};
use super::{ApiError, ImportApi};
use crate::core::models::UploadCandidate;

pub const DEFAULT_BASE_URL: &str = "https://sleephq.com";

/// Production SleepHQ client over one shared reqwest connection pool.
pub struct SleepHqClient {
    http: reqwest::Client,
    base_url: String,
}

impl SleepHqClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issue a request and apply the uniform error contract: transport
    /// failures and non-2xx statuses both become an `ApiError` tagged with
    /// the operation name.
    async fn execute(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::new(operation, e.to_string()))?;
        response
            .error_for_status()
            .map_err(|e| ApiError::new(operation, e.to_string()))
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        operation: &'static str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        response
            .json()
            .await
            .map_err(|e| ApiError::new(operation, format!("invalid response body: {e}")))
    }
}

#[async_trait]
impl ImportApi for SleepHqClient {
    async fn authenticate(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<String, ApiError> {
        const OP: &str = "authenticate";
        let form = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("grant_type", "password"),
            ("scope", "read write"),
        ];
        let response = self
            .execute(OP, self.http.post(self.url("/oauth/token")).form(&form))
            .await?;
        let body: TokenResponse = Self::decode(OP, response).await?;
        Ok(body.access_token)
    }

    async fn list_teams(&self, token: &str) -> Result<Vec<Team>, ApiError> {
        const OP: &str = "list_teams";
        let response = self
            .execute(
                OP,
                self.http.get(self.url("/api/v1/teams")).bearer_auth(token),
            )
            .await?;
        let body: ListResponse<TeamResource> = Self::decode(OP, response).await?;
        Ok(body.data.into_iter().map(Team::from).collect())
    }

    async fn list_machines(&self, team_id: &str, token: &str) -> Result<Vec<Machine>, ApiError> {
        const OP: &str = "list_machines";
        let url = self.url(&format!("/api/v1/teams/{team_id}/machines"));
        let response = self
            .execute(OP, self.http.get(url).bearer_auth(token))
            .await?;
        let body: ListResponse<MachineResource> = Self::decode(OP, response).await?;
        Ok(body.data.into_iter().map(Machine::from).collect())
    }

    async fn reserve_import(&self, team_id: &str, token: &str) -> Result<String, ApiError> {
        const OP: &str = "reserve_import";
        let url = self.url(&format!("/api/v1/teams/{team_id}/imports"));
        // Flagged non-programmatic so the import shows up like a manual one.
        let form = [("programmatic", "false")];
        let response = self
            .execute(OP, self.http.post(url).bearer_auth(token).form(&form))
            .await?;
        let body: SingleResponse<ImportResource> = Self::decode(OP, response).await?;
        debug!(import_id = %body.data.id, "Reserved import");
        Ok(body.data.id)
    }

    async fn upload_file(
        &self,
        import_id: &str,
        token: &str,
        candidate: &UploadCandidate,
    ) -> Result<(), ApiError> {
        const OP: &str = "upload_file";
        let file = tokio::fs::File::open(&candidate.path)
            .await
            .map_err(|e| {
                ApiError::new(OP, format!("failed to open {}: {e}", candidate.path.display()))
            })?;
        let length = file
            .metadata()
            .await
            .map_err(|e| {
                ApiError::new(OP, format!("failed to stat {}: {e}", candidate.path.display()))
            })?
            .len();

        // The file handle is owned by the request body, so it is closed when
        // the request finishes on every exit path.
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let form = Form::new()
            .text("import_id", import_id.to_string())
            .text("name", candidate.name.clone())
            .text("path", "./")
            .text("content_hash", candidate.content_hash.clone())
            .part(
                "file",
                Part::stream_with_length(body, length).file_name(candidate.name.clone()),
            );

        let url = self.url(&format!("/api/v1/imports/{import_id}/files"));
        self.execute(OP, self.http.post(url).bearer_auth(token).multipart(form))
            .await?;
        Ok(())
    }

    async fn trigger_processing(&self, import_id: &str, token: &str) -> Result<(), ApiError> {
        const OP: &str = "trigger_processing";
        let url = self.url(&format!("/api/v1/imports/{import_id}/process_files"));
        self.execute(OP, self.http.post(url).bearer_auth(token))
            .await?;
        Ok(())
    }

    async fn poll_import(&self, import_id: &str, token: &str) -> Result<ImportStatus, ApiError> {
        const OP: &str = "poll_import";
        let url = self.url(&format!("/api/v1/imports/{import_id}"));
        let response = self
            .execute(OP, self.http.get(url).bearer_auth(token))
            .await?;
        let body: SingleResponse<ImportStatusResource> = Self::decode(OP, response).await?;
        Ok(ImportStatus::from(body.data))
    }
}
