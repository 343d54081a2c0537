//! Remote colleges API client
//!
//! `GET /colleges` is public; every other call carries the session's
//! basic-auth header. Non-2xx responses are classified into
//! [`AdminError::Unauthorized`] (401) and [`AdminError::Http`]; a body that
//! is not the expected JSON becomes [`AdminError::Payload`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::error::{AdminError, Result};
use crate::model::College;
use crate::session::Credentials;

/// Operations the admin panel needs from the remote API
#[async_trait]
pub trait CollegeApi: Send + Sync {
    /// Public list of every college
    async fn list_colleges(&self) -> Result<Vec<College>>;

    /// One authenticated request used to check a credential pair
    async fn validate_credentials(&self, credentials: &Credentials) -> Result<()>;

    /// Full record by id (may include fields the public list omits)
    async fn get_college(&self, credentials: &Credentials, id: &str) -> Result<College>;

    async fn create_college(&self, credentials: &Credentials, college: &College) -> Result<()>;

    async fn update_college(
        &self,
        credentials: &Credentials,
        id: &str,
        college: &College,
    ) -> Result<()>;

    async fn delete_college(&self, credentials: &Credentials, id: &str) -> Result<()>;

    /// Pre-rendered spreadsheet of every college
    async fn export_colleges(&self, credentials: &Credentials) -> Result<Vec<u8>>;
}

/// reqwest-backed implementation
#[derive(Debug, Clone)]
pub struct HttpCollegeApi {
    client: Client,
    base_url: String,
}

impl HttpCollegeApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn college_url(&self, id: &str) -> String {
        self.url(&format!("/colleges/{}", urlencoding::encode(id)))
    }
}

#[async_trait]
impl CollegeApi for HttpCollegeApi {
    #[instrument(skip_all)]
    async fn list_colleges(&self) -> Result<Vec<College>> {
        let response = self.client.get(self.url("/colleges")).send().await?;
        let colleges: Vec<College> = decode_json(check_status(response).await?).await?;
        debug!(count = colleges.len(), "fetched college list");
        Ok(colleges)
    }

    #[instrument(skip_all, fields(username = %credentials.username))]
    async fn validate_credentials(&self, credentials: &Credentials) -> Result<()> {
        let response = self
            .client
            .get(self.url("/colleges"))
            .header(AUTHORIZATION, credentials.basic_auth_header())
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self, credentials))]
    async fn get_college(&self, credentials: &Credentials, id: &str) -> Result<College> {
        let response = self
            .client
            .get(self.college_url(id))
            .header(AUTHORIZATION, credentials.basic_auth_header())
            .send()
            .await?;
        decode_json(check_status(response).await?).await
    }

    #[instrument(skip_all, fields(name = %college.name))]
    async fn create_college(&self, credentials: &Credentials, college: &College) -> Result<()> {
        let response = self
            .client
            .post(self.url("/colleges"))
            .header(AUTHORIZATION, credentials.basic_auth_header())
            .json(college)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self, credentials, college))]
    async fn update_college(
        &self,
        credentials: &Credentials,
        id: &str,
        college: &College,
    ) -> Result<()> {
        let response = self
            .client
            .put(self.college_url(id))
            .header(AUTHORIZATION, credentials.basic_auth_header())
            .json(college)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self, credentials))]
    async fn delete_college(&self, credentials: &Credentials, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.college_url(id))
            .header(AUTHORIZATION, credentials.basic_auth_header())
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    #[instrument(skip_all)]
    async fn export_colleges(&self, credentials: &Credentials) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(self.url("/colleges/export"))
            .header(AUTHORIZATION, credentials.basic_auth_header())
            .send()
            .await?;
        let response = check_status(response).await?;
        if is_json(response.headers()) {
            // An export endpoint answering JSON is reporting a problem, not a file
            let body = response.text().await.unwrap_or_default();
            return Err(AdminError::payload(format!(
                "expected a spreadsheet, got JSON: {}",
                truncate(&body, 200)
            )));
        }
        let bytes = response.bytes().await?;
        debug!(size = bytes.len(), "downloaded export");
        Ok(bytes.to_vec())
    }
}

/// Map non-2xx responses to errors, passing successful ones through
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), body = %truncate(&body, 500), "API request failed");

    if status == StatusCode::UNAUTHORIZED {
        return Err(AdminError::Unauthorized);
    }
    let text = status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| truncate(&body, 200));
    Err(AdminError::http(status.as_u16(), text))
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    if let Some(content_type) = content_type(response.headers()) {
        if !content_type.contains("application/json") {
            return Err(AdminError::payload(format!(
                "expected application/json, got {}",
                content_type
            )));
        }
    }
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| AdminError::payload(e.to_string()))
}

fn content_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase())
}

fn is_json(headers: &HeaderMap) -> bool {
    content_type(headers).is_some_and(|ct| ct.contains("application/json"))
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
