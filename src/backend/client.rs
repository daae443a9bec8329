//! HTTP client for the hosted backend
//!
//! Records go through the REST table API (`/rest/v1`), files through the
//! object storage API (`/storage/v1`). Both authenticate with the project's
//! anon key.

use super::error::{error_message, RemoteError};
use super::record::Record;
use super::traits::BackendClientTrait;
use crate::config::IntakeConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const USER_AGENT: &str = concat!("hire-intake/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
struct Endpoint {
    base_url: String,
    anon_key: String,
}

/// Client for the record and storage APIs
pub struct BackendClient {
    http: reqwest::Client,
    /// None when no URL or key is configured
    endpoint: Option<Endpoint>,
}

#[derive(Debug, Deserialize)]
struct SignedUrlResponse {
    #[serde(rename = "signedURL", alias = "signedUrl")]
    signed_url: String,
}

impl BackendClient {
    pub fn new(config: &IntakeConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        let endpoint = match (config.backend_url.as_deref(), config.anon_key.as_deref()) {
            (Some(url), Some(key)) if !url.trim().is_empty() && !key.trim().is_empty() => {
                Some(Endpoint {
                    base_url: url.trim().trim_end_matches('/').to_string(),
                    anon_key: key.trim().to_string(),
                })
            }
            _ => None,
        };

        if endpoint.is_none() {
            tracing::warn!("No backend configured; submissions will fail");
        }

        Ok(Self { http, endpoint })
    }

    /// Whether a backend URL and key are set
    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    fn endpoint(&self) -> Result<&Endpoint, RemoteError> {
        self.endpoint.as_ref().ok_or(RemoteError::NotConfigured)
    }

    fn request(
        &self,
        method: reqwest::Method,
        endpoint: &Endpoint,
        path: &str,
    ) -> reqwest::RequestBuilder {
        let url = format!("{}{}", endpoint.base_url, path);
        tracing::debug!(%method, %url, "Backend request");
        self.http
            .request(method, url)
            .header("apikey", &endpoint.anon_key)
            .bearer_auth(&endpoint.anon_key)
    }
}

/// Turn a non-2xx response into a `RemoteError::Status`
async fn check(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Status {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// Table writes return the affected rows; we always touch exactly one
fn first_row(rows: Vec<Record>) -> Result<Record, RemoteError> {
    rows.into_iter()
        .next()
        .ok_or_else(|| RemoteError::Decode("no row returned".to_string()))
}

/// Signed URLs come back relative to the storage API root
fn resolve_signed_url(base_url: &str, signed: &str) -> String {
    if signed.starts_with("http://") || signed.starts_with("https://") {
        return signed.to_string();
    }
    let separator = if signed.starts_with('/') { "" } else { "/" };
    format!("{base_url}/storage/v1{separator}{signed}")
}

#[async_trait]
impl BackendClientTrait for BackendClient {
    async fn create_record(
        &self,
        table: &str,
        fields: serde_json::Value,
    ) -> Result<Record, RemoteError> {
        let endpoint = self.endpoint()?;
        let response = self
            .request(reqwest::Method::POST, endpoint, &format!("/rest/v1/{table}"))
            .header("Prefer", "return=representation")
            .json(&fields)
            .send()
            .await?;

        let rows: Vec<Record> = check(response).await?.json().await?;
        first_row(rows)
    }

    async fn upload_file(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, RemoteError> {
        let endpoint = self.endpoint()?;
        let size = bytes.len();
        let response = self
            .request(
                reqwest::Method::POST,
                endpoint,
                &format!("/storage/v1/object/{bucket}/{path}"),
            )
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        check(response).await?;
        tracing::debug!(%path, size, "Uploaded file");
        Ok(path.to_string())
    }

    async fn update_record(
        &self,
        table: &str,
        id: &str,
        fields: serde_json::Value,
    ) -> Result<Record, RemoteError> {
        let endpoint = self.endpoint()?;
        let response = self
            .request(reqwest::Method::PATCH, endpoint, &format!("/rest/v1/{table}"))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&fields)
            .send()
            .await?;

        let rows: Vec<Record> = check(response).await?.json().await?;
        first_row(rows)
    }

    async fn get_signed_url(
        &self,
        bucket: &str,
        path: &str,
        ttl_seconds: u64,
    ) -> Result<String, RemoteError> {
        let endpoint = self.endpoint()?;
        let response = self
            .request(
                reqwest::Method::POST,
                endpoint,
                &format!("/storage/v1/object/sign/{bucket}/{path}"),
            )
            .json(&json!({ "expiresIn": ttl_seconds }))
            .send()
            .await?;

        let signed: SignedUrlResponse = check(response).await?.json().await?;
        Ok(resolve_signed_url(&endpoint.base_url, &signed.signed_url))
    }
}
