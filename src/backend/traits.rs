//! Trait abstraction for the hosted backend to enable mocking in tests

use super::error::RemoteError;
use super::record::Record;
use async_trait::async_trait;

/// Record and storage operations the intake flow relies on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendClientTrait: Send + Sync {
    /// Insert a row and return it as stored
    async fn create_record(
        &self,
        table: &str,
        fields: serde_json::Value,
    ) -> Result<Record, RemoteError>;

    /// Store a file at `path` inside `bucket`, returning the stored path
    async fn upload_file(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, RemoteError>;

    /// Patch a row by id and return it as stored
    async fn update_record(
        &self,
        table: &str,
        id: &str,
        fields: serde_json::Value,
    ) -> Result<Record, RemoteError>;

    /// Time-limited download link for a stored file
    async fn get_signed_url(
        &self,
        bucket: &str,
        path: &str,
        ttl_seconds: u64,
    ) -> Result<String, RemoteError>;
}
