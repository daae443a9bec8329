//! Submission of a completed intake request
//!
//! Creates the record, uploads staged files under the record's id, then
//! links the uploaded paths back onto the record. Calls run strictly one
//! after another so failures can be attributed to a single file.

use crate::backend::{BackendClientTrait, Record, RemoteError};
use crate::state::{
    validate_all, Attachment, AttachmentStager, FormState, IntakeController, ValidationError,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Submission failed before anything was persisted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Could not send your request: {0}")]
    Remote(#[from] RemoteError),
}

/// A file that could not be uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUpload {
    pub file_name: String,
    pub reason: String,
}

/// The request was saved but some attachments did not make it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartialSuccessWarning {
    pub failed_uploads: Vec<FailedUpload>,
    /// Set when uploaded paths could not be linked onto the record
    pub link_error: Option<String>,
}

impl PartialSuccessWarning {
    fn is_empty(&self) -> bool {
        self.failed_uploads.is_empty() && self.link_error.is_none()
    }

    pub fn failed_file_names(&self) -> Vec<&str> {
        self.failed_uploads
            .iter()
            .map(|f| f.file_name.as_str())
            .collect()
    }

    /// One-paragraph caveat for the success screen
    pub fn message(&self) -> String {
        let mut parts = Vec::new();
        if !self.failed_uploads.is_empty() {
            parts.push(format!(
                "These files could not be uploaded: {}.",
                self.failed_file_names().join(", ")
            ));
        }
        if self.link_error.is_some() {
            parts.push("Uploaded files could not be attached to your request.".to_string());
        }
        parts.push("Your request was received; please email any missing files.".to_string());
        parts.join(" ")
    }
}

/// Outcome of a submission that persisted a record
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub record: Record,
    /// (file name, storage path) for every uploaded file
    pub uploaded: Vec<(String, String)>,
    pub warning: Option<PartialSuccessWarning>,
}

impl SubmissionReceipt {
    pub fn is_partial(&self) -> bool {
        self.warning.is_some()
    }
}

/// Writes intake requests to a backend table and bucket
pub struct SubmissionCoordinator<'a, C: BackendClientTrait + ?Sized> {
    client: &'a C,
    table: String,
    bucket: String,
}

impl<'a, C: BackendClientTrait + ?Sized> SubmissionCoordinator<'a, C> {
    pub fn new(client: &'a C, table: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
            bucket: bucket.into(),
        }
    }

    /// Persist the request and its attachments.
    ///
    /// Returns an error only when no record was created. Upload or linking
    /// failures after that come back as a receipt with a warning. Uploaded
    /// attachments get their `storage_path` filled in.
    pub async fn submit(
        &self,
        form: &FormState,
        staged: &mut [Attachment],
    ) -> Result<SubmissionReceipt, SubmissionError> {
        validate_all(form)?;

        let record = self
            .client
            .create_record(&self.table, form.to_remote_fields())
            .await
            .map_err(|e| {
                tracing::warn!("Record creation failed: {e}");
                e
            })?;
        tracing::info!(id = %record.id, files = staged.len(), "Created hire request");

        let mut warning = PartialSuccessWarning::default();
        let mut uploaded = Vec::new();

        for attachment in staged.iter_mut() {
            let path = storage_path(&record.id, &attachment.name);
            match self
                .client
                .upload_file(
                    &self.bucket,
                    &path,
                    attachment.bytes.clone(),
                    attachment.kind.mime(),
                )
                .await
            {
                Ok(stored) => {
                    attachment.storage_path = Some(stored.clone());
                    uploaded.push((attachment.name.clone(), stored));
                }
                Err(e) => {
                    tracing::warn!(file = %attachment.name, "Upload failed: {e}");
                    warning.failed_uploads.push(FailedUpload {
                        file_name: attachment.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let mut final_record = record;
        if !uploaded.is_empty() {
            let paths: Vec<&str> = uploaded.iter().map(|(_, p)| p.as_str()).collect();
            match self
                .client
                .update_record(&self.table, &final_record.id, json!({ "attachments": paths }))
                .await
            {
                Ok(updated) => {
                    tracing::info!(
                        id = %updated.id,
                        linked = updated.attachment_paths().len(),
                        "Linked attachments"
                    );
                    final_record = updated;
                }
                Err(e) => {
                    // Record stays without attachments; no rollback
                    tracing::warn!(id = %final_record.id, "Linking attachments failed: {e}");
                    warning.link_error = Some(e.to_string());
                }
            }
        }

        Ok(SubmissionReceipt {
            record: final_record,
            uploaded,
            warning: (!warning.is_empty()).then_some(warning),
        })
    }
}

/// Submit the controller's form with the staged files, resetting both once a
/// record exists. On error nothing is reset so the visitor can retry.
pub async fn submit_and_reset<C: BackendClientTrait + ?Sized>(
    coordinator: &SubmissionCoordinator<'_, C>,
    controller: &mut IntakeController,
    stager: &mut AttachmentStager,
) -> Result<SubmissionReceipt, SubmissionError> {
    let receipt = coordinator
        .submit(controller.form(), stager.attachments_mut())
        .await?;
    controller.reset();
    stager.clear();
    Ok(receipt)
}

/// `{record_id}/{uuid}-{file name}` with the name reduced to safe characters
pub fn storage_path(record_id: &str, file_name: &str) -> String {
    format!("{record_id}/{}-{}", Uuid::new_v4(), sanitize_file_name(file_name))
}

fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackendClientTrait;
    use crate::state::{filled_controller, FieldName, PendingFile, Step};
    use mockall::Sequence;
    use pretty_assertions::assert_eq;

    const TABLE: &str = "hire_requests";
    const BUCKET: &str = "hire-attachments";
    const RECORD_ID: &str = "4f0c1d2e-1111-4222-8333-944455556666";

    fn pdf(name: &str, size: usize) -> PendingFile {
        PendingFile::new(name, "application/pdf", vec![0u8; size])
    }

    fn stager_with(files: Vec<PendingFile>) -> AttachmentStager {
        let mut stager = AttachmentStager::new();
        for file in files {
            stager.stage(file).unwrap();
        }
        stager
    }

    fn created() -> Record {
        Record::new(RECORD_ID).with_field("attachments", json!([]))
    }

    #[tokio::test]
    async fn test_missing_fields_make_no_network_calls() {
        // Any call on the mock would panic: no expectations are set
        let client = MockBackendClientTrait::new();
        let coordinator = SubmissionCoordinator::new(&client, TABLE, BUCKET);
        let mut controller = filled_controller();
        controller.set_text(FieldName::Email, " ");
        let mut stager = stager_with(vec![pdf("brief.pdf", 10)]);

        let result = submit_and_reset(&coordinator, &mut controller, &mut stager).await;

        match result {
            Err(SubmissionError::Validation(e)) => assert_eq!(e.missing, vec![FieldName::Email]),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(stager.len(), 1);
    }

    #[tokio::test]
    async fn test_full_submission_with_one_attachment() {
        let mut client = MockBackendClientTrait::new();
        let mut seq = Sequence::new();

        client
            .expect_create_record()
            .withf(|table, fields| {
                table == TABLE
                    && fields["email"] == "grace@example.com"
                    && fields["attachments"] == json!([])
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(created()));
        client
            .expect_upload_file()
            .withf(|bucket, path, bytes, content_type| {
                bucket == BUCKET
                    && path.starts_with(&format!("{RECORD_ID}/"))
                    && path.ends_with("-brief.pdf")
                    && bytes.len() == 2 * 1024 * 1024
                    && content_type == "application/pdf"
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, path, _, _| Ok(path.to_string()));
        client
            .expect_update_record()
            .withf(|table, id, fields| {
                table == TABLE
                    && id == RECORD_ID
                    && fields["attachments"].as_array().map(|a| a.len()) == Some(1)
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, id, fields| {
                Ok(Record::new(id).with_field("attachments", fields["attachments"].clone()))
            });

        let coordinator = SubmissionCoordinator::new(&client, TABLE, BUCKET);
        let mut controller = filled_controller();
        controller.advance().unwrap();
        let mut stager = stager_with(vec![pdf("brief.pdf", 2 * 1024 * 1024)]);

        let receipt = submit_and_reset(&coordinator, &mut controller, &mut stager)
            .await
            .unwrap();

        assert!(!receipt.is_partial());
        assert_eq!(receipt.record.attachment_paths().len(), 1);
        assert_eq!(receipt.uploaded[0].0, "brief.pdf");
        assert_eq!(controller.form(), &FormState::default());
        assert_eq!(controller.current_step(), Step::AboutYou);
        assert!(stager.is_empty());
    }

    #[tokio::test]
    async fn test_no_attachments_skips_upload_and_update() {
        let mut client = MockBackendClientTrait::new();
        client
            .expect_create_record()
            .times(1)
            .returning(|_, _| Ok(created()));

        let coordinator = SubmissionCoordinator::new(&client, TABLE, BUCKET);
        let form = filled_controller().form().clone();

        let receipt = coordinator.submit(&form, &mut []).await.unwrap();
        assert_eq!(receipt.record, created());
        assert!(receipt.uploaded.is_empty());
        assert!(receipt.warning.is_none());
    }

    #[tokio::test]
    async fn test_create_failure_stops_and_keeps_state() {
        let mut client = MockBackendClientTrait::new();
        client
            .expect_create_record()
            .times(1)
            .returning(|_, _| Err(RemoteError::Network("connection reset".to_string())));
        client.expect_upload_file().never();
        client.expect_update_record().never();

        let coordinator = SubmissionCoordinator::new(&client, TABLE, BUCKET);
        let mut controller = filled_controller();
        let before = controller.form().clone();
        let mut stager = stager_with(vec![pdf("brief.pdf", 10)]);

        let result = submit_and_reset(&coordinator, &mut controller, &mut stager).await;

        assert_eq!(
            result,
            Err(SubmissionError::Remote(RemoteError::Network(
                "connection reset".to_string()
            )))
        );
        assert_eq!(controller.form(), &before);
        assert_eq!(stager.len(), 1);
        assert!(stager.attachments()[0].storage_path.is_none());
    }

    #[tokio::test]
    async fn test_one_failed_upload_is_partial_success() {
        let mut client = MockBackendClientTrait::new();
        client
            .expect_create_record()
            .times(1)
            .returning(|_, _| Ok(created()));
        client
            .expect_upload_file()
            .withf(|_, path, _, _| path.ends_with("-good.pdf"))
            .times(1)
            .returning(|_, path, _, _| Ok(path.to_string()));
        client
            .expect_upload_file()
            .withf(|_, path, _, _| path.ends_with("-bad.pdf"))
            .times(1)
            .returning(|_, _, _, _| {
                Err(RemoteError::Status {
                    status: 413,
                    message: "Payload too large".to_string(),
                })
            });
        client
            .expect_update_record()
            .withf(|_, _, fields| {
                let paths = fields["attachments"].as_array().cloned().unwrap_or_default();
                paths.len() == 1 && paths[0].as_str().is_some_and(|p| p.ends_with("-good.pdf"))
            })
            .times(1)
            .returning(|_, id, fields| {
                Ok(Record::new(id).with_field("attachments", fields["attachments"].clone()))
            });

        let coordinator = SubmissionCoordinator::new(&client, TABLE, BUCKET);
        let form = filled_controller().form().clone();
        let mut stager = stager_with(vec![pdf("good.pdf", 10), pdf("bad.pdf", 10)]);

        let receipt = coordinator
            .submit(&form, stager.attachments_mut())
            .await
            .unwrap();

        let warning = receipt.warning.expect("partial success");
        assert_eq!(warning.failed_file_names(), vec!["bad.pdf"]);
        assert!(warning.link_error.is_none());
        assert!(warning.message().contains("bad.pdf"));
        assert_eq!(receipt.uploaded.len(), 1);
        assert!(stager.attachments()[0].storage_path.is_some());
        assert!(stager.attachments()[1].storage_path.is_none());
    }

    #[tokio::test]
    async fn test_link_failure_keeps_created_record_and_resets() {
        let mut client = MockBackendClientTrait::new();
        client
            .expect_create_record()
            .times(1)
            .returning(|_, _| Ok(created()));
        client
            .expect_upload_file()
            .times(1)
            .returning(|_, path, _, _| Ok(path.to_string()));
        client
            .expect_update_record()
            .withf(|table, id, _| table == TABLE && id == RECORD_ID)
            .times(1)
            .returning(|_, _, _| Err(RemoteError::Network("timed out".to_string())));

        let coordinator = SubmissionCoordinator::new(&client, TABLE, BUCKET);
        let mut controller = filled_controller();
        let mut stager = stager_with(vec![pdf("brief.pdf", 10)]);

        let receipt = submit_and_reset(&coordinator, &mut controller, &mut stager)
            .await
            .unwrap();

        assert_eq!(receipt.record, created());
        let warning = receipt.warning.expect("partial success");
        assert!(warning.failed_uploads.is_empty());
        assert_eq!(
            warning.link_error,
            Some("Network error: timed out".to_string())
        );
        assert_eq!(controller.form(), &FormState::default());
        assert!(stager.is_empty());
    }

    #[tokio::test]
    async fn test_all_uploads_failing_skips_update() {
        let mut client = MockBackendClientTrait::new();
        client
            .expect_create_record()
            .returning(|_, _| Ok(created()));
        client
            .expect_upload_file()
            .times(2)
            .returning(|_, _, _, _| Err(RemoteError::Network("offline".to_string())));
        client.expect_update_record().never();

        let coordinator = SubmissionCoordinator::new(&client, TABLE, BUCKET);
        let form = filled_controller().form().clone();
        let mut stager = stager_with(vec![pdf("a.pdf", 1), pdf("b.pdf", 1)]);

        let receipt = coordinator
            .submit(&form, stager.attachments_mut())
            .await
            .unwrap();
        assert_eq!(
            receipt.warning.unwrap().failed_file_names(),
            vec!["a.pdf", "b.pdf"]
        );
    }

    #[tokio::test]
    async fn test_retry_after_failure_creates_new_record() {
        let mut client = MockBackendClientTrait::new();
        let mut seq = Sequence::new();
        client
            .expect_create_record()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(RemoteError::Network("offline".to_string())));
        client
            .expect_create_record()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(created()));

        let coordinator = SubmissionCoordinator::new(&client, TABLE, BUCKET);
        let mut controller = filled_controller();
        let mut stager = AttachmentStager::new();

        assert!(submit_and_reset(&coordinator, &mut controller, &mut stager)
            .await
            .is_err());
        assert!(submit_and_reset(&coordinator, &mut controller, &mut stager)
            .await
            .is_ok());
    }

    #[test]
    fn test_storage_path_is_namespaced_and_sanitized() {
        let path = storage_path("rec-1", "My CV (final).pdf");
        let (prefix, rest) = path.split_once('/').unwrap();
        assert_eq!(prefix, "rec-1");
        assert!(rest.ends_with("-My_CV__final_.pdf"));
        assert_ne!(storage_path("rec-1", "a.pdf"), storage_path("rec-1", "a.pdf"));
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_file_name("..."), "file");
        assert_eq!(sanitize_file_name("résumé.docx"), "r_sum_.docx");
    }

    #[test]
    fn test_warning_message_mentions_link_failure() {
        let warning = PartialSuccessWarning {
            failed_uploads: Vec::new(),
            link_error: Some("boom".to_string()),
        };
        assert!(warning.message().contains("could not be attached"));
    }
}
