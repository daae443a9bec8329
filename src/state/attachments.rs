//! Attachment staging
//!
//! Files are validated when selected and held in memory until the
//! submission uploads them.

use anyhow::{Context, Result};
use std::path::Path;
use thiserror::Error;
use tokio::io::AsyncReadExt;

/// Largest accepted file, in bytes
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
/// Most files a single request can carry
pub const MAX_ATTACHMENTS: usize = 5;

const FALLBACK_MIME: &str = "application/octet-stream";

/// Allow-listed attachment types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Pdf,
    Msword,
    Docx,
    PlainText,
    Jpeg,
    Png,
    Gif,
    Webp,
    Zip,
}

impl AttachmentKind {
    pub const ALL: [AttachmentKind; 9] = [
        Self::Pdf,
        Self::Msword,
        Self::Docx,
        Self::PlainText,
        Self::Jpeg,
        Self::Png,
        Self::Gif,
        Self::Webp,
        Self::Zip,
    ];

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Msword => "application/msword",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::PlainText => "text/plain",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
            Self::Zip => "application/zip",
        }
    }

    /// Match a MIME type, ignoring case and parameters like `charset`
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.mime().eq_ignore_ascii_case(essence))
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "doc" => Some(Self::Msword),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::PlainText),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::Webp),
            "zip" => Some(Self::Zip),
            _ => None,
        }
    }
}

/// Guess the MIME type of a local file from its extension
pub fn guess_mime(path: &Path) -> &'static str {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(AttachmentKind::from_extension)
        .map(|k| k.mime())
        .unwrap_or(FALLBACK_MIME)
}

/// A file the visitor picked, not yet validated
#[derive(Debug, Clone)]
pub struct PendingFile {
    pub name: String,
    pub mime_type: String,
    bytes: Vec<u8>,
    /// Size reported by the filesystem when the contents were not read
    reported_size: u64,
}

impl PendingFile {
    #[cfg(test)]
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
            reported_size: 0,
        }
    }

    /// Load a file from disk. At most one byte past the size limit is read,
    /// so an oversized file is detected without loading all of it.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let metadata = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("Cannot read {}", path.display()))?;
        if !metadata.is_file() {
            anyhow::bail!("{} is not a file", path.display());
        }

        let mut bytes = Vec::new();
        if metadata.len() <= MAX_FILE_SIZE {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Cannot read {}", path.display()))?;
            file.take(MAX_FILE_SIZE + 1)
                .read_to_end(&mut bytes)
                .await
                .with_context(|| format!("Cannot read {}", path.display()))?;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            mime_type: guess_mime(path).to_string(),
            bytes,
            reported_size: metadata.len(),
        })
    }

    /// Size checked against the limit: the larger of the bytes held and
    /// what the filesystem reported
    pub fn size(&self) -> u64 {
        self.reported_size.max(self.bytes.len() as u64)
    }
}

/// A validated file waiting for upload
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub name: String,
    pub size: u64,
    pub kind: AttachmentKind,
    pub bytes: Vec<u8>,
    /// Set once the file has been uploaded
    pub storage_path: Option<String>,
}

/// Why a file was not staged. Shown to the visitor, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageRejection {
    #[error("\"{name}\" is larger than 10MB")]
    TooLarge { name: String, size: u64 },
    #[error("\"{name}\" is not a supported file type ({mime_type})")]
    UnsupportedType { name: String, mime_type: String },
    #[error("\"{name}\" was not added: at most {max} files can be attached")]
    TooMany { name: String, max: usize },
}

#[derive(Debug, Clone, Default)]
pub struct AttachmentStager {
    staged: Vec<Attachment>,
}

impl AttachmentStager {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and add a file. A rejected file leaves the list untouched.
    pub fn stage(&mut self, file: PendingFile) -> Result<(), StageRejection> {
        if self.staged.len() >= MAX_ATTACHMENTS {
            return Err(self.reject(StageRejection::TooMany {
                name: file.name,
                max: MAX_ATTACHMENTS,
            }));
        }
        let size = file.size();
        if size > MAX_FILE_SIZE {
            return Err(self.reject(StageRejection::TooLarge {
                name: file.name,
                size,
            }));
        }
        let Some(kind) = AttachmentKind::from_mime(&file.mime_type) else {
            return Err(self.reject(StageRejection::UnsupportedType {
                name: file.name,
                mime_type: file.mime_type,
            }));
        };

        tracing::info!(name = %file.name, size = file.bytes.len(), "Staged attachment");
        self.staged.push(Attachment {
            name: file.name,
            size: file.bytes.len() as u64,
            kind,
            bytes: file.bytes,
            storage_path: None,
        });
        Ok(())
    }

    fn reject(&self, rejection: StageRejection) -> StageRejection {
        tracing::warn!("Rejected attachment: {rejection}");
        rejection
    }

    /// Remove a staged file by position; out of range is a no-op
    pub fn unstage(&mut self, index: usize) -> Option<Attachment> {
        (index < self.staged.len()).then(|| self.staged.remove(index))
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.staged
    }

    pub fn attachments_mut(&mut self) -> &mut [Attachment] {
        &mut self.staged
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.staged.iter().map(|a| a.size).sum()
    }

    pub fn clear(&mut self) {
        self.staged.clear();
    }
}

/// Human-readable byte size, e.g. "2.0 MB"
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}
