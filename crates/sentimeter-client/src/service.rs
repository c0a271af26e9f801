use std::path::Path;

use async_trait::async_trait;

use crate::error::ClientError;

/// A table to classify in bulk, sent as the `file` part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl BulkUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read an upload from disk, naming it after the file.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());
        Ok(Self { file_name, bytes })
    }
}

/// The remote sentiment classifier.
///
/// Both calls go to the same endpoint; the service tells the modes apart by
/// payload shape.
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// Classify one text, returning the raw label.
    async fn predict_text(&self, text: &str) -> Result<String, ClientError>;

    /// Classify every row of a table, returning the raw CSV response body.
    async fn predict_bulk(&self, upload: BulkUpload) -> Result<String, ClientError>;
}
