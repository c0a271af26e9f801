//! HTTP client for the sentiment classifier service.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ClientError;
use crate::service::{BulkUpload, PredictionService};

/// Client for the classifier's `/predict` and `/test` endpoints.
pub struct HttpClassifier {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct TextRequest<'a> {
    text: &'a str,
}

/// The service answers `{"prediction": ...}` on success and
/// `{"error": ...}` (still with a 200) when it fails internally.
#[derive(Deserialize)]
struct TextResponse {
    prediction: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpClassifier {
    /// Create a new client for the given service base URL.
    ///
    /// `base_url` should be like `http://127.0.0.1:5000` (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn predict_url(&self) -> String {
        format!("{}/predict", self.base_url)
    }

    /// Check that the service is up. Returns its status text.
    pub async fn ping(&self) -> Result<String, ClientError> {
        let url = format!("{}/test", self.base_url);
        info!(url = %url, "pinging classifier");
        let resp = ensure_success(self.client.get(&url).send().await?).await?;
        Ok(resp.text().await?)
    }

    /// Classify a single text.
    pub async fn predict_text(&self, text: &str) -> Result<String, ClientError> {
        let url = self.predict_url();
        info!(url = %url, chars = text.chars().count(), "requesting text prediction");

        let resp = self
            .client
            .post(&url)
            .json(&TextRequest { text })
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        let parsed: TextResponse = serde_json::from_str(&resp.text().await?)?;
        match (parsed.prediction, parsed.error) {
            (Some(label), _) => {
                info!(label = %label, "text prediction complete");
                Ok(label)
            }
            (None, Some(error)) => Err(ClientError::Service(error)),
            (None, None) => Err(ClientError::MissingPrediction),
        }
    }

    /// Upload a table for bulk classification and return the CSV body.
    pub async fn predict_bulk(&self, upload: BulkUpload) -> Result<String, ClientError> {
        let url = self.predict_url();
        info!(
            url = %url,
            file = %upload.file_name,
            bytes = upload.bytes.len(),
            "uploading table for bulk prediction"
        );

        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        let resp = self.client.post(&url).multipart(form).send().await?;
        let resp = ensure_success(resp).await?;

        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));
        let body = resp.text().await?;

        if is_json && let Ok(ErrorBody { error }) = serde_json::from_str::<ErrorBody>(&body) {
            return Err(ClientError::Service(error));
        }

        info!(bytes = body.len(), "bulk prediction complete");
        Ok(body)
    }
}

async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Server {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp)
}

#[async_trait]
impl PredictionService for HttpClassifier {
    async fn predict_text(&self, text: &str) -> Result<String, ClientError> {
        HttpClassifier::predict_text(self, text).await
    }

    async fn predict_bulk(&self, upload: BulkUpload) -> Result<String, ClientError> {
        HttpClassifier::predict_bulk(self, upload).await
    }
}
