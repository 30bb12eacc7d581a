//! Media relay: download the triggering attachment and upload it to the
//! hosting endpoint, returning the public URL.

use std::fmt;

use tracing::info;

use crate::transport::{MediaHandle, Transport, TransportError};

#[derive(Debug)]
pub enum RelayError {
    /// Could not retrieve the attachment from the messaging platform.
    Download(TransportError),
    /// The hosting call failed outright.
    Upload(String),
    /// The hosting call succeeded but yielded no usable URL.
    NoPublicUrl,
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Download(source) => write!(f, "attachment download failed: {source}"),
            Self::Upload(msg) => write!(f, "upload failed: {msg}"),
            Self::NoPublicUrl => write!(f, "upload response contained no public URL"),
        }
    }
}

impl std::error::Error for RelayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Download(source) => Some(source),
            _ => None,
        }
    }
}

pub struct MediaRelay {
    client: reqwest::Client,
    upload_url: String,
}

impl MediaRelay {
    pub fn new(upload_url: String) -> Self {
        // No timeout: a hung upload stalls only the one event it belongs to.
        Self {
            client: reqwest::Client::new(),
            upload_url,
        }
    }

    /// Download the attachment and upload it to the hosting endpoint.
    /// The whole image is buffered in memory; no size cap is enforced.
    pub async fn relay(
        &self,
        transport: &dyn Transport,
        media: &MediaHandle,
    ) -> Result<String, RelayError> {
        let bytes = transport
            .download(media)
            .await
            .map_err(RelayError::Download)?;
        info!("📥 Downloaded attachment ({} bytes)", bytes.len());

        let part = reqwest::multipart::Part::bytes(bytes).file_name("photo.jpg");
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RelayError::Upload(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Upload(format!("host returned {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RelayError::Upload(e.to_string()))?;

        let url = extract_public_url(&body).ok_or(RelayError::NoPublicUrl)?;
        info!("📤 Uploaded image: {url}");
        Ok(url)
    }
}

/// Pull the public URL out of the upload response. Hosts answer either with
/// a JSON object carrying a `url` field, a JSON string, or a bare URL body.
fn extract_public_url(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        return match value {
            serde_json::Value::Object(map) => map
                .get("url")
                .and_then(|u| u.as_str())
                .filter(|u| !u.is_empty())
                .map(str::to_string),
            serde_json::Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        };
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
