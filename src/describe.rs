//! Client for the description-generation endpoint.

use std::fmt;

use serde::Deserialize;
use tracing::info;

/// Reply used when the worker returns no description. This is a normal
/// outcome, not an error.
pub const NO_DESCRIPTION: &str = "No description found.";

#[derive(Debug)]
pub enum DescribeError {
    /// Request could not be sent or the body could not be read.
    Http(reqwest::Error),
    /// The worker answered with a non-success status.
    Status(reqwest::StatusCode),
}

impl fmt::Display for DescribeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(source) => write!(f, "description request failed: {source}"),
            Self::Status(status) => write!(f, "description endpoint returned {status}"),
        }
    }
}

impl std::error::Error for DescribeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(source) => Some(source),
            Self::Status(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct WorkerResponse {
    #[serde(rename = "cleanText")]
    clean_text: Option<String>,
}

pub struct Describer {
    client: reqwest::Client,
    worker_url: String,
}

impl Describer {
    pub fn new(worker_url: String) -> Self {
        // No timeout by design of the pipeline; see MediaRelay.
        Self {
            client: reqwest::Client::new(),
            worker_url,
        }
    }

    /// Ask the worker to describe the hosted image.
    pub async fn describe(&self, prompt: &str, image_url: &str) -> Result<String, DescribeError> {
        let url = format!(
            "{}?text={}&image={}",
            self.worker_url,
            urlencoding::encode(prompt),
            urlencoding::encode(image_url),
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(DescribeError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DescribeError::Status(status));
        }

        let body: WorkerResponse = response.json().await.map_err(DescribeError::Http)?;

        let text = body
            .clean_text
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());
        info!("💬 Description ready ({} chars)", text.len());
        Ok(text)
    }
}
