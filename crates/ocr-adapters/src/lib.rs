//! # ocr-adapters
//!
//! Client for a Vision-style `images:annotate` endpoint implementing the
//! `TextRecognizer` port. One TEXT_DETECTION request per call; the first
//! annotation carries the full recognized text blob.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use domains::TextRecognizer;

pub struct VisionTextRecognizer {
    client: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
}

#[derive(Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateResult>,
}

#[derive(Deserialize)]
struct AnnotateResult {
    #[serde(rename = "textAnnotations", default)]
    text_annotations: Vec<TextAnnotation>,
}

#[derive(Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    description: String,
}

impl VisionTextRecognizer {
    /// `endpoint` is the annotate URL without the key query parameter.
    pub fn new(endpoint: impl Into<String>, api_key: SecretString) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { client, endpoint: endpoint.into(), api_key })
    }
}

#[async_trait]
impl TextRecognizer for VisionTextRecognizer {
    async fn detect_text(&self, image_url: &str) -> anyhow::Result<Option<String>> {
        let request = serde_json::json!({
            "requests": [{
                "image": { "source": { "imageUri": image_url } },
                "features": [{ "type": "TEXT_DETECTION" }]
            }]
        });

        let url = format!("{}?key={}", self.endpoint, self.api_key.expose_secret());
        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .context("text-detection request failed")?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("text detection failed: {status} - {body}");
        }

        let annotated: AnnotateResponse = response
            .json()
            .await
            .context("text-detection response unreadable")?;

        let text = annotated
            .responses
            .into_iter()
            .next()
            .and_then(|result| result.text_annotations.into_iter().next())
            .map(|annotation| annotation.description)
            .filter(|description| !description.is_empty());

        debug!(found = text.is_some(), "text detection completed");
        Ok(text)
    }
}
