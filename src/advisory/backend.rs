//! Remote advisory backend.
//!
//! [`AdvisoryBackend`] is the seam the dispatcher calls through;
//! [`HttpBackend`] speaks the real HTTP contract with reqwest.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use super::normalize::{RemoteReply, ReplyKind, normalize};
use super::types::ImagePayload;
use crate::config::{AgriConfig, DispatchConfig, ResponseFieldConfig, RouteConfig};
use crate::error::{AdvisoryError, Result};
use crate::language::Language;

/// JSON body of the advisory route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisoryRequest {
    pub query: String,
    pub location: String,
    pub language: Language,
}

/// A backend that can answer advisory and image queries.
#[async_trait]
pub trait AdvisoryBackend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Send a text query to `endpoint`.
    async fn advise(&self, endpoint: &str, request: &AdvisoryRequest) -> Result<RemoteReply>;

    /// Upload an image to `endpoint` for analysis.
    async fn analyze_image(
        &self,
        endpoint: &str,
        image: &ImagePayload,
        language: Language,
    ) -> Result<RemoteReply>;
}

/// reqwest-based [`AdvisoryBackend`].
pub struct HttpBackend {
    client: reqwest::Client,
    routes: RouteConfig,
    fields: ResponseFieldConfig,
    text_timeout: Duration,
    image_timeout: Duration,
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("routes", &self.routes)
            .field("text_timeout", &self.text_timeout)
            .field("image_timeout", &self.image_timeout)
            .finish()
    }
}

impl HttpBackend {
    pub fn new(config: &AgriConfig) -> Result<Self> {
        Self::with_parts(&config.routes, &config.fields, &config.dispatch)
    }

    /// # Errors
    ///
    /// [`AdvisoryError::Config`] if the HTTP client cannot be built.
    pub fn with_parts(
        routes: &RouteConfig,
        fields: &ResponseFieldConfig,
        dispatch: &DispatchConfig,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AdvisoryError::Config(format!("building advisory client: {e}")))?;
        Ok(Self {
            client,
            routes: routes.clone(),
            fields: fields.clone(),
            text_timeout: dispatch.text_timeout(),
            image_timeout: dispatch.image_timeout(),
        })
    }

    async fn read_success_body(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisoryError::RemoteError {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }
        Ok(response.text().await?)
    }
}

/// Pull a readable message out of an error body (`{"detail": ...}` from the
/// backend framework, or the raw text).
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("detail")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.chars().take(500).collect())
}

#[async_trait]
impl AdvisoryBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn advise(&self, endpoint: &str, request: &AdvisoryRequest) -> Result<RemoteReply> {
        let url = RouteConfig::url(endpoint, &self.routes.advisory);
        let response = self
            .client
            .post(&url)
            .timeout(self.text_timeout)
            .json(request)
            .send()
            .await?;
        let body = Self::read_success_body(response).await?;
        Ok(normalize(
            &body,
            ReplyKind::Advisory,
            &self.fields,
            None,
            request.language,
        ))
    }

    async fn analyze_image(
        &self,
        endpoint: &str,
        image: &ImagePayload,
        language: Language,
    ) -> Result<RemoteReply> {
        let url = RouteConfig::url(endpoint, &self.routes.image);
        let part = reqwest::multipart::Part::stream(image.data.clone())
            .file_name(image.filename.clone())
            .mime_str(&image.mime_type)
            .map_err(|e| AdvisoryError::InvalidInput(format!("bad MIME type: {e}")))?;
        let form = reqwest::multipart::Form::new().part(self.routes.image_field.clone(), part);

        let response = self
            .client
            .post(&url)
            .timeout(self.image_timeout)
            .multipart(form)
            .send()
            .await?;
        let body = Self::read_success_body(response).await?;
        Ok(normalize(
            &body,
            ReplyKind::ImageAnalysis,
            &self.fields,
            Some(&image.filename),
            language,
        ))
    }
}
