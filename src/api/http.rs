//! reqwest implementation of [`VideoApi`].

use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;

use super::{ProgressSnapshot, SubmitAck, VideoApi};
use crate::error::{StudioError, StudioResult};
use crate::request::{QuickRequest, TemplateRequest};
use crate::script::{AnalyzeRequest, ExampleScript, ScriptTemplate};
use crate::settings::ApiSettings;

/// `{"error": "..."}` body the backend sends with failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Pulls the `error` field out of a JSON body, if there is one.
fn error_field(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|e| !e.is_empty())
}

/// HTTP client for the generation backend.
#[derive(Debug, Clone)]
pub struct HttpVideoApi {
    client: Client,
    base_url: String,
    submit_timeout: Duration,
    poll_timeout: Duration,
}

impl HttpVideoApi {
    /// Creates a client from the API settings.
    pub fn new(settings: &ApiSettings) -> StudioResult<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            submit_timeout: settings.submit_timeout(),
            poll_timeout: settings.poll_timeout(),
        })
    }

    /// Creates a client for `base_url` with default timeouts.
    pub fn with_base_url(base_url: &str) -> StudioResult<Self> {
        Self::new(&ApiSettings {
            base_url: base_url.to_string(),
            ..ApiSettings::default()
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decodes a successful submission response.
    async fn read_ack(resp: Response) -> StudioResult<SubmitAck> {
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| StudioError::submission(Some(status), e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(SubmitAck {
                success: true,
                ..Default::default()
            });
        }
        serde_json::from_str(&body).map_err(|e| {
            StudioError::submission(Some(status), format!("invalid acknowledgement: {}", e))
        })
    }

    async fn get_json(&self, path: &str) -> StudioResult<serde_json::Value> {
        let resp = self.client.get(self.url(path)).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(StudioError::api(status, message));
        }

        Ok(resp.json().await?)
    }
}

#[async_trait::async_trait]
impl VideoApi for HttpVideoApi {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /health
    async fn check_health(&self) -> bool {
        match self.client.get(self.url("/health")).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "health check failed");
                false
            }
        }
    }

    /// POST /api/generate-video
    async fn submit_quick(&self, request: &QuickRequest) -> StudioResult<SubmitAck> {
        let resp = self
            .client
            .post(self.url("/api/generate-video"))
            .timeout(self.submit_timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| StudioError::submission(None, e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(StudioError::submission(Some(status), message));
        }

        Self::read_ack(resp).await
    }

    /// POST /api/generate-with-template
    async fn submit_template(&self, request: &TemplateRequest) -> StudioResult<SubmitAck> {
        let resp = self
            .client
            .post(self.url("/api/generate-with-template"))
            .timeout(self.submit_timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| StudioError::submission(None, e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            let message = error_field(&body).unwrap_or_else(|| {
                if body.trim().is_empty() {
                    "Generation failed".to_string()
                } else {
                    body
                }
            });
            return Err(StudioError::submission(Some(status), message));
        }

        Self::read_ack(resp).await
    }

    /// GET /api/progress
    async fn poll_progress(&self) -> StudioResult<ProgressSnapshot> {
        let resp = self
            .client
            .get(self.url("/api/progress"))
            .timeout(self.poll_timeout)
            .send()
            .await
            .map_err(|e| StudioError::poll(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            return Err(StudioError::poll(format!(
                "Failed to fetch progress (HTTP {})",
                status
            )));
        }

        resp.json()
            .await
            .map_err(|e| StudioError::poll(e.to_string()))
    }

    /// GET /api/voices
    async fn list_voices(&self) -> StudioResult<serde_json::Value> {
        self.get_json("/api/voices").await
    }

    /// GET /api/available-effects
    async fn list_effects(&self) -> StudioResult<serde_json::Value> {
        self.get_json("/api/available-effects").await
    }

    /// POST /api/analyze-script
    async fn analyze_script(&self, script: &ExampleScript) -> StudioResult<ScriptTemplate> {
        script.ensure_analyzable()?;

        let resp = self
            .client
            .post(self.url("/api/analyze-script"))
            .json(&AnalyzeRequest::from(script))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            let message = error_field(&body).unwrap_or(body);
            return Err(StudioError::api(status, message));
        }

        Ok(resp.json().await?)
    }
}
