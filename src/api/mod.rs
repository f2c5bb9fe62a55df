//! Backend API surface.
//!
//! Wire types are always available; the async [`VideoApi`] trait and its
//! reqwest implementation need the `client` feature.

#[cfg(feature = "client")]
pub mod http;

use serde::{Deserialize, Serialize};

#[cfg(feature = "client")]
use crate::error::StudioResult;
#[cfg(feature = "client")]
use crate::request::{QuickRequest, TemplateRequest};
#[cfg(feature = "client")]
use crate::script::{ExampleScript, ScriptTemplate};

#[cfg(feature = "client")]
pub use http::HttpVideoApi;

/// Backend base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Status string the backend reports once the video is rendered.
pub const STATUS_COMPLETE: &str = "complete";

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Acknowledgement of a submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SubmitAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    /// Any other fields the backend echoed back.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One progress report from `GET /api/progress`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProgressSnapshot {
    #[serde(default)]
    pub status: String,
    /// Percentage, 0 to 100.
    #[serde(default)]
    pub progress: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substatus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProgressSnapshot {
    /// Creates an in-flight snapshot.
    pub fn new(status: impl Into<String>, progress: f32) -> Self {
        Self {
            status: status.into(),
            progress,
            ..Default::default()
        }
    }

    /// Builder: Set video path.
    pub fn with_video_path(mut self, path: impl Into<String>) -> Self {
        self.video_path = Some(path.into());
        self
    }

    /// Builder: Set error.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// The backend's error message, if it reported one.
    pub fn reported_error(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }

    /// The rendered video path once generation finished.
    pub fn completed_path(&self) -> Option<&str> {
        if self.status == STATUS_COMPLETE {
            self.video_path.as_deref().filter(|p| !p.is_empty())
        } else {
            None
        }
    }

    /// True when the snapshot ends the session.
    pub fn is_terminal(&self) -> bool {
        self.reported_error().is_some() || self.completed_path().is_some()
    }
}

/// Joins a base URL and an asset path into a fetchable URL.
pub fn asset_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/api/video/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

// =============================================================================
// API TRAIT
// =============================================================================

/// Operations the generation backend exposes.
#[cfg(feature = "client")]
#[async_trait::async_trait]
pub trait VideoApi: Send + Sync {
    /// Base URL the client talks to.
    fn base_url(&self) -> &str;

    /// Liveness probe. Never errors; any failure reads as offline.
    async fn check_health(&self) -> bool;

    /// Starts a quick-mode generation.
    async fn submit_quick(&self, request: &QuickRequest) -> StudioResult<SubmitAck>;

    /// Starts a template-mode generation.
    async fn submit_template(&self, request: &TemplateRequest) -> StudioResult<SubmitAck>;

    /// Reads the current progress of the running generation.
    async fn poll_progress(&self) -> StudioResult<ProgressSnapshot>;

    /// Narrator voices the backend offers.
    async fn list_voices(&self) -> StudioResult<serde_json::Value>;

    /// Effects and filters the backend offers.
    async fn list_effects(&self) -> StudioResult<serde_json::Value>;

    /// Extracts a structural template from an example script.
    async fn analyze_script(&self, script: &ExampleScript) -> StudioResult<ScriptTemplate>;

    /// URL of a rendered asset.
    fn resolve_asset_url(&self, path: &str) -> String {
        asset_url(self.base_url(), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_asset_url() {
        assert_eq!(
            asset_url(DEFAULT_BASE_URL, "abc.mp4"),
            "http://localhost:5000/api/video/abc.mp4"
        );
        assert_eq!(
            asset_url("http://gpu:5000/", "/out/final.mp4"),
            "http://gpu:5000/api/video/out/final.mp4"
        );
    }

    #[test]
    fn test_snapshot_accepts_integer_and_null_fields() {
        let snap: ProgressSnapshot = serde_json::from_value(json!({
            "status": "generating_images",
            "progress": 35,
            "substatus": null,
            "details": "Scene 3 of 10",
            "video_path": null,
            "error": null
        }))
        .unwrap();
        assert_eq!(snap.progress, 35.0);
        assert_eq!(snap.details.as_deref(), Some("Scene 3 of 10"));
        assert!(!snap.is_terminal());

        let snap: ProgressSnapshot = serde_json::from_value(json!({"status": "x", "progress": 12.5})).unwrap();
        assert_eq!(snap.progress, 12.5);
    }

    #[test]
    fn test_terminal_snapshots() {
        let done = ProgressSnapshot::new("complete", 100.0).with_video_path("abc.mp4");
        assert_eq!(done.completed_path(), Some("abc.mp4"));
        assert!(done.is_terminal());

        let no_path = ProgressSnapshot::new("complete", 100.0);
        assert!(!no_path.is_terminal());

        let failed = ProgressSnapshot::new("error", 40.0).with_error("boom");
        assert_eq!(failed.reported_error(), Some("boom"));

        let empty_error = ProgressSnapshot::new("running", 40.0).with_error("");
        assert!(!empty_error.is_terminal());
    }

    #[test]
    fn test_ack_keeps_extra_fields() {
        let ack: SubmitAck = serde_json::from_value(json!({
            "success": true,
            "message": "Generation started",
            "job": "a1"
        }))
        .unwrap();
        assert!(ack.success);
        assert_eq!(ack.extra["job"], "a1");
    }
}
