//! Generation session state and its transitions.
//!
//! Everything here is synchronous; the controller applies these transitions
//! inside its watch channel so each one is atomic with respect to observers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::ProgressSnapshot;
use crate::studio::model::VideoConfig;
use crate::studio::options::{duration_label, ImageStyle, StoryType};

/// Lifecycle state of a generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    /// Submission in flight.
    Generating,
    /// Acknowledged; progress is being polled.
    Polling,
    Complete,
    Error,
}

impl SessionState {
    /// True while a generation is being submitted or tracked.
    pub fn is_active(self) -> bool {
        matches!(self, SessionState::Generating | SessionState::Polling)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Complete | SessionState::Error)
    }
}

/// Which submission path started the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    Quick,
    Template,
}

/// The configuration values echoed in a finished result.
///
/// Captured when the request is submitted, so later edits to the live
/// configuration never leak into the result of an earlier run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmittedConfig {
    pub topic: String,
    pub story_type: StoryType,
    pub image_style: ImageStyle,
    pub voice_id: String,
    pub duration: u32,
    pub num_scenes: u32,
}

impl From<&VideoConfig> for SubmittedConfig {
    fn from(config: &VideoConfig) -> Self {
        Self {
            topic: config.topic().to_string(),
            story_type: config.story_type(),
            image_style: config.image_style(),
            voice_id: config.voice_id().to_string(),
            duration: config.duration(),
            num_scenes: config.num_scenes(),
        }
    }
}

/// A finished video.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoResult {
    /// Backend-relative asset path.
    pub video_path: String,
    /// Fully resolved URL of the asset.
    pub video_url: String,
    pub topic: String,
    pub story_type: StoryType,
    pub image_style: ImageStyle,
    pub voice_id: String,
    /// Minutes.
    pub duration: u32,
    pub scene_count: u32,
    pub generated_at: DateTime<Utc>,
}

impl VideoResult {
    pub fn new(video_path: &str, video_url: String, submitted: &SubmittedConfig) -> Self {
        Self {
            video_path: video_path.to_string(),
            video_url,
            topic: submitted.topic.clone(),
            story_type: submitted.story_type,
            image_style: submitted.image_style,
            voice_id: submitted.voice_id.clone(),
            duration: submitted.duration,
            scene_count: submitted.num_scenes,
            generated_at: Utc::now(),
        }
    }

    /// e.g. `"5 min (Quick)"`.
    pub fn duration_text(&self) -> String {
        format!("{} min ({})", self.duration, duration_label(self.duration))
    }
}

/// What applying a progress snapshot did.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotOutcome {
    /// Progress recorded; keep polling.
    Progress,
    /// Dropped because it would move progress backwards.
    Stale,
    /// The session was not polling; nothing changed.
    Ignored,
    /// The video is ready.
    Completed,
    /// The backend reported an error.
    Failed(String),
}

impl SnapshotOutcome {
    /// True when polling should stop.
    pub fn stops_polling(&self) -> bool {
        matches!(
            self,
            SnapshotOutcome::Completed | SnapshotOutcome::Failed(_) | SnapshotOutcome::Ignored
        )
    }

    /// True when the session changed.
    pub fn is_change(&self) -> bool {
        !matches!(self, SnapshotOutcome::Stale | SnapshotOutcome::Ignored)
    }
}

// =============================================================================
// GENERATION SESSION
// =============================================================================

/// Observable state of one generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GenerationSession {
    pub state: SessionState,
    pub mode: Option<GenerationMode>,
    /// Last applied progress report.
    pub progress: Option<ProgressSnapshot>,
    /// Set only when `state` is `Complete`.
    pub result: Option<VideoResult>,
    /// Set only when `state` is `Error` (and not yet dismissed).
    pub error: Option<String>,
}

impl GenerationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Last applied progress percentage.
    pub fn percent(&self) -> f32 {
        self.progress.as_ref().map(|p| p.progress).unwrap_or(0.0)
    }

    /// Enters `Generating`, clearing the previous run. Returns false while a run is active.
    pub fn begin(&mut self, mode: GenerationMode) -> bool {
        if self.is_active() {
            return false;
        }
        *self = Self {
            state: SessionState::Generating,
            mode: Some(mode),
            ..Self::default()
        };
        true
    }

    /// Submission acknowledged: `Generating` to `Polling`.
    pub fn acknowledge(&mut self) -> bool {
        if self.state != SessionState::Generating {
            return false;
        }
        self.state = SessionState::Polling;
        true
    }

    /// Moves an active session to `Error`.
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = SessionState::Error;
        self.error = Some(message.into());
        true
    }

    /// Merges one progress report.
    ///
    /// `finish` builds the result from the completed asset path.
    pub fn apply_snapshot<F>(&mut self, snapshot: ProgressSnapshot, finish: F) -> SnapshotOutcome
    where
        F: FnOnce(&str) -> VideoResult,
    {
        if self.state != SessionState::Polling {
            return SnapshotOutcome::Ignored;
        }

        if let Some(message) = snapshot.reported_error() {
            let message = message.to_string();
            self.state = SessionState::Error;
            self.error = Some(message.clone());
            self.progress = Some(snapshot);
            return SnapshotOutcome::Failed(message);
        }

        if let Some(path) = snapshot.completed_path() {
            self.result = Some(finish(path));
            self.state = SessionState::Complete;
            self.progress = Some(snapshot);
            return SnapshotOutcome::Completed;
        }

        if let Some(last) = &self.progress {
            if snapshot.progress < last.progress {
                return SnapshotOutcome::Stale;
            }
        }
        self.progress = Some(snapshot);
        SnapshotOutcome::Progress
    }

    /// Clears the error message but keeps the state.
    pub fn dismiss_error(&mut self) -> bool {
        self.error.take().is_some()
    }

    /// Back to `Idle`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
