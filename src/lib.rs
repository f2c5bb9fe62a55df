//! StoryReel - Client library for an AI story-video generation backend.
//!
//! The crate covers everything between a user's choices and a finished video:
//!
//! - **Configuration model**: `VideoConfig` keeps every selection valid on write
//! - **Request building**: quick-mode and template-mode payloads snapshot the config
//! - **Session control**: submit, poll progress, surface the result or the error
//!
//! # Example
//!
//! ```rust
//! use storyreel::{QuickRequest, StoryType, VideoConfig};
//!
//! // Collect the user's choices
//! let mut config = VideoConfig::new()
//!     .with_topic("The lighthouse keeper who vanished")
//!     .with_story_type(StoryType::MysteryThriller)
//!     .with_duration(8);
//! config.set_voice_speed(3.0); // clamped to 2.0
//! config.add_character("Thomas", "60s, grey beard, oilskin coat");
//!
//! // Snapshot it into the body of POST /api/generate-video
//! let request = QuickRequest::from_config(&config);
//! assert_eq!(request.voice_speed, 2.0);
//! assert!(request.caption.is_none());
//! ```
//!
//! With the `client` feature (on by default), `SessionController` submits the
//! request through an `HttpVideoApi` and publishes every state change on a
//! watch channel.

pub mod error;

// Configuration, requests and session state
pub mod studio;
pub mod request;
pub mod script;
pub mod api;
pub mod session;
pub mod settings;

// Re-exports for convenience
pub use api::{asset_url, ProgressSnapshot, SubmitAck};
pub use error::{StudioError, StudioResult};
pub use request::{QuickRequest, TemplateRequest};
pub use script::{ExampleScript, ScriptTemplate};
pub use session::{GenerationMode, GenerationSession, SessionState, VideoResult};
pub use settings::Settings;
pub use studio::{
    CaptionAnimation, CaptionPosition, CaptionStyle, Character, ColorFilter, HookIntensity,
    ImageMode, ImageStyle, MediaPriority, MediaSource, Pacing, StoryType, VideoConfig,
    VoiceEngine,
};

#[cfg(feature = "wasm")]
pub use studio::JsVideoConfig;

// Network-backed components (only compiled when client feature enabled)
#[cfg(feature = "client")]
pub mod health;
#[cfg(feature = "client")]
pub mod gallery;
#[cfg(feature = "client")]
pub mod stock;

#[cfg(feature = "client")]
pub use api::{HttpVideoApi, VideoApi};
#[cfg(feature = "client")]
pub use gallery::{GalleryRecord, GalleryStore, JsonGallery};
#[cfg(feature = "client")]
pub use health::{HealthMonitor, HealthStatus};
#[cfg(feature = "client")]
pub use session::SessionController;
#[cfg(feature = "client")]
pub use stock::{PexelsClient, StockFilter};
