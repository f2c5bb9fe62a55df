//! Studio configuration module.
//!
//! Option tables and the `VideoConfig` model a presentation layer edits
//! before submitting a generation.

pub mod options;
pub mod model;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use model::{
    CaptionConfig, Character, ManualMedia, MediaKind, MediaPriority, PriorityMode, StockMediaItem,
    VideoConfig,
};
pub use options::{
    duration_label, estimated_words, voice_by_id, CaptionAnimation, CaptionPosition, CaptionStyle,
    ColorFilter, HookIntensity, ImageMode, ImageStyle, MediaSource, OptionSpec, Pacing, StoryType,
    VoiceEngine, VoiceOption, VOICES,
};

#[cfg(feature = "wasm")]
pub use wasm::JsVideoConfig;
