//! The generation configuration model.
//!
//! `VideoConfig` holds every user choice for one generation. Setters enforce
//! the model invariants on every write, so a config can never hold an
//! out-of-range speed, more than five characters, an empty media priority or
//! both caption modes at once.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{StudioError, StudioResult};
use super::options::{
    voice_by_id, CaptionAnimation, CaptionPosition, CaptionStyle, ColorFilter, HookIntensity,
    ImageMode, ImageStyle, MediaSource, Pacing, StoryType, VoiceEngine,
};

/// Maximum number of described characters.
pub const MAX_CHARACTERS: usize = 5;
/// Narration speed bounds.
pub const VOICE_SPEED_RANGE: (f32, f32) = (0.5, 2.0);
/// Duration bounds in minutes.
pub const DURATION_RANGE: (u32, u32) = (1, 60);
/// Scene count bounds.
pub const SCENE_RANGE: (u32, u32) = (5, 20);

// =============================================================================
// CHARACTER
// =============================================================================

/// A recurring character with an appearance description.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Character {
    pub name: String,
    pub description: String,
}

impl Character {
    /// Creates a character.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// True when both name and description carry text.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.description.trim().is_empty()
    }
}

// =============================================================================
// MEDIA
// =============================================================================

/// Kind of a media asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Detects the media kind from a file extension.
    pub fn detect(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "webp" | "gif" | "bmp" => Some(MediaKind::Image),
            "mp4" | "mov" | "webm" | "mkv" | "avi" | "m4v" => Some(MediaKind::Video),
            _ => None,
        }
    }
}

/// A user-supplied image or clip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManualMedia {
    pub name: String,
    pub path: PathBuf,
    pub kind: MediaKind,
}

impl ManualMedia {
    /// Creates a manual asset, tagging it with the detected kind.
    pub fn from_path(path: impl Into<PathBuf>) -> StudioResult<Self> {
        let path = path.into();
        let kind = MediaKind::detect(&path).ok_or_else(|| {
            StudioError::validation(format!("Unsupported media file: {}", path.display()))
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, path, kind })
    }
}

/// An externally sourced stock photo or clip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockMediaItem {
    pub id: u64,
    pub kind: MediaKind,
    pub thumbnail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub photographer: String,
}

// =============================================================================
// MEDIA PRIORITY
// =============================================================================

/// How media sources are consumed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "mode", content = "pattern")]
pub enum PriorityMode {
    /// Use sources one after another in priority order.
    #[default]
    Sequential,
    /// Interleave sources following a comma-separated pattern such as `ai,stock,ai`.
    Pattern(String),
}

/// Ordered list of media sources. Never empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawMediaPriority")]
pub struct MediaPriority {
    order: Vec<MediaSource>,
    mode: PriorityMode,
}

/// Wire shape of `MediaPriority`; decoded values pass through `set_order`.
#[derive(Deserialize)]
struct RawMediaPriority {
    #[serde(default)]
    order: Vec<MediaSource>,
    #[serde(default)]
    mode: PriorityMode,
}

impl From<RawMediaPriority> for MediaPriority {
    fn from(raw: RawMediaPriority) -> Self {
        let mut priority = MediaPriority {
            order: Vec::new(),
            mode: raw.mode,
        };
        priority.set_order(raw.order);
        priority
    }
}

impl Default for MediaPriority {
    fn default() -> Self {
        Self {
            order: Self::default_order(),
            mode: PriorityMode::Sequential,
        }
    }
}

impl MediaPriority {
    /// `[ai, stock, manual]`.
    pub fn default_order() -> Vec<MediaSource> {
        vec![MediaSource::Ai, MediaSource::Stock, MediaSource::Manual]
    }

    /// Current source order.
    pub fn order(&self) -> &[MediaSource] {
        &self.order
    }

    /// Current consumption mode.
    pub fn mode(&self) -> &PriorityMode {
        &self.mode
    }

    /// Switches between sequential and pattern consumption.
    pub fn set_mode(&mut self, mode: PriorityMode) {
        self.mode = mode;
    }

    /// Replaces the order. An empty list resets to the default order.
    pub fn set_order(&mut self, order: Vec<MediaSource>) {
        let mut deduped = Vec::with_capacity(order.len());
        for source in order {
            if !deduped.contains(&source) {
                deduped.push(source);
            }
        }
        self.order = if deduped.is_empty() {
            Self::default_order()
        } else {
            deduped
        };
    }

    /// Swaps the source at `index` with the one before it.
    pub fn move_up(&mut self, index: usize) {
        if index > 0 && index < self.order.len() {
            self.order.swap(index - 1, index);
        }
    }

    /// Swaps the source at `index` with the one after it.
    pub fn move_down(&mut self, index: usize) {
        if index + 1 < self.order.len() {
            self.order.swap(index, index + 1);
        }
    }

    /// Removes the source at `index`. Ignored when it is the last one left.
    pub fn remove(&mut self, index: usize) -> bool {
        if self.order.len() <= 1 || index >= self.order.len() {
            return false;
        }
        self.order.remove(index);
        true
    }

    /// Appends a source that is not already present.
    pub fn add(&mut self, source: MediaSource) -> bool {
        if self.order.contains(&source) {
            return false;
        }
        self.order.push(source);
        true
    }

    /// Sources not currently in the list.
    pub fn available(&self) -> Vec<MediaSource> {
        MediaSource::ALL
            .iter()
            .copied()
            .filter(|s| !self.order.contains(s))
            .collect()
    }

    /// The sequence the backend should consume sources in.
    ///
    /// In pattern mode unknown entries are skipped, and a pattern with no valid
    /// entry falls back to the default order.
    pub fn effective_order(&self) -> Vec<MediaSource> {
        match &self.mode {
            PriorityMode::Sequential => self.order.clone(),
            PriorityMode::Pattern(pattern) => {
                let parsed: Vec<MediaSource> = pattern
                    .split(',')
                    .filter_map(|s| s.trim().parse().ok())
                    .collect();
                if parsed.is_empty() {
                    Self::default_order()
                } else {
                    parsed
                }
            }
        }
    }
}

// =============================================================================
// CAPTIONS
// =============================================================================

/// Manual caption settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CaptionConfig {
    pub enabled: bool,
    pub text: String,
    pub style: CaptionStyle,
    pub position: CaptionPosition,
    pub animation: CaptionAnimation,
}

// =============================================================================
// VIDEO CONFIG
// =============================================================================

/// Every user-selected generation parameter.
///
/// Fields are read through getters; writes go through setters so the
/// invariants hold. Decoding runs the same normalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawVideoConfig")]
pub struct VideoConfig {
    topic: String,
    story_type: StoryType,
    image_style: ImageStyle,
    image_mode: ImageMode,
    voice_id: String,
    voice_engine: VoiceEngine,
    voice_speed: f32,
    duration: u32,
    hook_intensity: HookIntensity,
    pacing: Pacing,
    num_scenes: u32,
    characters: Vec<Character>,
    manual_media: Vec<ManualMedia>,
    stock_keywords: Vec<String>,
    selected_stock_media: Vec<StockMediaItem>,
    media_priority: MediaPriority,
    auto_captions: bool,
    caption: CaptionConfig,
    color_filter: ColorFilter,
    zoom_effect: bool,
    grain_effect: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            topic: String::new(),
            story_type: StoryType::default(),
            image_style: ImageStyle::default(),
            image_mode: ImageMode::default(),
            voice_id: "af_bella".to_string(),
            voice_engine: VoiceEngine::Kokoro,
            voice_speed: 1.0,
            duration: 5,
            hook_intensity: HookIntensity::default(),
            pacing: Pacing::default(),
            num_scenes: 10,
            characters: Vec::new(),
            manual_media: Vec::new(),
            stock_keywords: Vec::new(),
            selected_stock_media: Vec::new(),
            media_priority: MediaPriority::default(),
            auto_captions: false,
            caption: CaptionConfig::default(),
            color_filter: ColorFilter::default(),
            zoom_effect: false,
            grain_effect: false,
        }
    }
}

/// Wire shape of `VideoConfig` before normalization.
#[derive(Deserialize)]
struct RawVideoConfig {
    topic: String,
    story_type: StoryType,
    image_style: ImageStyle,
    image_mode: ImageMode,
    voice_id: String,
    voice_engine: VoiceEngine,
    voice_speed: f32,
    duration: u32,
    hook_intensity: HookIntensity,
    pacing: Pacing,
    num_scenes: u32,
    characters: Vec<Character>,
    manual_media: Vec<ManualMedia>,
    stock_keywords: Vec<String>,
    selected_stock_media: Vec<StockMediaItem>,
    media_priority: MediaPriority,
    auto_captions: bool,
    caption: CaptionConfig,
    color_filter: ColorFilter,
    zoom_effect: bool,
    grain_effect: bool,
}

impl From<RawVideoConfig> for VideoConfig {
    fn from(raw: RawVideoConfig) -> Self {
        let mut config = VideoConfig {
            topic: raw.topic,
            story_type: raw.story_type,
            image_style: raw.image_style,
            image_mode: raw.image_mode,
            voice_id: raw.voice_id,
            voice_engine: raw.voice_engine,
            hook_intensity: raw.hook_intensity,
            pacing: raw.pacing,
            manual_media: raw.manual_media,
            stock_keywords: raw.stock_keywords,
            selected_stock_media: raw.selected_stock_media,
            media_priority: raw.media_priority,
            caption: raw.caption,
            color_filter: raw.color_filter,
            zoom_effect: raw.zoom_effect,
            grain_effect: raw.grain_effect,
            ..VideoConfig::default()
        };
        config.set_voice_speed(raw.voice_speed);
        config.set_duration(raw.duration);
        config.set_num_scenes(raw.num_scenes);
        config.set_characters(raw.characters);
        // Manual captions win when both modes arrive enabled.
        config.auto_captions = raw.auto_captions && !config.caption.enabled;
        config
    }
}

fn clamp_u32(value: u32, (min, max): (u32, u32)) -> u32 {
    value.clamp(min, max)
}

impl VideoConfig {
    /// Creates a config with the initial selections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: Set topic.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.set_topic(topic);
        self
    }

    /// Builder: Set story type.
    pub fn with_story_type(mut self, story_type: StoryType) -> Self {
        self.story_type = story_type;
        self
    }

    /// Builder: Set duration.
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.set_duration(minutes);
        self
    }

    /// Builder: Add a character.
    pub fn with_character(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.add_character(name, description);
        self
    }

    // =========================================================================
    // GETTERS
    // =========================================================================

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn story_type(&self) -> StoryType {
        self.story_type
    }

    pub fn image_style(&self) -> ImageStyle {
        self.image_style
    }

    pub fn image_mode(&self) -> ImageMode {
        self.image_mode
    }

    pub fn voice_id(&self) -> &str {
        &self.voice_id
    }

    pub fn voice_engine(&self) -> VoiceEngine {
        self.voice_engine
    }

    pub fn voice_speed(&self) -> f32 {
        self.voice_speed
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn hook_intensity(&self) -> HookIntensity {
        self.hook_intensity
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    pub fn num_scenes(&self) -> u32 {
        self.num_scenes
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn manual_media(&self) -> &[ManualMedia] {
        &self.manual_media
    }

    pub fn stock_keywords(&self) -> &[String] {
        &self.stock_keywords
    }

    pub fn selected_stock_media(&self) -> &[StockMediaItem] {
        &self.selected_stock_media
    }

    pub fn media_priority(&self) -> &MediaPriority {
        &self.media_priority
    }

    pub fn auto_captions(&self) -> bool {
        self.auto_captions
    }

    pub fn caption(&self) -> &CaptionConfig {
        &self.caption
    }

    pub fn color_filter(&self) -> ColorFilter {
        self.color_filter
    }

    pub fn zoom_effect(&self) -> bool {
        self.zoom_effect
    }

    pub fn grain_effect(&self) -> bool {
        self.grain_effect
    }

    /// True when the topic has non-whitespace text.
    pub fn has_topic(&self) -> bool {
        !self.topic.trim().is_empty()
    }

    // =========================================================================
    // SCALAR SETTERS
    // =========================================================================

    pub fn set_topic(&mut self, topic: impl Into<String>) {
        self.topic = topic.into();
    }

    pub fn set_story_type(&mut self, story_type: StoryType) {
        self.story_type = story_type;
    }

    pub fn set_image_style(&mut self, image_style: ImageStyle) {
        self.image_style = image_style;
    }

    pub fn set_image_mode(&mut self, image_mode: ImageMode) {
        self.image_mode = image_mode;
    }

    pub fn set_voice_id(&mut self, voice_id: impl Into<String>) {
        self.voice_id = voice_id.into();
    }

    pub fn set_voice_engine(&mut self, engine: VoiceEngine) {
        self.voice_engine = engine;
    }

    /// Selects a voice; catalog voices also switch the engine.
    pub fn select_voice(&mut self, voice_id: &str) {
        if let Some(voice) = voice_by_id(voice_id) {
            self.voice_engine = voice.engine;
        }
        self.voice_id = voice_id.to_string();
    }

    /// Stores `speed` clamped to [0.5, 2.0]. NaN resets to 1.0.
    pub fn set_voice_speed(&mut self, speed: f32) {
        let (min, max) = VOICE_SPEED_RANGE;
        self.voice_speed = if speed.is_nan() { 1.0 } else { speed.clamp(min, max) };
    }

    /// Stores `minutes` clamped to [1, 60].
    pub fn set_duration(&mut self, minutes: u32) {
        self.duration = clamp_u32(minutes, DURATION_RANGE);
    }

    pub fn set_hook_intensity(&mut self, intensity: HookIntensity) {
        self.hook_intensity = intensity;
    }

    pub fn set_pacing(&mut self, pacing: Pacing) {
        self.pacing = pacing;
    }

    /// Stores `num` clamped to [5, 20].
    pub fn set_num_scenes(&mut self, num: u32) {
        self.num_scenes = clamp_u32(num, SCENE_RANGE);
    }

    pub fn set_color_filter(&mut self, filter: ColorFilter) {
        self.color_filter = filter;
    }

    pub fn set_zoom_effect(&mut self, enabled: bool) {
        self.zoom_effect = enabled;
    }

    pub fn set_grain_effect(&mut self, enabled: bool) {
        self.grain_effect = enabled;
    }

    // =========================================================================
    // CHARACTERS
    // =========================================================================

    /// Appends a character. Returns false (and changes nothing) at the cap.
    pub fn add_character(&mut self, name: impl Into<String>, description: impl Into<String>) -> bool {
        if self.characters.len() >= MAX_CHARACTERS {
            return false;
        }
        self.characters.push(Character::new(name, description));
        true
    }

    /// Rewrites the character at `index`.
    pub fn update_character(
        &mut self,
        index: usize,
        name: impl Into<String>,
        description: impl Into<String>,
    ) {
        if let Some(character) = self.characters.get_mut(index) {
            character.name = name.into();
            character.description = description.into();
        }
    }

    pub fn remove_character(&mut self, index: usize) {
        if index < self.characters.len() {
            self.characters.remove(index);
        }
    }

    /// Replaces all characters, keeping at most the first five.
    pub fn set_characters(&mut self, mut characters: Vec<Character>) {
        characters.truncate(MAX_CHARACTERS);
        self.characters = characters;
    }

    // =========================================================================
    // MEDIA
    // =========================================================================

    /// Adds an uploaded file after detecting its kind.
    pub fn add_manual_media(&mut self, path: impl Into<PathBuf>) -> StudioResult<&ManualMedia> {
        let media = ManualMedia::from_path(path)?;
        self.manual_media.push(media);
        Ok(&self.manual_media[self.manual_media.len() - 1])
    }

    pub fn remove_manual_media(&mut self, index: usize) {
        if index < self.manual_media.len() {
            self.manual_media.remove(index);
        }
    }

    /// Appends a search keyword. Blank input is ignored; duplicates are kept.
    pub fn add_stock_keyword(&mut self, keyword: &str) -> bool {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return false;
        }
        self.stock_keywords.push(keyword.to_string());
        true
    }

    pub fn remove_stock_keyword(&mut self, index: usize) {
        if index < self.stock_keywords.len() {
            self.stock_keywords.remove(index);
        }
    }

    pub fn set_stock_keywords(&mut self, keywords: Vec<String>) {
        self.stock_keywords = keywords;
    }

    /// Selects the item if absent, deselects it if present. Returns the new selection state.
    pub fn toggle_stock_media(&mut self, item: StockMediaItem) -> bool {
        if let Some(pos) = self.selected_stock_media.iter().position(|m| m.id == item.id) {
            self.selected_stock_media.remove(pos);
            false
        } else {
            self.selected_stock_media.push(item);
            true
        }
    }

    pub fn clear_stock_media(&mut self) {
        self.selected_stock_media.clear();
    }

    /// Mutable access to the media priority list (its own methods keep it non-empty).
    pub fn media_priority_mut(&mut self) -> &mut MediaPriority {
        &mut self.media_priority
    }

    // =========================================================================
    // CAPTIONS
    // =========================================================================

    /// Enables or disables script-derived captions; enabling turns manual captions off.
    pub fn set_auto_captions(&mut self, enabled: bool) {
        self.auto_captions = enabled;
        if enabled {
            self.caption.enabled = false;
        }
    }

    /// Enables or disables manual captions; enabling turns auto captions off.
    pub fn set_caption_enabled(&mut self, enabled: bool) {
        self.caption.enabled = enabled;
        if enabled {
            self.auto_captions = false;
        }
    }

    pub fn set_caption_text(&mut self, text: impl Into<String>) {
        self.caption.text = text.into();
    }

    pub fn set_caption_style(&mut self, style: CaptionStyle) {
        self.caption.style = style;
    }

    pub fn set_caption_position(&mut self, position: CaptionPosition) {
        self.caption.position = position;
    }

    pub fn set_caption_animation(&mut self, animation: CaptionAnimation) {
        self.caption.animation = animation;
    }
}

// =============================================================================
// TESTS
// =============================================================================
