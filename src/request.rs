//! Submission payloads built from a configuration snapshot.
//!
//! Builders borrow the config and never mutate it. They do not validate;
//! the session controller guards topic and template presence.

use serde::Serialize;

use crate::script::ScriptTemplate;
use crate::studio::model::{CaptionConfig, Character, VideoConfig};
use crate::studio::options::{
    CaptionAnimation, CaptionPosition, CaptionStyle, ColorFilter, HookIntensity, ImageMode,
    ImageStyle, Pacing, StoryType, VoiceEngine,
};

/// Manual caption block sent when captions are enabled.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CaptionSpec {
    pub text: String,
    pub style: CaptionStyle,
    pub position: CaptionPosition,
    pub animation: CaptionAnimation,
}

impl CaptionSpec {
    /// The caption block for a config, if manual captions are on.
    pub fn from_caption(caption: &CaptionConfig) -> Option<Self> {
        caption.enabled.then(|| Self {
            text: caption.text.clone(),
            style: caption.style,
            position: caption.position,
            animation: caption.animation,
        })
    }
}

/// Character entry as the backend expects it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CharacterPayload {
    pub name: String,
    pub description: String,
}

impl From<&Character> for CharacterPayload {
    fn from(c: &Character) -> Self {
        Self {
            name: c.name.clone(),
            description: c.description.clone(),
        }
    }
}

// =============================================================================
// QUICK MODE
// =============================================================================

/// Body of `POST /api/generate-video`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuickRequest {
    pub topic: String,
    pub story_type: StoryType,
    pub image_style: ImageStyle,
    pub image_mode: ImageMode,
    pub voice_id: String,
    pub voice_engine: VoiceEngine,
    pub voice_speed: f32,
    pub duration: u32,
    pub hook_intensity: HookIntensity,
    pub pacing: Pacing,
    pub num_scenes: u32,
    pub characters: Vec<CharacterPayload>,
    pub stock_keywords: Vec<String>,
    pub color_filter: ColorFilter,
    pub zoom_effect: bool,
    pub auto_captions: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<CaptionSpec>,
}

impl QuickRequest {
    /// Snapshots `config` into a quick-mode payload.
    ///
    /// Characters missing a name or description are left out.
    pub fn from_config(config: &VideoConfig) -> Self {
        Self {
            topic: config.topic().to_string(),
            story_type: config.story_type(),
            image_style: config.image_style(),
            image_mode: config.image_mode(),
            voice_id: config.voice_id().to_string(),
            voice_engine: config.voice_engine(),
            voice_speed: config.voice_speed(),
            duration: config.duration(),
            hook_intensity: config.hook_intensity(),
            pacing: config.pacing(),
            num_scenes: config.num_scenes(),
            characters: config
                .characters()
                .iter()
                .filter(|c| c.is_complete())
                .map(CharacterPayload::from)
                .collect(),
            stock_keywords: config.stock_keywords().to_vec(),
            color_filter: config.color_filter(),
            zoom_effect: config.zoom_effect(),
            auto_captions: config.auto_captions(),
            caption: CaptionSpec::from_caption(config.caption()),
        }
    }
}

// =============================================================================
// TEMPLATE MODE
// =============================================================================

/// Body of `POST /api/generate-with-template`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TemplateRequest {
    pub topic: String,
    pub story_type: StoryType,
    pub template: ScriptTemplate,
    /// Always null; the backend researches the topic itself.
    pub research_data: Option<serde_json::Value>,
    pub duration: u32,
    pub num_scenes: u32,
    pub voice_id: String,
    pub voice_engine: VoiceEngine,
    pub voice_speed: f32,
    pub zoom_effect: bool,
    pub color_filter: ColorFilter,
    pub visual_effects: bool,
    pub auto_captions: bool,
    pub srt_subtitles: bool,
    pub emotion_captions: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<CaptionSpec>,
}

impl TemplateRequest {
    /// Snapshots `config` plus the extracted `template` into a template-mode payload.
    pub fn from_config(config: &VideoConfig, template: &ScriptTemplate) -> Self {
        Self {
            topic: config.topic().to_string(),
            story_type: config.story_type(),
            template: template.clone(),
            research_data: None,
            duration: config.duration(),
            num_scenes: config.num_scenes(),
            voice_id: config.voice_id().to_string(),
            voice_engine: config.voice_engine(),
            voice_speed: config.voice_speed(),
            zoom_effect: config.zoom_effect(),
            color_filter: config.color_filter(),
            visual_effects: false,
            auto_captions: config.auto_captions(),
            srt_subtitles: false,
            emotion_captions: true,
            caption: CaptionSpec::from_caption(config.caption()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn sample_template() -> ScriptTemplate {
        serde_json::from_value(json!({
            "hook_example": "It started with a knock.",
            "hook_style": "mystery",
            "setup_length": 100,
            "rise_length": 250,
            "climax_length": 150,
            "end_length": 50,
            "tone": ["tense"],
        }))
        .unwrap()
    }

    #[test]
    fn test_quick_request_without_captions() {
        let config = VideoConfig::new().with_topic("The lighthouse keeper");
        let body = serde_json::to_value(QuickRequest::from_config(&config)).unwrap();

        assert!(body.get("caption").is_none());
        assert_eq!(body["auto_captions"], Value::Bool(false));
        assert_eq!(body["topic"], "The lighthouse keeper");
        assert_eq!(body["story_type"], "scary_horror");
        assert_eq!(body["image_mode"], "ai_only");
        assert_eq!(body["voice_id"], "af_bella");
        assert_eq!(body["voice_engine"], "kokoro");
        assert_eq!(body["duration"], 5);
        assert_eq!(body["num_scenes"], 10);
        assert_eq!(body["color_filter"], "none");
    }

    #[test]
    fn test_quick_request_with_manual_caption() {
        let mut config = VideoConfig::new().with_topic("storm");
        config.set_caption_enabled(true);
        config.set_caption_text("Based on true events");
        config.set_caption_style(CaptionStyle::Horror);

        let body = serde_json::to_value(QuickRequest::from_config(&config)).unwrap();
        assert_eq!(
            body["caption"],
            json!({
                "text": "Based on true events",
                "style": "horror",
                "position": "bottom",
                "animation": "fade_in"
            })
        );
    }

    #[test]
    fn test_incomplete_characters_are_dropped() {
        let config = VideoConfig::new()
            .with_topic("t")
            .with_character("Sarah", "25, nurse")
            .with_character("", "no name")
            .with_character("Tom", "  ");

        let request = QuickRequest::from_config(&config);
        assert_eq!(request.characters.len(), 1);
        assert_eq!(request.characters[0].name, "Sarah");
        assert_eq!(config.characters().len(), 3);
    }

    #[test]
    fn test_template_request_shape() {
        let mut config = VideoConfig::new().with_topic("Dyatlov Pass");
        config.add_stock_keyword("snow");
        config.add_character("Igor", "hiker");
        config.set_auto_captions(true);

        let body = serde_json::to_value(TemplateRequest::from_config(&config, &sample_template())).unwrap();
        assert_eq!(body["research_data"], Value::Null);
        assert_eq!(body["visual_effects"], Value::Bool(false));
        assert_eq!(body["srt_subtitles"], Value::Bool(false));
        assert_eq!(body["emotion_captions"], Value::Bool(true));
        assert_eq!(body["auto_captions"], Value::Bool(true));
        assert_eq!(body["template"]["hookStyle"], "mystery");
        assert_eq!(body["template"]["sentenceVariation"], "medium");
        assert!(body.get("characters").is_none());
        assert!(body.get("stock_keywords").is_none());
        assert!(body.get("caption").is_none());
    }
}
