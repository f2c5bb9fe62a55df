//! WASM bindings for the studio module.
//!
//! Wraps `VideoConfig` so a browser front-end can keep the configuration in
//! Rust and read back plain JS objects.

use js_sys::Array;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

use crate::error::StudioError;
use crate::request::{QuickRequest, TemplateRequest};
use crate::script::ScriptTemplate;
use super::model::VideoConfig;
use super::options::{
    duration_label, CaptionAnimation, CaptionPosition, CaptionStyle, ColorFilter, HookIntensity,
    ImageMode, ImageStyle, MediaSource, Pacing, StoryType, VoiceEngine, VOICES,
};

fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&Serializer::new().serialize_maps_as_objects(true))
}

// =============================================================================
// ERROR CONVERSION
// =============================================================================

impl From<StudioError> for JsValue {
    fn from(err: StudioError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }
}

/// Parses an option id, converting failures to a JS error string.
macro_rules! js_option {
    ($ty:ty, $id:expr) => {
        $id.parse::<$ty>().map_err(|e: StudioError| JsValue::from(e))
    };
}

// =============================================================================
// MAIN WRAPPER TYPE
// =============================================================================

/// JavaScript-friendly wrapper around `VideoConfig`.
#[wasm_bindgen]
pub struct JsVideoConfig {
    inner: VideoConfig,
}

#[wasm_bindgen]
impl JsVideoConfig {
    /// Creates a config with the initial selections.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const config = new JsVideoConfig();
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsVideoConfig {
        JsVideoConfig {
            inner: VideoConfig::new(),
        }
    }

    /// The whole configuration as a JavaScript object.
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(&self.inner)?)
    }

    /// Quick-mode request body for the current configuration.
    #[wasm_bindgen(js_name = quickRequest)]
    pub fn quick_request(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(&QuickRequest::from_config(&self.inner))?)
    }

    /// Template-mode request body; `template` is the analyzer's response object.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const body = config.templateRequest(await analyzeResponse.json());
    /// ```
    #[wasm_bindgen(js_name = templateRequest)]
    pub fn template_request(&self, template: JsValue) -> Result<JsValue, JsValue> {
        let template: ScriptTemplate = from_value(template)?;
        Ok(to_js_value(&TemplateRequest::from_config(&self.inner, &template))?)
    }
}

// =============================================================================
// STORY SETTINGS
// =============================================================================

#[wasm_bindgen]
impl JsVideoConfig {
    #[wasm_bindgen(js_name = setTopic)]
    pub fn set_topic(&mut self, topic: &str) {
        self.inner.set_topic(topic);
    }

    /// Sets the story type by id.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// config.setStoryType('true_crime');
    /// ```
    #[wasm_bindgen(js_name = setStoryType)]
    pub fn set_story_type(&mut self, id: &str) -> Result<(), JsValue> {
        self.inner.set_story_type(js_option!(StoryType, id)?);
        Ok(())
    }

    #[wasm_bindgen(js_name = setHookIntensity)]
    pub fn set_hook_intensity(&mut self, id: &str) -> Result<(), JsValue> {
        self.inner.set_hook_intensity(js_option!(HookIntensity, id)?);
        Ok(())
    }

    #[wasm_bindgen(js_name = setPacing)]
    pub fn set_pacing(&mut self, id: &str) -> Result<(), JsValue> {
        self.inner.set_pacing(js_option!(Pacing, id)?);
        Ok(())
    }

    /// Sets the duration in minutes; returns the stored (clamped) value.
    #[wasm_bindgen(js_name = setDuration)]
    pub fn set_duration(&mut self, minutes: u32) -> u32 {
        self.inner.set_duration(minutes);
        self.inner.duration()
    }

    /// Sets the scene count; returns the stored (clamped) value.
    #[wasm_bindgen(js_name = setNumScenes)]
    pub fn set_num_scenes(&mut self, num: u32) -> u32 {
        self.inner.set_num_scenes(num);
        self.inner.num_scenes()
    }

    /// Label for the current duration ("Quick", "Medium", "Long" or "Epic").
    #[wasm_bindgen(js_name = durationLabel)]
    pub fn duration_label(&self) -> String {
        duration_label(self.inner.duration()).to_string()
    }

    /// Adds a character; returns false when five already exist.
    #[wasm_bindgen(js_name = addCharacter)]
    pub fn add_character(&mut self, name: &str, description: &str) -> bool {
        self.inner.add_character(name, description)
    }

    #[wasm_bindgen(js_name = updateCharacter)]
    pub fn update_character(&mut self, index: usize, name: &str, description: &str) {
        self.inner.update_character(index, name, description);
    }

    #[wasm_bindgen(js_name = removeCharacter)]
    pub fn remove_character(&mut self, index: usize) {
        self.inner.remove_character(index);
    }
}

// =============================================================================
// VISUAL AND VOICE SETTINGS
// =============================================================================

#[wasm_bindgen]
impl JsVideoConfig {
    #[wasm_bindgen(js_name = setImageStyle)]
    pub fn set_image_style(&mut self, id: &str) -> Result<(), JsValue> {
        self.inner.set_image_style(js_option!(ImageStyle, id)?);
        Ok(())
    }

    #[wasm_bindgen(js_name = setImageMode)]
    pub fn set_image_mode(&mut self, id: &str) -> Result<(), JsValue> {
        self.inner.set_image_mode(js_option!(ImageMode, id)?);
        Ok(())
    }

    #[wasm_bindgen(js_name = setColorFilter)]
    pub fn set_color_filter(&mut self, id: &str) -> Result<(), JsValue> {
        self.inner.set_color_filter(js_option!(ColorFilter, id)?);
        Ok(())
    }

    #[wasm_bindgen(js_name = setZoomEffect)]
    pub fn set_zoom_effect(&mut self, enabled: bool) {
        self.inner.set_zoom_effect(enabled);
    }

    #[wasm_bindgen(js_name = setGrainEffect)]
    pub fn set_grain_effect(&mut self, enabled: bool) {
        self.inner.set_grain_effect(enabled);
    }

    /// Selects a voice; catalog voices also switch the engine.
    #[wasm_bindgen(js_name = selectVoice)]
    pub fn select_voice(&mut self, voice_id: &str) {
        self.inner.select_voice(voice_id);
    }

    #[wasm_bindgen(js_name = setVoiceEngine)]
    pub fn set_voice_engine(&mut self, id: &str) -> Result<(), JsValue> {
        self.inner.set_voice_engine(js_option!(VoiceEngine, id)?);
        Ok(())
    }

    /// Sets narration speed; returns the stored (clamped) value.
    #[wasm_bindgen(js_name = setVoiceSpeed)]
    pub fn set_voice_speed(&mut self, speed: f32) -> f32 {
        self.inner.set_voice_speed(speed);
        self.inner.voice_speed()
    }
}

// =============================================================================
// MEDIA AND CAPTIONS
// =============================================================================

#[wasm_bindgen]
impl JsVideoConfig {
    #[wasm_bindgen(js_name = addStockKeyword)]
    pub fn add_stock_keyword(&mut self, keyword: &str) -> bool {
        self.inner.add_stock_keyword(keyword)
    }

    #[wasm_bindgen(js_name = removeStockKeyword)]
    pub fn remove_stock_keyword(&mut self, index: usize) {
        self.inner.remove_stock_keyword(index);
    }

    /// Current stock keywords as an array of strings.
    #[wasm_bindgen(js_name = stockKeywords)]
    pub fn stock_keywords(&self) -> Array {
        let array = Array::new();
        for keyword in self.inner.stock_keywords() {
            array.push(&JsValue::from_str(keyword));
        }
        array
    }

    /// Media source ids in priority order.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// config.mediaPriority(); // ['ai', 'stock', 'manual']
    /// ```
    #[wasm_bindgen(js_name = mediaPriority)]
    pub fn media_priority(&self) -> Array {
        let array = Array::new();
        for source in self.inner.media_priority().order() {
            array.push(&JsValue::from_str(source.id()));
        }
        array
    }

    #[wasm_bindgen(js_name = movePriorityUp)]
    pub fn move_priority_up(&mut self, index: usize) {
        self.inner.media_priority_mut().move_up(index);
    }

    #[wasm_bindgen(js_name = movePriorityDown)]
    pub fn move_priority_down(&mut self, index: usize) {
        self.inner.media_priority_mut().move_down(index);
    }

    /// Removes a priority entry; returns false when it is the last one.
    #[wasm_bindgen(js_name = removePriority)]
    pub fn remove_priority(&mut self, index: usize) -> bool {
        self.inner.media_priority_mut().remove(index)
    }

    #[wasm_bindgen(js_name = addPriority)]
    pub fn add_priority(&mut self, id: &str) -> Result<bool, JsValue> {
        let source = js_option!(MediaSource, id)?;
        Ok(self.inner.media_priority_mut().add(source))
    }

    #[wasm_bindgen(js_name = setAutoCaptions)]
    pub fn set_auto_captions(&mut self, enabled: bool) {
        self.inner.set_auto_captions(enabled);
    }

    #[wasm_bindgen(js_name = setCaptionEnabled)]
    pub fn set_caption_enabled(&mut self, enabled: bool) {
        self.inner.set_caption_enabled(enabled);
    }

    /// Sets the manual caption text and look.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// config.setCaption('Based on true events', 'horror', 'bottom', 'fade_in');
    /// ```
    #[wasm_bindgen(js_name = setCaption)]
    pub fn set_caption(
        &mut self,
        text: &str,
        style: &str,
        position: &str,
        animation: &str,
    ) -> Result<(), JsValue> {
        let style = js_option!(CaptionStyle, style)?;
        let position = js_option!(CaptionPosition, position)?;
        let animation = js_option!(CaptionAnimation, animation)?;
        self.inner.set_caption_text(text);
        self.inner.set_caption_style(style);
        self.inner.set_caption_position(position);
        self.inner.set_caption_animation(animation);
        Ok(())
    }
}

// =============================================================================
// OPTION TABLES
// =============================================================================

/// Returns an option table (`[{id, name, description}]`) by kind.
///
/// # Example (JavaScript)
/// ```js
/// const styles = optionTable('image_style');
/// ```
#[wasm_bindgen(js_name = optionTable)]
pub fn option_table(kind: &str) -> Result<JsValue, JsValue> {
    let table = match kind {
        "story_type" => StoryType::table(),
        "image_style" => ImageStyle::table(),
        "image_mode" => ImageMode::table(),
        "hook_intensity" => HookIntensity::table(),
        "pacing" => Pacing::table(),
        "color_filter" => ColorFilter::table(),
        "media_source" => MediaSource::table(),
        "caption_style" => CaptionStyle::table(),
        "caption_position" => CaptionPosition::table(),
        "caption_animation" => CaptionAnimation::table(),
        "voice_engine" => VoiceEngine::table(),
        other => return Err(JsValue::from_str(&format!("Unknown option table: {}", other))),
    };
    Ok(to_js_value(&table)?)
}

/// Returns the narrator voice catalog.
#[wasm_bindgen(js_name = voiceCatalog)]
pub fn voice_catalog() -> Result<JsValue, JsValue> {
    Ok(to_js_value(&VOICES)?)
}
