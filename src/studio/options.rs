//! Declarative option tables for every closed selection in the configuration.
//!
//! Each table is generated by `option_set!`, which produces an enum whose
//! serde representation is the backend id, plus `ALL`, `id()`, `name()`,
//! `description()` and `table()` for presentation layers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StudioError;

/// A single row of an option table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

// =============================================================================
// OPTION SET MACRO
// =============================================================================

/// Generates a closed option enum with its id/name/description table.
macro_rules! option_set {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal), default = $default:ident {
            $( $variant:ident => ($id:literal, $label:literal, $desc:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $id)]
                $variant,
            )+
        }

        impl $name {
            /// Every option, in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Backend identifier.
            pub fn id(self) -> &'static str {
                match self {
                    $($name::$variant => $id,)+
                }
            }

            /// Human-readable name.
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// One-line description.
            pub fn description(self) -> &'static str {
                match self {
                    $($name::$variant => $desc,)+
                }
            }

            /// Table row for this option.
            pub fn spec(self) -> OptionSpec {
                OptionSpec {
                    id: self.id(),
                    name: self.name(),
                    description: self.description(),
                }
            }

            /// The whole option table.
            pub fn table() -> Vec<OptionSpec> {
                Self::ALL.iter().map(|option| option.spec()).collect()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.id())
            }
        }

        impl FromStr for $name {
            type Err = StudioError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($id => Ok($name::$variant),)+
                    other => Err(StudioError::unknown_option($kind, other)),
                }
            }
        }
    };
}

// =============================================================================
// STORY
// =============================================================================

option_set! {
    /// Narrative genre of the story.
    StoryType("story type"), default = ScaryHorror {
        EmotionalHeartwarming => ("emotional_heartwarming", "Emotional & Heartwarming", "Stories that touch the heart and inspire"),
        ScaryHorror => ("scary_horror", "Scary & Horror", "Terrifying stories that keep you up at night"),
        SurprisingTwist => ("surprising_twist", "Surprising Twist", "Mind-bending stories with unexpected endings"),
        TragicSad => ("tragic_sad", "Tragic & Sad", "Heart-breaking stories of loss and struggle"),
        MotivationalInspiring => ("motivational_inspiring", "Motivational & Inspiring", "Stories of triumph against all odds"),
        TrueCrime => ("true_crime", "True Crime", "Real criminal cases and investigations"),
        MysteryThriller => ("mystery_thriller", "Mystery & Thriller", "Puzzles, suspects and slow reveals"),
        HistoricalDocumentary => ("historical_documentary", "Historical Documentary", "Researched accounts of real events"),
        SupernaturalParanormal => ("supernatural_paranormal", "Supernatural & Paranormal", "Ghosts, hauntings and the unexplained"),
        AdventureSurvival => ("adventure_survival", "Adventure & Survival", "Against nature, against the odds"),
        SciFiFuture => ("sci_fi_future", "Sci-Fi & Future", "Technology, space and tomorrow"),
        FantasyMagical => ("fantasy_magical", "Fantasy & Magical", "Myths, magic and other worlds"),
        ComedyFunny => ("comedy_funny", "Comedy & Funny", "Light-hearted and absurd"),
        RomanticLove => ("romantic_love", "Romantic & Love", "Connection, longing and devotion"),
        WarMilitary => ("war_military", "War & Military", "Battles, soldiers and sacrifice"),
        BiographicalLife => ("biographical_life", "Biographical", "The life of a real person"),
        ConspiracyMystery => ("conspiracy_mystery", "Conspiracy", "Hidden truths and cover-ups"),
        AnimeStyle => ("anime_style", "Anime Style", "Dramatic anime-inspired storytelling"),
        PsychologicalMind => ("psychological_mind", "Psychological", "Inside the mind, unreliable narrators"),
        NatureWildlife => ("nature_wildlife", "Nature & Wildlife", "The animal kingdom and the wild"),
    }
}

option_set! {
    /// Opening hook strength.
    HookIntensity("hook intensity"), default = Medium {
        Mild => ("mild", "Mild", "Gentle curiosity opener"),
        Medium => ("medium", "Medium", "Clear intrigue in the first lines"),
        Extreme => ("extreme", "Extreme", "Shock opener that demands attention"),
    }
}

option_set! {
    /// Narrative pacing.
    Pacing("pacing"), default = Medium {
        Slow => ("slow", "Slow", "Atmospheric slow burn"),
        Medium => ("medium", "Medium", "Balanced scene lengths"),
        Fast => ("fast", "Fast", "Quick cuts and momentum"),
        Dynamic => ("dynamic", "Dynamic", "Varies with the story beats"),
    }
}

// =============================================================================
// VISUALS
// =============================================================================

option_set! {
    /// Look of AI-generated images.
    ImageStyle("image style"), default = Cinematic {
        Cinematic => ("cinematic", "Cinematic", "Film-like lighting and composition"),
        CinematicFilm => ("cinematic_film", "Cinematic Film", "Analog film grain and color"),
        DocumentaryReal => ("documentary_real", "Documentary", "Photorealistic documentary frames"),
        DarkNoir => ("dark_noir", "Dark Noir", "High contrast shadows"),
        HorrorCreepy => ("horror_creepy", "Horror", "Eerie unsettling imagery"),
        AnimeStyle => ("anime_style", "Anime", "Vibrant anime illustration"),
        ComicBook => ("comic_book", "Comic Book", "Inked panels and bold color"),
        OilPainting => ("oil_painting", "Oil Painting", "Classical painted texture"),
        HistoricalPhoto => ("historical_photo", "Historical Photo", "Aged archival photography"),
        SciFiFuture => ("sci_fi_future", "Sci-Fi", "Futuristic neon worlds"),
        FantasyEpic => ("fantasy_epic", "Fantasy Epic", "Grand magical vistas"),
        SketchDrawing => ("sketch_drawing", "Sketch", "Pencil line drawings"),
        Watercolor => ("watercolor", "Watercolor", "Soft washes of color"),
        RetroVintage => ("retro_vintage", "Retro Vintage", "Faded retro palette"),
    }
}

option_set! {
    /// Where the visual slots of a video are sourced from.
    ImageMode("image mode"), default = AiOnly {
        AiOnly => ("ai_only", "AI Only", "100% AI-generated images"),
        ManualOnly => ("manual_only", "Manual Only", "100% your own uploads"),
        StockOnly => ("stock_only", "Stock Only", "100% stock photos and clips"),
        AiManual => ("ai_manual", "AI + Manual", "Mix AI images with your uploads"),
        AiStock => ("ai_stock", "AI + Stock", "Mix AI images with stock media"),
        ManualStock => ("manual_stock", "Manual + Stock", "Mix your uploads with stock media"),
        AllMix => ("all_mix", "All Sources", "AI, uploads and stock combined"),
    }
}

impl ImageMode {
    /// Whether the mode consumes user uploads.
    pub fn uses_manual(self) -> bool {
        matches!(
            self,
            ImageMode::ManualOnly | ImageMode::AiManual | ImageMode::ManualStock | ImageMode::AllMix
        )
    }

    /// Whether the mode consumes stock media.
    pub fn uses_stock(self) -> bool {
        matches!(
            self,
            ImageMode::StockOnly | ImageMode::AiStock | ImageMode::ManualStock | ImageMode::AllMix
        )
    }
}

option_set! {
    /// Color grade applied to the final video.
    ColorFilter("color filter"), default = None {
        None => ("none", "None", "Original colors"),
        Cinematic => ("cinematic", "Cinematic", "Professional cinema look"),
        Warm => ("warm", "Warm", "Cozy warm tones"),
        Cool => ("cool", "Cool", "Blue professional look"),
        Vibrant => ("vibrant", "Vibrant", "Pop and energy"),
        Vintage => ("vintage", "Vintage", "Nostalgic retro feel"),
        Noir => ("noir", "Noir", "Black and white drama"),
        Dramatic => ("dramatic", "Dramatic", "High contrast mood"),
        Horror => ("horror", "Horror", "Dark and eerie"),
        Anime => ("anime", "Anime", "Vibrant anime style"),
    }
}

option_set! {
    /// Media source kinds used by the media priority list.
    MediaSource("media source"), default = Ai {
        Ai => ("ai", "AI Generated", "SDXL-Turbo GPU images"),
        Stock => ("stock", "Stock Media", "Pexels professional media"),
        Manual => ("manual", "Manual Uploads", "Your own images/videos"),
    }
}

// =============================================================================
// CAPTIONS
// =============================================================================

option_set! {
    /// Visual style of manual captions.
    CaptionStyle("caption style"), default = Simple {
        Simple => ("simple", "Simple", "White with black outline"),
        Bold => ("bold", "Bold", "Large bold text"),
        Minimal => ("minimal", "Minimal", "Clean subtle look"),
        Cinematic => ("cinematic", "Cinematic", "Professional cinema"),
        Horror => ("horror", "Horror", "Red dramatic text"),
        Elegant => ("elegant", "Elegant", "Sophisticated style"),
    }
}

option_set! {
    /// Vertical placement of manual captions.
    CaptionPosition("caption position"), default = Bottom {
        Bottom => ("bottom", "Bottom", "Lower third"),
        Top => ("top", "Top", "Upper third"),
        Center => ("center", "Center", "Middle of the frame"),
    }
}

option_set! {
    /// Entrance/exit animation of manual captions.
    CaptionAnimation("caption animation"), default = FadeIn {
        None => ("none", "None", "Static text"),
        FadeIn => ("fade_in", "Fade In", "Smooth appearance"),
        FadeOut => ("fade_out", "Fade Out", "Smooth disappearance"),
        SlideUp => ("slide_up", "Slide Up", "Slide from bottom"),
    }
}

// =============================================================================
// VOICES
// =============================================================================

option_set! {
    /// Speech synthesis backend.
    VoiceEngine("voice engine"), default = Kokoro {
        Kokoro => ("kokoro", "Kokoro", "Local neural TTS"),
        Edge => ("edge", "Edge", "Microsoft Edge online voices"),
    }
}

/// A narrator voice from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoiceOption {
    pub id: &'static str,
    pub name: &'static str,
    pub gender: &'static str,
    pub style: &'static str,
    pub engine: VoiceEngine,
}

const fn voice(
    id: &'static str,
    name: &'static str,
    gender: &'static str,
    style: &'static str,
    engine: VoiceEngine,
) -> VoiceOption {
    VoiceOption {
        id,
        name,
        gender,
        style,
        engine,
    }
}

/// Narrator voice catalog.
pub const VOICES: &[VoiceOption] = &[
    voice("af_bella", "Bella", "Female", "Natural & Warm", VoiceEngine::Kokoro),
    voice("aria", "Aria (Bella)", "Female", "Natural & Warm", VoiceEngine::Edge),
    voice("sarah_pro", "Sarah", "Female", "Professional", VoiceEngine::Edge),
    voice("nicole", "Nicole", "Female", "Cheerful & Clear", VoiceEngine::Edge),
    voice("jenny", "Jenny", "Female", "Young & Energetic", VoiceEngine::Edge),
    voice("sara", "Sara", "Female", "Natural", VoiceEngine::Edge),
    voice("emma", "Emma", "Female", "British Accent", VoiceEngine::Edge),
    voice("guy", "Guy (Adam)", "Male", "Natural & Clear", VoiceEngine::Edge),
    voice("adam_narration", "Adam", "Male", "Professional Narration", VoiceEngine::Edge),
    voice("michael", "Michael", "Male", "Warm & Friendly", VoiceEngine::Edge),
    voice("brian", "Brian", "Male", "Casual", VoiceEngine::Edge),
    voice("andrew", "Andrew", "Male", "Professional", VoiceEngine::Edge),
    voice("christopher", "Christopher", "Male", "Friendly", VoiceEngine::Edge),
    voice("george", "George", "Male", "British Accent", VoiceEngine::Edge),
];

/// Looks up a catalog voice by id.
pub fn voice_by_id(id: &str) -> Option<&'static VoiceOption> {
    VOICES.iter().find(|v| v.id == id)
}

// =============================================================================
// DURATION
// =============================================================================

/// Narration words per minute used for length estimates.
pub const WORDS_PER_MINUTE: u32 = 150;

/// Length bucket label for a duration in minutes.
pub fn duration_label(minutes: u32) -> &'static str {
    match minutes {
        0..=5 => "Quick",
        6..=15 => "Medium",
        16..=30 => "Long",
        _ => "Epic",
    }
}

/// Approximate script length for a duration.
pub fn estimated_words(minutes: u32) -> u32 {
    minutes * WORDS_PER_MINUTE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_ids_round_trip_through_from_str() {
        for style in ImageStyle::ALL {
            assert_eq!(style.id().parse::<ImageStyle>().unwrap(), *style);
        }
        assert!("glitter".parse::<ColorFilter>().is_err());
    }

    #[test]
    fn test_serde_uses_backend_ids() {
        let json = serde_json::to_string(&CaptionAnimation::FadeIn).unwrap();
        assert_eq!(json, "\"fade_in\"");
        let mode: ImageMode = serde_json::from_str("\"all_mix\"").unwrap();
        assert_eq!(mode, ImageMode::AllMix);
    }

    #[test]
    fn test_defaults_match_initial_selection() {
        assert_eq!(StoryType::default().id(), "scary_horror");
        assert_eq!(ImageStyle::default().id(), "cinematic");
        assert_eq!(ImageMode::default().id(), "ai_only");
        assert_eq!(ColorFilter::default().id(), "none");
        assert_eq!(StoryType::table().len(), 20);
        assert_eq!(ImageMode::table().len(), 7);
    }

    #[test]
    fn test_image_mode_sources() {
        assert!(!ImageMode::AiOnly.uses_manual());
        assert!(!ImageMode::AiOnly.uses_stock());
        assert!(ImageMode::AllMix.uses_manual() && ImageMode::AllMix.uses_stock());
        assert!(ImageMode::ManualStock.uses_stock());
        assert!(ImageMode::AiManual.uses_manual());
    }

    #[test]
    fn test_duration_labels() {
        assert_eq!(duration_label(1), "Quick");
        assert_eq!(duration_label(15), "Medium");
        assert_eq!(duration_label(16), "Long");
        assert_eq!(duration_label(60), "Epic");
        assert_eq!(estimated_words(5), 750);
    }

    #[test]
    fn test_voice_lookup() {
        assert_eq!(voice_by_id("george").unwrap().engine, VoiceEngine::Edge);
        assert_eq!(voice_by_id("af_bella").unwrap().engine, VoiceEngine::Kokoro);
        assert!(voice_by_id("nobody").is_none());
    }
}
