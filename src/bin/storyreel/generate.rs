//! `storyreel generate`: build a config from flags, submit, and follow progress.

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;

use storyreel::session::SessionController;
use storyreel::studio::options::{
    CaptionAnimation, CaptionPosition, CaptionStyle, ColorFilter, HookIntensity, ImageMode,
    ImageStyle, MediaSource, Pacing, StoryType,
};
use storyreel::{
    ExampleScript, GalleryStore, HttpVideoApi, JsonGallery, SessionState, Settings, VideoApi,
    VideoConfig,
};

#[derive(Args)]
pub struct GenerateArgs {
    /// Story topic
    #[arg(short = 't', long)]
    topic: String,

    /// Example script to analyze; switches to template mode
    #[arg(long)]
    template: Option<PathBuf>,

    #[arg(long, default_value_t = StoryType::default())]
    story_type: StoryType,

    #[arg(long, default_value_t = ImageStyle::default())]
    image_style: ImageStyle,

    #[arg(long, default_value_t = ImageMode::default())]
    image_mode: ImageMode,

    /// Voice id (catalog voices also pick the engine)
    #[arg(long, default_value = "af_bella")]
    voice: String,

    /// Narration speed, 0.5 to 2.0
    #[arg(long, default_value_t = 1.0)]
    speed: f32,

    /// Duration in minutes, 1 to 60
    #[arg(short = 'd', long, default_value_t = 5)]
    duration: u32,

    /// Scene count, 5 to 20
    #[arg(long, default_value_t = 10)]
    scenes: u32,

    #[arg(long, default_value_t = HookIntensity::default())]
    hook: HookIntensity,

    #[arg(long, default_value_t = Pacing::default())]
    pacing: Pacing,

    #[arg(long, default_value_t = ColorFilter::default())]
    filter: ColorFilter,

    #[arg(long)]
    zoom: bool,

    /// Film grain (kept in the local config; not sent to the backend)
    #[arg(long)]
    grain: bool,

    /// Captions generated from the script
    #[arg(long, conflicts_with = "caption")]
    auto_captions: bool,

    /// A single manual caption
    #[arg(long)]
    caption: Option<String>,

    #[arg(long, default_value_t = CaptionStyle::default())]
    caption_style: CaptionStyle,

    #[arg(long, default_value_t = CaptionPosition::default())]
    caption_position: CaptionPosition,

    #[arg(long, default_value_t = CaptionAnimation::default())]
    caption_animation: CaptionAnimation,

    /// Character as "Name: description" (repeatable, up to 5)
    #[arg(long = "character")]
    characters: Vec<String>,

    /// Stock search keyword (repeatable)
    #[arg(short = 'k', long = "keyword")]
    keywords: Vec<String>,

    /// Uploaded image or clip (repeatable; local config only, not sent to the backend)
    #[arg(long = "media")]
    media: Vec<PathBuf>,

    /// Media source order, e.g. "stock,ai" (local config only, not sent to the backend)
    #[arg(long, value_delimiter = ',')]
    priority: Vec<MediaSource>,
}

impl GenerateArgs {
    /// Flags that are set but have no field in either request body.
    fn local_only_flags(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.grain {
            flags.push("--grain");
        }
        if !self.media.is_empty() {
            flags.push("--media");
        }
        if !self.priority.is_empty() {
            flags.push("--priority");
        }
        flags
    }

    fn to_config(&self) -> anyhow::Result<VideoConfig> {
        for flag in self.local_only_flags() {
            tracing::warn!(flag, "the backend does not accept this setting; it is ignored for generation");
        }
        let mut config = VideoConfig::new()
            .with_topic(self.topic.clone())
            .with_story_type(self.story_type)
            .with_duration(self.duration);
        config.set_image_style(self.image_style);
        config.set_image_mode(self.image_mode);
        config.select_voice(&self.voice);
        config.set_voice_speed(self.speed);
        config.set_num_scenes(self.scenes);
        config.set_hook_intensity(self.hook);
        config.set_pacing(self.pacing);
        config.set_color_filter(self.filter);
        config.set_zoom_effect(self.zoom);
        config.set_grain_effect(self.grain);
        config.set_auto_captions(self.auto_captions);

        if let Some(text) = &self.caption {
            config.set_caption_enabled(true);
            config.set_caption_text(text.clone());
            config.set_caption_style(self.caption_style);
            config.set_caption_position(self.caption_position);
            config.set_caption_animation(self.caption_animation);
        }

        for spec in &self.characters {
            let (name, description) = spec.split_once(':').unwrap_or((spec.as_str(), ""));
            if !config.add_character(name.trim(), description.trim()) {
                tracing::warn!(character = %spec, "character limit reached, ignoring");
            }
        }
        for keyword in &self.keywords {
            config.add_stock_keyword(keyword);
        }
        for path in &self.media {
            config
                .add_manual_media(path.clone())
                .with_context(|| format!("cannot use {}", path.display()))?;
        }
        if !self.priority.is_empty() {
            config.media_priority_mut().set_order(self.priority.clone());
        }

        Ok(config)
    }
}

pub async fn run(api: HttpVideoApi, settings: &Settings, args: GenerateArgs) -> anyhow::Result<()> {
    let config = args.to_config()?;

    let template = match &args.template {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let script = ExampleScript::from_file(path, content)?;
            println!("Analyzing {}...", script.name);
            Some(api.analyze_script(&script).await.context("analysis failed")?)
        }
        None => None,
    };

    let controller = match &settings.gallery.path {
        Some(path) => {
            let gallery: Arc<dyn GalleryStore> = Arc::new(JsonGallery::new(path.clone()));
            SessionController::with_gallery(api, &settings.api, gallery)
        }
        None => SessionController::new(api, &settings.api),
    };
    let mut rx = controller.subscribe();

    println!(
        "Generating \"{}\" ({} min, {} scenes)...",
        config.topic(),
        config.duration(),
        config.num_scenes()
    );
    match &template {
        Some(t) => controller.submit_template(&config, Some(t)).await?,
        None => controller.submit_quick(&config).await?,
    }

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
            .context("invalid progress template")?
            .progress_chars("=>-"),
    );

    let session = loop {
        {
            let session = rx.borrow_and_update();
            if let Some(progress) = &session.progress {
                pb.set_position(progress.progress.clamp(0.0, 100.0) as u64);
                let msg = match (&progress.substatus, &progress.details) {
                    (_, Some(details)) => format!("{} - {}", progress.status, details),
                    (Some(sub), None) => format!("{} - {}", progress.status, sub),
                    (None, None) => progress.status.clone(),
                };
                pb.set_message(msg);
            }
            if !session.is_active() {
                break session.clone();
            }
        }
        rx.changed().await?;
    };

    match session.state {
        SessionState::Complete => {
            pb.finish_with_message("Done");
            if let Some(result) = session.result {
                println!("\nVideo ready: {}", result.video_url);
                println!("  Topic:    {}", result.topic);
                println!("  Duration: {}", result.duration_text());
                println!("  Style:    {} / {}", result.story_type.name(), result.image_style.name());
                println!("  Voice:    {}", result.voice_id);
                println!("  Scenes:   {}", result.scene_count);
            }
            // Let the gallery write land before the runtime shuts down.
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            Ok(())
        }
        _ => {
            pb.abandon_with_message("Failed");
            let message = session.error.unwrap_or_else(|| "Generation failed".to_string());
            anyhow::bail!(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: GenerateArgs,
    }

    fn parse(argv: &[&str]) -> GenerateArgs {
        let mut full = vec!["storyreel", "--topic", "Roanoke"];
        full.extend_from_slice(argv);
        Harness::try_parse_from(full).unwrap().args
    }

    #[test]
    fn test_local_only_flags_are_reported() {
        assert!(parse(&[]).local_only_flags().is_empty());

        let args = parse(&["--grain", "--media", "clips/storm.mp4", "--priority", "stock,ai"]);
        assert_eq!(args.local_only_flags(), vec!["--grain", "--media", "--priority"]);

        let config = args.to_config().unwrap();
        assert!(config.grain_effect());
        assert_eq!(config.manual_media().len(), 1);
        assert_eq!(config.media_priority().order(), &[MediaSource::Stock, MediaSource::Ai]);
    }

    #[test]
    fn test_caption_flags_build_manual_caption() {
        let config = parse(&["--caption", "Based on true events", "-d", "90"])
            .to_config()
            .unwrap();
        assert!(config.caption().enabled);
        assert!(!config.auto_captions());
        assert_eq!(config.duration(), 60);
    }
}
