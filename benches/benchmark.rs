//! Benchmarks for request building and progress merging.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use storyreel::session::SubmittedConfig;
use storyreel::{
    GenerationMode, GenerationSession, ProgressSnapshot, QuickRequest, ScriptTemplate,
    TemplateRequest, VideoConfig, VideoResult,
};

fn full_config() -> VideoConfig {
    let mut config = VideoConfig::new()
        .with_topic("The lighthouse keepers of Flannan Isles")
        .with_duration(12)
        .with_character("Thomas", "60s, grey beard, oilskin coat")
        .with_character("James", "30s, clean shaven, wool sweater")
        .with_character("Donald", "40s, red hair, captain's hat");
    for keyword in ["lighthouse", "storm", "island", "fog"] {
        config.add_stock_keyword(keyword);
    }
    config.set_caption_enabled(true);
    config.set_caption_text("Based on true events");
    config
}

fn bench_config_edits(c: &mut Criterion) {
    c.bench_function("config_edits", |b| {
        let mut config = VideoConfig::new();
        let mut i = 0u32;
        b.iter(|| {
            config.set_voice_speed(black_box(i as f32 * 0.1));
            config.set_duration(black_box(i % 80));
            config.set_num_scenes(black_box(i % 25));
            config.set_auto_captions(i % 2 == 0);
            i += 1;
        })
    });
}

fn bench_quick_request(c: &mut Criterion) {
    let config = full_config();
    c.bench_function("quick_request_build", |b| {
        b.iter(|| black_box(QuickRequest::from_config(black_box(&config))))
    });
    c.bench_function("quick_request_serialize", |b| {
        b.iter(|| {
            let request = QuickRequest::from_config(&config);
            black_box(serde_json::to_vec(&request).unwrap())
        })
    });
}

fn bench_template_request(c: &mut Criterion) {
    let config = full_config();
    let template: ScriptTemplate = serde_json::from_value(serde_json::json!({
        "hook_example": "Nobody heard the bell that night.",
        "hook_style": "mystery",
        "setup_length": 90,
        "rise_length": 240,
        "climax_length": 160,
        "end_length": 60,
        "tone": ["ominous", "quiet"],
        "key_patterns": ["rhetorical questions", "short sentences"]
    }))
    .unwrap();
    c.bench_function("template_request_serialize", |b| {
        b.iter(|| {
            let request = TemplateRequest::from_config(&config, &template);
            black_box(serde_json::to_vec(&request).unwrap())
        })
    });
}

fn bench_snapshot_decode(c: &mut Criterion) {
    let body = br#"{"status":"generating_images","progress":42,"substatus":"sdxl","details":"Scene 4 of 10","video_path":null,"error":null}"#;
    c.bench_function("snapshot_decode", |b| {
        b.iter(|| black_box(serde_json::from_slice::<ProgressSnapshot>(black_box(body)).unwrap()))
    });
}

fn bench_apply_snapshots(c: &mut Criterion) {
    let submitted = SubmittedConfig::from(&full_config());
    let mut group = c.benchmark_group("apply_snapshots");
    for count in [10usize, 100, 1000] {
        let snapshots: Vec<ProgressSnapshot> = (0..count)
            .map(|i| {
                // Every fifth report goes backwards and is dropped.
                let pct = if i % 5 == 4 { i as f32 / 2.0 } else { i as f32 };
                ProgressSnapshot::new("running", pct * 100.0 / count as f32)
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(count), &snapshots, |b, snapshots| {
            b.iter(|| {
                let mut session = GenerationSession::new();
                session.begin(GenerationMode::Quick);
                session.acknowledge();
                for snapshot in snapshots {
                    session.apply_snapshot(snapshot.clone(), |path| {
                        VideoResult::new(path, String::new(), &submitted)
                    });
                }
                let done = ProgressSnapshot::new("complete", 100.0).with_video_path("abc.mp4");
                session.apply_snapshot(done, |path| {
                    VideoResult::new(path, format!("http://localhost:5000/api/video/{}", path), &submitted)
                });
                black_box(session)
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_config_edits,
    bench_quick_request,
    bench_template_request,
    bench_snapshot_decode,
    bench_apply_snapshots,
);

criterion_main!(benches);
