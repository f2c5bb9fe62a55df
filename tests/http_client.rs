//! HttpVideoApi and PexelsClient against a local fake backend.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use storyreel::settings::ApiSettings;
use storyreel::stock::{PexelsClient, StockFilter};
use storyreel::studio::MediaKind;
use storyreel::{
    ExampleScript, HttpVideoApi, QuickRequest, SessionController, SessionState, StudioError,
    TemplateRequest, VideoApi, VideoConfig,
};

#[derive(Clone, Default)]
struct Backend {
    bodies: Arc<Mutex<Vec<(String, Value)>>>,
    progress: Arc<Mutex<VecDeque<Value>>>,
}

impl Backend {
    fn with_progress(snapshots: Vec<Value>) -> Self {
        Self {
            progress: Arc::new(Mutex::new(snapshots.into())),
            ..Default::default()
        }
    }

    fn record(&self, route: &str, body: Value) {
        self.bodies.lock().unwrap().push((route.to_string(), body));
    }

    fn bodies_for(&self, route: &str) -> Vec<Value> {
        self.bodies
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| r == route)
            .map(|(_, b)| b.clone())
            .collect()
    }
}

async fn generate_ok(State(backend): State<Backend>, Json(body): Json<Value>) -> Json<Value> {
    backend.record("generate-video", body);
    Json(json!({"success": true, "message": "Generation started"}))
}

async fn template_ok(State(backend): State<Backend>, Json(body): Json<Value>) -> Json<Value> {
    backend.record("generate-with-template", body);
    Json(json!({"success": true, "message": "Template generation started"}))
}

async fn progress(State(backend): State<Backend>) -> Json<Value> {
    let next = backend.progress.lock().unwrap().pop_front();
    Json(next.unwrap_or_else(|| json!({"status": "idle", "progress": 0})))
}

async fn analyze(State(backend): State<Backend>, Json(body): Json<Value>) -> Json<Value> {
    backend.record("analyze-script", body);
    Json(json!({
        "hook_example": "Nobody heard the bell that night.",
        "hook_style": "mystery",
        "setup_length": 90,
        "rise_length": 240,
        "climax_length": 160,
        "end_length": 60,
        "tone": ["ominous"],
        "key_patterns": ["rhetorical questions"]
    }))
}

fn backend_router(backend: Backend) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(json!({"status": "ok"})) }))
        .route("/api/generate-video", post(generate_ok))
        .route("/api/generate-with-template", post(template_ok))
        .route("/api/progress", get(progress))
        .route("/api/analyze-script", post(analyze))
        .route(
            "/api/voices",
            get(|| async { Json(json!({"voices": [{"id": "af_bella"}]})) }),
        )
        .route(
            "/api/available-effects",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "effects offline") }),
        )
        .with_state(backend)
}

fn failing_router() -> Router {
    Router::new()
        .route(
            "/api/generate-video",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "GPU server offline") }),
        )
        .route(
            "/api/generate-with-template",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": "Template is missing hook_style"})),
                )
            }),
        )
        .route(
            "/api/progress",
            get(|| async { StatusCode::BAD_GATEWAY }),
        )
        .route(
            "/api/analyze-script",
            post(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({"error": "Could not detect structure"})),
                )
            }),
        )
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn long_script() -> ExampleScript {
    ExampleScript::from_text(
        "lighthouse",
        "The keeper logged every ship for forty years. Then, on a calm night in 1900, \
         the lamp went dark and three men disappeared without a trace.",
    )
    .unwrap()
}

fn template_config() -> VideoConfig {
    let mut config = VideoConfig::new().with_topic("Flannan Isles");
    config.set_auto_captions(true);
    config
}

#[tokio::test]
async fn health_reports_online_and_offline() {
    let base = serve(backend_router(Backend::default())).await;
    let api = HttpVideoApi::with_base_url(&base).unwrap();
    assert!(api.check_health().await);

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let api = HttpVideoApi::with_base_url(&dead).unwrap();
    assert!(!api.check_health().await);
}

#[tokio::test]
async fn quick_submission_sends_expected_body() {
    let backend = Backend::default();
    let base = serve(backend_router(backend.clone())).await;
    let api = HttpVideoApi::with_base_url(&base).unwrap();

    let config = VideoConfig::new()
        .with_topic("The lighthouse keeper")
        .with_character("Thomas", "60s, grey beard")
        .with_character("", "unnamed");
    let ack = api.submit_quick(&QuickRequest::from_config(&config)).await.unwrap();
    assert!(ack.success);
    assert_eq!(ack.message, "Generation started");

    let bodies = backend.bodies_for("generate-video");
    assert_eq!(bodies.len(), 1);
    let body = &bodies[0];
    assert_eq!(body["topic"], "The lighthouse keeper");
    assert_eq!(body["auto_captions"], Value::Bool(false));
    assert!(body.get("caption").is_none());
    assert_eq!(body["characters"], json!([{"name": "Thomas", "description": "60s, grey beard"}]));
    assert_eq!(body["voice_speed"], json!(1.0));
}

#[tokio::test]
async fn quick_submission_failure_carries_status_and_body() {
    let base = serve(failing_router()).await;
    let api = HttpVideoApi::with_base_url(&base).unwrap();

    let config = VideoConfig::new().with_topic("storm");
    let err = api.submit_quick(&QuickRequest::from_config(&config)).await.unwrap_err();
    match err {
        StudioError::SubmissionFailed { status, ref message } => {
            assert_eq!(status, Some(500));
            assert_eq!(message, "GPU server offline");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn template_submission_failure_uses_error_field() {
    let base = serve(failing_router()).await;
    let api = HttpVideoApi::with_base_url(&base).unwrap();
    let template = api_template();

    let err = api
        .submit_template(&TemplateRequest::from_config(&template_config(), &template))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Template is missing hook_style");
}

#[tokio::test]
async fn poll_failure_is_poll_error() {
    let base = serve(failing_router()).await;
    let api = HttpVideoApi::with_base_url(&base).unwrap();

    let err = api.poll_progress().await.unwrap_err();
    assert!(matches!(err, StudioError::PollFailed(_)));
    assert!(err.to_string().contains("502"));
}

#[tokio::test]
async fn auxiliary_endpoints() {
    let backend = Backend::default();
    let base = serve(backend_router(backend.clone())).await;
    let api = HttpVideoApi::with_base_url(&base).unwrap();

    let voices = api.list_voices().await.unwrap();
    assert_eq!(voices["voices"][0]["id"], "af_bella");

    match api.list_effects().await.unwrap_err() {
        StudioError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "effects offline");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let template = api.analyze_script(&long_script().with_script_type("mystery")).await.unwrap();
    assert_eq!(template.hook_style, "mystery");
    assert_eq!(template.key_patterns, vec!["rhetorical questions".to_string()]);
    assert_eq!(template.sentence_variation, "medium");

    let sent = backend.bodies_for("analyze-script");
    assert_eq!(sent[0]["scriptType"], "mystery");
    assert!(sent[0]["scriptContent"].as_str().unwrap().starts_with("The keeper"));
}

#[tokio::test]
async fn short_script_is_rejected_before_any_request() {
    let backend = Backend::default();
    let base = serve(backend_router(backend.clone())).await;
    let api = HttpVideoApi::with_base_url(&base).unwrap();

    let script = ExampleScript::from_text("short", "Too short to learn from.").unwrap();
    assert!(api.analyze_script(&script).await.unwrap_err().is_validation());
    assert!(backend.bodies_for("analyze-script").is_empty());
}

#[tokio::test]
async fn analyze_failure_uses_error_field() {
    let base = serve(failing_router()).await;
    let api = HttpVideoApi::with_base_url(&base).unwrap();

    match api.analyze_script(&long_script()).await.unwrap_err() {
        StudioError::Api { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "Could not detect structure");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

fn api_template() -> storyreel::ScriptTemplate {
    serde_json::from_value(json!({"hook_style": "mystery", "setup_length": 90})).unwrap()
}

#[tokio::test]
async fn session_runs_to_completion_over_http() {
    let backend = Backend::with_progress(vec![
        json!({"status": "writing_script", "progress": 10}),
        json!({"status": "generating_images", "progress": 35, "details": "Scene 3 of 10"}),
        json!({"status": "voice", "progress": 70.5}),
        json!({"status": "complete", "progress": 100, "video_path": "abc.mp4"}),
    ]);
    let base = serve(backend_router(backend.clone())).await;
    let settings = ApiSettings {
        base_url: base.clone(),
        poll_interval_ms: 20,
        ..ApiSettings::default()
    };
    let controller = SessionController::new(HttpVideoApi::new(&settings).unwrap(), &settings);
    let mut rx = controller.subscribe();

    controller
        .submit_template(&template_config(), Some(&api_template()))
        .await
        .unwrap();

    let session = tokio::time::timeout(
        Duration::from_secs(5),
        rx.wait_for(|s| s.state.is_terminal()),
    )
    .await
    .expect("session did not finish")
    .unwrap()
    .clone();

    assert_eq!(session.state, SessionState::Complete);
    let result = session.result.unwrap();
    assert_eq!(result.video_url, format!("{}/api/video/abc.mp4", base));
    assert_eq!(result.topic, "Flannan Isles");

    let bodies = backend.bodies_for("generate-with-template");
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["template"]["hookStyle"], "mystery");
    assert_eq!(bodies[0]["emotion_captions"], Value::Bool(true));
    assert_eq!(backend.progress.lock().unwrap().len(), 0);
}

#[tokio::test]
async fn stock_search_keeps_working_half() {
    let seen_auth: Arc<Mutex<Vec<String>>> = Arc::default();
    let auth = seen_auth.clone();
    let router = Router::new()
        .route(
            "/v1/search",
            get(move |headers: HeaderMap| {
                let auth = auth.clone();
                async move {
                    if let Some(value) = headers.get("authorization") {
                        auth.lock().unwrap().push(value.to_str().unwrap().to_string());
                    }
                    Json(json!({
                        "photos": [{
                            "id": 11,
                            "photographer": "Mara",
                            "src": {"medium": "m.jpg", "large2x": "l.jpg"}
                        }]
                    }))
                    .into_response()
                }
            }),
        )
        .route(
            "/videos/search",
            get(|| async { (StatusCode::TOO_MANY_REQUESTS, "rate limited") }),
        );
    let base = serve(router).await;
    let client = PexelsClient::with_base_url(&base, "test-key").unwrap();

    let items = client.search("fog", StockFilter::Both).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].kind, MediaKind::Image);
    assert_eq!(items[0].large_url.as_deref(), Some("l.jpg"));
    assert_eq!(seen_auth.lock().unwrap().as_slice(), ["test-key".to_string()]);

    assert!(client.search_videos("fog").await.is_err());
}
