//! Session controller: submission, progress polling and cancellation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use super::state::{
    GenerationMode, GenerationSession, SnapshotOutcome, SubmittedConfig, VideoResult,
};
use crate::api::VideoApi;
use crate::error::{StudioError, StudioResult};
use crate::gallery::{GalleryEntry, GalleryStore};
use crate::request::{QuickRequest, TemplateRequest};
use crate::script::ScriptTemplate;
use crate::settings::ApiSettings;
use crate::studio::model::VideoConfig;

/// Shown when a submission has no topic.
pub const MSG_TOPIC_REQUIRED: &str = "Please enter a story topic";
/// Shown when a template submission has no template.
pub const MSG_TEMPLATE_REQUIRED: &str = "Please load a template first";
/// Shown when a submission arrives while another run is active.
pub const MSG_ALREADY_RUNNING: &str = "A generation is already in progress";
/// Recorded when a submission future is dropped before the backend answered.
pub const MSG_SUBMIT_CANCELLED: &str = "Submission cancelled";

/// A validated submission ready to send.
enum Submission {
    Quick(QuickRequest),
    Template(TemplateRequest),
}

impl Submission {
    fn mode(&self) -> GenerationMode {
        match self {
            Submission::Quick(_) => GenerationMode::Quick,
            Submission::Template(_) => GenerationMode::Template,
        }
    }
}

struct Shared<A> {
    api: A,
    state: watch::Sender<GenerationSession>,
    /// Bumped on every new run and every reset; writes from older runs are dropped.
    epoch: AtomicU64,
    cancel: Mutex<Option<watch::Sender<bool>>>,
    gallery: Option<Arc<dyn GalleryStore>>,
    poll_interval: Duration,
    submit_timeout: Duration,
    poll_timeout: Duration,
}

impl<A> Shared<A> {
    fn current_epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Signals the running poll task, if any, to stop.
    fn cancel_polling(&self) {
        let previous = match self.cancel.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(tx) = previous {
            let _ = tx.send(true);
        }
    }

    /// Applies `f` only if `epoch` is still the current run.
    fn update_if_current<F>(&self, epoch: u64, f: F) -> bool
    where
        F: FnOnce(&mut GenerationSession) -> bool,
    {
        self.state.send_if_modified(|session| {
            if self.current_epoch() != epoch {
                return false;
            }
            f(session)
        })
    }
}

/// Fails the run it guards unless disarmed, so a dropped submission future
/// never leaves the session stuck in `Generating`.
struct SubmitGuard<'a, A> {
    shared: &'a Shared<A>,
    epoch: u64,
    armed: bool,
}

impl<A> SubmitGuard<'_, A> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<A> Drop for SubmitGuard<'_, A> {
    fn drop(&mut self) {
        if self.armed
            && self
                .shared
                .update_if_current(self.epoch, |session| session.fail(MSG_SUBMIT_CANCELLED))
        {
            tracing::warn!(epoch = self.epoch, "submission dropped before completion");
        }
    }
}

/// Drives one generation session at a time against a [`VideoApi`].
///
/// State is published through a watch channel; call [`subscribe`](Self::subscribe)
/// to observe every transition. Dropping the controller stops any polling.
pub struct SessionController<A: VideoApi + 'static> {
    shared: Arc<Shared<A>>,
}

impl<A: VideoApi + 'static> SessionController<A> {
    /// Creates a controller without a gallery.
    pub fn new(api: A, settings: &ApiSettings) -> Self {
        Self::build(api, settings, None)
    }

    /// Creates a controller that records finished videos in `gallery`.
    pub fn with_gallery(api: A, settings: &ApiSettings, gallery: Arc<dyn GalleryStore>) -> Self {
        Self::build(api, settings, Some(gallery))
    }

    fn build(api: A, settings: &ApiSettings, gallery: Option<Arc<dyn GalleryStore>>) -> Self {
        let (state, _) = watch::channel(GenerationSession::new());
        Self {
            shared: Arc::new(Shared {
                api,
                state,
                epoch: AtomicU64::new(0),
                cancel: Mutex::new(None),
                gallery,
                poll_interval: settings.poll_interval(),
                submit_timeout: settings.submit_timeout(),
                poll_timeout: settings.poll_timeout(),
            }),
        }
    }

    /// The API client this controller talks to.
    pub fn api(&self) -> &A {
        &self.shared.api
    }

    /// A receiver that sees every state change.
    pub fn subscribe(&self) -> watch::Receiver<GenerationSession> {
        self.shared.state.subscribe()
    }

    /// Copy of the current session.
    pub fn snapshot(&self) -> GenerationSession {
        self.shared.state.borrow().clone()
    }

    /// Submits a quick-mode generation.
    ///
    /// Returns `Err` only when the submission is rejected locally; network and
    /// backend failures land in the session's `Error` state instead.
    pub async fn submit_quick(&self, config: &VideoConfig) -> StudioResult<()> {
        if !config.has_topic() {
            tracing::warn!("submission rejected: empty topic");
            return Err(StudioError::validation(MSG_TOPIC_REQUIRED));
        }
        let request = QuickRequest::from_config(config);
        self.run(Submission::Quick(request), SubmittedConfig::from(config))
            .await
    }

    /// Submits a template-mode generation using a previously extracted template.
    pub async fn submit_template(
        &self,
        config: &VideoConfig,
        template: Option<&ScriptTemplate>,
    ) -> StudioResult<()> {
        if !config.has_topic() {
            tracing::warn!("submission rejected: empty topic");
            return Err(StudioError::validation(MSG_TOPIC_REQUIRED));
        }
        let template = match template {
            Some(t) => t,
            None => {
                tracing::warn!("submission rejected: no template loaded");
                return Err(StudioError::validation(MSG_TEMPLATE_REQUIRED));
            }
        };
        let request = TemplateRequest::from_config(config, template);
        self.run(Submission::Template(request), SubmittedConfig::from(config))
            .await
    }

    /// Returns to `Idle`, abandoning any in-flight run.
    pub fn reset(&self) {
        self.shared.epoch.fetch_add(1, Ordering::SeqCst);
        self.shared.cancel_polling();
        self.shared.state.send_modify(GenerationSession::reset);
        tracing::info!("session reset");
    }

    /// Clears the error message, keeping the state.
    pub fn dismiss_error(&self) {
        self.shared
            .state
            .send_if_modified(GenerationSession::dismiss_error);
    }

    async fn run(&self, submission: Submission, submitted: SubmittedConfig) -> StudioResult<()> {
        let mode = submission.mode();
        let shared = &self.shared;

        // The active check and the transition happen under the channel lock.
        let mut epoch = 0;
        let started = shared.state.send_if_modified(|session| {
            if !session.begin(mode) {
                return false;
            }
            epoch = shared.epoch.fetch_add(1, Ordering::SeqCst) + 1;
            true
        });
        if !started {
            tracing::warn!(?mode, "submission rejected: generation already running");
            return Err(StudioError::validation(MSG_ALREADY_RUNNING));
        }
        let guard = SubmitGuard {
            shared: shared.as_ref(),
            epoch,
            armed: true,
        };
        shared.cancel_polling();
        tracing::info!(?mode, topic = %submitted.topic, epoch, "submitting generation");

        let sent = match &submission {
            Submission::Quick(request) => {
                tokio::time::timeout(shared.submit_timeout, shared.api.submit_quick(request)).await
            }
            Submission::Template(request) => {
                tokio::time::timeout(shared.submit_timeout, shared.api.submit_template(request))
                    .await
            }
        };
        let result = sent.unwrap_or_else(|_| {
            Err(StudioError::submission(None, "Submission timed out"))
        });

        match result {
            Ok(ack) => {
                if shared.update_if_current(epoch, GenerationSession::acknowledge) {
                    tracing::info!(message = %ack.message, "generation acknowledged, polling");
                    spawn_poll_task(Arc::clone(shared), epoch, submitted);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "submission failed");
                let message = e.user_message();
                shared.update_if_current(epoch, |session| session.fail(message));
            }
        }
        guard.disarm();
        Ok(())
    }
}

impl<A: VideoApi + 'static> Drop for SessionController<A> {
    fn drop(&mut self) {
        self.shared.epoch.fetch_add(1, Ordering::SeqCst);
        self.shared.cancel_polling();
    }
}

// =============================================================================
// POLL TASK
// =============================================================================

fn spawn_poll_task<A: VideoApi + 'static>(
    shared: Arc<Shared<A>>,
    epoch: u64,
    submitted: SubmittedConfig,
) {
    let (cancel_tx, mut cancel_rx) = watch::channel(false);
    {
        let mut slot = match shared.cancel.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = slot.replace(cancel_tx) {
            let _ = previous.send(true);
        }
    }

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(shared.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; the first poll waits one interval.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = cancel_rx.changed() => break,
            }
            if *cancel_rx.borrow() || shared.current_epoch() != epoch {
                break;
            }

            let polled = tokio::select! {
                polled = tokio::time::timeout(shared.poll_timeout, shared.api.poll_progress()) => polled,
                _ = cancel_rx.changed() => break,
            };
            let polled = polled.unwrap_or_else(|_| Err(StudioError::poll("timed out")));

            let snapshot = match polled {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    tracing::warn!(error = %e, "progress poll failed");
                    let message = e.user_message();
                    shared.update_if_current(epoch, |session| session.fail(message));
                    break;
                }
            };

            let mut outcome = SnapshotOutcome::Ignored;
            shared.update_if_current(epoch, |session| {
                outcome = session.apply_snapshot(snapshot, |path| {
                    VideoResult::new(path, shared.api.resolve_asset_url(path), &submitted)
                });
                outcome.is_change()
            });

            match &outcome {
                SnapshotOutcome::Progress => {
                    let session = shared.state.borrow();
                    if let Some(progress) = &session.progress {
                        tracing::debug!(
                            status = %progress.status,
                            progress = progress.progress,
                            "progress"
                        );
                    }
                }
                SnapshotOutcome::Stale => {
                    tracing::warn!("dropped progress snapshot that moved backwards");
                }
                SnapshotOutcome::Completed => {
                    let result = shared.state.borrow().result.clone();
                    if let Some(result) = result {
                        tracing::info!(video = %result.video_path, "generation complete");
                        save_to_gallery(shared.gallery.clone(), &result);
                    }
                }
                SnapshotOutcome::Failed(message) => {
                    let err = StudioError::backend(message.as_str());
                    tracing::warn!(error = %err, "backend reported error");
                }
                SnapshotOutcome::Ignored => {}
            }

            if outcome.stops_polling() {
                break;
            }
        }
        tracing::debug!(epoch, "poll task stopped");
    });
}

/// Records a finished video without waiting for the write.
fn save_to_gallery(gallery: Option<Arc<dyn GalleryStore>>, result: &VideoResult) {
    let Some(gallery) = gallery else {
        return;
    };
    let entry = GalleryEntry::from(result);
    tokio::spawn(async move {
        if let Err(e) = gallery.save(entry).await {
            tracing::warn!(error = %e, "failed to save video to gallery");
        }
    });
}
