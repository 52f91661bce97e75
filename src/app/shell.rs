use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use crate::adapters::TomlConfigStore;
use crate::app::capture::ShortcutCapture;
use crate::app::catalog::CatalogSync;
use crate::app::gateway::{CommandGateway, CooldownGuard};
use crate::app::reconciler::{LifecycleEvent, LifecycleReconciler};
use crate::app::registry::SubscriptionRegistry;
use crate::app::settings::SettingsPanel;
use crate::app::throttle::LevelThrottle;
use crate::domain::event::{
    decode_payload, topics, AccessibilityStatus, BackendDiagnostics, DownloadComplete,
    DownloadStart, ProfileReport, Transcription,
};
use crate::domain::{
    DomainError, DownloadProgress, KeyPress, LevelSample, Platform, RecordingStatus, ShellConfig,
    ShortcutSpec, TimingConfig, TopicEvent,
};
use crate::infrastructure::init_logging;
use crate::ports::{CommandTransport, ConfigStore, EventSource, RenderSurface};

/// Host-originated actions: clicks, focus changes, and keydowns forwarded
/// from the widget layer. They share the shell's single consumption loop
/// with backend events, so handler bodies never race each other.
#[derive(Debug, Clone, PartialEq)]
pub enum UiIntent {
    ToggleRecording,
    ShortcutFieldFocused,
    ShortcutKeyDown(KeyPress),
    ShortcutFieldBlurred,
    SaveShortcut,
    SelectModel(String),
    DownloadModel(String),
    RefreshCatalog,
    SaveLanguage(Option<String>),
    SavePrompt(Option<String>),
    SetAutoPaste(bool),
    SetHoldToRecord(bool),
    ChooseDevice(Option<String>),
    OpenAccessibilitySettings,
}

/// Async work a sync event handler scheduled for right after dispatch.
enum FollowUp {
    DownloadCompleted,
}

/// Diagnostics region content, combining the engine report with the last
/// transcription timing.
#[derive(Default)]
struct DiagnosticsLine {
    engine: Option<String>,
    timing: Option<String>,
}

impl DiagnosticsLine {
    fn render(&self) -> String {
        match (&self.engine, &self.timing) {
            (Some(engine), Some(timing)) => format!("{engine} | {timing}"),
            (Some(engine), None) => engine.clone(),
            (None, Some(timing)) => timing.clone(),
            (None, None) => String::new(),
        }
    }
}

/// Everything the event handlers may touch. Each piece of reconciled
/// state has exactly one owning component in here.
struct ShellState<S> {
    surface: Arc<S>,
    gateway: CommandGateway,
    platform: Platform,
    timing: TimingConfig,
    reconciler: LifecycleReconciler,
    throttle: LevelThrottle,
    capture: ShortcutCapture,
    catalog: CatalogSync,
    settings: SettingsPanel,
    toggle_guard: CooldownGuard,
    diagnostics: DiagnosticsLine,
    pending_clear: Option<(tokio::time::Instant, u64)>,
    followups: Vec<FollowUp>,
}

fn apply_lifecycle<S: RenderSurface>(state: &mut ShellState<S>, event: LifecycleEvent) {
    if let Some(clear) = state
        .reconciler
        .apply(event, &state.timing, state.surface.as_ref())
    {
        state.pending_clear = Some((
            tokio::time::Instant::now() + clear.delay,
            clear.generation,
        ));
    }
}

/// The client shell: subscribes to every backend topic, folds events and
/// host intents into UI state, and pushes the result through the render
/// surface.
///
/// Execution is single-threaded cooperative. All handlers run on one
/// loop; suspension happens only at gateway awaits, and between awaits
/// handler bodies are atomic with respect to each other.
pub struct Shell<S> {
    registry: SubscriptionRegistry<ShellState<S>>,
    state: ShellState<S>,
}

impl<S: RenderSurface + 'static> Shell<S> {
    pub fn new(
        surface: Arc<S>,
        transport: Arc<dyn CommandTransport>,
        config: &ShellConfig,
        platform: Platform,
    ) -> Result<Self, DomainError> {
        let timing = config.timing.clone();
        let state = ShellState {
            surface,
            gateway: CommandGateway::new(transport),
            platform,
            throttle: LevelThrottle::new(Duration::from_millis(timing.level_interval_ms)),
            toggle_guard: CooldownGuard::new(Duration::from_millis(timing.toggle_cooldown_ms)),
            timing,
            reconciler: LifecycleReconciler::new(),
            capture: ShortcutCapture::new(platform),
            catalog: CatalogSync::new(),
            settings: SettingsPanel::new(),
            diagnostics: DiagnosticsLine::default(),
            pending_clear: None,
            followups: Vec::new(),
        };

        let mut registry = SubscriptionRegistry::new();
        Self::attach_subscriptions(&mut registry)?;
        info!(topics = registry.len(), "Event subscriptions attached");

        Ok(Self { registry, state })
    }

    /// Initialize from the on-disk shell config, mirroring the standard
    /// startup sequence: config store, config, logging, shell.
    pub fn init_from_disk(
        surface: Arc<S>,
        transport: Arc<dyn CommandTransport>,
    ) -> Result<(Self, Option<WorkerGuard>), DomainError> {
        let store = TomlConfigStore::new()?;
        let config = store.load()?;
        let log_guard = init_logging(&store.logs_dir(), &config.logging)?;
        info!("Saybar shell starting up");
        let shell = Self::new(surface, transport, &config, Platform::current())?;
        Ok((shell, log_guard))
    }

    /// Attach every topic handler exactly once.
    fn attach_subscriptions(
        registry: &mut SubscriptionRegistry<ShellState<S>>,
    ) -> Result<(), DomainError> {
        registry.subscribe(
            topics::ACCESSIBILITY_STATUS,
            Box::new(|state, payload| {
                let status: AccessibilityStatus =
                    decode_payload(topics::ACCESSIBILITY_STATUS, &payload)?;
                state.surface.set_accessibility_banner(!status.trusted);
                Ok(())
            }),
        )?;
        registry.subscribe(
            topics::RECORDING_START,
            Box::new(|state, _| {
                // A fresh recording renders its first level sample.
                state.throttle.reset();
                apply_lifecycle(state, LifecycleEvent::RecordingStart);
                Ok(())
            }),
        )?;
        registry.subscribe(
            topics::RECORDING_STOP,
            Box::new(|state, _| {
                apply_lifecycle(state, LifecycleEvent::RecordingStop);
                Ok(())
            }),
        )?;
        registry.subscribe(
            topics::AUDIO_LEVEL,
            Box::new(|state, payload| {
                let sample: LevelSample = decode_payload(topics::AUDIO_LEVEL, &payload)?;
                if state.throttle.accept(Instant::now()) {
                    state
                        .surface
                        .set_level(sample.percent(), &sample.db_text());
                }
                Ok(())
            }),
        )?;
        registry.subscribe(
            topics::TRANSCRIPTION_START,
            Box::new(|state, _| {
                apply_lifecycle(state, LifecycleEvent::TranscriptionStart);
                Ok(())
            }),
        )?;
        registry.subscribe(
            topics::TRANSCRIPTION,
            Box::new(|state, payload| {
                let transcription: Transcription =
                    decode_payload(topics::TRANSCRIPTION, &payload)?;
                state.surface.set_transcript(&transcription.text);
                Ok(())
            }),
        )?;
        registry.subscribe(
            topics::TRANSCRIPTION_PROFILE,
            Box::new(|state, payload| {
                let report: ProfileReport =
                    decode_payload(topics::TRANSCRIPTION_PROFILE, &payload)?;
                state.diagnostics.timing = Some(report.summary());
                state.surface.set_diagnostics(&state.diagnostics.render());
                Ok(())
            }),
        )?;
        registry.subscribe(
            topics::BACKEND_STATUS,
            Box::new(|state, payload| {
                let diagnostics: BackendDiagnostics =
                    decode_payload(topics::BACKEND_STATUS, &payload)?;
                state.diagnostics.engine = Some(diagnostics.summary());
                state.surface.set_diagnostics(&state.diagnostics.render());
                Ok(())
            }),
        )?;
        registry.subscribe(
            topics::TRANSCRIPTION_COMPLETE,
            Box::new(|state, _| {
                apply_lifecycle(state, LifecycleEvent::TranscriptionComplete);
                Ok(())
            }),
        )?;
        registry.subscribe(
            topics::TRANSCRIPTION_FAILED,
            Box::new(|state, _| {
                apply_lifecycle(state, LifecycleEvent::TranscriptionFailed);
                Ok(())
            }),
        )?;
        registry.subscribe(
            topics::MODEL_DOWNLOAD_START,
            Box::new(|state, payload| {
                let start: DownloadStart = decode_payload(topics::MODEL_DOWNLOAD_START, &payload)?;
                state.catalog.download_started(start, state.surface.as_ref());
                Ok(())
            }),
        )?;
        registry.subscribe(
            topics::MODEL_DOWNLOAD_PROGRESS,
            Box::new(|state, payload| {
                let progress: DownloadProgress =
                    decode_payload(topics::MODEL_DOWNLOAD_PROGRESS, &payload)?;
                state
                    .catalog
                    .download_progressed(progress, state.surface.as_ref());
                Ok(())
            }),
        )?;
        registry.subscribe(
            topics::MODEL_DOWNLOAD_COMPLETE,
            Box::new(|state, payload| {
                let complete: DownloadComplete =
                    decode_payload(topics::MODEL_DOWNLOAD_COMPLETE, &payload)?;
                debug!(model = %complete.id, "Model download completed");
                state.followups.push(FollowUp::DownloadCompleted);
                Ok(())
            }),
        )?;
        registry.subscribe(
            topics::MODEL_DOWNLOAD_ERROR,
            Box::new(|state, payload| {
                let message: String = decode_payload(topics::MODEL_DOWNLOAD_ERROR, &payload)?;
                state.catalog.download_failed(&message, state.surface.as_ref());
                Ok(())
            }),
        )?;
        registry.subscribe(
            topics::NO_MODEL_SELECTED,
            Box::new(|state, _| {
                apply_lifecycle(state, LifecycleEvent::NoModelSelected);
                Ok(())
            }),
        )?;
        Ok(())
    }

    /// Paint the idle baseline and pull the initial snapshots: saved
    /// shortcut, settings, model catalog, and (on macOS) the current
    /// accessibility trust.
    pub async fn bootstrap(&mut self) {
        let state = &mut self.state;
        let surface = state.surface.as_ref();
        state.reconciler.render_idle(surface);

        match state.gateway.get_current_shortcut().await {
            Ok(spec) => state.capture.load_saved(spec, surface),
            Err(err) => {
                warn!(error = %err, "Loading current shortcut failed; showing the default");
                state
                    .capture
                    .load_saved(ShortcutSpec::default_for(state.platform), surface);
            }
        }

        state.settings.load_all(&state.gateway, surface).await;
        state.catalog.refresh(&state.gateway, surface).await;

        if state.platform == Platform::MacOs {
            match state.gateway.is_accessibility_trusted().await {
                Ok(trusted) => surface.set_accessibility_banner(!trusted),
                Err(err) => warn!(error = %err, "Accessibility trust query failed"),
            }
        }
    }

    #[must_use]
    pub fn recording_status(&self) -> RecordingStatus {
        self.state.reconciler.status()
    }

    #[must_use]
    pub fn is_subscribed(&self, topic: &str) -> bool {
        self.registry.is_subscribed(topic)
    }

    /// Deliver one backend event, then run whatever async follow-up its
    /// handler scheduled.
    pub async fn handle_event(&mut self, event: TopicEvent) {
        self.registry.dispatch(&mut self.state, event);
        self.drain_followups().await;
    }

    async fn drain_followups(&mut self) {
        for followup in std::mem::take(&mut self.state.followups) {
            match followup {
                FollowUp::DownloadCompleted => {
                    let gateway = self.state.gateway.clone();
                    self.state
                        .catalog
                        .download_completed(&gateway, self.state.surface.as_ref())
                        .await;
                }
            }
        }
    }

    /// Handle one host intent.
    pub async fn handle_intent(&mut self, intent: UiIntent) {
        let state = &mut self.state;
        let surface = Arc::clone(&state.surface);
        match intent {
            UiIntent::ToggleRecording => {
                if !state.toggle_guard.try_arm(Instant::now()) {
                    debug!("Toggle ignored inside the cooldown window");
                    return;
                }
                // Disabled until a lifecycle event re-renders the button.
                surface.set_capture_button(state.reconciler.status().button_label(), false);
                surface.set_action_notice("");
                if let Err(err) = state.gateway.toggle_recording().await {
                    warn!(error = %err, "Toggle recording failed");
                    surface.set_action_notice(&err.to_string());
                    surface.set_capture_button(state.reconciler.status().button_label(), true);
                }
            }
            UiIntent::ShortcutFieldFocused => state.capture.begin_capture(surface.as_ref()),
            UiIntent::ShortcutKeyDown(press) => state.capture.key_down(&press, surface.as_ref()),
            UiIntent::ShortcutFieldBlurred => state.capture.end_capture(surface.as_ref()),
            UiIntent::SaveShortcut => {
                state.capture.save(&state.gateway, surface.as_ref()).await;
            }
            UiIntent::SelectModel(id) => {
                state
                    .catalog
                    .select(&id, &state.gateway, surface.as_ref())
                    .await;
            }
            UiIntent::DownloadModel(id) => {
                state
                    .catalog
                    .request_download(&id, &state.gateway, surface.as_ref())
                    .await;
            }
            UiIntent::RefreshCatalog => {
                state.catalog.refresh(&state.gateway, surface.as_ref()).await;
            }
            UiIntent::SaveLanguage(language) => {
                state
                    .settings
                    .save_language(language, &state.gateway, surface.as_ref())
                    .await;
            }
            UiIntent::SavePrompt(prompt) => {
                state
                    .settings
                    .save_prompt(prompt, &state.gateway, surface.as_ref())
                    .await;
            }
            UiIntent::SetAutoPaste(enabled) => {
                state
                    .settings
                    .save_auto_paste(enabled, &state.gateway, surface.as_ref())
                    .await;
            }
            UiIntent::SetHoldToRecord(enabled) => {
                state
                    .settings
                    .save_hold_to_record(enabled, &state.gateway, surface.as_ref())
                    .await;
            }
            UiIntent::ChooseDevice(device) => {
                state
                    .settings
                    .choose_device(device, &state.gateway, surface.as_ref())
                    .await;
            }
            UiIntent::OpenAccessibilitySettings => {
                if let Err(err) = state.gateway.open_accessibility_settings().await {
                    warn!(error = %err, "Opening accessibility settings failed");
                    surface.set_settings_notice(&err.to_string());
                }
            }
        }
    }

    fn fire_pending_clear(&mut self) {
        if let Some((_, generation)) = self.state.pending_clear.take() {
            self.state
                .reconciler
                .apply_clear(generation, self.state.surface.as_ref());
        }
    }

    /// Subscribe to an event source and run until its channel closes.
    pub async fn run_with_source(
        self,
        source: &dyn EventSource,
        intents: mpsc::UnboundedReceiver<UiIntent>,
    ) {
        let events = source.subscribe();
        self.run(events, intents).await;
    }

    /// Consume backend events and host intents until the event channel
    /// closes. Everything is processed strictly in arrival order on this
    /// one task.
    pub async fn run(
        mut self,
        mut events: broadcast::Receiver<TopicEvent>,
        mut intents: mpsc::UnboundedReceiver<UiIntent>,
    ) {
        loop {
            let clear_at = self.state.pending_clear.map(|(at, _)| at);
            let clear_deadline = clear_at
                .unwrap_or_else(|| tokio::time::Instant::now() + Duration::from_secs(86_400));

            tokio::select! {
                event = events.recv() => match event {
                    Ok(event) => self.handle_event(event).await,
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "Event stream lagged; events were lost");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        info!("Event channel closed; shell stopping");
                        break;
                    }
                },
                Some(intent) = intents.recv() => self.handle_intent(intent).await,
                _ = tokio::time::sleep_until(clear_deadline), if clear_at.is_some() => {
                    self.fire_pending_clear();
                }
            }
        }
    }
}
