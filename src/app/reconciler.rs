use std::time::Duration;

use tracing::debug;

use crate::domain::{Accent, RecordingStatus, TimingConfig};
use crate::ports::RenderSurface;

/// Backend lifecycle notifications the reconciler folds into one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    RecordingStart,
    RecordingStop,
    TranscriptionStart,
    TranscriptionComplete,
    TranscriptionFailed,
    NoModelSelected,
}

/// A deferred return to the idle presentation, scheduled by the shell.
///
/// The generation ties the clear to the status that scheduled it; any
/// later lifecycle event supersedes it, so a stale timer can never
/// overwrite a newer status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusClear {
    pub delay: Duration,
    pub generation: u64,
}

const IDLE_TEXT: &str = "Ready";
const RECORDING_TEXT: &str = "Recording\u{2026}";
const PROCESSING_TEXT: &str = "Processing\u{2026}";
const TRANSCRIBING_TEXT: &str = "Transcribing\u{2026}";
const COMPLETE_TEXT: &str = "Transcribed and copied";
const FAILED_TEXT: &str = "Transcription failed";
const NO_MODEL_TEXT: &str = "No model selected. Please select and download a model first.";

/// Folds recording and transcription lifecycle events into the single
/// current status and its presentation.
///
/// The reconciler owns the status; nothing else mutates it. Events are
/// applied exactly as received, with no ordering preconditions: a
/// recording-stop without a prior start still lands in Transcribing.
/// Applying the same event twice reproduces the same observable state.
pub struct LifecycleReconciler {
    status: RecordingStatus,
    generation: u64,
}

impl LifecycleReconciler {
    pub fn new() -> Self {
        Self {
            status: RecordingStatus::Idle,
            generation: 0,
        }
    }

    #[must_use]
    pub fn status(&self) -> RecordingStatus {
        self.status
    }

    /// Paint the idle baseline.
    pub fn render_idle<S: RenderSurface>(&self, surface: &S) {
        surface.set_status(IDLE_TEXT, Accent::None);
        surface.set_capture_button(RecordingStatus::Idle.button_label(), true);
    }

    /// Apply one lifecycle event, returning a clear to schedule when the
    /// new status is transient.
    pub fn apply<S: RenderSurface>(
        &mut self,
        event: LifecycleEvent,
        timing: &TimingConfig,
        surface: &S,
    ) -> Option<StatusClear> {
        self.generation += 1;
        debug!(?event, from = ?self.status, "Applying lifecycle event");

        match event {
            LifecycleEvent::RecordingStart => {
                self.status = RecordingStatus::Recording;
                surface.set_status(RECORDING_TEXT, Accent::Red);
                surface.set_capture_button(self.status.button_label(), true);
                None
            }
            LifecycleEvent::RecordingStop => {
                self.status = RecordingStatus::Transcribing;
                surface.set_status(PROCESSING_TEXT, Accent::Amber);
                surface.set_capture_button(self.status.button_label(), true);
                None
            }
            LifecycleEvent::TranscriptionStart => {
                // Status text only; the stop handler already set the accent.
                self.status = RecordingStatus::Transcribing;
                surface.set_status(TRANSCRIBING_TEXT, Accent::Amber);
                None
            }
            LifecycleEvent::TranscriptionComplete => {
                self.status = RecordingStatus::Ready;
                surface.set_status(COMPLETE_TEXT, Accent::Green);
                surface.set_capture_button(self.status.button_label(), true);
                Some(StatusClear {
                    delay: Duration::from_millis(timing.ready_clear_ms),
                    generation: self.generation,
                })
            }
            LifecycleEvent::TranscriptionFailed => {
                self.status = RecordingStatus::Error;
                surface.set_status(FAILED_TEXT, Accent::Red);
                surface.set_capture_button(self.status.button_label(), true);
                Some(StatusClear {
                    delay: Duration::from_millis(timing.error_clear_ms),
                    generation: self.generation,
                })
            }
            LifecycleEvent::NoModelSelected => {
                // Blocking message; stays until the user installs a model.
                self.status = RecordingStatus::Error;
                surface.set_status(NO_MODEL_TEXT, Accent::Red);
                None
            }
        }
    }

    /// Fire a scheduled clear. Stale generations are ignored.
    pub fn apply_clear<S: RenderSurface>(&mut self, generation: u64, surface: &S) -> bool {
        if generation != self.generation {
            debug!(generation, current = self.generation, "Ignoring stale status clear");
            return false;
        }
        self.status = RecordingStatus::Idle;
        self.render_idle(surface);
        true
    }
}

impl Default for LifecycleReconciler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::SnapshotSurface;

    fn timing() -> TimingConfig {
        TimingConfig::default()
    }

    #[test]
    fn test_start_then_stop_transitions() {
        let surface = SnapshotSurface::new();
        let mut reconciler = LifecycleReconciler::new();
        assert_eq!(reconciler.status(), RecordingStatus::Idle);

        reconciler.apply(LifecycleEvent::RecordingStart, &timing(), &surface);
        assert_eq!(reconciler.status(), RecordingStatus::Recording);
        let snap = surface.snapshot();
        assert_eq!(snap.status_text, RECORDING_TEXT);
        assert_eq!(snap.accent, Accent::Red);
        assert_eq!(snap.button_label, "Stop");

        reconciler.apply(LifecycleEvent::RecordingStop, &timing(), &surface);
        assert_eq!(reconciler.status(), RecordingStatus::Transcribing);
        let snap = surface.snapshot();
        assert_eq!(snap.status_text, PROCESSING_TEXT);
        assert_eq!(snap.accent, Accent::Amber);
        assert_eq!(snap.button_label, "Start");
    }

    #[test]
    fn test_stop_without_start_still_transitions() {
        // No precondition is enforced; this documents current behavior.
        let surface = SnapshotSurface::new();
        let mut reconciler = LifecycleReconciler::new();
        reconciler.apply(LifecycleEvent::RecordingStop, &timing(), &surface);
        assert_eq!(reconciler.status(), RecordingStatus::Transcribing);
    }

    #[test]
    fn test_complete_schedules_short_clear_to_idle() {
        let surface = SnapshotSurface::new();
        let mut reconciler = LifecycleReconciler::new();
        let clear = reconciler
            .apply(LifecycleEvent::TranscriptionComplete, &timing(), &surface)
            .unwrap();
        assert_eq!(clear.delay, Duration::from_millis(timing().ready_clear_ms));
        assert_eq!(reconciler.status(), RecordingStatus::Ready);
        assert_eq!(surface.snapshot().accent, Accent::Green);

        assert!(reconciler.apply_clear(clear.generation, &surface));
        assert_eq!(reconciler.status(), RecordingStatus::Idle);
        let snap = surface.snapshot();
        assert_eq!(snap.status_text, IDLE_TEXT);
        assert_eq!(snap.accent, Accent::None);
    }

    #[test]
    fn test_failed_schedules_longer_clear() {
        let surface = SnapshotSurface::new();
        let mut reconciler = LifecycleReconciler::new();
        let clear = reconciler
            .apply(LifecycleEvent::TranscriptionFailed, &timing(), &surface)
            .unwrap();
        assert_eq!(clear.delay, Duration::from_millis(timing().error_clear_ms));
        assert_eq!(reconciler.status(), RecordingStatus::Error);
        assert_eq!(surface.snapshot().status_text, FAILED_TEXT);
    }

    #[test]
    fn test_stale_clear_cannot_overwrite_newer_status() {
        let surface = SnapshotSurface::new();
        let mut reconciler = LifecycleReconciler::new();
        let clear = reconciler
            .apply(LifecycleEvent::TranscriptionComplete, &timing(), &surface)
            .unwrap();

        // A new recording begins before the clear fires.
        reconciler.apply(LifecycleEvent::RecordingStart, &timing(), &surface);
        assert!(!reconciler.apply_clear(clear.generation, &surface));
        assert_eq!(reconciler.status(), RecordingStatus::Recording);
        assert_eq!(surface.snapshot().status_text, RECORDING_TEXT);
    }

    #[test]
    fn test_no_model_selected_blocks_regardless_of_status() {
        let surface = SnapshotSurface::new();
        let mut reconciler = LifecycleReconciler::new();

        for warmup in [
            LifecycleEvent::RecordingStart,
            LifecycleEvent::TranscriptionComplete,
            LifecycleEvent::TranscriptionFailed,
        ] {
            reconciler.apply(warmup, &timing(), &surface);
            let clear = reconciler.apply(LifecycleEvent::NoModelSelected, &timing(), &surface);
            assert_eq!(clear, None, "blocking message must not auto-clear");
            assert_eq!(reconciler.status(), RecordingStatus::Error);
            assert_eq!(surface.snapshot().status_text, NO_MODEL_TEXT);
        }
    }

    #[test]
    fn test_applying_same_event_twice_is_idempotent() {
        let surface = SnapshotSurface::new();
        let mut reconciler = LifecycleReconciler::new();

        reconciler.apply(LifecycleEvent::RecordingStart, &timing(), &surface);
        let first = surface.snapshot();
        reconciler.apply(LifecycleEvent::RecordingStart, &timing(), &surface);
        let second = surface.snapshot();

        assert_eq!(first.status_text, second.status_text);
        assert_eq!(first.accent, second.accent);
        assert_eq!(first.button_label, second.button_label);
        assert_eq!(reconciler.status(), RecordingStatus::Recording);
    }
}
