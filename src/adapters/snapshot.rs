use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::{Accent, CatalogSnapshot};
use crate::ports::{RenderSurface, SettingsForm};

/// Everything the surface currently shows, as plain values.
#[derive(Debug, Clone, Default)]
pub struct UiSnapshot {
    pub status_text: String,
    pub accent: Accent,
    pub button_label: String,
    pub button_enabled: bool,
    pub level_percent: f32,
    pub level_db_text: String,
    pub transcript: String,
    pub shortcut_display: String,
    pub shortcut_save_enabled: bool,
    pub shortcut_notice: String,
    pub model_selector: CatalogSnapshot,
    pub download_notice: String,
    pub settings_form: SettingsForm,
    pub settings_notice: String,
    pub action_notice: String,
    pub accessibility_banner: bool,
    pub diagnostics: String,
}

/// Render surface that keeps the latest UI state in memory.
///
/// Hosts read the snapshot and paint it with whatever toolkit they use;
/// tests assert against it directly. Cloning shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSurface {
    inner: Arc<RwLock<UiSnapshot>>,
}

impl SnapshotSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> UiSnapshot {
        self.inner.read().clone()
    }
}

impl RenderSurface for SnapshotSurface {
    fn set_status(&self, text: &str, accent: Accent) {
        let mut snap = self.inner.write();
        snap.status_text = text.to_string();
        snap.accent = accent;
    }

    fn set_capture_button(&self, label: &str, enabled: bool) {
        let mut snap = self.inner.write();
        snap.button_label = label.to_string();
        snap.button_enabled = enabled;
    }

    fn set_level(&self, percent: f32, db_text: &str) {
        let mut snap = self.inner.write();
        snap.level_percent = percent;
        snap.level_db_text = db_text.to_string();
    }

    fn set_transcript(&self, text: &str) {
        self.inner.write().transcript = text.to_string();
    }

    fn set_shortcut_display(&self, text: &str) {
        self.inner.write().shortcut_display = text.to_string();
    }

    fn set_shortcut_save_enabled(&self, enabled: bool) {
        self.inner.write().shortcut_save_enabled = enabled;
    }

    fn set_shortcut_notice(&self, text: &str) {
        self.inner.write().shortcut_notice = text.to_string();
    }

    fn set_model_selector(&self, snapshot: &CatalogSnapshot) {
        self.inner.write().model_selector = snapshot.clone();
    }

    fn set_download_notice(&self, text: &str) {
        self.inner.write().download_notice = text.to_string();
    }

    fn set_settings_form(&self, form: &SettingsForm) {
        self.inner.write().settings_form = form.clone();
    }

    fn set_settings_notice(&self, text: &str) {
        self.inner.write().settings_notice = text.to_string();
    }

    fn set_action_notice(&self, text: &str) {
        self.inner.write().action_notice = text.to_string();
    }

    fn set_accessibility_banner(&self, visible: bool) {
        self.inner.write().accessibility_banner = visible;
    }

    fn set_diagnostics(&self, text: &str) {
        self.inner.write().diagnostics = text.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_writes() {
        let surface = SnapshotSurface::new();
        surface.set_status("Recording\u{2026}", Accent::Red);
        surface.set_capture_button("Stop", true);
        surface.set_level(42.0, "-12.3 dB");

        let snap = surface.snapshot();
        assert_eq!(snap.status_text, "Recording\u{2026}");
        assert_eq!(snap.accent, Accent::Red);
        assert_eq!(snap.button_label, "Stop");
        assert_eq!(snap.level_percent, 42.0);
    }

    #[test]
    fn test_clone_shares_state() {
        let surface = SnapshotSurface::new();
        let alias = surface.clone();
        alias.set_transcript("hello");
        assert_eq!(surface.snapshot().transcript, "hello");
    }
}
