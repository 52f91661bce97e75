use tracing::warn;

use crate::app::gateway::CommandGateway;
use crate::domain::{DomainError, KeyPress, Platform, ShortcutSpec};
use crate::ports::RenderSurface;

const SAVED_NOTICE: &str = "Shortcut saved";

/// Capture editor states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Capturing,
}

/// Turns raw keydowns into a staged shortcut specification while the
/// editor field is focused.
///
/// Every valid keydown overwrites the stage (capture is not additive
/// across keydowns) and re-renders the display with the same glyph
/// mapping used for a loaded shortcut, so the editor and the current
/// shortcut always look alike. Saving is explicit; the stage survives a
/// failed save so the user can retry without re-capturing.
pub struct ShortcutCapture {
    platform: Platform,
    state: CaptureState,
    staged: Option<ShortcutSpec>,
    saved: Option<ShortcutSpec>,
}

impl ShortcutCapture {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            state: CaptureState::Idle,
            staged: None,
            saved: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> CaptureState {
        self.state
    }

    #[must_use]
    pub fn staged(&self) -> Option<&ShortcutSpec> {
        self.staged.as_ref()
    }

    /// The last specification the backend confirmed.
    #[must_use]
    pub fn saved(&self) -> Option<&ShortcutSpec> {
        self.saved.as_ref()
    }

    /// Show a previously saved specification.
    pub fn load_saved<S: RenderSurface>(&mut self, spec: ShortcutSpec, surface: &S) {
        surface.set_shortcut_display(&spec.display(self.platform));
        surface.set_shortcut_save_enabled(false);
        surface.set_shortcut_notice("");
        self.saved = Some(spec);
    }

    /// Editor field gained focus: start capturing, dropping any stale
    /// unsaved stage.
    pub fn begin_capture<S: RenderSurface>(&mut self, surface: &S) {
        self.state = CaptureState::Capturing;
        self.staged = None;
        surface.set_shortcut_display("");
        surface.set_shortcut_save_enabled(false);
        surface.set_shortcut_notice("");
    }

    /// One intercepted keydown while capturing.
    ///
    /// A keydown consisting solely of modifiers is not a valid terminal
    /// state and is ignored; capture remains open.
    pub fn key_down<S: RenderSurface>(&mut self, press: &KeyPress, surface: &S) {
        if self.state != CaptureState::Capturing {
            return;
        }
        let Some(spec) = ShortcutSpec::from_key_press(press) else {
            return;
        };
        surface.set_shortcut_display(&spec.display(self.platform));
        surface.set_shortcut_save_enabled(spec.is_savable());
        surface.set_shortcut_notice("");
        self.staged = Some(spec);
    }

    /// Editor field lost focus. Without a valid captured key the display
    /// reverts to empty; a staged spec stays available for the save
    /// action.
    pub fn end_capture<S: RenderSurface>(&mut self, surface: &S) {
        self.state = CaptureState::Idle;
        if self.staged.is_none() {
            surface.set_shortcut_display("");
            surface.set_shortcut_save_enabled(false);
        }
    }

    /// Persist the staged specification through the command gateway.
    ///
    /// Rejected locally when nothing valid is staged. On failure the
    /// stage is retained and the error shown inline so the user can
    /// retry.
    pub async fn save<S: RenderSurface>(&mut self, gateway: &CommandGateway, surface: &S) {
        let Some(spec) = self.staged.clone().filter(ShortcutSpec::is_savable) else {
            let err = DomainError::InvalidShortcut("press a key combination first".to_string());
            surface.set_shortcut_notice(&err.to_string());
            return;
        };
        match gateway.save_custom_shortcut(&spec).await {
            Ok(()) => {
                surface.set_shortcut_display(&spec.display(self.platform));
                surface.set_shortcut_save_enabled(false);
                surface.set_shortcut_notice(SAVED_NOTICE);
                self.saved = Some(spec);
                self.staged = None;
            }
            Err(err) => {
                warn!(error = %err, "Saving shortcut failed");
                surface.set_shortcut_notice(&err.to_string());
            }
        }
    }
}
