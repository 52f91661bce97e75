use crate::domain::{Accent, CatalogSnapshot};

/// Values shown by the settings form, loaded from the backend at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsForm {
    pub language: Option<String>,
    pub prompt: Option<String>,
    pub auto_paste: bool,
    pub hold_to_record: bool,
    pub devices: Vec<String>,
    pub selected_device: Option<String>,
}

/// Port for the render sink.
///
/// The shell owns all state and pushes presentational updates through
/// this interface; implementations map each call onto whatever widget
/// toolkit the host uses. Calls are idempotent: repeating one with the
/// same arguments must not change what the user sees.
pub trait RenderSurface: Send + Sync {
    /// Status line text plus its visual accent.
    fn set_status(&self, text: &str, accent: Accent);

    /// Record toggle button label and enabled state.
    fn set_capture_button(&self, label: &str, enabled: bool);

    /// Level meter fill (percent in [0, 100]) and dB readout text.
    fn set_level(&self, percent: f32, db_text: &str);

    /// Most recent transcript text.
    fn set_transcript(&self, text: &str);

    /// Shortcut editor display text.
    fn set_shortcut_display(&self, text: &str);

    /// Whether the shortcut save action is available.
    fn set_shortcut_save_enabled(&self, enabled: bool);

    /// Inline guidance or error text next to the shortcut editor.
    fn set_shortcut_notice(&self, text: &str);

    /// Rebuild the model selector from a full snapshot.
    fn set_model_selector(&self, snapshot: &CatalogSnapshot);

    /// Transient download progress line, or an error message verbatim.
    fn set_download_notice(&self, text: &str);

    /// Populate the settings form controls.
    fn set_settings_form(&self, form: &SettingsForm);

    /// Inline status text for settings saves.
    fn set_settings_notice(&self, text: &str);

    /// Inline status text for record toggle failures.
    fn set_action_notice(&self, text: &str);

    /// Show or hide the accessibility permission banner.
    fn set_accessibility_banner(&self, visible: bool);

    /// Backend diagnostics line.
    fn set_diagnostics(&self, text: &str);
}
