use tracing::warn;

use crate::app::gateway::CommandGateway;
use crate::domain::DomainError;
use crate::ports::{RenderSurface, SettingsForm};

const SAVED_NOTICE: &str = "Saved";

/// Settings panel logic: loads the backend-owned settings into the form
/// and writes changes back one command at a time.
///
/// Persistence lives entirely behind the gateway; this component only
/// mirrors values and surfaces failures inline. A failed save leaves the
/// form showing the last value the backend confirmed.
pub struct SettingsPanel {
    form: SettingsForm,
}

impl SettingsPanel {
    pub fn new() -> Self {
        Self {
            form: SettingsForm::default(),
        }
    }

    #[must_use]
    pub fn form(&self) -> &SettingsForm {
        &self.form
    }

    /// Pull every setting from the backend and populate the form.
    ///
    /// Each value is fetched independently so one failing command does
    /// not blank the rest of the panel.
    pub async fn load_all<S: RenderSurface>(&mut self, gateway: &CommandGateway, surface: &S) {
        match gateway.get_default_language().await {
            Ok(language) => self.form.language = language,
            Err(err) => warn!(error = %err, "Loading default language failed"),
        }
        match gateway.get_default_prompt().await {
            Ok(prompt) => self.form.prompt = prompt,
            Err(err) => warn!(error = %err, "Loading default prompt failed"),
        }
        match gateway.get_auto_paste_enabled().await {
            Ok(enabled) => self.form.auto_paste = enabled,
            Err(err) => warn!(error = %err, "Loading auto-paste flag failed"),
        }
        match gateway.get_hold_to_record_enabled().await {
            Ok(enabled) => self.form.hold_to_record = enabled,
            Err(err) => warn!(error = %err, "Loading hold-to-record flag failed"),
        }
        match gateway.list_audio_input_devices().await {
            Ok(devices) => self.form.devices = devices,
            Err(err) => warn!(error = %err, "Listing input devices failed"),
        }
        match gateway.get_selected_audio_input_device().await {
            Ok(selected) => self.form.selected_device = selected,
            Err(err) => warn!(error = %err, "Loading selected device failed"),
        }
        surface.set_settings_form(&self.form);
    }

    pub async fn save_language<S: RenderSurface>(
        &mut self,
        language: Option<String>,
        gateway: &CommandGateway,
        surface: &S,
    ) {
        let result = gateway.save_default_language(language.as_deref()).await;
        self.finish(result, surface, |form| form.language = language);
    }

    pub async fn save_prompt<S: RenderSurface>(
        &mut self,
        prompt: Option<String>,
        gateway: &CommandGateway,
        surface: &S,
    ) {
        let result = gateway.save_default_prompt(prompt.as_deref()).await;
        self.finish(result, surface, |form| form.prompt = prompt);
    }

    pub async fn save_auto_paste<S: RenderSurface>(
        &mut self,
        enabled: bool,
        gateway: &CommandGateway,
        surface: &S,
    ) {
        let result = gateway.save_auto_paste_enabled(enabled).await;
        self.finish(result, surface, |form| form.auto_paste = enabled);
    }

    pub async fn save_hold_to_record<S: RenderSurface>(
        &mut self,
        enabled: bool,
        gateway: &CommandGateway,
        surface: &S,
    ) {
        let result = gateway.save_hold_to_record_enabled(enabled).await;
        self.finish(result, surface, |form| form.hold_to_record = enabled);
    }

    /// Save the device choice, then ask the backend to switch its input
    /// stream over to it.
    pub async fn choose_device<S: RenderSurface>(
        &mut self,
        device: Option<String>,
        gateway: &CommandGateway,
        surface: &S,
    ) {
        let result = match gateway
            .save_selected_audio_input_device(device.as_deref())
            .await
        {
            Ok(()) => gateway.apply_selected_audio_input_device().await,
            Err(err) => Err(err),
        };
        self.finish(result, surface, |form| form.selected_device = device);
    }

    fn finish<S: RenderSurface>(
        &mut self,
        result: Result<(), DomainError>,
        surface: &S,
        commit: impl FnOnce(&mut SettingsForm),
    ) {
        match result {
            Ok(()) => {
                commit(&mut self.form);
                surface.set_settings_form(&self.form);
                surface.set_settings_notice(SAVED_NOTICE);
            }
            Err(err) => {
                warn!(error = %err, "Saving setting failed");
                surface.set_settings_notice(&err.to_string());
            }
        }
    }
}

impl Default for SettingsPanel {
    fn default() -> Self {
        Self::new()
    }
}
