use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use crate::domain::{CatalogSnapshot, DomainError, ShortcutSpec};
use crate::ports::CommandTransport;

/// Typed wrapper around the backend command channel.
///
/// Each method encodes its arguments, invokes the named command, and
/// decodes the result. Failures come back as `DomainError::Command` and
/// are surfaced inline by the caller; there is no automatic retry.
#[derive(Clone)]
pub struct CommandGateway {
    transport: Arc<dyn CommandTransport>,
}

impl CommandGateway {
    pub fn new(transport: Arc<dyn CommandTransport>) -> Self {
        Self { transport }
    }

    async fn call<T: DeserializeOwned>(&self, name: &str, args: Value) -> Result<T, DomainError> {
        debug!(command = name, "Invoking backend command");
        let value = self.transport.invoke(name, args).await?;
        serde_json::from_value(value)
            .map_err(|e| DomainError::command(name, format!("unexpected response: {e}")))
    }

    pub async fn toggle_recording(&self) -> Result<String, DomainError> {
        self.call("toggle_recording", json!({})).await
    }

    pub async fn is_accessibility_trusted(&self) -> Result<bool, DomainError> {
        self.call("is_accessibility_trusted", json!({})).await
    }

    pub async fn open_accessibility_settings(&self) -> Result<(), DomainError> {
        self.call("open_accessibility_settings", json!({})).await
    }

    pub async fn get_default_language(&self) -> Result<Option<String>, DomainError> {
        self.call("get_default_language", json!({})).await
    }

    pub async fn save_default_language(&self, language: Option<&str>) -> Result<(), DomainError> {
        self.call("save_default_language", json!({ "language": language }))
            .await
    }

    pub async fn get_default_prompt(&self) -> Result<Option<String>, DomainError> {
        self.call("get_default_prompt", json!({})).await
    }

    pub async fn save_default_prompt(&self, prompt: Option<&str>) -> Result<(), DomainError> {
        self.call("save_default_prompt", json!({ "prompt": prompt }))
            .await
    }

    pub async fn get_auto_paste_enabled(&self) -> Result<bool, DomainError> {
        self.call("get_auto_paste_enabled", json!({})).await
    }

    pub async fn save_auto_paste_enabled(&self, enabled: bool) -> Result<(), DomainError> {
        self.call("save_auto_paste_enabled", json!({ "enabled": enabled }))
            .await
    }

    pub async fn get_hold_to_record_enabled(&self) -> Result<bool, DomainError> {
        self.call("get_hold_to_record_enabled", json!({})).await
    }

    pub async fn save_hold_to_record_enabled(&self, enabled: bool) -> Result<(), DomainError> {
        self.call("save_hold_to_record_enabled", json!({ "enabled": enabled }))
            .await
    }

    pub async fn list_audio_input_devices(&self) -> Result<Vec<String>, DomainError> {
        self.call("list_audio_input_devices", json!({})).await
    }

    pub async fn get_selected_audio_input_device(&self) -> Result<Option<String>, DomainError> {
        self.call("get_selected_audio_input_device", json!({})).await
    }

    pub async fn save_selected_audio_input_device(
        &self,
        name: Option<&str>,
    ) -> Result<(), DomainError> {
        self.call("save_selected_audio_input_device", json!({ "name": name }))
            .await
    }

    /// Ask the backend to rebuild its input stream on the saved device.
    pub async fn apply_selected_audio_input_device(&self) -> Result<(), DomainError> {
        self.call("apply_selected_audio_input_device", json!({}))
            .await
    }

    pub async fn get_current_shortcut(&self) -> Result<ShortcutSpec, DomainError> {
        self.call("get_current_shortcut", json!({})).await
    }

    pub async fn save_custom_shortcut(&self, spec: &ShortcutSpec) -> Result<(), DomainError> {
        self.call("save_custom_shortcut", json!({ "config": spec }))
            .await
    }

    pub async fn get_models_status(&self) -> Result<CatalogSnapshot, DomainError> {
        self.call("get_models_status", json!({})).await
    }

    pub async fn download_model(&self, id: &str) -> Result<(), DomainError> {
        self.call("download_model", json!({ "id": id })).await
    }

    pub async fn select_model(&self, id: &str) -> Result<(), DomainError> {
        self.call("select_model", json!({ "id": id })).await
    }
}

/// Guards a user action against accidental duplicates.
///
/// In-flight commands cannot be cancelled, so a second click inside the
/// window is simply swallowed while the triggering control is disabled.
#[derive(Debug)]
pub struct CooldownGuard {
    window: Duration,
    armed_at: Option<Instant>,
}

impl CooldownGuard {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            armed_at: None,
        }
    }

    /// Arm the guard. Returns false while the previous arm is still
    /// inside the cooldown window.
    pub fn try_arm(&mut self, now: Instant) -> bool {
        match self.armed_at {
            Some(at) if now.duration_since(at) < self.window => false,
            _ => {
                self.armed_at = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Transport fake that records invocations and replays canned results.
    struct FakeTransport {
        calls: Mutex<Vec<(String, Value)>>,
        result: Box<dyn Fn(&str) -> Result<Value, DomainError> + Send + Sync>,
    }

    impl FakeTransport {
        fn replying(result: impl Fn(&str) -> Result<Value, DomainError> + Send + Sync + 'static) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                result: Box::new(result),
            })
        }

        fn calls(&self) -> Vec<(String, Value)> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl CommandTransport for FakeTransport {
        async fn invoke(&self, command: &str, args: Value) -> Result<Value, DomainError> {
            self.calls.lock().push((command.to_string(), args));
            (self.result)(command)
        }
    }

    #[tokio::test]
    async fn test_shortcut_commands_use_wire_shapes() {
        let transport = FakeTransport::replying(|name| match name {
            "get_current_shortcut" => Ok(json!({"modifiers": ["Super", "Shift"], "key": "F9"})),
            _ => Ok(Value::Null),
        });
        let gateway = CommandGateway::new(transport.clone());

        let spec = gateway.get_current_shortcut().await.unwrap();
        assert_eq!(spec.key, "F9");

        gateway.save_custom_shortcut(&spec).await.unwrap();
        let calls = transport.calls();
        assert_eq!(calls[1].0, "save_custom_shortcut");
        assert_eq!(
            calls[1].1,
            json!({"config": {"modifiers": ["Super", "Shift"], "key": "F9"}})
        );
    }

    #[tokio::test]
    async fn test_setting_commands_encode_arguments() {
        let transport = FakeTransport::replying(|_| Ok(Value::Null));
        let gateway = CommandGateway::new(transport.clone());

        gateway.save_default_language(Some("en")).await.unwrap();
        gateway.save_auto_paste_enabled(true).await.unwrap();
        gateway.download_model("large-v3-turbo").await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].1, json!({"language": "en"}));
        assert_eq!(calls[1].1, json!({"enabled": true}));
        assert_eq!(calls[2], ("download_model".to_string(), json!({"id": "large-v3-turbo"})));
    }

    #[tokio::test]
    async fn test_transport_failure_is_a_command_error() {
        let transport =
            FakeTransport::replying(|name| Err(DomainError::command(name, "backend unreachable")));
        let gateway = CommandGateway::new(transport);

        let err = gateway.toggle_recording().await.unwrap_err();
        assert!(matches!(err, DomainError::Command { ref name, .. } if name == "toggle_recording"));
    }

    #[tokio::test]
    async fn test_bad_response_shape_is_a_command_error() {
        let transport = FakeTransport::replying(|_| Ok(json!({"nope": 1})));
        let gateway = CommandGateway::new(transport);

        let err = gateway.get_current_shortcut().await.unwrap_err();
        assert!(matches!(err, DomainError::Command { .. }));
    }

    #[test]
    fn test_cooldown_guard_swallows_rapid_duplicates() {
        let mut guard = CooldownGuard::new(Duration::from_millis(400));
        let start = Instant::now();
        assert!(guard.try_arm(start));
        assert!(!guard.try_arm(start + Duration::from_millis(100)));
        assert!(!guard.try_arm(start + Duration::from_millis(399)));
        assert!(guard.try_arm(start + Duration::from_millis(400)));
    }
}
