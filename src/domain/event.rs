use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::DomainError;

/// Backend event topics.
///
/// Each topic is attached exactly once at startup; the payload shapes are
/// documented on the structs below.
pub mod topics {
    pub const ACCESSIBILITY_STATUS: &str = "accessibility-status";
    pub const RECORDING_START: &str = "recording-start";
    pub const RECORDING_STOP: &str = "recording-stop";
    pub const AUDIO_LEVEL: &str = "audio-level";
    pub const TRANSCRIPTION_START: &str = "transcription-start";
    pub const TRANSCRIPTION: &str = "transcription";
    pub const TRANSCRIPTION_PROFILE: &str = "transcription-profile";
    pub const BACKEND_STATUS: &str = "backend-status";
    pub const TRANSCRIPTION_COMPLETE: &str = "transcription-complete";
    pub const TRANSCRIPTION_FAILED: &str = "transcription-failed";
    pub const MODEL_DOWNLOAD_START: &str = "model-download-start";
    pub const MODEL_DOWNLOAD_PROGRESS: &str = "model-download-progress";
    pub const MODEL_DOWNLOAD_COMPLETE: &str = "model-download-complete";
    pub const MODEL_DOWNLOAD_ERROR: &str = "model-download-error";
    pub const NO_MODEL_SELECTED: &str = "no-model-selected";
}

/// A raw event as delivered by the backend channel: topic name plus an
/// undecoded JSON payload.
#[derive(Debug, Clone)]
pub struct TopicEvent {
    pub topic: String,
    pub payload: Value,
}

impl TopicEvent {
    pub fn new(topic: impl Into<String>, payload: Value) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }
}

/// Decode a topic payload, mapping failures to a malformed-event error so
/// the subscription layer can drop the event and keep going.
pub fn decode_payload<T: DeserializeOwned>(topic: &str, payload: &Value) -> Result<T, DomainError> {
    serde_json::from_value(payload.clone()).map_err(|e| DomainError::malformed(topic, e.to_string()))
}

/// Payload of `accessibility-status`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AccessibilityStatus {
    pub trusted: bool,
}

/// Payload of `transcription`.
#[derive(Debug, Clone, Deserialize)]
pub struct Transcription {
    pub text: String,
}

/// Payload of `model-download-start`.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadStart {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub total_bytes: Option<u64>,
}

/// Payload of `model-download-complete`.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadComplete {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub selected: bool,
}

/// Payload of `backend-status`: engine diagnostics emitted once at backend
/// startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendDiagnostics {
    #[serde(default)]
    pub target_os: String,
    #[serde(default)]
    pub metallib_present: bool,
    #[serde(default)]
    pub likely_using_metal: bool,
}

impl BackendDiagnostics {
    /// Single-line summary for the diagnostics region.
    #[must_use]
    pub fn summary(&self) -> String {
        let engine = if self.likely_using_metal { "metal" } else { "cpu" };
        if self.target_os.is_empty() {
            format!("engine: {engine}")
        } else {
            format!("engine: {engine} ({})", self.target_os)
        }
    }
}

/// Payload of `transcription-profile`: timing breakdown for the last
/// transcription round trip.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileReport {
    #[serde(default)]
    pub client: ClientTimings,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ClientTimings {
    #[serde(default)]
    pub total_ms: u64,
}

impl ProfileReport {
    /// Single-line summary for the diagnostics region.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("last transcription: {} ms", self.client.total_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_accessibility_payload() {
        let status: AccessibilityStatus =
            decode_payload(topics::ACCESSIBILITY_STATUS, &serde_json::json!({"trusted": false}))
                .unwrap();
        assert!(!status.trusted);
    }

    #[test]
    fn test_decode_malformed_payload_is_rejected() {
        let err = decode_payload::<Transcription>(
            topics::TRANSCRIPTION,
            &serde_json::json!({"text": 42}),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::MalformedEvent { ref topic, .. } if topic == "transcription"));
    }

    #[test]
    fn test_download_start_tolerates_missing_total() {
        let start: DownloadStart =
            decode_payload(topics::MODEL_DOWNLOAD_START, &serde_json::json!({"id": "base"}))
                .unwrap();
        assert_eq!(start.id, "base");
        assert_eq!(start.total_bytes, None);
    }

    #[test]
    fn test_backend_diagnostics_summary() {
        let diag: BackendDiagnostics = decode_payload(
            topics::BACKEND_STATUS,
            &serde_json::json!({
                "target_os": "macos",
                "metallib_present": true,
                "likely_using_metal": true
            }),
        )
        .unwrap();
        assert_eq!(diag.summary(), "engine: metal (macos)");

        let empty = BackendDiagnostics::default();
        assert_eq!(empty.summary(), "engine: cpu");
    }

    #[test]
    fn test_profile_report_summary() {
        let report: ProfileReport = decode_payload(
            topics::TRANSCRIPTION_PROFILE,
            &serde_json::json!({"client": {"total_ms": 840, "http_ms": 700}, "server": {}}),
        )
        .unwrap();
        assert_eq!(report.summary(), "last transcription: 840 ms");
    }
}
