use serde::{Deserialize, Serialize};

/// Recording pipeline status as shown to the user.
///
/// Exactly one value is active at a time. Transitions are driven only by
/// backend lifecycle events; nothing in the client infers a status on its
/// own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RecordingStatus {
    #[default]
    Idle,
    Recording,
    Transcribing,
    Ready,
    Error,
}

impl RecordingStatus {
    /// Label for the capture toggle button in this status.
    #[must_use]
    pub fn button_label(&self) -> &'static str {
        match self {
            RecordingStatus::Recording => "Stop",
            _ => "Start",
        }
    }
}

/// Visual accent accompanying a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Accent {
    #[default]
    None,
    Red,
    Amber,
    Green,
}
