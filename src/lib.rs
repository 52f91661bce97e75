#![forbid(unsafe_code)]

//! Client-side state core for a menu-bar voice dictation app.
//!
//! The backend (audio capture, speech engine, model storage, settings)
//! lives in another process and is reached through two channels: a
//! request/response command channel and a fire-and-forget event channel.
//! This crate subscribes to the event topics, folds them into one
//! coherent UI state, captures raw keyboard input into a portable
//! shortcut specification, and pushes everything through a render
//! surface the host paints.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use adapters::{SnapshotSurface, TomlConfigStore, UiSnapshot};
pub use app::{Shell, UiIntent};
pub use domain::{
    Accent, CatalogSnapshot, DomainError, DownloadProgress, KeyPress, LevelSample, ModelEntry,
    ModifierKey, Platform, RecordingStatus, ShellConfig, ShortcutSpec, TopicEvent,
};
pub use ports::{CommandTransport, ConfigStore, EventSource, RenderSurface, SettingsForm};
