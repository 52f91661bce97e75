pub mod config;
pub mod events;
pub mod surface;
pub mod transport;

pub use config::ConfigStore;
pub use events::EventSource;
pub use surface::{RenderSurface, SettingsForm};
pub use transport::CommandTransport;
