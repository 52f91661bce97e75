pub mod config_store;
pub mod snapshot;

pub use config_store::TomlConfigStore;
pub use snapshot::{SnapshotSurface, UiSnapshot};
