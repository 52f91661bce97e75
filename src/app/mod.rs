pub mod capture;
pub mod catalog;
pub mod gateway;
pub mod reconciler;
pub mod registry;
pub mod settings;
pub mod shell;
pub mod throttle;

pub use capture::{CaptureState, ShortcutCapture};
pub use catalog::CatalogSync;
pub use gateway::{CommandGateway, CooldownGuard};
pub use reconciler::{LifecycleEvent, LifecycleReconciler, StatusClear};
pub use registry::{SubscriptionRegistry, TopicHandler};
pub use settings::SettingsPanel;
pub use shell::{Shell, UiIntent};
pub use throttle::LevelThrottle;
