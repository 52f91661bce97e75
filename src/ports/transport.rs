use async_trait::async_trait;
use serde_json::Value;

use crate::domain::DomainError;

/// Port for the backend command channel.
///
/// Every request/response operation goes through this interface: a named
/// command with optional structured arguments, answered with a typed
/// result or an error payload. Implementations bridge to the host process
/// (IPC, webview bridge, in-process backend). Commands cannot be cancelled
/// once issued.
#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// Invoke a named command and await its raw JSON result.
    ///
    /// Failures (backend unreachable, validation rejected, permission
    /// denied) surface as `DomainError::Command`.
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, DomainError>;
}
