//! Lifecycle hooks the dispatcher calls into.

use async_trait::async_trait;

use super::CommandDispatcher;

/// Lifecycle callbacks supplied by the application.
#[async_trait]
pub trait DispatcherHooks: Send + Sync {
    /// Called when the client reports its connection is active. Clients
    /// normally do this once; a client that emits `Ready` again after a
    /// reconnect invokes the hook again.
    async fn on_ready(&self, _dispatcher: &CommandDispatcher) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

#[async_trait]
impl DispatcherHooks for NoopHooks {}
