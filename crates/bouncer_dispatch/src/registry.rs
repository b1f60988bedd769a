//! Routing errors to the dispatcher registered for their command.

use crate::ErrorDispatcher;
use bouncer_core::{CommandError, CommandId, ExecutionContext};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Maps command ids to dispatchers.
///
/// Commands without their own dispatcher use the fallback, if one is set.
///
/// # Examples
///
/// ```
/// use bouncer_dispatch::{DispatchRegistry, ErrorDispatcher};
///
/// let registry = DispatchRegistry::new()
///     .register("admin purge", ErrorDispatcher::default())
///     .with_fallback(ErrorDispatcher::default());
///
/// assert!(registry.get(&"admin purge".into()).is_some());
/// assert!(registry.get(&"ping".into()).is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DispatchRegistry {
    dispatchers: HashMap<CommandId, Arc<ErrorDispatcher>>,
    fallback: Option<Arc<ErrorDispatcher>>,
}

impl DispatchRegistry {
    /// An empty registry without a fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle errors from `command` with `dispatcher`.
    pub fn register(
        mut self,
        command: impl Into<CommandId>,
        dispatcher: impl Into<Arc<ErrorDispatcher>>,
    ) -> Self {
        self.dispatchers.insert(command.into(), dispatcher.into());
        self
    }

    /// Handle errors from unregistered commands with `dispatcher`.
    pub fn with_fallback(mut self, dispatcher: impl Into<Arc<ErrorDispatcher>>) -> Self {
        self.fallback = Some(dispatcher.into());
        self
    }

    /// The dispatcher responsible for `command`.
    pub fn get(&self, command: &CommandId) -> Option<&Arc<ErrorDispatcher>> {
        self.dispatchers.get(command).or(self.fallback.as_ref())
    }

    /// Number of commands with their own dispatcher.
    pub fn len(&self) -> usize {
        self.dispatchers.len()
    }

    /// Whether no command has its own dispatcher.
    pub fn is_empty(&self) -> bool {
        self.dispatchers.is_empty()
    }

    /// Hand `error` to the dispatcher for the invoking command.
    ///
    /// Returns `false` when no dispatcher applies and the error was dropped.
    #[instrument(skip_all, fields(command = %ctx.command().id()))]
    pub async fn route(&self, ctx: &dyn ExecutionContext, error: CommandError) -> bool {
        match self.get(ctx.command().id()) {
            Some(dispatcher) => {
                debug!("Routing command error");
                dispatcher.handle(ctx, error).await;
                true
            }
            None => {
                warn!(error = %error, "No dispatcher registered for command");
                false
            }
        }
    }
}
