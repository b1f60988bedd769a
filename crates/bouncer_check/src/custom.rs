//! Checks backed by an arbitrary predicate.

use crate::{Check, Verdict};
use async_trait::async_trait;
use bouncer_core::{ExecutionContext, FailureRecord};
use bouncer_error::BouncerResult;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// An asynchronous predicate over an invocation.
pub type Predicate =
    Arc<dyn for<'a> Fn(&'a dyn ExecutionContext) -> BoxFuture<'a, BouncerResult<bool>> + Send + Sync>;

/// Passes when the predicate returns `true`.
///
/// Always reports `Generic()`. Errors from the predicate propagate as host
/// failures.
///
/// # Examples
///
/// ```
/// use bouncer_check::CustomCheck;
/// use futures::FutureExt;
///
/// let long_names = CustomCheck::new(|ctx| {
///     async move { Ok(ctx.actor().name().len() > 3) }.boxed()
/// });
/// # let _ = long_names;
/// ```
#[derive(Clone)]
pub struct CustomCheck {
    predicate: Predicate,
}

impl CustomCheck {
    /// Wrap a predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: for<'a> Fn(&'a dyn ExecutionContext) -> BoxFuture<'a, BouncerResult<bool>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
        }
    }
}

impl fmt::Debug for CustomCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomCheck")
    }
}

#[async_trait]
impl Check for CustomCheck {
    fn name(&self) -> String {
        "custom".to_string()
    }

    #[instrument(skip_all, fields(check = "custom"))]
    async fn evaluate(&self, ctx: &dyn ExecutionContext) -> BouncerResult<Verdict> {
        let passed = (self.predicate)(ctx).await?;
        debug!(passed, "Evaluated custom predicate");
        Ok(Verdict::new(passed, FailureRecord::generic()))
    }
}
