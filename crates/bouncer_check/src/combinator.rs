//! Logical combinators over checks.

use crate::{BoxedCheck, Check, CheckExt, Verdict};
use async_trait::async_trait;
use bouncer_core::{ExecutionContext, FailureRecord};
use bouncer_error::BouncerResult;
use tracing::{debug, instrument};

fn join_names(children: &[BoxedCheck]) -> String {
    children
        .iter()
        .map(|child| child.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Logical negation.
///
/// Reports the inverse of the child's kind with the child's arguments, so
/// `Not(in_channel(5))` explains itself as `InChannel([5])`.
pub struct Not {
    inner: BoxedCheck,
}

impl Not {
    /// Negate a check.
    pub fn new(check: impl Check + 'static) -> Self {
        Self {
            inner: check.boxed(),
        }
    }
}

#[async_trait]
impl Check for Not {
    fn name(&self) -> String {
        format!("not({})", self.inner.name())
    }

    #[instrument(skip_all, fields(check = "not"))]
    async fn evaluate(&self, ctx: &dyn ExecutionContext) -> BouncerResult<Verdict> {
        let verdict = self.inner.evaluate(ctx).await?.negate();
        debug!(passed = verdict.passed(), kind = %verdict.record().kind(), "Negated child");
        Ok(verdict)
    }
}

/// Passes when any child passes.
///
/// Children run in order and evaluation stops at the first success. When every
/// child fails the reason is [`FailureKind::Generic`](bouncer_core::FailureKind::Generic);
/// the children's own reasons are discarded. An empty `Any` fails.
pub struct Any {
    children: Vec<BoxedCheck>,
}

impl Any {
    /// Combine checks with logical or.
    pub fn new(children: impl IntoIterator<Item = BoxedCheck>) -> Self {
        Self {
            children: children.into_iter().collect(),
        }
    }

    /// Add another alternative.
    pub fn or(mut self, check: impl Check + 'static) -> Self {
        self.children.push(check.boxed());
        self
    }
}

#[async_trait]
impl Check for Any {
    fn name(&self) -> String {
        format!("any({})", join_names(&self.children))
    }

    #[instrument(skip_all, fields(check = "any", children = self.children.len()))]
    async fn evaluate(&self, ctx: &dyn ExecutionContext) -> BouncerResult<Verdict> {
        for (index, child) in self.children.iter().enumerate() {
            if child.evaluate(ctx).await?.passed() {
                debug!(index, "Child passed, short-circuiting");
                return Ok(Verdict::pass(FailureRecord::generic()));
            }
        }
        debug!("No child passed");
        Ok(Verdict::fail(FailureRecord::generic()))
    }
}

/// Passes when every child passes.
///
/// Children run in order and evaluation stops at the first failure, whose
/// exact record is reported. A passing `All` reports
/// [`FailureKind::Generic`](bouncer_core::FailureKind::Generic). An empty `All`
/// passes.
pub struct All {
    children: Vec<BoxedCheck>,
}

impl All {
    /// Combine checks with logical and.
    pub fn new(children: impl IntoIterator<Item = BoxedCheck>) -> Self {
        Self {
            children: children.into_iter().collect(),
        }
    }

    /// Add another requirement.
    pub fn and(mut self, check: impl Check + 'static) -> Self {
        self.children.push(check.boxed());
        self
    }
}

#[async_trait]
impl Check for All {
    fn name(&self) -> String {
        format!("all({})", join_names(&self.children))
    }

    #[instrument(skip_all, fields(check = "all", children = self.children.len()))]
    async fn evaluate(&self, ctx: &dyn ExecutionContext) -> BouncerResult<Verdict> {
        for (index, child) in self.children.iter().enumerate() {
            let verdict = child.evaluate(ctx).await?;
            if !verdict.passed() {
                debug!(index, record = %verdict.record(), "Child failed, short-circuiting");
                return Ok(verdict);
            }
        }
        debug!("Every child passed");
        Ok(Verdict::pass(FailureRecord::generic()))
    }
}

/// Alias for [`Any`].
pub type Or = Any;

/// Alias for [`All`].
pub type And = All;
