//! Display name checks.

use crate::{Check, Verdict};
use async_trait::async_trait;
use bouncer_core::{ExecutionContext, FailureArg, FailureKind, FailureRecord};
use bouncer_error::{BouncerResult, CheckConfigError, CheckConfigErrorKind};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// A caller-supplied name test returning `(reported value, passed)`.
pub type NameTest = Arc<dyn Fn(&dyn ExecutionContext) -> (String, bool) + Send + Sync>;

#[derive(Clone)]
enum Rule {
    Contains(String),
    Custom(NameTest),
}

/// Passes when the actor's display name satisfies a rule.
///
/// The built-in rule is a case-insensitive substring test. Reports
/// `UsernameDoesNotContain(substring)`, or the value a custom test returned.
///
/// # Examples
///
/// ```
/// use bouncer_check::UsernameCheck;
///
/// let tagged = UsernameCheck::contains("[guild]").unwrap();
/// # let _ = tagged;
/// assert!(UsernameCheck::contains("").is_err());
/// ```
#[derive(Clone)]
pub struct UsernameCheck {
    rule: Rule,
}

impl UsernameCheck {
    /// The display name must contain `substring`, ignoring case.
    pub fn contains(substring: impl Into<String>) -> Result<Self, CheckConfigError> {
        let substring = substring.into();
        if substring.is_empty() {
            return Err(CheckConfigError::new(CheckConfigErrorKind::EmptySubstring));
        }
        Ok(Self {
            rule: Rule::Contains(substring),
        })
    }

    /// Decide with a custom test.
    pub fn with<F>(test: F) -> Self
    where
        F: Fn(&dyn ExecutionContext) -> (String, bool) + Send + Sync + 'static,
    {
        Self {
            rule: Rule::Custom(Arc::new(test)),
        }
    }
}

impl fmt::Debug for UsernameCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rule {
            Rule::Contains(substring) => f.debug_tuple("UsernameCheck").field(substring).finish(),
            Rule::Custom(_) => f.write_str("UsernameCheck(<custom>)"),
        }
    }
}

#[async_trait]
impl Check for UsernameCheck {
    fn name(&self) -> String {
        "username_contains".to_string()
    }

    #[instrument(skip_all, fields(check = "username"))]
    async fn evaluate(&self, ctx: &dyn ExecutionContext) -> BouncerResult<Verdict> {
        let (reported, passed) = match &self.rule {
            Rule::Contains(substring) => {
                let name = ctx.actor().display_name().to_lowercase();
                (substring.clone(), name.contains(&substring.to_lowercase()))
            }
            Rule::Custom(test) => test(ctx),
        };
        debug!(passed, "Evaluated display name");
        Ok(Verdict::new(
            passed,
            FailureRecord::new(FailureKind::UsernameDoesNotContain, vec![FailureArg::Text(reported)]),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bouncer_core::{MockContext, UserId};

    #[tokio::test]
    async fn substring_ignores_case() {
        let ctx = MockContext::dm(UserId::new(1)).with_display_name("Ferris [MOD]");
        assert!(UsernameCheck::contains("[mod]").unwrap().evaluate(&ctx).await.unwrap().passed());
    }

    #[tokio::test]
    async fn custom_tests_report_their_value() {
        let ctx = MockContext::dm(UserId::new(1)).with_display_name("ab");
        let check = UsernameCheck::with(|ctx| {
            let len = ctx.actor().display_name().chars().count();
            (format!("{len} characters"), len >= 3)
        });
        let verdict = check.evaluate(&ctx).await.unwrap();
        assert!(!verdict.passed());
        assert_eq!(verdict.record().args(), &vec![FailureArg::Text("2 characters".to_string())]);
    }
}
