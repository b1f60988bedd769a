//! Guild membership duration checks.

use crate::{Check, Verdict};
use async_trait::async_trait;
use bouncer_core::{ExecutionContext, FailureArg, FailureKind, FailureRecord};
use bouncer_error::{BouncerResult, CheckConfigError, CheckConfigErrorKind};
use tracing::{debug, instrument};

/// The unit membership bounds are written in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum TimeUnit {
    /// Seconds
    #[default]
    #[strum(serialize = "s")]
    Seconds,
    /// Minutes
    #[strum(serialize = "m")]
    Minutes,
    /// Hours
    #[strum(serialize = "h")]
    Hours,
    /// Days
    #[strum(serialize = "d")]
    Days,
    /// Weeks
    #[strum(serialize = "w")]
    Weeks,
    /// Years of 52 weeks
    #[strum(serialize = "y")]
    Years,
}

impl TimeUnit {
    /// Length of one unit in seconds.
    pub const fn seconds(self) -> u64 {
        match self {
            TimeUnit::Seconds => 1,
            TimeUnit::Minutes => 60,
            TimeUnit::Hours => 60 * 60,
            TimeUnit::Days => 60 * 60 * 24,
            TimeUnit::Weeks => 60 * 60 * 24 * 7,
            TimeUnit::Years => 60 * 60 * 24 * 7 * 52,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Comparison {
    AtLeast,
    GreaterThan,
    AtMost,
    LessThan,
}

impl Comparison {
    /// The kind naming the state that violates this comparison.
    fn kind(self) -> FailureKind {
        match self {
            Comparison::AtLeast => FailureKind::MembershipLT,
            Comparison::GreaterThan => FailureKind::MembershipLE,
            Comparison::AtMost => FailureKind::MembershipGT,
            Comparison::LessThan => FailureKind::MembershipGE,
        }
    }

    fn holds(self, elapsed: f64, limit: f64) -> bool {
        match self {
            Comparison::AtLeast => elapsed >= limit,
            Comparison::GreaterThan => elapsed > limit,
            Comparison::AtMost => elapsed <= limit,
            Comparison::LessThan => elapsed < limit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bound {
    comparison: Comparison,
    limit: f64,
}

/// Compares how long the actor has been in the invoking guild to one or two bounds.
///
/// Bounds are written in a [`TimeUnit`] and added one at a time; two bounds
/// form a range. Each builder call returns a new check.
///
/// A failure reports the violated bound's kind with
/// `(violated seconds, other kind, other seconds)`, or just `(seconds)` for a
/// single bound. Actors without a join time fail. A check without bounds
/// always passes.
///
/// # Examples
///
/// ```
/// use bouncer_check::{MembershipCheck, TimeUnit};
///
/// let week_to_month = MembershipCheck::new(TimeUnit::Days)
///     .at_least(7.0)?
///     .at_most(30.0)?;
/// # let _ = week_to_month;
///
/// assert!(MembershipCheck::new(TimeUnit::Days).at_least(-1.0).is_err());
/// # Ok::<(), bouncer_error::CheckConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipCheck {
    unit: TimeUnit,
    bounds: Vec<Bound>,
}

impl MembershipCheck {
    /// A check without bounds, in `unit`.
    pub fn new(unit: TimeUnit) -> Self {
        Self {
            unit,
            bounds: Vec::new(),
        }
    }

    fn bounded(&self, comparison: Comparison, limit: f64) -> Result<Self, CheckConfigError> {
        if !limit.is_finite() || limit < 0.0 {
            return Err(CheckConfigError::new(CheckConfigErrorKind::InvalidBound(
                limit.to_string(),
            )));
        }
        if self.bounds.len() >= 2 {
            return Err(CheckConfigError::new(CheckConfigErrorKind::RangeFull));
        }
        let mut bounds = self.bounds.clone();
        bounds.push(Bound { comparison, limit });
        Ok(Self {
            unit: self.unit,
            bounds,
        })
    }

    /// Membership must be at least `limit` units.
    pub fn at_least(&self, limit: f64) -> Result<Self, CheckConfigError> {
        self.bounded(Comparison::AtLeast, limit)
    }

    /// Membership must exceed `limit` units.
    pub fn greater_than(&self, limit: f64) -> Result<Self, CheckConfigError> {
        self.bounded(Comparison::GreaterThan, limit)
    }

    /// Membership must be at most `limit` units.
    pub fn at_most(&self, limit: f64) -> Result<Self, CheckConfigError> {
        self.bounded(Comparison::AtMost, limit)
    }

    /// Membership must be shorter than `limit` units.
    pub fn less_than(&self, limit: f64) -> Result<Self, CheckConfigError> {
        self.bounded(Comparison::LessThan, limit)
    }

    fn seconds(&self, bound: &Bound) -> FailureArg {
        FailureArg::Seconds((bound.limit * self.unit.seconds() as f64).round() as u64)
    }

    /// The record for `primary`, naming the other bound as the alternative.
    fn record(&self, primary: usize) -> FailureRecord {
        let bound = &self.bounds[primary];
        let mut args = vec![self.seconds(bound)];
        if let Some(other) = self
            .bounds
            .iter()
            .enumerate()
            .find(|(index, _)| *index != primary)
            .map(|(_, other)| other)
        {
            args.push(FailureArg::Kind(other.comparison.kind()));
            args.push(self.seconds(other));
        }
        FailureRecord::new(bound.comparison.kind(), args)
    }
}

#[async_trait]
impl Check for MembershipCheck {
    fn name(&self) -> String {
        "membership".to_string()
    }

    #[instrument(skip_all, fields(check = "membership", unit = %self.unit, bounds = self.bounds.len()))]
    async fn evaluate(&self, ctx: &dyn ExecutionContext) -> BouncerResult<Verdict> {
        if self.bounds.is_empty() {
            return Ok(Verdict::pass(FailureRecord::generic()));
        }
        let Some(joined_at) = *ctx.actor().joined_at() else {
            debug!("Actor has no join time");
            return Ok(Verdict::fail(self.record(0)));
        };

        let elapsed_ms = (ctx.now() - joined_at).num_milliseconds() as f64;
        let elapsed = elapsed_ms / 1000.0 / self.unit.seconds() as f64;
        let violated = self
            .bounds
            .iter()
            .position(|bound| !bound.comparison.holds(elapsed, bound.limit));

        debug!(elapsed, ?violated, "Evaluated membership duration");
        Ok(match violated {
            Some(index) => Verdict::fail(self.record(index)),
            None => Verdict::pass(self.record(0)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bouncer_core::{GuildId, MockContext, UserId};
    use chrono::{Duration, Utc};
    use std::str::FromStr;

    fn member_for(days: i64) -> MockContext {
        let now = Utc::now();
        MockContext::in_guild(UserId::new(1), GuildId::new(2))
            .with_now(now)
            .with_joined_at(now - Duration::days(days))
    }

    #[test]
    fn years_are_fifty_two_weeks() {
        assert_eq!(TimeUnit::Years.seconds(), 52 * TimeUnit::Weeks.seconds());
        assert_eq!(TimeUnit::from_str("d").unwrap(), TimeUnit::Days);
    }

    #[test]
    fn third_bound_is_rejected() {
        let err = MembershipCheck::new(TimeUnit::Hours)
            .greater_than(1.0)
            .and_then(|check| check.less_than(5.0))
            .and_then(|check| check.less_than(6.0))
            .unwrap_err();
        assert_eq!(err.kind(), &CheckConfigErrorKind::RangeFull);
    }

    #[test]
    fn non_finite_bounds_are_rejected() {
        let err = MembershipCheck::new(TimeUnit::Days).at_most(f64::NAN).unwrap_err();
        assert!(matches!(err.kind(), CheckConfigErrorKind::InvalidBound(_)));
    }

    #[tokio::test]
    async fn single_bound_reports_its_seconds() {
        let check = MembershipCheck::new(TimeUnit::Days).greater_than(2.0).unwrap();
        let verdict = check.evaluate(&member_for(1)).await.unwrap();
        assert!(!verdict.passed());
        assert_eq!(
            verdict.record(),
            &FailureRecord::new(FailureKind::MembershipLE, vec![FailureArg::Seconds(172_800)])
        );
    }

    #[tokio::test]
    async fn missing_join_time_fails() {
        let ctx = MockContext::in_guild(UserId::new(1), GuildId::new(2));
        let check = MembershipCheck::new(TimeUnit::Seconds).at_least(0.0).unwrap();
        assert!(!check.evaluate(&ctx).await.unwrap().passed());
    }

    #[tokio::test]
    async fn no_bounds_always_passes() {
        let ctx = MockContext::dm(UserId::new(1));
        let check = MembershipCheck::new(TimeUnit::Weeks);
        assert!(check.evaluate(&ctx).await.unwrap().passed());
    }

    #[tokio::test]
    async fn negation_flips_strictness() {
        let check = MembershipCheck::new(TimeUnit::Days).at_least(7.0).unwrap();
        let verdict = check.evaluate(&member_for(10)).await.unwrap().negate();
        assert!(!verdict.passed());
        assert_eq!(*verdict.record().kind(), FailureKind::MembershipGE);
    }
}
