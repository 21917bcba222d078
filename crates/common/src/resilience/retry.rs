//! Retry decisions and attempt budgets
//!
//! Errors describe how they want to be retried through [`Retryable`]; the
//! loop that acts on the decision owns a [`RetryBudget`] so the number of
//! attempts per logical call stays bounded.

use std::time::Duration;

/// Decision for whether to retry an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry immediately
    Retry,
    /// Retry after sleeping for the given delay
    RetryAfter(Duration),
    /// Don't retry the operation
    Stop,
}

impl RetryDecision {
    /// Whether another attempt is wanted.
    #[must_use]
    pub fn should_retry(&self) -> bool {
        !matches!(self, Self::Stop)
    }

    /// Delay to observe before the next attempt.
    #[must_use]
    pub fn delay(&self) -> Duration {
        match self {
            Self::RetryAfter(delay) => *delay,
            Self::Retry | Self::Stop => Duration::ZERO,
        }
    }
}

/// Errors that know their own retry policy.
pub trait Retryable {
    /// How a caller should react to this error.
    fn retry_decision(&self) -> RetryDecision;
}

/// Counts attempts against a fixed maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    max_attempts: u32,
    used: u32,
}

impl RetryBudget {
    /// Budget allowing `max_attempts` attempts in total (at least one).
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts: max_attempts.max(1), used: 0 }
    }

    /// Claim an attempt. Returns the 1-based attempt number, or `None` when
    /// the budget is spent.
    pub fn next_attempt(&mut self) -> Option<u32> {
        if self.used >= self.max_attempts {
            return None;
        }
        self.used += 1;
        Some(self.used)
    }

    /// Attempts claimed so far.
    #[must_use]
    pub fn used(&self) -> u32 {
        self.used
    }

    /// Maximum attempts.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// True once no further attempt may be claimed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.used >= self.max_attempts
    }
}
