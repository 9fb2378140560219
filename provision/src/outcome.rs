//! Tri-state result of one platform operation.
//!
//! Decided once at the client boundary; callers branch on [`Outcome`], never
//! on raw status codes.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The platform already holds the desired end state.
    BenignConflict,
    Failure(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::Failure(_))
    }

    /// Classifies an HTTP status against the codes an operation accepts.
    pub fn from_status(status: u16, policy: &StatusPolicy) -> Self {
        if policy.success.contains(&status) {
            Outcome::Success
        } else if policy.benign.contains(&status) {
            Outcome::BenignConflict
        } else {
            Outcome::Failure(format!("unexpected status {status}"))
        }
    }

    /// Folds two outcomes of one logical operation. Failures win, then
    /// plain successes; two benign conflicts stay benign.
    pub fn combine(self, other: Outcome) -> Outcome {
        match (self, other) {
            (Outcome::Failure(a), Outcome::Failure(b)) => Outcome::Failure(format!("{a}; {b}")),
            (failure @ Outcome::Failure(_), _) | (_, failure @ Outcome::Failure(_)) => failure,
            (Outcome::BenignConflict, Outcome::BenignConflict) => Outcome::BenignConflict,
            _ => Outcome::Success,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::BenignConflict => write!(f, "already in desired state"),
            Outcome::Failure(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Status codes an operation accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPolicy {
    pub success: &'static [u16],
    pub benign: &'static [u16],
}

/// Create where "already exists" (409) is fine.
pub const CREATED_OR_EXISTS: StatusPolicy = StatusPolicy {
    success: &[201],
    benign: &[409],
};

/// ACL attachment; the platform answers 204 and 409 for an existing pair.
pub const NO_CONTENT_OR_EXISTS: StatusPolicy = StatusPolicy {
    success: &[204],
    benign: &[409],
};

pub const OK_ONLY: StatusPolicy = StatusPolicy {
    success: &[200],
    benign: &[],
};

pub const NO_CONTENT_ONLY: StatusPolicy = StatusPolicy {
    success: &[204],
    benign: &[],
};
