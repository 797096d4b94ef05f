use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityStatus {
    Secure,
    Insecure,
    Bogus,
    Indeterminate,
}

impl fmt::Display for SecurityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SecurityStatus::Secure => "SECURE",
            SecurityStatus::Insecure => "INSECURE",
            SecurityStatus::Bogus => "BOGUS",
            SecurityStatus::Indeterminate => "INDETERMINATE",
        };
        f.write_str(label)
    }
}

/// Outcome of a verification step.
///
/// Failure variants carry the reason chain ordered from the outermost
/// context to the innermost cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult<T> {
    Secure(T),
    Insecure(Vec<String>),
    Bogus(Vec<String>),
    Indeterminate(Vec<String>),
}

/// The failing half of a [`VerificationResult`], detached from its payload
/// type so it can be propagated across layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub status: SecurityStatus,
    pub reason_chain: Vec<String>,
}

impl<T> VerificationResult<T> {
    pub fn insecure(reason: impl Into<String>) -> Self {
        VerificationResult::Insecure(vec![reason.into()])
    }

    pub fn bogus(reason: impl Into<String>) -> Self {
        VerificationResult::Bogus(vec![reason.into()])
    }

    pub fn indeterminate(reason: impl Into<String>) -> Self {
        VerificationResult::Indeterminate(vec![reason.into()])
    }

    pub fn status(&self) -> SecurityStatus {
        match self {
            VerificationResult::Secure(_) => SecurityStatus::Secure,
            VerificationResult::Insecure(_) => SecurityStatus::Insecure,
            VerificationResult::Bogus(_) => SecurityStatus::Bogus,
            VerificationResult::Indeterminate(_) => SecurityStatus::Indeterminate,
        }
    }

    pub fn is_secure(&self) -> bool {
        matches!(self, VerificationResult::Secure(_))
    }

    /// Reasons behind a failure; empty when secure.
    pub fn reason_chain(&self) -> &[String] {
        match self {
            VerificationResult::Secure(_) => &[],
            VerificationResult::Insecure(reasons)
            | VerificationResult::Bogus(reasons)
            | VerificationResult::Indeterminate(reasons) => reasons,
        }
    }

    /// Prepend `context` to the reason chain of a failure. Secure results
    /// pass through untouched.
    pub fn augment(self, context: impl Into<String>) -> Self {
        match self.into_result() {
            Ok(value) => VerificationResult::Secure(value),
            Err(failure) => failure.augment(context).into(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> VerificationResult<U> {
        match self.into_result() {
            Ok(value) => VerificationResult::Secure(f(value)),
            Err(failure) => failure.into(),
        }
    }

    pub fn into_result(self) -> std::result::Result<T, Failure> {
        let (status, reason_chain) = match self {
            VerificationResult::Secure(value) => return Ok(value),
            VerificationResult::Insecure(reasons) => (SecurityStatus::Insecure, reasons),
            VerificationResult::Bogus(reasons) => (SecurityStatus::Bogus, reasons),
            VerificationResult::Indeterminate(reasons) => (SecurityStatus::Indeterminate, reasons),
        };
        Err(Failure {
            status,
            reason_chain,
        })
    }
}

impl Failure {
    pub fn augment(mut self, context: impl Into<String>) -> Self {
        self.reason_chain.insert(0, context.into());
        self
    }
}

impl<T> From<Failure> for VerificationResult<T> {
    fn from(failure: Failure) -> Self {
        match failure.status {
            SecurityStatus::Insecure => VerificationResult::Insecure(failure.reason_chain),
            SecurityStatus::Bogus => VerificationResult::Bogus(failure.reason_chain),
            // A failure is never secure; fall back to the weakest claim.
            SecurityStatus::Indeterminate | SecurityStatus::Secure => {
                VerificationResult::Indeterminate(failure.reason_chain)
            }
        }
    }
}
