use thiserror::Error;

use super::Times;

/// A call a substitute forwarded to the [`Recorder`](super::Recorder)
/// that could not be answered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// No registered expectation accepts the arguments.
    #[error("✗ unexpected call to `{name}` with {args}{}", render_closest(.closest))]
    Unmatched {
        name: &'static str,
        args: String,
        /// Why each expectation registered for `name` rejected the call.
        closest: Vec<String>,
    },

    /// Every expectation accepting the arguments was already called
    /// as often as it allows.
    #[error("✗ `{name}` with {args} was called more often than expected ({expected})")]
    OverCalled {
        name: &'static str,
        args: String,
        expected: Times,
    },

    /// The callable was registered with different argument or return
    /// types than it was called with.
    #[error("✗ `{name}` was used with a different signature than it was registered with")]
    SignatureMismatch { name: &'static str },
}

/// A single reason why [`Recorder::verify`](super::Recorder::verify)
/// failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    #[error("✗ `{name}` with {expectation} was expected {expected} but was called {actual} time(s)")]
    Unmet {
        name: &'static str,
        expectation: String,
        expected: Times,
        actual: usize,
    },

    #[error(transparent)]
    Call(#[from] CallError),
}

/// Every failure collected up to the verification point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} expectation failure(s):\n\n{}", .failures.len(), render_failures(.failures))]
pub struct VerificationError {
    failures: Vec<Failure>,
}

impl VerificationError {
    pub(crate) fn new(failures: Vec<Failure>) -> Self {
        VerificationError { failures }
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }
}

fn render_closest(closest: &[String]) -> String {
    if closest.is_empty() {
        String::new()
    } else {
        format!("\n\n{}", closest.join("\n\n"))
    }
}

fn render_failures(failures: &[Failure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n\n")
}
