//! Tools to check the arguments a substitute forwards to a
//! [`Recorder`](crate::Recorder).

mod any;
mod eq;
mod from_fn;
mod invocation_matcher;

use std::fmt;

pub use any::{any, Any};
pub use eq::{eq, Eq};
pub use from_fn::from_fn;
pub use invocation_matcher::{AnyInvocation, InvocationMatcher};

/// Matcher for a single argument of a callable.
///
/// The [`Display`](fmt::Display) supertrait is used when a
/// verification report needs to show what was expected.
///
/// ```
/// use swapfn::matcher::{self, ArgMatcher};
///
/// let first_call = matcher::eq("first call");
/// assert!(first_call.matches(&"first call".to_string()));
/// assert!(!first_call.matches(&"second call".to_string()));
/// ```
pub trait ArgMatcher<Arg: ?Sized>: fmt::Display {
    /// Returns whether the argument matches.
    fn matches(&self, argument: &Arg) -> bool;
}
