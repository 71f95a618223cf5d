use std::fmt;

use super::ArgMatcher;

struct FromFn<F> {
    message: String,
    matcher: F,
}

impl<Arg, F> ArgMatcher<Arg> for FromFn<F>
where
    Arg: ?Sized,
    F: Fn(&Arg) -> bool,
{
    fn matches(&self, argument: &Arg) -> bool {
        (self.matcher)(argument)
    }
}

impl<F> fmt::Display for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Returns an [`ArgMatcher`] that succeeds based on the provided
/// closure, displayed as `message` in verification reports.
///
/// Prefer the [`from_fn!`](crate::from_fn!) macro, which uses the
/// source of the closure as the message.
pub fn from_fn<Arg>(
    matcher: impl Fn(&Arg) -> bool,
    message: impl fmt::Display,
) -> impl ArgMatcher<Arg>
where
    Arg: ?Sized,
{
    FromFn {
        matcher,
        message: message.to_string(),
    }
}

/// Returns an [`ArgMatcher`](crate::matcher::ArgMatcher) that
/// succeeds based on the provided closure.
///
/// The matcher displays as the source of the closure.
///
/// ```
/// use swapfn::{from_fn, matcher::ArgMatcher};
///
/// let mentions_method_two = from_fn!(|input: &String| input.contains("Method 2"));
/// assert!(mentions_method_two.matches(&"Method 1 called from Method 2".to_string()));
/// assert!(!mentions_method_two.matches(&"first call".to_string()));
/// ```
#[macro_export]
macro_rules! from_fn {
    ($matcher:expr) => {
        $crate::matcher::from_fn($matcher, stringify!($matcher))
    };
}

/// Returns an [`ArgMatcher`](crate::matcher::ArgMatcher) that
/// succeeds if the pattern matches.
///
/// Two forms are accepted: `pattern!(pattern)` and
/// `pattern!(type => pattern)`. Use the latter when the argument
/// type cannot be inferred.
///
/// ```
/// use swapfn::{pattern, matcher::ArgMatcher};
///
/// let small = pattern!(usize => 0..=2);
/// assert!(small.matches(&1));
/// assert!(!small.matches(&3));
/// ```
#[macro_export]
macro_rules! pattern {
    ($( $pattern:pat_param )|+ $( if $guard: expr )? $(,)?) => (
        $crate::matcher::from_fn(
            move |arg| matches!(arg, $($pattern)|+ $(if $guard)?),
            stringify!($($pattern)|+ $(if $guard)?),
        )
    );
    ($ty:ty => $( $pattern:pat_param )|+ $( if $guard: expr )? $(,)?) => (
        $crate::matcher::from_fn(
            move |arg: &$ty| matches!(arg, $($pattern)|+ $(if $guard)?),
            stringify!($($pattern)|+ $(if $guard)?),
        )
    );
}
