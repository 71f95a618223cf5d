//! The expectation-recording and verification collaborator.
//!
//! A [`Recorder`] is shared between a test and the substitutes it
//! installs into a [`Service`](crate::Service). The test registers
//! expectations up front, substitutes forward their arguments at call
//! time, and the test verifies once at the end.

mod error;
mod expect;
mod expectation;

use std::{collections::BTreeMap, fmt, sync::Arc};

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

pub use error::{CallError, Failure, VerificationError};
pub use expect::Expect;
pub use expectation::Times;

use crate::matcher::InvocationMatcher;
use expectation::{ErasedGroup, Expectation, Group};

/// When call failures are surfaced by [`Recorder::answer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Unmatched calls are answered with a default value and reported
    /// at the verification point.
    #[default]
    Deferred,
    /// Unmatched calls panic as soon as they happen.
    FailFast,
}

/// A call forwarded to the recorder, matched or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub name: &'static str,
    /// `Debug` rendering of the arguments.
    pub args: String,
}

#[derive(Default)]
struct Inner {
    strictness: Strictness,
    groups: Mutex<BTreeMap<&'static str, Arc<dyn ErasedGroup>>>,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<Vec<Failure>>,
}

/// Records expected calls, answers forwarded calls, and verifies the
/// expectations were met.
///
/// Cloning a `Recorder` clones the handle; every clone shares the
/// same expectations and call log.
///
/// ```
/// use swapfn::{matcher, Recorder};
///
/// let recorder = Recorder::new();
/// recorder
///     .expect::<String, String>("method_one")
///     .with_args((matcher::eq("first call"),))
///     .returns("my custom return".to_string());
///
/// let forwarded: String = recorder.answer("method_one", "first call".to_string());
/// assert_eq!(forwarded, "my custom return");
/// assert!(recorder.verify().is_ok());
/// ```
#[derive(Clone, Default)]
pub struct Recorder {
    inner: Arc<Inner>,
}

impl Recorder {
    /// Creates a recorder that defers call failures to [`verify`].
    ///
    /// [`verify`]: Recorder::verify
    pub fn new() -> Self {
        Recorder::default()
    }

    /// Creates a recorder that panics on the first failed call.
    pub fn fail_fast() -> Self {
        Recorder::with_strictness(Strictness::FailFast)
    }

    pub fn with_strictness(strictness: Strictness) -> Self {
        Recorder {
            inner: Arc::new(Inner {
                strictness,
                ..Inner::default()
            }),
        }
    }

    pub fn strictness(&self) -> Strictness {
        self.inner.strictness
    }

    /// Starts registering an expectation for the callable `name`,
    /// taking arguments `I` and answering with `O`.
    ///
    /// Single-argument callables use the argument itself as `I`;
    /// callables with no arguments use `()`; callables with several
    /// arguments use a tuple.
    pub fn expect<I, O>(&self, name: &'static str) -> Expect<'_, I, O> {
        Expect::new(name, self)
    }

    fn register<I: 'static, O: 'static>(
        &self,
        name: &'static str,
        matcher: Box<dyn InvocationMatcher<I> + Send>,
        answer: Box<dyn FnMut(&I) -> O + Send>,
        times: Times,
    ) {
        let expectation = Expectation::new(matcher, answer, times);
        debug!(name, ?expectation, "registered expectation");

        // registering is quick and never runs user code so the store
        // stays locked for the whole insertion
        let mut groups = self.inner.groups.lock();
        let group = groups
            .entry(name)
            .or_insert_with(|| Arc::new(Mutex::new(Group::<I, O>::new())))
            .clone();

        match group.into_any().downcast::<Mutex<Group<I, O>>>() {
            Ok(group) => group.lock().push(expectation),
            Err(_) => self.fail(CallError::SignatureMismatch { name }.into()),
        }
    }

    /// Matches a forwarded call against the expectations registered
    /// for `name` and returns the configured answer.
    ///
    /// Expectations are tried in registration order. Failed calls are
    /// returned and also kept for [`verify`](Recorder::verify).
    ///
    /// The answer runs after the expectations for `name` are released,
    /// so it may call back into the recorder. Only a call that lands on
    /// the expectation whose answer is running would block.
    pub fn called<I, O>(&self, name: &'static str, args: I) -> Result<O, CallError>
    where
        I: fmt::Debug + 'static,
        O: 'static,
    {
        let rendered = format!("{:?}", args);
        self.inner.calls.lock().push(Call {
            name,
            args: rendered.clone(),
        });

        let result = self.dispatch(name, &args, rendered);
        match &result {
            Ok(_) => trace!(name, ?args, "call matched an expectation"),
            Err(error) => self.fail(error.clone().into()),
        }
        result
    }

    fn dispatch<I: 'static, O: 'static>(
        &self,
        name: &'static str,
        args: &I,
        rendered: String,
    ) -> Result<O, CallError> {
        // clone so the store is not held while the group is searched
        let group = self.inner.groups.lock().get(name).cloned();
        let group = match group {
            Some(group) => group,
            None => {
                return Err(CallError::Unmatched {
                    name,
                    args: rendered,
                    closest: vec![],
                })
            }
        };

        let group = group
            .into_any()
            .downcast::<Mutex<Group<I, O>>>()
            .map_err(|_| CallError::SignatureMismatch { name })?;
        // the group is released before the answer runs so answers may
        // call back into the recorder
        let answer = group.lock().call(name, args, rendered)?;
        let mut answer = answer.lock();
        Ok((&mut **answer)(args))
    }

    /// Forwards a call on behalf of a substitute.
    ///
    /// Over-calls always panic at call time. Other failures panic under
    /// [`Strictness::FailFast`]; under [`Strictness::Deferred`] they
    /// are answered with `O::default()` and reported by
    /// [`verify`](Recorder::verify).
    pub fn answer<I, O>(&self, name: &'static str, args: I) -> O
    where
        I: fmt::Debug + 'static,
        O: Default + 'static,
    {
        match self.called(name, args) {
            Ok(output) => output,
            Err(error @ CallError::OverCalled { .. }) => panic!("{}", error),
            Err(error) => match self.inner.strictness {
                Strictness::FailFast => panic!("{}", error),
                Strictness::Deferred => O::default(),
            },
        }
    }

    fn fail(&self, failure: Failure) {
        warn!(%failure, "expectation failure");
        self.inner.failures.lock().push(failure);
    }

    /// Checks that every expectation was met and no call failed.
    pub fn verify(&self) -> Result<(), VerificationError> {
        let mut failures = self.inner.failures.lock().clone();

        let groups: Vec<_> = self
            .inner
            .groups
            .lock()
            .iter()
            .map(|(name, group)| (*name, Arc::clone(group)))
            .collect();
        for (name, group) in groups {
            failures.extend(group.unmet(name));
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(VerificationError::new(failures))
        }
    }

    /// Panics with a report of every failure if [`verify`] fails.
    ///
    /// [`verify`]: Recorder::verify
    #[track_caller]
    pub fn assert_expectations(&self) {
        if let Err(error) = self.verify() {
            panic!("{}", error);
        }
    }

    /// Every call forwarded for `name`, in order.
    pub fn calls(&self, name: &str) -> Vec<Call> {
        self.inner
            .calls
            .lock()
            .iter()
            .filter(|call| call.name == name)
            .cloned()
            .collect()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.inner
            .calls
            .lock()
            .iter()
            .filter(|call| call.name == name)
            .count()
    }

    #[track_caller]
    pub fn assert_called_times(&self, name: &str, expected: usize) {
        let actual = self.call_count(name);
        assert!(
            actual == expected,
            "✗ expected `{}` to be called {} time(s), but it was called {} time(s)",
            name,
            expected,
            actual
        );
    }

    #[track_caller]
    pub fn assert_not_called(&self, name: &str) {
        let calls = self.calls(name);
        assert!(
            calls.is_empty(),
            "✗ expected `{}` not to be called, but it was called with: {:?}",
            name,
            calls.iter().map(|call| &call.args).collect::<Vec<_>>()
        );
    }
}

impl fmt::Debug for Recorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recorder")
            .field("strictness", &self.inner.strictness)
            .field("callables", &self.inner.groups.lock().keys())
            .field("calls", &self.inner.calls.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::eq;

    #[test]
    fn unregistered_call_is_unmatched() {
        let recorder = Recorder::new();

        let result: Result<String, _> = recorder.called("method_one", "x".to_string());

        assert_eq!(
            result,
            Err(CallError::Unmatched {
                name: "method_one",
                args: "\"x\"".to_string(),
                closest: vec![],
            })
        );
        assert_eq!(recorder.verify().unwrap_err().failures().len(), 1);
    }

    #[test]
    fn signature_mismatch_is_reported() {
        let recorder = Recorder::new();
        recorder.expect::<String, String>("method_one").returns("a".into());

        let result: Result<usize, _> = recorder.called("method_one", "x".to_string());

        assert_eq!(
            result,
            Err(CallError::SignatureMismatch { name: "method_one" })
        );
    }

    #[test]
    fn registering_two_signatures_under_one_name_fails_verification() {
        let recorder = Recorder::new();
        recorder.expect::<String, String>("method_one").maybe().returns("a".into());
        recorder.expect::<u8, u8>("method_one").maybe().returns(1);

        let error = recorder.verify().unwrap_err();

        assert_eq!(
            error.failures(),
            &[Failure::Call(CallError::SignatureMismatch {
                name: "method_one"
            })]
        );
    }

    #[test]
    fn deferred_answer_defaults_and_reports_later() {
        let recorder = Recorder::new();
        recorder
            .expect::<String, String>("method_one")
            .with_args((eq("expected"),))
            .maybe()
            .returns("configured".into());

        let output: String = recorder.answer("method_one", "unexpected".to_string());

        assert_eq!(output, "");
        let error = recorder.verify().unwrap_err();
        assert!(error.to_string().contains("unexpected call to `method_one`"));
        assert!(error.to_string().contains("Expected: \"expected\""));
    }

    #[test]
    #[should_panic(expected = "unexpected call to `method_one`")]
    fn fail_fast_answer_panics_at_call_time() {
        let recorder = Recorder::fail_fast();

        let _: String = recorder.answer("method_one", "unexpected".to_string());
    }

    #[test]
    #[should_panic(expected = "was called more often than expected (once)")]
    fn over_call_panics_at_call_time_even_when_deferred() {
        let recorder = Recorder::new();
        recorder.expect::<(), ()>("method_two").returns(());

        recorder.answer::<(), ()>("method_two", ());
        recorder.answer::<(), ()>("method_two", ());
    }

    #[test]
    fn strictness_is_chosen_at_construction() {
        assert_eq!(Recorder::new().strictness(), Strictness::Deferred);
        assert_eq!(Recorder::fail_fast().strictness(), Strictness::FailFast);
        assert_eq!(
            Recorder::with_strictness(Strictness::FailFast).strictness(),
            Strictness::FailFast
        );
    }

    #[test]
    fn never_expectation_rejects_every_matching_call() {
        let recorder = Recorder::new();
        recorder
            .expect::<String, String>("method_one")
            .with_args((eq("x"),))
            .times(0)
            .returns("unused".into());

        let result: Result<String, _> = recorder.called("method_one", "x".to_string());

        assert_eq!(
            result,
            Err(CallError::OverCalled {
                name: "method_one",
                args: "\"x\"".to_string(),
                expected: Times::Exactly(0),
            })
        );
        let error = recorder.verify().unwrap_err();
        assert_eq!(error.failures().len(), 1);
        assert!(error
            .to_string()
            .contains("was called more often than expected (never)"));
    }

    #[test]
    fn never_expectation_without_calls_verifies() {
        let recorder = Recorder::new();
        recorder.expect::<(), ()>("method_two").times(0).returns(());

        recorder.assert_expectations();
        recorder.assert_not_called("method_two");
    }

    #[test]
    fn answers_may_call_back_into_the_recorder() {
        let recorder = Recorder::new();
        let inner = recorder.clone();
        recorder.expect::<(), u8>("inner").returns(3);
        recorder.expect::<(), bool>("outer").returning(move |_| {
            inner.called::<(), u8>("inner", ()) == Ok(3) && inner.verify().is_ok()
        });

        assert_eq!(recorder.called::<(), bool>("outer", ()), Ok(true));
        recorder.assert_expectations();
    }

    #[test]
    fn answers_may_call_back_for_the_same_name() {
        let recorder = Recorder::new();
        let inner = recorder.clone();
        recorder
            .expect::<u8, u8>("count")
            .with_args((eq(0u8),))
            .returns(0);
        recorder
            .expect::<u8, u8>("count")
            .with_args((eq(1u8),))
            .returning(move |n| inner.called::<u8, u8>("count", n - 1).unwrap_or(99) + 1);

        assert_eq!(recorder.called::<u8, u8>("count", 1), Ok(1));
        recorder.assert_expectations();
    }

    #[test]
    fn clones_share_expectations_and_calls() {
        let recorder = Recorder::new();
        let handle = recorder.clone();
        recorder.expect::<(), u8>("count").times(2).returns(7);

        assert_eq!(handle.called::<(), u8>("count", ()), Ok(7));
        assert_eq!(handle.called::<(), u8>("count", ()), Ok(7));

        recorder.assert_called_times("count", 2);
        recorder.assert_expectations();
    }

    #[test]
    fn returning_sees_the_arguments() {
        let recorder = Recorder::new();
        recorder
            .expect::<(u8, u8), u8>("add")
            .repeatedly()
            .returning(|(a, b)| a + b);

        assert_eq!(recorder.called::<(u8, u8), u8>("add", (2, 3)), Ok(5));
        assert_eq!(recorder.called::<(u8, u8), u8>("add", (4, 4)), Ok(8));
        assert_eq!(
            recorder.calls("add"),
            vec![
                Call {
                    name: "add",
                    args: "(2, 3)".to_string()
                },
                Call {
                    name: "add",
                    args: "(4, 4)".to_string()
                },
            ]
        );
        recorder.assert_expectations();
    }

    #[test]
    #[should_panic(expected = "expected `method_two` not to be called")]
    fn assert_not_called_fails_after_a_call() {
        let recorder = Recorder::new();
        recorder.expect::<(), ()>("method_two").returns(());
        recorder.answer::<(), ()>("method_two", ());

        recorder.assert_not_called("method_two");
    }
}
