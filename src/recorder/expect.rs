use std::marker::PhantomData;

use super::{Recorder, Times};
use crate::matcher::{AnyInvocation, InvocationMatcher};

/// Builder for a single expectation on a [`Recorder`].
///
/// Created by [`Recorder::expect`]. By default the expectation
/// accepts any arguments and must be called exactly once. Nothing is
/// registered until [`returns`](Expect::returns) or
/// [`returning`](Expect::returning) is called.
pub struct Expect<'r, I, O, M = AnyInvocation> {
    name: &'static str,
    recorder: &'r Recorder,
    matcher: M,
    times: Times,
    // contravariant with I but covariant with O
    _marker: PhantomData<fn(I) -> O>,
}

impl<'r, I, O> Expect<'r, I, O, AnyInvocation> {
    pub(super) fn new(name: &'static str, recorder: &'r Recorder) -> Self {
        Expect {
            name,
            recorder,
            matcher: AnyInvocation,
            times: Times::Exactly(1),
            _marker: PhantomData,
        }
    }
}

impl<'r, I, O, M> Expect<'r, I, O, M>
where
    I: 'static,
    O: 'static,
    M: InvocationMatcher<I> + Send + 'static,
{
    /// Only accept calls whose arguments match.
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
    /// assert_eq!(
    ///     recorder.called::<_, String>("method_one", "first call".to_string()),
    ///     Ok("my custom return".to_string())
    /// );
    /// recorder.assert_expectations();
    /// ```
    pub fn with_args<N>(self, matcher: N) -> Expect<'r, I, O, N>
    where
        N: InvocationMatcher<I> + Send + 'static,
    {
        Expect {
            name: self.name,
            recorder: self.recorder,
            matcher,
            times: self.times,
            _marker: PhantomData,
        }
    }

    /// Expect exactly one call. This is the default.
    pub fn once(self) -> Self {
        self.times(1)
    }

    /// Expect exactly `times` calls. `times(0)` means the call must
    /// never happen.
    pub fn times(mut self, times: usize) -> Self {
        self.times = Times::Exactly(times);
        self
    }

    /// Expect at least one call, with no upper bound.
    pub fn repeatedly(mut self) -> Self {
        self.times = Times::AtLeastOnce;
        self
    }

    /// Accept any number of calls, including none.
    pub fn maybe(mut self) -> Self {
        self.times = Times::Any;
        self
    }

    /// Registers the expectation, answering every accepted call with
    /// a clone of `value`.
    pub fn returns(self, value: O)
    where
        O: Clone + Send,
    {
        self.returning(move |_| value.clone())
    }

    /// Registers the expectation, answering every accepted call with
    /// the result of `answer`.
    pub fn returning(self, answer: impl FnMut(&I) -> O + Send + 'static) {
        self.recorder
            .register(self.name, Box::new(self.matcher), Box::new(answer), self.times)
    }
}
