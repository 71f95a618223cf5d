use std::{
    any::Any,
    fmt::{self, Formatter},
    sync::Arc,
};

use parking_lot::Mutex;

use super::{CallError, Failure};
use crate::matcher::InvocationMatcher;

/// How many times an expectation must be called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Times {
    /// Exactly `n` calls. `Exactly(0)` forbids any matching call.
    Exactly(usize),
    /// Any number of calls, but at least one.
    AtLeastOnce,
    /// Any number of calls, including none.
    Any,
}

impl Times {
    /// Whether another call may be accepted after `calls` calls.
    pub fn accepts(self, calls: usize) -> bool {
        match self {
            Times::Exactly(n) => calls < n,
            Times::AtLeastOnce | Times::Any => true,
        }
    }

    /// Whether `calls` calls fulfill the expectation.
    pub fn is_satisfied_by(self, calls: usize) -> bool {
        match self {
            Times::Exactly(n) => calls == n,
            Times::AtLeastOnce => calls > 0,
            Times::Any => true,
        }
    }
}

impl fmt::Display for Times {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Times::Exactly(0) => f.write_str("never"),
            Times::Exactly(1) => f.write_str("once"),
            Times::Exactly(n) => write!(f, "exactly {} times", n),
            Times::AtLeastOnce => f.write_str("at least once"),
            Times::Any => f.write_str("any number of times"),
        }
    }
}

/// Shared so it can be run after the group lock is released.
pub(super) type Answer<I, O> = Arc<Mutex<Box<dyn FnMut(&I) -> O + Send>>>;

pub(super) struct Expectation<I, O> {
    matcher: Box<dyn InvocationMatcher<I> + Send>,
    answer: Answer<I, O>,
    times: Times,
    calls: usize,
}

pub(super) enum Rejection {
    NotMatched(String),
    Exhausted(Times),
}

impl<I, O> Expectation<I, O> {
    pub fn new(
        matcher: Box<dyn InvocationMatcher<I> + Send>,
        answer: Box<dyn FnMut(&I) -> O + Send>,
        times: Times,
    ) -> Self {
        Expectation {
            matcher,
            answer: Arc::new(Mutex::new(answer)),
            times,
            calls: 0,
        }
    }

    /// Counts the call and hands back the answer to run.
    pub fn call(&mut self, input: &I) -> Result<Answer<I, O>, Rejection> {
        self.matcher.matches(input).map_err(Rejection::NotMatched)?;

        if !self.times.accepts(self.calls) {
            return Err(Rejection::Exhausted(self.times));
        }

        self.calls += 1;
        Ok(Arc::clone(&self.answer))
    }
}

impl<I, O> fmt::Debug for Expectation<I, O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expectation")
            .field("args", &self.matcher.expectations())
            .field("times", &self.times)
            .field("calls", &self.calls)
            .finish()
    }
}

/// Every expectation registered under one callable name.
pub(super) struct Group<I, O> {
    expectations: Vec<Expectation<I, O>>,
}

impl<I, O> Group<I, O> {
    pub fn new() -> Self {
        Group {
            expectations: vec![],
        }
    }

    pub fn push(&mut self, expectation: Expectation<I, O>) {
        self.expectations.push(expectation)
    }

    /// Answers with the first expectation, in registration order,
    /// that accepts the arguments and is not exhausted.
    pub fn call(
        &mut self,
        name: &'static str,
        input: &I,
        args: String,
    ) -> Result<Answer<I, O>, CallError> {
        let mut closest = vec![];
        let mut exhausted = None;

        for expectation in &mut self.expectations {
            match expectation.call(input) {
                Ok(answer) => return Ok(answer),
                Err(Rejection::NotMatched(error)) => closest.push(format!("✗ {}", error)),
                Err(Rejection::Exhausted(times)) => {
                    exhausted.get_or_insert(times);
                }
            }
        }

        Err(match exhausted {
            Some(expected) => CallError::OverCalled {
                name,
                args,
                expected,
            },
            None => CallError::Unmatched {
                name,
                args,
                closest,
            },
        })
    }

    pub fn unmet(&self, name: &'static str) -> Vec<Failure> {
        self.expectations
            .iter()
            .filter(|e| !e.times.is_satisfied_by(e.calls))
            .map(|e| Failure::Unmet {
                name,
                expectation: e.matcher.expectations(),
                expected: e.times,
                actual: e.calls,
            })
            .collect()
    }
}

/// A [`Group`] with its argument and output types erased so groups
/// of different signatures can share one store.
pub(super) trait ErasedGroup: Send + Sync {
    fn unmet(&self, name: &'static str) -> Vec<Failure>;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<I: 'static, O: 'static> ErasedGroup for Mutex<Group<I, O>> {
    fn unmet(&self, name: &'static str) -> Vec<Failure> {
        self.lock().unmet(name)
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
