//! Ready-made values for the [`Service`] slots.
//!
//! Nothing here is special to the service: each function returns a
//! plain slot value that could as well be written inline in a test.

use std::{cell::RefCell, rc::Rc};

use crate::{MethodOneFn, MethodTwoFn, Recorder, Service};

/// Shared record a tracking substitute writes into and a test reads
/// from.
///
/// Cloning a `Tracker` clones the handle. It is single-threaded, like
/// the [`Service`] itself.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    state: Rc<RefCell<TrackerState>>,
}

#[derive(Debug, Default)]
struct TrackerState {
    args: Vec<String>,
    captured_returns: Vec<String>,
}

impl Tracker {
    pub fn new() -> Self {
        Tracker::default()
    }

    pub fn record(&self, input: &str) {
        self.state.borrow_mut().args.push(input.to_string());
    }

    /// Keeps a value returned by a real implementation.
    pub fn capture(&self, output: &str) {
        self.state.borrow_mut().captured_returns.push(output.to_string());
    }

    pub fn count(&self) -> usize {
        self.state.borrow().args.len()
    }

    pub fn args(&self) -> Vec<String> {
        self.state.borrow().args.clone()
    }

    pub fn captured_returns(&self) -> Vec<String> {
        self.state.borrow().captured_returns.clone()
    }
}

/// Records the call and answers with `answer` without running the
/// real implementation.
///
/// ```
/// use swapfn::{run_standard_flow, substitute, Service};
///
/// let tracker = substitute::Tracker::new();
/// let mut service = Service::new();
/// service.method_one = substitute::stub(tracker.clone(), |input| input.to_string());
///
/// run_standard_flow(&service);
/// assert_eq!(tracker.count(), 2);
/// ```
pub fn stub(tracker: Tracker, answer: impl Fn(&str) -> String + 'static) -> MethodOneFn {
    Box::new(move |_: &Service, input: &str| -> String {
        tracker.record(input);
        answer(input)
    })
}

/// Records the call, then runs the real implementation and returns
/// its result unchanged. The result is also captured in the tracker.
pub fn pass_through(tracker: Tracker) -> MethodOneFn {
    Box::new(move |service: &Service, input: &str| -> String {
        tracker.record(input);
        let output = service.method_one_impl(input);
        tracker.capture(&output);
        output
    })
}

/// Forwards every call to `recorder` under `name` and answers with
/// whatever the recorder dictates.
pub fn recorded(recorder: Recorder, name: &'static str) -> MethodOneFn {
    Box::new(move |_: &Service, input: &str| -> String {
        recorder.answer(name, input.to_string())
    })
}

/// Like [`recorded`], but the real implementation still runs.
///
/// Its return value is captured in `tracker` and then discarded: the
/// caller receives the recorder's answer. Meant for integration-style
/// tests where the real side effect has to happen.
pub fn recorded_with_real_call(
    recorder: Recorder,
    name: &'static str,
    tracker: Tracker,
) -> MethodOneFn {
    Box::new(move |service: &Service, input: &str| -> String {
        let answer = recorder.answer(name, input.to_string());
        tracker.record(input);
        tracker.capture(&service.method_one_impl(input));
        answer
    })
}

/// Forwards every call of behaviour two to `recorder` under `name`.
/// The real behaviour two does not run, so behaviour one is not
/// reached.
pub fn recorded_method_two(recorder: Recorder, name: &'static str) -> MethodTwoFn {
    Box::new(move |_: &Service| recorder.answer::<(), ()>(name, ()))
}
