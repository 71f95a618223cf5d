//! Mock a struct's calls to its own methods without a trait.
//!
//! The question this crate answers: how do you test a method B that
//! calls a method A on the same struct? Store the behaviours as
//! function values instead of calling methods directly:
//!
//! 1. The struct holds one boxed closure per behaviour (a *slot*).
//! 2. The constructor binds every slot to the real implementation.
//! 3. Tests assign a substitute to a slot; every behaviour calling
//!    through that slot now runs the substitute.
//!
//! ```
//! use std::{cell::Cell, rc::Rc};
//! use swapfn::{run_standard_flow, Service};
//!
//! let mut service = Service::new();
//! let count = Rc::new(Cell::new(0));
//! let counter = count.clone();
//! service.method_one = Box::new(move |_: &Service, input: &str| -> String {
//!     counter.set(counter.get() + 1);
//!     input.to_string()
//! });
//!
//! run_standard_flow(&service);
//!
//! // once directly, once from inside method two
//! assert_eq!(count.get(), 2);
//! ```
//!
//! When counting is not enough, a [`Recorder`] can be put behind a
//! slot to register expected calls with [`matcher`]s and verify them
//! at the end of the test. See the [`substitute`] module for the
//! common shapes of substitutes.

pub mod matcher;
pub mod recorder;
mod service;
pub mod substitute;

pub use recorder::{CallError, Failure, Recorder, Strictness, Times, VerificationError};
pub use service::{
    run_standard_flow, MethodOneFn, MethodTwoFn, Service, FIRST_CALL_INPUT, METHOD_TWO_INPUT,
};
