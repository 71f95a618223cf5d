use std::fmt;

use tracing::info;

/// Slot type for behaviour one: text in, text out.
pub type MethodOneFn = Box<dyn Fn(&Service, &str) -> String>;

/// Slot type for behaviour two: no input and no direct output. Its
/// effect is only visible through the slots it calls.
pub type MethodTwoFn = Box<dyn Fn(&Service)>;

/// The argument behaviour two passes to behaviour one.
pub const METHOD_TWO_INPUT: &str = "Method 1 called from Method 2";

/// The argument [`run_standard_flow`] passes to behaviour one.
pub const FIRST_CALL_INPUT: &str = "first call";

/// An object whose behaviours live in reassignable slots.
///
/// [`Service::new`] binds every slot to its real implementation.
/// Tests replace a slot by assigning to the field; every behaviour
/// that calls through that slot then runs the substitute instead.
/// Each slot receives the service it belongs to, so substitutes and
/// real implementations alike can reach the other slots.
///
/// ```
/// use swapfn::{Service, METHOD_TWO_INPUT};
///
/// let mut service = Service::new();
/// service.method_one = Box::new(|_: &swapfn::Service, input: &str| input.to_uppercase());
///
/// assert_eq!(service.method_one("hi"), "HI");
/// // method two is untouched but now reaches the substitute
/// service.method_two();
/// ```
pub struct Service {
    pub method_one: MethodOneFn,
    pub method_two: MethodTwoFn,
}

impl Service {
    pub fn new() -> Self {
        Service {
            method_one: Box::new(Service::method_one_impl),
            method_two: Box::new(Service::method_two_impl),
        }
    }

    /// Real implementation of behaviour one.
    pub fn method_one_impl(&self, input: &str) -> String {
        let output = format!("This is my Method 1 being called! Input: {}", input);
        info!("{}", output);
        output
    }

    /// Real implementation of behaviour two.
    ///
    /// Calls behaviour one through its slot, never through
    /// [`method_one_impl`](Service::method_one_impl) directly.
    pub fn method_two_impl(&self) {
        (self.method_one)(self, METHOD_TWO_INPUT);
    }

    /// Runs whatever currently occupies the `method_one` slot.
    pub fn method_one(&self, input: &str) -> String {
        (self.method_one)(self, input)
    }

    /// Runs whatever currently occupies the `method_two` slot.
    pub fn method_two(&self) {
        (self.method_two)(self)
    }
}

impl Default for Service {
    fn default() -> Self {
        Service::new()
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // do not try to format the callables
        f.debug_struct("Service")
            .field("method_one", &"<slot>")
            .field("method_two", &"<slot>")
            .finish()
    }
}

/// Calls behaviour one directly, then behaviour two.
///
/// With the real behaviour two installed, behaviour one runs twice.
pub fn run_standard_flow(service: &Service) {
    info!("func calls on service:");
    service.method_one(FIRST_CALL_INPUT);
    service.method_two();
}

#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
    };

    use super::*;

    #[test]
    fn real_implementations_by_default() {
        let service = Service::new();

        assert_eq!(
            service.method_one("first call"),
            "This is my Method 1 being called! Input: first call"
        );
        assert_eq!(
            service.method_one("first call"),
            service.method_one_impl("first call")
        );
    }

    #[test]
    fn method_two_reaches_method_one_through_the_slot() {
        let mut service = Service::new();
        let inputs = Rc::new(RefCell::new(vec![]));
        let seen = inputs.clone();
        service.method_one = Box::new(move |_: &Service, input: &str| -> String {
            seen.borrow_mut().push(input.to_string());
            String::new()
        });

        service.method_two();

        assert_eq!(*inputs.borrow(), vec![METHOD_TWO_INPUT.to_string()]);
    }

    #[test]
    fn overriding_method_two_leaves_method_one_alone() {
        let mut service = Service::new();
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        service.method_two = Box::new(move |_: &Service| counter.set(counter.get() + 1));

        assert_eq!(service.method_one("x"), service.method_one_impl("x"));
        service.method_two();
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn each_override_fully_replaces_the_previous_one() {
        let mut service = Service::new();
        service.method_one = Box::new(|_: &Service, _: &str| -> String { "first".to_string() });
        service.method_one = Box::new(|_: &Service, _: &str| -> String { "second".to_string() });

        assert_eq!(service.method_one("x"), "second");
    }

    #[test]
    fn substitutes_can_reach_other_slots() {
        let mut service = Service::new();
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        service.method_two = Box::new(move |_: &Service| counter.set(counter.get() + 1));
        service.method_one = Box::new(|service: &Service, input: &str| -> String {
            service.method_two();
            input.to_string()
        });

        run_standard_flow(&service);

        // method one ran once, method two ran once from the flow and
        // once from inside method one
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn debug_does_not_format_slots() {
        assert_eq!(
            format!("{:?}", Service::new()),
            r#"Service { method_one: "<slot>", method_two: "<slot>" }"#
        );
    }
}
