use std::{cell::Cell, rc::Rc};

use swapfn::{run_standard_flow, substitute, Service, FIRST_CALL_INPUT, METHOD_TWO_INPUT};

#[test]
fn counting_stub_sees_both_calls() {
    let mut service = Service::new();
    let count = Rc::new(Cell::new(0));

    let counter = count.clone();
    service.method_one = Box::new(move |_: &Service, input: &str| -> String {
        counter.set(counter.get() + 1);
        input.to_string()
    });

    run_standard_flow(&service);

    // once directly, once through method two
    assert_eq!(count.get(), 2);
}

#[test]
fn counting_pass_through_keeps_counting() {
    let mut service = Service::new();
    let count = Rc::new(Cell::new(0));

    let counter = count.clone();
    service.method_one = Box::new(move |_: &Service, input: &str| -> String {
        counter.set(counter.get() + 1);
        input.to_string()
    });
    run_standard_flow(&service);
    assert_eq!(count.get(), 2);

    let counter = count.clone();
    service.method_one = Box::new(move |service: &Service, input: &str| -> String {
        counter.set(counter.get() + 1);
        service.method_one_impl(input)
    });
    run_standard_flow(&service);

    assert_eq!(count.get(), 4);
}

#[test]
fn count_scales_with_number_of_flows() {
    let tracker = substitute::Tracker::new();
    let mut service = Service::new();
    service.method_one = substitute::stub(tracker.clone(), |input| input.to_string());

    for _ in 0..5 {
        run_standard_flow(&service);
    }

    assert_eq!(tracker.count(), 10);
}

#[test]
fn stub_receives_the_flow_arguments_in_order() {
    let tracker = substitute::Tracker::new();
    let mut service = Service::new();
    service.method_one = substitute::stub(tracker.clone(), |_| String::new());

    run_standard_flow(&service);

    assert_eq!(
        tracker.args(),
        vec![FIRST_CALL_INPUT.to_string(), METHOD_TWO_INPUT.to_string()]
    );
}

#[test]
fn overriding_method_one_does_not_touch_a_replaced_method_two() {
    let tracker = substitute::Tracker::new();
    let mut service = Service::new();
    service.method_two = Box::new(|_: &Service| {});
    service.method_one = substitute::stub(tracker.clone(), |input| input.to_string());

    run_standard_flow(&service);

    // method two no longer calls through the method one slot
    assert_eq!(tracker.count(), 1);
}

#[test]
fn fresh_service_is_unaffected_by_other_instances() {
    let mut overridden = Service::new();
    overridden.method_one = Box::new(|_: &Service, _: &str| -> String { "fake".to_string() });

    let fresh = Service::new();

    assert_eq!(overridden.method_one("x"), "fake");
    assert_eq!(
        fresh.method_one("x"),
        "This is my Method 1 being called! Input: x"
    );
}
