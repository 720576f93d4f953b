mod common;

#[test]
fn type_error_through_an_untyped_parameter() {
    // `x` inside `f` is Unknown to the checker (spec.md §4.3 defers rather
    // than fails), so this only blows up once `f` actually runs with an
    // array argument — a genuine RuntimeError, not a CheckError.
    let outcome = common::run(
        "f = function(x)
           return x + 1
         end function
         f([1, 2])",
    );
    assert!(!outcome.ok);
    let msg = outcome.error_message.unwrap();
    assert!(msg.contains("Type") || msg.contains("not defined"), "{msg}");
}

#[test]
fn undeclared_name_is_rejected_before_running() {
    // `never_assigned` has no assignment anywhere in the program, so the
    // pre-check rejects the read before the evaluator ever runs.
    let outcome = common::run("println(never_assigned)");
    assert!(!outcome.ok);
}

#[test]
fn index_error_on_out_of_range_array_access() {
    let outcome = common::run("a = [1, 2, 3] println(a[10])");
    assert!(!outcome.ok);
    let msg = outcome.error_message.unwrap();
    assert!(msg.contains("Index") || msg.contains("range"), "{msg}");
}

#[test]
fn index_error_on_negative_out_of_range_index() {
    let outcome = common::run("a = [1, 2, 3] println(a[-10])");
    assert!(!outcome.ok);
}

#[test]
fn arity_mismatch_on_builtin_call_is_rejected() {
    // Builtin arity is part of the pre-check too (it knows every builtin's
    // signature up front), so this never reaches the evaluator either —
    // still a useful guarantee: the program is rejected before running.
    let outcome = common::run("println(max(1))");
    assert!(!outcome.ok);
}

#[test]
fn call_error_on_calling_a_non_function_value() {
    // Calling a value the checker can see statically isn't a Function is
    // also a pre-check rejection; route it through Unknown to force the
    // failure into the evaluator instead.
    let outcome = common::run(
        "f = function(x)
           return x()
         end function
         f(5)",
    );
    assert!(!outcome.ok);
}

#[test]
fn call_error_on_break_outside_a_loop() {
    let outcome = common::run("break");
    assert!(!outcome.ok);
}

#[test]
fn call_error_on_continue_outside_a_loop() {
    let outcome = common::run("continue");
    assert!(!outcome.ok);
}

#[test]
fn division_by_zero_is_infinity_not_an_error() {
    // Floating point semantics: division by zero is not a runtime error here.
    let outcome = common::run("println(1 / 0)");
    assert!(outcome.ok, "{:?}", outcome.error_message);
    assert_eq!(outcome.stdout, "inf\n");
}
