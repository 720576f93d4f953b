mod common;

#[test]
fn empty_program_produces_no_output() {
    let outcome = common::run("");
    assert!(outcome.ok, "{:?}", outcome.error_message);
    assert_eq!(outcome.stdout, "");
}

#[test]
fn empty_string_arithmetic() {
    let outcome = common::run(
        "println(\"\" + \"x\")
         println(\"\" - \"x\")
         println(\"x\" * 0)
         println(\"\" * 3)",
    );
    assert!(outcome.ok, "{:?}", outcome.error_message);
    assert_eq!(outcome.stdout, "x\n\n\n\n");
}

#[test]
fn deeply_nested_parens_around_an_identifier() {
    let outcome = common::run("x = 1 println((((((((((x))))))))))");
    assert!(outcome.ok, "{:?}", outcome.error_message);
    assert_eq!(outcome.stdout, "1\n");
}

#[test]
fn function_with_no_params_and_no_body() {
    let outcome = common::run(
        "f = function()
         end function
         println(f())",
    );
    assert!(outcome.ok, "{:?}", outcome.error_message);
    assert_eq!(outcome.stdout, "nil\n");
}

#[test]
fn calling_with_too_many_arguments_ignores_the_extras() {
    let outcome = common::run(
        "f = function(a)
           return a
         end function
         println(f(1, 2, 3))",
    );
    assert!(outcome.ok, "{:?}", outcome.error_message);
    assert_eq!(outcome.stdout, "1\n");
}

#[test]
fn calling_with_too_few_arguments_defaults_missing_to_nil() {
    let outcome = common::run(
        "f = function(a, b)
           return b
         end function
         println(f(1))",
    );
    assert!(outcome.ok, "{:?}", outcome.error_message);
    assert_eq!(outcome.stdout, "nil\n");
}
