mod common;

#[test]
fn string_comparisons_are_lexicographic() {
    let outcome = common::run(
        "println(\"apple\" < \"banana\")
         println(\"banana\" < \"apple\")
         println(\"abc\" == \"abc\")",
    );
    assert!(outcome.ok, "{:?}", outcome.error_message);
    assert_eq!(outcome.stdout, "true\nfalse\ntrue\n");
}

#[test]
fn equality_across_tags_is_always_false() {
    let outcome = common::run(
        "println(1 == \"1\")
         println(nil == false)
         println(0 == false)",
    );
    assert!(outcome.ok, "{:?}", outcome.error_message);
    assert_eq!(outcome.stdout, "false\nfalse\nfalse\n");
}

#[test]
fn logical_operators_short_circuit() {
    // The right side of `and`/`or` must not run when short-circuited. An
    // out-of-range index is well-typed statically (checker only knows
    // "List, Number") but a RuntimeError if actually evaluated, so reaching
    // it would fail the test via an unhandled error instead of quietly
    // passing.
    let outcome = common::run("a = [1] println(false and a[99])");
    assert!(outcome.ok, "{:?}", outcome.error_message);
    assert_eq!(outcome.stdout, "false\n");

    let outcome = common::run("a = [1] println(true or a[99])");
    assert!(outcome.ok, "{:?}", outcome.error_message);
    assert_eq!(outcome.stdout, "true\n");
}
