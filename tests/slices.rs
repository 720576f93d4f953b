mod common;

#[test]
fn array_slice_defaults_and_clamping() {
    let outcome = common::run(
        "a = [10, 20, 30, 40, 50]
         println(a[1:3])
         println(a[:2])
         println(a[3:])
         println(a[-2:])
         println(a[100:200])",
    );
    assert!(outcome.ok, "{:?}", outcome.error_message);
    assert_eq!(
        outcome.stdout,
        "[20, 30]\n[10, 20]\n[40, 50]\n[40, 50]\n[]\n"
    );
}

#[test]
fn string_slice_and_negative_index() {
    let outcome = common::run(
        "s = \"hello world\"
         println(s[0:5])
         println(s[-5:])
         println(s[-1])",
    );
    assert!(outcome.ok, "{:?}", outcome.error_message);
    assert_eq!(outcome.stdout, "hello\nworld\nd\n");
}

#[test]
fn slicing_an_array_never_aliases_the_source() {
    let outcome = common::run(
        "a = [1, 2, 3]
         b = a[0:2]
         b = push(b, 99)
         println(a)
         println(b)",
    );
    assert!(outcome.ok, "{:?}", outcome.error_message);
    assert_eq!(outcome.stdout, "[1, 2, 3]\n[1, 2, 99]\n");
}
