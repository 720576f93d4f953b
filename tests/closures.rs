mod common;

#[test]
fn counter_closure_keeps_private_state() {
    let outcome = common::run(
        "make_counter = function()
           count = 0
           return function()
             count += 1
             return count
           end function
         end function

         c1 = make_counter()
         c2 = make_counter()
         println(c1())
         println(c1())
         println(c2())",
    );
    assert!(outcome.ok, "{:?}", outcome.error_message);
    assert_eq!(outcome.stdout, "1\n2\n1\n");
}

#[test]
fn recursive_closure_self_capture_does_not_hang() {
    // A function assigned to a name in its own defining scope captures an
    // environment that (through the binding) refers back to itself. The
    // reference graph is cyclic but Value equality/Drop never walk it, so
    // this just needs to run and terminate.
    let outcome = common::run(
        "factorial = function(n)
           if n <= 1 then return 1 end if
           return n * factorial(n - 1)
         end function
         println(factorial(5))",
    );
    assert!(outcome.ok, "{:?}", outcome.error_message);
    assert_eq!(outcome.stdout, "120\n");
}
