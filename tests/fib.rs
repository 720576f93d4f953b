mod common;

#[test]
fn recursive_fibonacci() {
    let outcome = common::run(
        "fib = function(n)
           if n < 2 then return n end if
           return fib(n - 1) + fib(n - 2)
         end function
         for i in range(10)
           println(fib(i))
         end for",
    );
    assert!(outcome.ok, "{:?}", outcome.error_message);
    assert_eq!(outcome.stdout, "0\n1\n1\n2\n3\n5\n8\n13\n21\n34\n");
}
