//! Tree-walking interpreter for a small dynamically-typed scripting
//! language.
//!
//! Pipeline: [`lexer`] -> [`parser`] -> [`checker`] -> [`interpreter`],
//! mirroring the teacher's `lexer -> parser -> typechecker -> interpreter`
//! staging in its own `src/bin/why.rs`.

pub mod ast;
pub mod checker;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod stdlib;
pub mod value;

use error::GlintError;
use std::io::{BufRead, Write};

/// Runs a complete program: lex, parse, pre-check, then evaluate. Mirrors
/// the `Interpret(input_chars, output_stream) -> bool` entry point (spec.md
/// §6), expressed as a `Result` so the CLI layer decides how to report
/// failure.
pub fn interpret(
    source: &str,
    output: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<(), GlintError> {
    let program = parser::Parser::new(source)?.parse_program()?;

    let check_errors = checker::check(&program);
    if !check_errors.is_empty() {
        return Err(GlintError::Check(check_errors));
    }

    let mut interp = interpreter::Interpreter::new(output, input);
    interp.run(&program)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(source: &str) -> (String, Result<(), GlintError>) {
        let mut out = Vec::new();
        let mut input = Cursor::new(Vec::new());
        let result = interpret(source, &mut out, &mut input);
        (String::from_utf8(out).unwrap(), result)
    }

    #[test]
    fn empty_program_succeeds_with_no_output() {
        let (out, result) = run("");
        result.unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn fibonacci_iteration() {
        let (out, result) = run(
            "a = 0 b = 1 i = 0
             while i < 10
               println(a)
               next = a + b
               a = b
               b = next
               i += 1
             end while",
        );
        result.unwrap();
        assert_eq!(out, "0\n1\n1\n2\n3\n5\n8\n13\n21\n34\n");
    }

    #[test]
    fn fizzbuzz_one_to_fifteen() {
        let (out, result) = run(
            "for n in range(1, 16)
               if n % 15 == 0 then println(\"FizzBuzz\")
               else if n % 3 == 0 then println(\"Fizz\")
               else if n % 5 == 0 then println(\"Buzz\")
               else println(n)
               end if
             end for",
        );
        result.unwrap();
        assert_eq!(
            out,
            "1\n2\nFizz\n4\nBuzz\nFizz\n7\n8\nFizz\nBuzz\n11\nFizz\n13\n14\nFizzBuzz\n"
        );
    }

    #[test]
    fn lexical_error_is_reported_as_lex() {
        let (_, result) = run("x = 1 @");
        assert!(matches!(result.unwrap_err(), GlintError::Lex(_)));
    }

    #[test]
    fn syntax_error_is_reported_as_parse() {
        let (_, result) = run("if true");
        assert!(matches!(result.unwrap_err(), GlintError::Parse(_)));
    }

    #[test]
    fn check_error_is_reported_without_running() {
        let (out, result) = run("println(undeclared_name)");
        assert!(matches!(result.unwrap_err(), GlintError::Check(_)));
        assert_eq!(out, "");
    }

    #[test]
    fn runtime_error_is_reported_as_runtime() {
        let (_, result) = run("x = [1, 2] println(x[10])");
        assert!(matches!(result.unwrap_err(), GlintError::Runtime(_)));
    }

    #[test]
    fn stacktrace_reflects_active_call_chain() {
        let (out, result) = run(
            "inner = function() return stacktrace() end function
             outer = function() return inner() end function
             println(outer())",
        );
        result.unwrap();
        assert!(out.contains("outer()"));
        assert!(out.contains("inner()"));
    }
}
