//! Shared test driver, adapted from the teacher's `test-utils` crate's
//! `Expected { stdout, stderr }` pattern — here calling [`glint::interpret`]
//! directly instead of spawning a built binary, since the library exposes a
//! full entry point on its own.

use std::io::Cursor;

pub struct Outcome {
    pub stdout: String,
    pub ok: bool,
    pub error_message: Option<String>,
}

pub fn run(source: &str) -> Outcome {
    let mut stdout = Vec::new();
    let mut stdin = Cursor::new(Vec::new());
    match glint::interpret(source, &mut stdout, &mut stdin) {
        Ok(()) => Outcome {
            stdout: String::from_utf8(stdout).unwrap(),
            ok: true,
            error_message: None,
        },
        Err(e) => Outcome {
            stdout: String::from_utf8(stdout).unwrap(),
            ok: false,
            error_message: Some(e.to_string()),
        },
    }
}

pub fn run_with_input(source: &str, input: &str) -> Outcome {
    let mut stdout = Vec::new();
    let mut stdin = Cursor::new(input.as_bytes().to_vec());
    match glint::interpret(source, &mut stdout, &mut stdin) {
        Ok(()) => Outcome {
            stdout: String::from_utf8(stdout).unwrap(),
            ok: true,
            error_message: None,
        },
        Err(e) => Outcome {
            stdout: String::from_utf8(stdout).unwrap(),
            ok: false,
            error_message: Some(e.to_string()),
        },
    }
}
