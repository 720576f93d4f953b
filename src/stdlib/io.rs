//! I/O builtins (spec.md §6), grounded on `builtins.cpp`'s
//! `RegisterIOFunctions`.

use crate::error::RuntimeError;
use crate::interpreter::NativeContext;
use crate::value::Value;
use std::io::{BufRead, Write};

/// `print`'s formatting policy: used by `print`, `println`, and reused by
/// `to_string` for the Number case (spec.md §6).
pub fn format_for_print(v: &Value) -> String {
    match v {
        Value::String(s) => {
            if s.contains(' ') {
                format!("\"{s}\"")
            } else {
                s.to_string()
            }
        }
        other => other.to_string(),
    }
}

pub fn print(ctx: &mut NativeContext, args: &[Value], _pos: crate::error::Position) -> Result<Value, RuntimeError> {
    if let Some(v) = args.first() {
        write!(ctx.output, "{}", format_for_print(v)).ok();
    }
    Ok(Value::Nil)
}

pub fn println(ctx: &mut NativeContext, args: &[Value], pos: crate::error::Position) -> Result<Value, RuntimeError> {
    print(ctx, args, pos)?;
    writeln!(ctx.output).ok();
    Ok(Value::Nil)
}

pub fn read(ctx: &mut NativeContext, _args: &[Value], _pos: crate::error::Position) -> Result<Value, RuntimeError> {
    let mut line = String::new();
    match ctx.input.read_line(&mut line) {
        Ok(0) => Ok(Value::Nil),
        Ok(_) => {
            if line.ends_with('\n') {
                line.pop();
                if line.ends_with('\r') {
                    line.pop();
                }
            }
            Ok(Value::string(line))
        }
        Err(_) => Ok(Value::Nil),
    }
}
