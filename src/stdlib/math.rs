//! Math and numeric-conversion builtins (spec.md §6), grounded on
//! `builtins.cpp`'s `RegisterMathFunctions`.

use crate::error::RuntimeError;
use crate::interpreter::NativeContext;
use crate::value::Value;
use rand::Rng;

fn number_arg(args: &[Value], i: usize, name: &str, pos: crate::error::Position) -> Result<f64, RuntimeError> {
    args[i]
        .as_number()
        .ok_or_else(|| RuntimeError::type_error(format!("'{name}' expects a Number argument"), pos))
}

pub fn abs(_ctx: &mut NativeContext, args: &[Value], pos: crate::error::Position) -> Result<Value, RuntimeError> {
    Ok(Value::Number(number_arg(args, 0, "abs", pos)?.abs()))
}

pub fn ceil(_ctx: &mut NativeContext, args: &[Value], pos: crate::error::Position) -> Result<Value, RuntimeError> {
    Ok(Value::Number(number_arg(args, 0, "ceil", pos)?.ceil()))
}

pub fn floor(_ctx: &mut NativeContext, args: &[Value], pos: crate::error::Position) -> Result<Value, RuntimeError> {
    Ok(Value::Number(number_arg(args, 0, "floor", pos)?.floor()))
}

pub fn round(_ctx: &mut NativeContext, args: &[Value], pos: crate::error::Position) -> Result<Value, RuntimeError> {
    Ok(Value::Number(number_arg(args, 0, "round", pos)?.round()))
}

pub fn sqrt(_ctx: &mut NativeContext, args: &[Value], pos: crate::error::Position) -> Result<Value, RuntimeError> {
    let n = number_arg(args, 0, "sqrt", pos)?;
    if n < 0.0 {
        return Err(RuntimeError::type_error("'sqrt' of a negative number", pos));
    }
    Ok(Value::Number(n.sqrt()))
}

pub fn rnd(_ctx: &mut NativeContext, args: &[Value], pos: crate::error::Position) -> Result<Value, RuntimeError> {
    let n = number_arg(args, 0, "rnd", pos)?.floor() as i64;
    if n <= 0 {
        return Err(RuntimeError::type_error("'rnd' argument must be positive", pos));
    }
    let value = rand::thread_rng().gen_range(0..n);
    Ok(Value::Number(value as f64))
}

/// Parses a leading numeric prefix the way `std::stod` does: scans as much
/// of a number as matches, ignores trailing garbage, and only fails when no
/// digits are found at all.
fn parse_numeric_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let mut saw_digit = false;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        saw_digit = true;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            saw_digit = true;
        }
    }
    if !saw_digit {
        return None;
    }
    let mut end = i;
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }
    s[..end].parse::<f64>().ok()
}

pub fn parse_num(_ctx: &mut NativeContext, args: &[Value], pos: crate::error::Position) -> Result<Value, RuntimeError> {
    let s = args[0]
        .as_str()
        .ok_or_else(|| RuntimeError::type_error("'parse_num' expects a String argument", pos))?;
    Ok(parse_numeric_prefix(s).map(Value::Number).unwrap_or(Value::Nil))
}

pub fn to_string_builtin(_ctx: &mut NativeContext, args: &[Value], pos: crate::error::Position) -> Result<Value, RuntimeError> {
    let n = number_arg(args, 0, "to_string", pos)?;
    Ok(Value::string(Value::Number(n).to_string()))
}

pub fn min(_ctx: &mut NativeContext, args: &[Value], pos: crate::error::Position) -> Result<Value, RuntimeError> {
    let mut best = number_arg(args, 0, "min", pos)?;
    for i in 1..args.len() {
        best = best.min(number_arg(args, i, "min", pos)?);
    }
    Ok(Value::Number(best))
}

pub fn max(_ctx: &mut NativeContext, args: &[Value], pos: crate::error::Position) -> Result<Value, RuntimeError> {
    let mut best = number_arg(args, 0, "max", pos)?;
    for i in 1..args.len() {
        best = best.max(number_arg(args, i, "max", pos)?);
    }
    Ok(Value::Number(best))
}
