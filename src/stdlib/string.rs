//! String builtins (spec.md §6), grounded on `builtins.cpp`'s
//! `RegisterStringFunctions`.

use crate::error::RuntimeError;
use crate::interpreter::NativeContext;
use crate::value::Value;

fn string_arg<'a>(args: &'a [Value], i: usize, name: &str, pos: crate::error::Position) -> Result<&'a str, RuntimeError> {
    args[i]
        .as_str()
        .ok_or_else(|| RuntimeError::type_error(format!("'{name}' expects a String argument"), pos))
}

pub fn lower(_ctx: &mut NativeContext, args: &[Value], pos: crate::error::Position) -> Result<Value, RuntimeError> {
    Ok(Value::string(string_arg(args, 0, "lower", pos)?.to_ascii_lowercase()))
}

pub fn upper(_ctx: &mut NativeContext, args: &[Value], pos: crate::error::Position) -> Result<Value, RuntimeError> {
    Ok(Value::string(string_arg(args, 0, "upper", pos)?.to_ascii_uppercase()))
}

pub fn split(_ctx: &mut NativeContext, args: &[Value], pos: crate::error::Position) -> Result<Value, RuntimeError> {
    let s = string_arg(args, 0, "split", pos)?;
    let delim = string_arg(args, 1, "split", pos)?;
    if delim.is_empty() {
        return Err(RuntimeError::type_error("'split' delimiter cannot be empty", pos));
    }
    let parts: Vec<Value> = s.split(delim).map(Value::string).collect();
    Ok(Value::array(parts))
}

pub fn join(_ctx: &mut NativeContext, args: &[Value], pos: crate::error::Position) -> Result<Value, RuntimeError> {
    let array = args[0]
        .as_array()
        .ok_or_else(|| RuntimeError::type_error("'join' expects an Array argument", pos))?;
    let delim = string_arg(args, 1, "join", pos)?;
    let parts: Vec<String> = array.borrow().iter().map(|c| c.borrow().to_string()).collect();
    Ok(Value::string(parts.join(delim)))
}

pub fn replace(_ctx: &mut NativeContext, args: &[Value], pos: crate::error::Position) -> Result<Value, RuntimeError> {
    let s = string_arg(args, 0, "replace", pos)?;
    let old = string_arg(args, 1, "replace", pos)?;
    let new = string_arg(args, 2, "replace", pos)?;
    if old.is_empty() {
        return Err(RuntimeError::type_error("'replace' old string cannot be empty", pos));
    }
    Ok(Value::string(s.replace(old, new)))
}
