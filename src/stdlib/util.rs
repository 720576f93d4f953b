//! General utility builtins (spec.md §6): `len`, `type`.

use crate::error::RuntimeError;
use crate::interpreter::NativeContext;
use crate::value::Value;

pub fn len(_ctx: &mut NativeContext, args: &[Value], pos: crate::error::Position) -> Result<Value, RuntimeError> {
    match &args[0] {
        Value::String(s) => Ok(Value::Number(s.chars().count() as f64)),
        Value::Array(cells) => Ok(Value::Number(cells.borrow().len() as f64)),
        other => Err(RuntimeError::type_error(
            format!("'len' requires a String or Array, found {}", other.type_name()),
            pos,
        )),
    }
}

pub fn type_of(_ctx: &mut NativeContext, args: &[Value], _pos: crate::error::Position) -> Result<Value, RuntimeError> {
    let name = match &args[0] {
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Boolean(_) => "boolean",
        Value::Nil => "nil",
        Value::Array(_) => "array",
        Value::Function(_) => "function",
    };
    Ok(Value::string(name))
}
