//! System/diagnostics builtins (spec.md §6): `stacktrace`.

use crate::error::RuntimeError;
use crate::interpreter::{format_call_stack, NativeContext};
use crate::value::Value;

pub fn stacktrace(ctx: &mut NativeContext, _args: &[Value], _pos: crate::error::Position) -> Result<Value, RuntimeError> {
    Ok(Value::string(format_call_stack(ctx.call_stack)))
}
