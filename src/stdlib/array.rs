//! Array builtins (spec.md §6), grounded on `builtins.cpp`'s
//! `RegisterArrayFunctions`.
//!
//! `builtins.cpp` extracts the target array by value before mutating it
//! (`Value::Array array = ExtractArray(...)`), which copies the cell list
//! but shares the cells themselves. `push`/`insert`/`sort` return that
//! mutated copy as the new array value; `pop`/`remove` return only the
//! removed element and let the mutated copy fall out of scope. The caller
//! must rebind the result (`a = push(a, x)`) to observe the change — this
//! rewrite keeps that behavior rather than mutating the argument in place
//! (see DESIGN.md).

use crate::error::RuntimeError;
use crate::interpreter::NativeContext;
use crate::value::{Cell, Value};
use std::cell::RefCell;
use std::rc::Rc;

fn array_arg<'a>(
    args: &'a [Value],
    i: usize,
    name: &str,
    pos: crate::error::Position,
) -> Result<Vec<Cell>, RuntimeError> {
    args[i]
        .as_array()
        .map(|cells| cells.borrow().clone())
        .ok_or_else(|| RuntimeError::type_error(format!("'{name}' expects an Array argument"), pos))
}

fn number_arg(args: &[Value], i: usize, name: &str, pos: crate::error::Position) -> Result<f64, RuntimeError> {
    args[i]
        .as_number()
        .ok_or_else(|| RuntimeError::type_error(format!("'{name}' expects a Number argument"), pos))
}

fn normalize(i: f64, len: usize) -> i64 {
    let i = i.trunc() as i64;
    if i < 0 {
        i + len as i64
    } else {
        i
    }
}

fn wrap(cells: Vec<Cell>) -> Value {
    Value::Array(Rc::new(RefCell::new(cells)))
}

pub fn range(_ctx: &mut NativeContext, args: &[Value], pos: crate::error::Position) -> Result<Value, RuntimeError> {
    let (start, end, step) = match args.len() {
        1 => (0.0, number_arg(args, 0, "range", pos)?, 1.0),
        2 => (
            number_arg(args, 0, "range", pos)?,
            number_arg(args, 1, "range", pos)?,
            1.0,
        ),
        3 => (
            number_arg(args, 0, "range", pos)?,
            number_arg(args, 1, "range", pos)?,
            number_arg(args, 2, "range", pos)?,
        ),
        _ => unreachable!("arity checked by the caller"),
    };
    if step == 0.0 {
        return Err(RuntimeError::type_error("'range' step cannot be zero", pos));
    }

    let mut values = vec![];
    let mut v = start;
    if step > 0.0 {
        while v < end {
            values.push(Rc::new(RefCell::new(Value::Number(v))));
            v += step;
        }
    } else {
        while v > end {
            values.push(Rc::new(RefCell::new(Value::Number(v))));
            v += step;
        }
    }
    Ok(wrap(values))
}

pub fn push(_ctx: &mut NativeContext, args: &[Value], pos: crate::error::Position) -> Result<Value, RuntimeError> {
    let mut cells = array_arg(args, 0, "push", pos)?;
    cells.push(Rc::new(RefCell::new(args[1].clone())));
    Ok(wrap(cells))
}

pub fn pop(_ctx: &mut NativeContext, args: &[Value], pos: crate::error::Position) -> Result<Value, RuntimeError> {
    let mut cells = array_arg(args, 0, "pop", pos)?;
    let last = cells
        .pop()
        .ok_or_else(|| RuntimeError::index_error("'pop' from an empty array", pos))?;
    Ok(last.borrow().clone())
}

pub fn insert(_ctx: &mut NativeContext, args: &[Value], pos: crate::error::Position) -> Result<Value, RuntimeError> {
    let mut cells = array_arg(args, 0, "insert", pos)?;
    let raw = number_arg(args, 1, "insert", pos)?;
    let index = normalize(raw, cells.len());
    if index < 0 || index as usize > cells.len() {
        return Err(RuntimeError::index_error(format!("'insert' index {raw} out of range"), pos));
    }
    cells.insert(index as usize, Rc::new(RefCell::new(args[2].clone())));
    Ok(wrap(cells))
}

pub fn remove(_ctx: &mut NativeContext, args: &[Value], pos: crate::error::Position) -> Result<Value, RuntimeError> {
    let mut cells = array_arg(args, 0, "remove", pos)?;
    let raw = number_arg(args, 1, "remove", pos)?;
    let index = normalize(raw, cells.len());
    if index < 0 || index as usize >= cells.len() {
        return Err(RuntimeError::index_error(format!("'remove' index {raw} out of range"), pos));
    }
    let removed = cells.remove(index as usize);
    Ok(removed.borrow().clone())
}

/// Orders in place within a homogeneous Number or String array; any other
/// element-type pairing is treated as equal, so mixed-type arrays end up in
/// whatever order a stable sort leaves unequal elements (matches the
/// `return false` fallback in `builtins.cpp`'s comparator).
pub fn sort(_ctx: &mut NativeContext, args: &[Value], pos: crate::error::Position) -> Result<Value, RuntimeError> {
    let mut cells = array_arg(args, 0, "sort", pos)?;
    cells.sort_by(|a, b| {
        let a = a.borrow();
        let b = b.borrow();
        match (&*a, &*b) {
            (Value::Number(x), Value::Number(y)) => x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal),
            (Value::String(x), Value::String(y)) => x.as_ref().cmp(y.as_ref()),
            _ => std::cmp::Ordering::Equal,
        }
    });
    Ok(wrap(cells))
}
