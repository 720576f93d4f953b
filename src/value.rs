//! Runtime value model (spec.md §5).
//!
//! Grounded on the teacher's `interpreter::VariableType`/`Value`-ish runtime
//! representation in `src/interpreter/mod.rs`, but using `Rc<RefCell<..>>`
//! array cells (the teacher targets a single-threaded tree walker with no
//! need for `Arc`/locks, same here) so array aliasing after assignment
//! behaves the way spec.md §5.2 requires.

use crate::ast::Stmt;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// An array element slot, shared by reference wherever the array itself is
/// shared (spec.md: "Arrays are reference types").
pub type Cell = Rc<RefCell<Value>>;

#[derive(Clone)]
pub enum Value {
    Number(f64),
    String(Rc<str>),
    Boolean(bool),
    Nil,
    Array(Rc<RefCell<Vec<Cell>>>),
    Function(Rc<FunctionObject>),
}

/// A function value is either user-defined (closes over an `Environment`) or
/// a native builtin (spec.md §6). Both share one call surface from the
/// interpreter's point of view.
pub enum FunctionObject {
    Script {
        name: Option<String>,
        params: Vec<String>,
        body: Vec<Stmt>,
        closure: crate::environment::EnvRef,
    },
    Native {
        name: &'static str,
        arity: Arity,
        func: NativeFn,
    },
}

pub type NativeFn = fn(
    &mut crate::interpreter::NativeContext,
    &[Value],
    crate::error::Position,
) -> Result<Value, crate::error::RuntimeError>;

/// Accepted argument counts for a native builtin.
#[derive(Debug, Clone, Copy)]
pub enum Arity {
    Exact(usize),
    Range(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, n: usize) -> bool {
        match self {
            Arity::Exact(k) => n == k,
            Arity::Range(lo, hi) => (lo..=hi).contains(&n),
            Arity::AtLeast(lo) => n >= lo,
        }
    }

    pub fn describe(self) -> String {
        match self {
            Arity::Exact(k) => format!("{k}"),
            Arity::Range(lo, hi) => format!("{lo}-{hi}"),
            Arity::AtLeast(lo) => format!("at least {lo}"),
        }
    }
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Rc::from(s.into()))
    }

    pub fn array(elements: Vec<Value>) -> Self {
        let cells = elements
            .into_iter()
            .map(|v| Rc::new(RefCell::new(v)))
            .collect();
        Value::Array(Rc::new(RefCell::new(cells)))
    }

    /// spec.md §5.3: Numbers are truthy unless `0`, Strings unless empty,
    /// Booleans as themselves, Nil is always falsy, Array/Function always
    /// truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Boolean(b) => *b,
            Value::Nil => false,
            Value::Array(_) | Value::Function(_) => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::Boolean(_) => "Bool",
            Value::Nil => "Nil",
            Value::Array(_) => "List",
            Value::Function(_) => "Function",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Rc<RefCell<Vec<Cell>>>> {
        match self {
            Value::Array(cells) => Some(cells),
            _ => None,
        }
    }

    /// spec.md §5.4: Number/String/Boolean/Nil compare by value (IEEE-754
    /// for numbers, so `NaN != NaN`); Array/Function compare by identity
    /// (Resolved Open Question on equality, SPEC_FULL.md §4.6).
    pub fn values_equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::String(s) => write!(f, "{s}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Nil => write!(f, "nil"),
            Value::Array(cells) => {
                write!(f, "[")?;
                for (i, cell) in cells.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", cell.borrow().display_quoted())?;
                }
                write!(f, "]")
            }
            Value::Function(func) => match func.as_ref() {
                FunctionObject::Script { name, .. } => match name {
                    Some(n) => write!(f, "<function {n}>"),
                    None => write!(f, "<function>"),
                },
                FunctionObject::Native { name, .. } => write!(f, "<builtin {name}>"),
            },
        }
    }
}

impl Value {
    /// Array elements render strings with quotes so `[1, "a"]` prints
    /// unambiguously, while top-level `print`/`println` of a bare string
    /// does not (spec.md §6, `original_source`'s `builtins.cpp` quoting
    /// rule).
    fn display_quoted(&self) -> String {
        match self {
            Value::String(s) => format!("{s:?}"),
            other => other.to_string(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
