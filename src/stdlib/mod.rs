//! Built-in function catalog (spec.md §6).
//!
//! Core/catalog split grounded on spec.md §1's own framing ("core exposes a
//! registration interface; the catalog itself is non-algorithmic") and on
//! the teacher's habit of one file per concern under a module directory.
//! Each submodule owns one family from `builtins.cpp`'s
//! `BuiltinRegistry::RegisterAll`.

mod array;
mod io;
mod math;
mod string;
mod system;
mod util;

use crate::environment::EnvRef;
use crate::value::{Arity, FunctionObject, NativeFn, Value};
use std::rc::Rc;

struct BuiltinSpec {
    name: &'static str,
    arity: Arity,
    func: NativeFn,
}

/// Arity/signature info the checker needs without depending on the
/// interpreter (spec.md §4.3: "known built-ins" arg-count check).
pub struct BuiltinSignature {
    pub arity: Arity,
}

const BUILTINS: &[BuiltinSpec] = &[
    BuiltinSpec { name: "print", arity: Arity::Range(0, 1), func: io::print },
    BuiltinSpec { name: "println", arity: Arity::Range(0, 1), func: io::println },
    BuiltinSpec { name: "read", arity: Arity::Exact(0), func: io::read },
    BuiltinSpec { name: "len", arity: Arity::Exact(1), func: util::len },
    BuiltinSpec { name: "type", arity: Arity::Exact(1), func: util::type_of },
    BuiltinSpec { name: "abs", arity: Arity::Exact(1), func: math::abs },
    BuiltinSpec { name: "ceil", arity: Arity::Exact(1), func: math::ceil },
    BuiltinSpec { name: "floor", arity: Arity::Exact(1), func: math::floor },
    BuiltinSpec { name: "round", arity: Arity::Exact(1), func: math::round },
    BuiltinSpec { name: "sqrt", arity: Arity::Exact(1), func: math::sqrt },
    BuiltinSpec { name: "rnd", arity: Arity::Exact(1), func: math::rnd },
    BuiltinSpec { name: "parse_num", arity: Arity::Exact(1), func: math::parse_num },
    BuiltinSpec { name: "to_string", arity: Arity::Exact(1), func: math::to_string_builtin },
    BuiltinSpec { name: "min", arity: Arity::AtLeast(2), func: math::min },
    BuiltinSpec { name: "max", arity: Arity::AtLeast(2), func: math::max },
    BuiltinSpec { name: "lower", arity: Arity::Exact(1), func: string::lower },
    BuiltinSpec { name: "upper", arity: Arity::Exact(1), func: string::upper },
    BuiltinSpec { name: "split", arity: Arity::Exact(2), func: string::split },
    BuiltinSpec { name: "join", arity: Arity::Exact(2), func: string::join },
    BuiltinSpec { name: "replace", arity: Arity::Exact(3), func: string::replace },
    BuiltinSpec { name: "range", arity: Arity::Range(1, 3), func: array::range },
    BuiltinSpec { name: "push", arity: Arity::Exact(2), func: array::push },
    BuiltinSpec { name: "pop", arity: Arity::Exact(1), func: array::pop },
    BuiltinSpec { name: "insert", arity: Arity::Exact(3), func: array::insert },
    BuiltinSpec { name: "remove", arity: Arity::Exact(2), func: array::remove },
    BuiltinSpec { name: "sort", arity: Arity::Exact(1), func: array::sort },
    BuiltinSpec { name: "stacktrace", arity: Arity::Exact(0), func: system::stacktrace },
];

pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|b| b.name)
}

pub fn builtin_signature(name: &str) -> Option<BuiltinSignature> {
    BUILTINS
        .iter()
        .find(|b| b.name == name)
        .map(|b| BuiltinSignature { arity: b.arity })
}

/// Registers every built-in into `env` (spec.md §6: "registered into the
/// global environment before evaluation").
pub fn register_builtins(env: &EnvRef) {
    for spec in BUILTINS {
        let func = Value::Function(Rc::new(FunctionObject::Native {
            name: spec.name,
            arity: spec.arity,
            func: spec.func,
        }));
        env.borrow_mut().bind(spec.name, func);
    }
}
