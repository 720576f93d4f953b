//! Scope & type pre-check (spec.md §4.3).
//!
//! Grounded on the shape of the teacher's `typechecker` pass (a tree walk
//! that threads a scope chain and an error sink, kept deliberately simpler
//! than Hindley-Milner-ish unification since this language's lattice is
//! flat and permissive) and on `typechecker/error.rs` for the error type.
//! Unlike the teacher's checker, this one never aborts on the first
//! failure: it is explicitly best-effort (spec.md §4.3), collecting every
//! violation it can find in sibling subtrees before returning a verdict.

use crate::ast::{AssignOp, BinaryOp, Expr, Stmt, UnaryOp};
use crate::error::CheckError;
use crate::stdlib;
use std::collections::{HashMap, HashSet};

/// The flat, permissive lattice spec.md §4.3 names. `Unknown` defers any
/// check it touches rather than failing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticType {
    Number,
    String,
    Bool,
    Nil,
    List,
    Function,
    Unknown,
}

impl StaticType {
    fn is_known_number(self) -> bool {
        matches!(self, StaticType::Number)
    }
}

struct Scope {
    names: HashMap<String, StaticType>,
}

struct Checker {
    scopes: Vec<Scope>,
    errors: Vec<CheckError>,
}

impl Checker {
    fn new() -> Self {
        let mut globals = Scope {
            names: HashMap::new(),
        };
        for name in stdlib::builtin_names() {
            globals.names.insert(name.to_string(), StaticType::Function);
        }
        Checker {
            scopes: vec![globals],
            errors: vec![],
        }
    }

    fn push_scope(&mut self) {
        self.scopes.push(Scope {
            names: HashMap::new(),
        });
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn lookup(&self, name: &str) -> Option<StaticType> {
        self.scopes
            .iter()
            .rev()
            .find_map(|s| s.names.get(name).copied())
    }

    /// Implicit declaration on first assignment; explicit declare for
    /// parameters and the `for` loop variable.
    fn declare(&mut self, name: &str, ty: StaticType) {
        self.scopes.last_mut().unwrap().names.insert(name.to_string(), ty);
    }

    fn error(&mut self, message: impl Into<String>, position: crate::error::Position) {
        self.errors.push(CheckError::new(message, position));
    }

    fn check_block(&mut self, body: &[Stmt]) {
        for stmt in body {
            self.check_stmt(stmt);
        }
    }

    fn check_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression(e) => {
                self.check_expr(e);
            }
            Stmt::If {
                condition,
                then_body,
                else_body,
            } => {
                // No fresh scope here, matching the evaluator (see
                // `Interpreter::exec_stmt`'s `Stmt::If` arm and DESIGN.md):
                // a name first assigned inside a branch must still be
                // visible to code after the `if`.
                self.check_expr(condition);
                self.check_block(then_body);
                if let Some(else_body) = else_body {
                    self.check_block(else_body);
                }
            }
            Stmt::While { condition, body } => {
                self.check_expr(condition);
                self.check_block(body);
            }
            Stmt::For {
                var,
                iterable,
                body,
            } => {
                self.check_expr(iterable);
                self.push_scope();
                self.declare(var, StaticType::Unknown);
                self.check_block(body);
                self.pop_scope();
            }
            Stmt::Return(value, _) => {
                if let Some(e) = value {
                    self.check_expr(e);
                }
            }
            Stmt::Block(body) => {
                self.push_scope();
                self.check_block(body);
                self.pop_scope();
            }
            Stmt::Break(_) | Stmt::Continue(_) => {}
        }
    }

    fn check_expr(&mut self, expr: &Expr) -> StaticType {
        match expr {
            Expr::Number(..) => StaticType::Number,
            Expr::Str(..) => StaticType::String,
            Expr::Boolean(..) => StaticType::Bool,
            Expr::Nil(..) => StaticType::Nil,
            Expr::Variable(name, position) => match self.lookup(name) {
                Some(ty) => ty,
                None => {
                    self.error(format!("'{name}' is not declared"), *position);
                    StaticType::Unknown
                }
            },
            Expr::Unary {
                op,
                operand,
                position,
            } => {
                let ty = self.check_expr(operand);
                match op {
                    UnaryOp::Neg => {
                        if ty != StaticType::Unknown && !ty.is_known_number() {
                            self.error(
                                format!("unary '-' requires Number, found {ty:?}"),
                                *position,
                            );
                        }
                        StaticType::Number
                    }
                    UnaryOp::Not => StaticType::Bool,
                }
            }
            Expr::Binary {
                op,
                left,
                right,
                position,
            } => {
                let l = self.check_expr(left);
                let r = self.check_expr(right);
                self.check_binary(*op, l, r, *position)
            }
            Expr::Assign {
                name,
                op,
                right,
                position,
            } => {
                let right_ty = self.check_expr(right);
                let ty = if op.as_binary().is_some() {
                    match self.lookup(name) {
                        Some(existing) => self.check_binary(
                            op.as_binary().unwrap(),
                            existing,
                            right_ty,
                            *position,
                        ),
                        None => {
                            self.error(format!("'{name}' is not declared"), *position);
                            StaticType::Unknown
                        }
                    }
                } else {
                    right_ty
                };
                if self.lookup(name).is_none() {
                    self.declare(name, ty);
                } else {
                    self.declare_in_owning_scope(name, ty);
                }
                ty
            }
            Expr::Call {
                callee,
                args,
                position,
            } => {
                let callee_ty = self.check_expr(callee);
                let arg_types: Vec<StaticType> = args.iter().map(|a| self.check_expr(a)).collect();
                if callee_ty != StaticType::Unknown && callee_ty != StaticType::Function {
                    self.error(
                        format!("cannot call a value of type {callee_ty:?}"),
                        *position,
                    );
                }
                if let Expr::Variable(name, _) = callee.as_ref() {
                    if let Some(sig) = stdlib::builtin_signature(name) {
                        if !sig.arity.accepts(arg_types.len()) {
                            self.error(
                                format!(
                                    "'{name}' expects {} argument(s), got {}",
                                    sig.arity.describe(),
                                    arg_types.len()
                                ),
                                *position,
                            );
                        }
                    }
                }
                StaticType::Unknown
            }
            Expr::List { elements, .. } => {
                for e in elements {
                    self.check_expr(e);
                }
                StaticType::List
            }
            Expr::Function {
                params,
                body,
                position,
            } => {
                self.push_scope();
                let mut seen = HashSet::new();
                for p in params {
                    if !seen.insert(p.clone()) {
                        self.error(format!("duplicate parameter name '{p}'"), *position);
                    }
                    self.declare(p, StaticType::Unknown);
                }
                self.check_block(body);
                self.pop_scope();
                StaticType::Function
            }
            Expr::Index {
                object,
                index,
                position,
            } => {
                let obj_ty = self.check_expr(object);
                let idx_ty = self.check_expr(index);
                if obj_ty != StaticType::Unknown
                    && !matches!(obj_ty, StaticType::List | StaticType::String)
                {
                    self.error(format!("cannot index a value of type {obj_ty:?}"), *position);
                }
                if idx_ty != StaticType::Unknown && idx_ty != StaticType::Number {
                    self.error("index must be Number".to_string(), *position);
                }
                StaticType::Unknown
            }
            Expr::Slice {
                object,
                from,
                to,
                position,
            } => {
                let obj_ty = self.check_expr(object);
                if let Some(f) = from {
                    self.check_bound(f);
                }
                if let Some(t) = to {
                    self.check_bound(t);
                }
                // Slice target may be List, String, or Function: the checker
                // is deliberately more permissive than the evaluator here
                // (documented design decision, see DESIGN.md).
                if obj_ty != StaticType::Unknown
                    && !matches!(
                        obj_ty,
                        StaticType::List | StaticType::String | StaticType::Function
                    )
                {
                    self.error(format!("cannot slice a value of type {obj_ty:?}"), *position);
                }
                match obj_ty {
                    StaticType::String => StaticType::String,
                    _ => StaticType::List,
                }
            }
        }
    }

    fn check_bound(&mut self, e: &Expr) {
        let ty = self.check_expr(e);
        if ty != StaticType::Unknown && ty != StaticType::Number {
            self.error(format!("slice bound must be Number, found {ty:?}"), e.position());
        }
    }

    /// Mirrors the evaluator's actual coercion rules (`number_of` accepts
    /// Number and Boolean, nothing else) rather than a cleaner-looking
    /// stricter lattice: a checker that rejects what the evaluator accepts
    /// is worse than a permissive one, since it would fail programs that
    /// run fine.
    fn check_binary(
        &mut self,
        op: BinaryOp,
        l: StaticType,
        r: StaticType,
        position: crate::error::Position,
    ) -> StaticType {
        use StaticType::*;
        let coerces_to_number = |t: StaticType| matches!(t, Number | Bool);
        match op {
            BinaryOp::Add => {
                if l == Unknown || r == Unknown {
                    return Unknown;
                }
                if l == String && r == String {
                    String
                } else if coerces_to_number(l) && coerces_to_number(r) {
                    Number
                } else {
                    self.error(
                        format!("'+' is not defined for {l:?} and {r:?}"),
                        position,
                    );
                    Unknown
                }
            }
            BinaryOp::Sub => {
                if l == Unknown || r == Unknown {
                    return Unknown;
                }
                if l == String && r == String {
                    String
                } else if coerces_to_number(l) && coerces_to_number(r) {
                    Number
                } else {
                    self.error(
                        format!("'-' requires two Numbers or two Strings, found {l:?} and {r:?}"),
                        position,
                    );
                    Unknown
                }
            }
            BinaryOp::Div | BinaryOp::Mod | BinaryOp::Pow => {
                if l == Unknown || r == Unknown {
                    return Unknown;
                }
                if coerces_to_number(l) && coerces_to_number(r) {
                    Number
                } else {
                    self.error(
                        format!("'{}' requires two Numbers, found {l:?} and {r:?}", op_sym(op)),
                        position,
                    );
                    Unknown
                }
            }
            BinaryOp::Mul => {
                if l == Unknown || r == Unknown {
                    return Unknown;
                }
                if l == String && coerces_to_number(r) {
                    String
                } else if r == String && coerces_to_number(l) {
                    String
                } else if coerces_to_number(l) && coerces_to_number(r) {
                    Number
                } else {
                    self.error(format!("'*' is not defined for {l:?} and {r:?}"), position);
                    Unknown
                }
            }
            BinaryOp::Eq
            | BinaryOp::NotEq
            | BinaryOp::Less
            | BinaryOp::LessEq
            | BinaryOp::Greater
            | BinaryOp::GreaterEq
            | BinaryOp::And
            | BinaryOp::Or => Bool,
        }
    }

    fn declare_in_owning_scope(&mut self, name: &str, ty: StaticType) {
        for scope in self.scopes.iter_mut().rev() {
            if scope.names.contains_key(name) {
                scope.names.insert(name.to_string(), ty);
                return;
            }
        }
        self.declare(name, ty);
    }
}

fn op_sym(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Sub => "-",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::Pow => "^",
        _ => "?",
    }
}

/// Runs the pre-check over a whole program, returning every violation found
/// (empty on success). Best-effort: does not stop at the first error.
pub fn check(program: &[Stmt]) -> Vec<CheckError> {
    let mut checker = Checker::new();
    checker.check_block(program);
    checker.errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn errors(source: &str) -> Vec<CheckError> {
        let program = Parser::new(source).unwrap().parse_program().unwrap();
        check(&program)
    }

    #[test]
    fn undeclared_read_fails() {
        assert!(!errors("print(x)").is_empty());
    }

    #[test]
    fn assignment_implicitly_declares() {
        assert!(errors("x = 1 print(x)").is_empty());
    }

    #[test]
    fn duplicate_parameter_names_fail() {
        assert!(!errors("f = function(a, a) end function").is_empty());
    }

    #[test]
    fn builtins_are_predeclared() {
        assert!(errors("println(\"hi\")").is_empty());
    }

    #[test]
    fn string_minus_number_is_a_type_error() {
        assert!(!errors("x = \"a\" - 1").is_empty());
    }

    #[test]
    fn unknown_defers_checks() {
        assert!(errors("f = function(a) return a + 1 end function").is_empty());
    }
}
