//! Classified error types for every phase of the pipeline (spec.md §7).
//!
//! Grounded on `typechecker/error.rs` and `parser/mod.rs` in the teacher
//! repo: plain structs with a hand-written `Display` + `std::error::Error`
//! impl rather than a derive-macro crate, each carrying a source position.

use std::fmt;

/// 1-based line/column of the first character of a token or node.
pub type Position = (usize, usize);

fn fmt_at(f: &mut fmt::Formatter<'_>, message: &str, position: Position) -> fmt::Result {
    write!(f, "{} ({}:{})", message, position.0, position.1)
}

#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub position: Position,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_at(f, &self.message, self.position)
    }
}

impl std::error::Error for LexError {}

impl LexError {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub position: Position,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_at(f, &self.message, self.position)
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// Scope/type pre-check failure (spec.md §4.3). The checker keeps walking
/// after one of these and collects every one it finds.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckError {
    pub message: String,
    pub position: Position,
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_at(f, &self.message, self.position)
    }
}

impl std::error::Error for CheckError {}

impl CheckError {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// The runtime error kinds named in spec.md §7.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    TypeError,
    NameError,
    IndexError,
    ArityError,
    CallError,
}

impl fmt::Display for RuntimeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuntimeErrorKind::TypeError => "TypeError",
            RuntimeErrorKind::NameError => "NameError",
            RuntimeErrorKind::IndexError => "IndexError",
            RuntimeErrorKind::ArityError => "ArityError",
            RuntimeErrorKind::CallError => "CallError",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub message: String,
    pub position: Position,
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}:{})",
            self.kind, self.message, self.position.0, self.position.1
        )
    }
}

impl std::error::Error for RuntimeError {}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, message: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            message: message.into(),
            position,
        }
    }

    pub fn type_error(message: impl Into<String>, position: Position) -> Self {
        Self::new(RuntimeErrorKind::TypeError, message, position)
    }

    pub fn name_error(message: impl Into<String>, position: Position) -> Self {
        Self::new(RuntimeErrorKind::NameError, message, position)
    }

    pub fn index_error(message: impl Into<String>, position: Position) -> Self {
        Self::new(RuntimeErrorKind::IndexError, message, position)
    }

    pub fn arity_error(message: impl Into<String>, position: Position) -> Self {
        Self::new(RuntimeErrorKind::ArityError, message, position)
    }

    pub fn call_error(message: impl Into<String>, position: Position) -> Self {
        Self::new(RuntimeErrorKind::CallError, message, position)
    }
}

/// Top-level error returned by [`crate::interpret`], one variant per phase.
#[derive(Debug, Clone, PartialEq)]
pub enum GlintError {
    Lex(LexError),
    Parse(ParseError),
    Check(Vec<CheckError>),
    Runtime(RuntimeError),
}

impl fmt::Display for GlintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlintError::Lex(e) => write!(f, "lexical error: {e}"),
            GlintError::Parse(e) => write!(f, "syntax error: {e}"),
            GlintError::Check(errs) => {
                for (i, e) in errs.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "type error: {e}")?;
                }
                Ok(())
            }
            GlintError::Runtime(e) => write!(f, "runtime error: {e}"),
        }
    }
}

impl std::error::Error for GlintError {}

impl From<LexError> for GlintError {
    fn from(e: LexError) -> Self {
        GlintError::Lex(e)
    }
}

impl From<ParseError> for GlintError {
    fn from(e: ParseError) -> Self {
        GlintError::Parse(e)
    }
}

impl From<RuntimeError> for GlintError {
    fn from(e: RuntimeError) -> Self {
        GlintError::Runtime(e)
    }
}
