//! Process-wide call stack (spec.md §3, §5): used only for diagnostics and
//! the `stacktrace` builtin. Frames are pushed on entry to a script function
//! call and popped on every exit path, including error propagation — see
//! the push/pop pairing in `Interpreter::call`.

use crate::value::Value;

#[derive(Debug, Clone)]
pub struct CallFrame {
    pub function_name: Option<String>,
    pub parameters: Vec<String>,
    pub arguments: Vec<Value>,
}

impl CallFrame {
    fn describe(&self) -> String {
        let name = self.function_name.as_deref().unwrap_or("<anonymous>");
        let args: Vec<String> = self.arguments.iter().map(|v| v.to_string()).collect();
        format!("{name}({})", args.join(", "))
    }
}

/// Joins the active chain outermost-to-innermost (spec.md §6), the shape
/// `stacktrace()` returns.
pub fn format_call_stack(frames: &[CallFrame]) -> String {
    frames
        .iter()
        .map(CallFrame::describe)
        .collect::<Vec<_>>()
        .join(" -> ")
}
