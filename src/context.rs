//! Mutable state threaded through a running program.

use std::collections::HashMap;

use crate::block::BlockRef;
use crate::value::Value;

/// A registered procedure body: either the legacy single-line action or a
/// block-form definition with its parameter names.
#[derive(Debug, Clone)]
pub enum ProcedureBody {
    Inline(String),
    Block {
        body: BlockRef,
        parameters: Vec<String>,
    },
}

/// Everything a running script mutates: variable and list mappings, the
/// procedure registry, the anonymous working list, the loop-control
/// signal pair, and the accumulated output. Handlers receive this by
/// mutable reference; nothing lives in ambient or static state.
pub struct ExecutionContext {
    pub variables: HashMap<String, Value>,
    pub lists: HashMap<String, Vec<Value>>,
    pub procedures: HashMap<String, ProcedureBody>,
    /// Anonymous working list for the bare `add ... to the list` forms.
    pub current_list: Vec<Value>,
    /// Transient loop-control signals, consumed by the nearest enclosing
    /// loop. Loop boundaries save and restore the caller's values.
    pub loop_break: bool,
    pub loop_continue: bool,
    output: String,
    pub(crate) db: Option<rusqlite::Connection>,
    pub(crate) http_agent: ureq::Agent,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self {
            variables: HashMap::new(),
            lists: HashMap::new(),
            procedures: HashMap::new(),
            current_list: Vec::new(),
            loop_break: false,
            loop_continue: false,
            output: String::new(),
            db: None,
            http_agent: ureq::Agent::new(),
        }
    }

    /// Append one line of user-visible output.
    pub(crate) fn emit(&mut self, line: impl AsRef<str>) {
        self.output.push_str(line.as_ref());
        self.output.push('\n');
    }

    /// Append text without a trailing newline; loop prefixes use this so
    /// the iterated command's first output line continues the prefix.
    pub(crate) fn emit_part(&mut self, text: impl AsRef<str>) {
        self.output.push_str(text.as_ref());
    }

    /// Drain the accumulated output.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    /// Clear variables, lists, procedures and the working list. The open
    /// database connection, if any, survives a reset.
    pub(crate) fn reset(&mut self) {
        self.variables.clear();
        self.lists.clear();
        self.procedures.clear();
        self.current_list.clear();
        self.loop_break = false;
        self.loop_continue = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_output_drains() {
        let mut ctx = ExecutionContext::new();
        ctx.emit("one");
        ctx.emit_part("two");
        assert_eq!(ctx.take_output(), "one\ntwo");
        assert_eq!(ctx.take_output(), "");
    }

    #[test]
    fn reset_clears_state_but_keeps_flags_false() {
        let mut ctx = ExecutionContext::new();
        ctx.variables.insert("x".to_string(), Value::Int(1));
        ctx.lists.insert("l".to_string(), vec![Value::Int(2)]);
        ctx.current_list.push(Value::Int(3));
        ctx.loop_break = true;
        ctx.reset();
        assert!(ctx.variables.is_empty());
        assert!(ctx.lists.is_empty());
        assert!(ctx.current_list.is_empty());
        assert!(!ctx.loop_break);
    }
}
