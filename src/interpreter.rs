//! The interpreter: an execution context plus the fixed dispatch tables.

use std::rc::Rc;

use crate::context::ExecutionContext;
use crate::dispatch::{block_header_rules, command_rules, Handler, HeaderRule, PatternRule};
use crate::trace::trace_log;
use crate::value::RuntimeError;

/// Commands longer than this are rejected up front.
const MAX_COMMAND_LEN: usize = 1000;

pub struct Interpreter {
    pub(crate) ctx: ExecutionContext,
    header_rules: Rc<[HeaderRule]>,
    rules: Rc<[PatternRule]>,
    /// Current procedure-call nesting, bounded by the call-frame guard.
    pub(crate) call_depth: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            ctx: ExecutionContext::new(),
            header_rules: block_header_rules().into(),
            rules: command_rules().into(),
            call_depth: 0,
        }
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut ExecutionContext {
        &mut self.ctx
    }

    /// Drain the output accumulated so far.
    pub fn take_output(&mut self) -> String {
        self.ctx.take_output()
    }

    pub(crate) fn rules(&self) -> Rc<[PatternRule]> {
        Rc::clone(&self.rules)
    }

    /// Dispatch one command line.
    ///
    /// `Ok(Some(descriptor))` is a success, `Ok(None)` a reported,
    /// non-fatal failure (unrecognized command or semantic error), and
    /// `Err` a fatal failure that must abort the enclosing script run.
    pub fn process_command(&mut self, command: &str) -> Result<Option<String>, RuntimeError> {
        let command = command.trim();
        if command.is_empty() {
            return Ok(None);
        }
        if command.len() > MAX_COMMAND_LEN {
            self.ctx
                .emit(format!("Error: Command too long (max {} characters)", MAX_COMMAND_LEN));
            return Ok(None);
        }

        // Block headers are recognized first so their keywords are never
        // misread as commands; outside a script they only echo.
        let header_rules = Rc::clone(&self.header_rules);
        for rule in header_rules.iter() {
            if let Some(caps) = rule.pattern.captures(command) {
                let descriptor = (rule.describe)(&caps);
                trace_log!("dispatch", "header rule matched: {}", descriptor);
                self.ctx.emit(format!("[ok: {}]", descriptor));
                return Ok(Some(descriptor));
            }
        }

        let rules = Rc::clone(&self.rules);
        for rule in rules.iter() {
            let Some(caps) = rule.pattern.captures(command) else {
                continue;
            };
            trace_log!("dispatch", "'{}' -> /{}/", command, rule.pattern.as_str());
            let outcome = match rule.handler {
                Handler::Command(handler) => handler(&mut self.ctx, &caps),
                Handler::Control(handler) => handler(self, &caps),
            };
            return match outcome {
                Ok(descriptor) => {
                    self.ctx.emit(format!("[ok: {}]", descriptor));
                    Ok(Some(descriptor))
                }
                Err(err) if err.fatal => Err(err),
                Err(err) => {
                    self.ctx.emit(format!("Error: {}", err.message));
                    if let Some(hint) = &err.hint {
                        for line in hint.lines() {
                            self.ctx.emit(line);
                        }
                    }
                    Ok(None)
                }
            };
        }

        self.ctx
            .emit(format!("Sorry, I don't understand: '{}'", command));
        let suggestions = crate::dispatch::suggestions_for(command, &self.ctx);
        if suggestions.is_empty() {
            self.ctx.emit("Type 'help' to see available commands.");
        } else {
            self.ctx.emit("Did you mean:");
            for suggestion in suggestions {
                self.ctx.emit(format!("  - {}", suggestion));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_echoes_a_descriptor() {
        let mut interp = Interpreter::new();
        let outcome = interp.process_command("print \"hello\"").unwrap();
        assert_eq!(outcome.as_deref(), Some("print(\"hello\")"));
        let output = interp.take_output();
        assert!(output.starts_with("hello\n"));
        assert!(output.contains("[ok: print(\"hello\")]"));
    }

    #[test]
    fn unrecognized_commands_are_not_fatal() {
        let mut interp = Interpreter::new();
        let outcome = interp.process_command("frobnicate the widget").unwrap();
        assert!(outcome.is_none());
        let output = interp.take_output();
        assert!(output.contains("Sorry, I don't understand: 'frobnicate the widget'"));
    }

    #[test]
    fn unrecognized_commands_suggest_corrections() {
        let mut interp = Interpreter::new();
        interp.process_command("pront \"hello\"").unwrap();
        let output = interp.take_output();
        assert!(output.contains("Did you mean:"));
        assert!(output.contains("print"));
    }

    #[test]
    fn oversized_commands_are_rejected() {
        let mut interp = Interpreter::new();
        let long = format!("print \"{}\"", "x".repeat(1200));
        let outcome = interp.process_command(&long).unwrap();
        assert!(outcome.is_none());
        assert!(interp.take_output().contains("Command too long"));
    }

    #[test]
    fn block_headers_only_echo_outside_scripts() {
        let mut interp = Interpreter::new();
        let outcome = interp.process_command("if x is greater than 3:").unwrap();
        assert_eq!(
            outcome.as_deref(),
            Some("if x is greater than 3: (block structure)")
        );
    }

    #[test]
    fn dispatch_is_first_match_wins() {
        // Deliberately ambiguous: both the AND rule and the single-clause
        // rule match; the earlier AND rule must win, so with b small the
        // action cannot run.
        let mut interp = Interpreter::new();
        interp.process_command("set a to 9").unwrap();
        interp.process_command("set b to 0").unwrap();
        interp
            .process_command("if a is greater than 1 and b is greater than 1 then print \"ran\"")
            .unwrap();
        let output = interp.take_output();
        assert!(output.contains("Condition not met"));
        assert!(!output.contains("ran\n"));
    }
}
