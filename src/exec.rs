//! Block execution engine: walks the structured forest, dispatching by
//! block kind and recursing into children in source order.
//!
//! Loop-control flags are process-wide per context, so every block-form
//! loop saves the caller's flag pair and restores it afterwards; without
//! that, a `break` inside an inner loop would terminate the outer one.

use std::sync::OnceLock;

use regex::Regex;

use crate::block::{BlockKind, BlockRef};
use crate::condition::evaluate_condition;
use crate::context::ProcedureBody;
use crate::control::WHILE_ITERATION_CAP;
use crate::interpreter::Interpreter;
use crate::trace::trace_log;
use crate::value::RuntimeError;

fn repeat_header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"repeat (\d+) times?:").expect("static header pattern"))
}

fn foreach_spec_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\w+) in list (\w+)").expect("static header pattern"))
}

fn function_header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)define function (\w+)(?: with (.+?))?:").expect("static header pattern"))
}

/// Header text after a leading keyword, with the trailing colon removed.
fn header_clause(header: &str, keyword_len: usize) -> String {
    header
        .trim()
        .chars()
        .skip(keyword_len)
        .collect::<String>()
        .trim_end_matches(':')
        .trim()
        .to_string()
}

impl Interpreter {
    pub(crate) fn execute_block(&mut self, block: &BlockRef) -> Result<(), RuntimeError> {
        let kind = block.borrow().kind;
        trace_log!(
            "exec",
            "block {:?} at line {} depth {}",
            kind,
            block.borrow().line_number,
            block.borrow().depth()
        );
        match kind {
            BlockKind::Conditional => self.execute_conditional_block(block),
            // An `else:` block runs on its own evaluation path; it is not
            // paired with the truth value of a preceding `if`.
            BlockKind::Else => self.execute_block_body(block),
            BlockKind::ForEach => self.execute_foreach_block(block),
            BlockKind::While => self.execute_while_block(block),
            BlockKind::Repeat => self.execute_repeat_block(block),
            BlockKind::Function => self.register_function_block(block),
            BlockKind::Unknown => self.execute_block_body(block),
        }
    }

    /// Direct commands first, then child blocks, in source order. The
    /// body of conditionals, while, repeat and procedure calls.
    pub(crate) fn execute_block_body(&mut self, block: &BlockRef) -> Result<(), RuntimeError> {
        let commands = block.borrow().commands.clone();
        for (command, line_number) in commands {
            self.ctx.emit(format!("[Line {}] {}", line_number, command));
            self.process_command(&command)
                .map_err(|err| err.at_line(line_number))?;
            self.ctx.emit("");
        }

        let children: Vec<BlockRef> = block.borrow().children.clone();
        for child in children {
            self.execute_block(&child)?;
        }
        Ok(())
    }

    fn execute_conditional_block(&mut self, block: &BlockRef) -> Result<(), RuntimeError> {
        let condition = header_clause(&block.borrow().header, "if ".len());
        if evaluate_condition(&self.ctx, &condition) {
            self.execute_block_body(block)?;
        }
        Ok(())
    }

    /// Per element: bind the loop variable and run the block's direct
    /// commands. Child blocks are not part of the per-iteration body in
    /// this form, and the loop variable stays bound after the loop.
    fn execute_foreach_block(&mut self, block: &BlockRef) -> Result<(), RuntimeError> {
        let spec = header_clause(&block.borrow().header, "for each ".len());

        let saved_break = self.ctx.loop_break;
        let saved_continue = self.ctx.loop_continue;
        self.ctx.loop_break = false;
        self.ctx.loop_continue = false;

        let result = self.run_foreach(block, &spec);

        self.ctx.loop_break = saved_break;
        self.ctx.loop_continue = saved_continue;
        result
    }

    fn run_foreach(&mut self, block: &BlockRef, spec: &str) -> Result<(), RuntimeError> {
        let Some(caps) = foreach_spec_pattern().captures(spec) else {
            self.ctx
                .emit(format!("Error: Invalid foreach specification: {}", spec));
            return Ok(());
        };
        let item_var = caps[1].to_string();
        let list_name = caps[2].to_string();

        let Some(items) = self.ctx.lists.get(&list_name).cloned() else {
            self.ctx
                .emit(format!("Error: List '{}' not found!", list_name));
            return Ok(());
        };

        let commands = block.borrow().commands.clone();
        'items: for item in items {
            if self.ctx.loop_break {
                break;
            }
            if self.ctx.loop_continue {
                self.ctx.loop_continue = false;
                continue;
            }
            self.ctx.variables.insert(item_var.clone(), item);

            for (command, line_number) in &commands {
                if self.ctx.loop_break {
                    continue 'items;
                }
                if self.ctx.loop_continue {
                    self.ctx.loop_continue = false;
                    continue 'items;
                }
                self.ctx.emit(format!("[Line {}] {}", line_number, command));
                self.process_command(command)
                    .map_err(|err| err.at_line(*line_number))?;
                self.ctx.emit("");
            }
        }
        Ok(())
    }

    fn execute_while_block(&mut self, block: &BlockRef) -> Result<(), RuntimeError> {
        let condition = header_clause(&block.borrow().header, "while ".len());

        let saved_break = self.ctx.loop_break;
        let saved_continue = self.ctx.loop_continue;

        let mut iterations = 0;
        let mut result = Ok(());
        while evaluate_condition(&self.ctx, &condition)
            && !self.ctx.loop_break
            && iterations < WHILE_ITERATION_CAP
        {
            self.ctx.loop_continue = false;
            if let Err(err) = self.execute_block_body(block) {
                result = Err(err);
                break;
            }
            iterations += 1;
            if self.ctx.loop_continue {
                self.ctx.loop_continue = false;
            }
        }
        if result.is_ok() && iterations >= WHILE_ITERATION_CAP {
            self.ctx.emit(format!(
                "Warning: Loop stopped after {} iterations (safety limit)",
                WHILE_ITERATION_CAP
            ));
        }

        self.ctx.loop_break = saved_break;
        self.ctx.loop_continue = saved_continue;
        result
    }

    fn execute_repeat_block(&mut self, block: &BlockRef) -> Result<(), RuntimeError> {
        let header = block.borrow().header.to_lowercase();
        // The count is re-parsed at execution time; a header that fails to
        // parse here executes nothing.
        let Some(count) = repeat_header_pattern()
            .captures(&header)
            .and_then(|caps| caps[1].parse::<usize>().ok())
        else {
            return Ok(());
        };

        let saved_break = self.ctx.loop_break;
        let saved_continue = self.ctx.loop_continue;

        let mut result = Ok(());
        for _ in 0..count {
            if self.ctx.loop_break {
                break;
            }
            self.ctx.loop_continue = false;
            if let Err(err) = self.execute_block_body(block) {
                result = Err(err);
                break;
            }
            if self.ctx.loop_continue {
                self.ctx.loop_continue = false;
            }
        }

        self.ctx.loop_break = saved_break;
        self.ctx.loop_continue = saved_continue;
        result
    }

    /// Definition only: the body is registered in the procedure registry
    /// and never executes until called.
    fn register_function_block(&mut self, block: &BlockRef) -> Result<(), RuntimeError> {
        let header = block.borrow().header.clone();
        let Some(caps) = function_header_pattern().captures(&header) else {
            return Ok(());
        };
        let name = caps[1].to_string();
        let parameters: Vec<String> = caps
            .get(2)
            .map(|m| m.as_str().split(',').map(|p| p.trim().to_string()).collect())
            .unwrap_or_default();

        if parameters.is_empty() {
            self.ctx.emit(format!("Function '{}' defined", name));
        } else {
            self.ctx.emit(format!(
                "Function '{}' defined with parameters: {}",
                name,
                parameters.join(", ")
            ));
        }
        self.ctx.procedures.insert(
            name,
            ProcedureBody::Block {
                body: BlockRef::clone(block),
                parameters,
            },
        );
        Ok(())
    }
}
