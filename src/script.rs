//! Script driver: picks the structuring mode, runs every top-level item
//! and reports the run summary.

use crate::block::{is_block_header, BlockParser, ScriptItem};
use crate::interpreter::Interpreter;
use crate::trace::trace_log;
use crate::value::RuntimeError;

impl Interpreter {
    /// Run a whole script.
    ///
    /// A script is block-structured iff any line is a block header;
    /// otherwise every line is an independent single-line command. On
    /// success the accumulated output (ending in the run summary) is
    /// returned; a fatal failure leaves the partial output in the context
    /// for retrieval via `take_output`.
    pub fn run_script(&mut self, source: &str) -> Result<String, RuntimeError> {
        let lines: Vec<&str> = source.lines().collect();
        let block_mode = lines.iter().any(|line| is_block_header(line.trim()));
        trace_log!(
            "exec",
            "script mode: {}",
            if block_mode { "block" } else { "flat" }
        );

        if block_mode {
            self.run_block_script(&lines)?;
        } else {
            self.run_flat_script(&lines)?;
        }
        Ok(self.take_output())
    }

    fn is_skippable(line: &str) -> bool {
        line.is_empty() || line.starts_with('#') || line.starts_with("//")
    }

    fn emit_summary(&mut self, total_lines: usize, attempted: usize, succeeded: usize, block_mode: bool) {
        self.ctx.emit("=== Script Execution Complete ===");
        self.ctx.emit(format!("Total lines in file: {}", total_lines));
        if block_mode {
            self.ctx
                .emit(format!("Commands/blocks executed: {}", attempted));
            self.ctx
                .emit(format!("Successful operations: {}", succeeded));
        } else {
            self.ctx.emit(format!("Lines executed: {}", attempted));
            self.ctx.emit(format!("Successful commands: {}", succeeded));
        }
        if attempted > 0 {
            self.ctx.emit(format!(
                "Success rate: {:.1}%",
                succeeded as f64 / attempted as f64 * 100.0
            ));
        } else {
            self.ctx.emit("Success rate: N/A");
        }
    }

    fn run_flat_script(&mut self, lines: &[&str]) -> Result<(), RuntimeError> {
        let mut attempted = 0;
        let mut succeeded = 0;

        for (idx, raw) in lines.iter().enumerate() {
            let line_number = idx + 1;
            let line = raw.trim();
            if Self::is_skippable(line) {
                continue;
            }

            attempted += 1;
            self.ctx.emit(format!("[Line {}] {}", line_number, line));
            match self.process_command(line) {
                Ok(Some(_)) => {
                    succeeded += 1;
                    self.ctx.emit("");
                }
                Ok(None) => self.ctx.emit(""),
                Err(err) => {
                    self.ctx
                        .emit(format!("ERROR at line {}: {}", line_number, err.message));
                    self.ctx.emit(format!("Command: {}", line));
                    return Err(err.at_line(line_number));
                }
            }
        }

        self.emit_summary(lines.len(), attempted, succeeded, false);
        Ok(())
    }

    fn run_block_script(&mut self, lines: &[&str]) -> Result<(), RuntimeError> {
        self.ctx
            .emit("Block structure detected - using enhanced parser...");
        self.ctx.emit("");

        let items = BlockParser::new().parse_lines(lines);
        self.ctx
            .emit(format!("Parsed {} top-level items", items.len()));

        let mut attempted = 0;
        let mut succeeded = 0;

        for item in &items {
            match item {
                ScriptItem::Block(block) => {
                    let (header, line_number) = {
                        let node = block.borrow();
                        (node.header.clone(), node.line_number)
                    };
                    self.ctx
                        .emit(format!("Executing block: {} (line {})", header, line_number));
                    attempted += 1;
                    match self.execute_block(block) {
                        Ok(()) => succeeded += 1,
                        Err(err) => {
                            self.ctx.emit(format!(
                                "ERROR executing block starting at line {}: {}",
                                line_number, err.message
                            ));
                            self.ctx.emit(format!("Block header: {}", header));
                            return Err(err);
                        }
                    }
                }
                ScriptItem::Command { text, line_number } => {
                    attempted += 1;
                    self.ctx.emit(format!("[Line {}] {}", line_number, text));
                    match self.process_command(text) {
                        Ok(Some(_)) => {
                            succeeded += 1;
                            self.ctx.emit("");
                        }
                        Ok(None) => self.ctx.emit(""),
                        Err(err) => {
                            self.ctx
                                .emit(format!("ERROR at line {}: {}", line_number, err.message));
                            self.ctx.emit(format!("Command: {}", text));
                            return Err(err.at_line(*line_number));
                        }
                    }
                }
            }
        }

        self.emit_summary(lines.len(), attempted, succeeded, true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_script_reports_summary() {
        let mut interp = Interpreter::new();
        let output = interp
            .run_script("set x to 5\nprint x\ndivide 10 by 0\n")
            .unwrap();
        assert!(output.contains("Lines executed: 3"));
        assert!(output.contains("Successful commands: 2"));
        assert!(output.contains("Success rate: 66.7%"));
    }

    #[test]
    fn comments_and_blanks_are_not_counted() {
        let mut interp = Interpreter::new();
        let output = interp
            .run_script("# comment\n\n// another\nprint \"only\"\n")
            .unwrap();
        assert!(output.contains("Total lines in file: 4"));
        assert!(output.contains("Lines executed: 1"));
        assert!(output.contains("Successful commands: 1"));
    }

    #[test]
    fn empty_script_has_no_rate() {
        let mut interp = Interpreter::new();
        let output = interp.run_script("# nothing here\n").unwrap();
        assert!(output.contains("Success rate: N/A"));
    }

    #[test]
    fn block_mode_is_selected_by_headers() {
        let mut interp = Interpreter::new();
        let output = interp
            .run_script("repeat 2 times:\n    print \"hi\"\n")
            .unwrap();
        assert!(output.contains("Block structure detected"));
        assert!(output.contains("Commands/blocks executed: 1"));
        assert!(output.contains("Successful operations: 1"));
    }

    #[test]
    fn colon_without_keyword_stays_flat() {
        let mut interp = Interpreter::new();
        let output = interp.run_script("print \"not a header:\"\n").unwrap();
        assert!(!output.contains("Block structure detected"));
    }
}
