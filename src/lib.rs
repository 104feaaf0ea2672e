//! Vernacular: a natural-language scripting runtime.
//!
//! Loosely structured English-like lines become executable operations
//! against a small interpreted runtime of named variables, named lists
//! and user-defined procedures. Scripts come in two shapes: flat
//! sequences of single-line commands, and Python-style colon-terminated,
//! indentation-delimited blocks for conditionals, loops and function
//! bodies. Recognition is an ordered table of regular expressions where
//! the first match wins; rule order is the sole disambiguation mechanism.
//!
//! ```
//! use vernacular::Interpreter;
//!
//! let mut interp = Interpreter::new();
//! let output = interp.run_script("set x to 5\nif x is greater than 3 then print \"big\"\n").unwrap();
//! assert!(output.contains("big"));
//! ```

#![allow(clippy::result_large_err)]

pub mod block;
pub mod condition;
mod context;
mod control;
mod dispatch;
mod exec;
mod interpreter;
pub mod repl;
mod runtime;
mod script;
mod trace;
pub mod value;

pub use block::{BlockKind, BlockNode, BlockParser, BlockRef, ScriptItem};
pub use context::{ExecutionContext, ProcedureBody};
pub use interpreter::Interpreter;
pub use value::{RuntimeError, Value};

#[cfg(test)]
mod tests {
    use super::Interpreter;

    #[test]
    fn set_and_print() {
        let mut interp = Interpreter::new();
        interp.process_command("set x to 5").unwrap();
        interp.process_command("print x").unwrap();
        let output = interp.take_output();
        assert!(output.contains("Variable 'x' set to 5"));
        assert!(output.contains("5\n"));
    }

    #[test]
    fn arithmetic_echo() {
        let mut interp = Interpreter::new();
        interp.process_command("multiply 4 by 6").unwrap();
        assert!(interp.take_output().contains("4 * 6 = 24"));
    }

    #[test]
    fn repeat_block_script() {
        let mut interp = Interpreter::new();
        let output = interp
            .run_script("repeat 3 times:\n    print \"hi\"\n")
            .unwrap();
        assert_eq!(output.matches("hi\n").count(), 3);
    }
}
