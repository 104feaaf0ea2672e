use regex::Captures;

use super::cap;
use crate::context::ExecutionContext;
use crate::value::RuntimeError;

impl ExecutionContext {
    pub(crate) fn print_quoted(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let text = cap(caps, 1).to_string();
        self.emit(&text);
        Ok(format!("print(\"{}\")", text))
    }

    pub(crate) fn print_variable(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let name = cap(caps, 1).to_string();
        match self.variables.get(&name) {
            Some(value) => {
                let shown = value.to_string();
                self.emit(shown);
                Ok(format!("print({})", name))
            }
            None => Err(self.unknown_variable_error(&name)),
        }
    }

    pub(crate) fn print_words(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let text = cap(caps, 1).trim().to_string();
        self.emit(&text);
        Ok(format!("print(\"{}\")", text))
    }

    /// Shared "no such variable" report with context-aware hints.
    pub(crate) fn unknown_variable_error(&self, name: &str) -> RuntimeError {
        let err = RuntimeError::new(format!("Variable '{}' is not defined!", name));
        if self.variables.is_empty() {
            err.with_hint("No variables exist yet. Create one with 'set name to value'")
        } else {
            let mut names: Vec<&str> = self.variables.keys().map(|k| k.as_str()).collect();
            names.sort_unstable();
            names.truncate(5);
            err.with_hint(format!(
                "Available variables: {}\nTip: Create it first with 'set {} to value'",
                names.join(", "),
                name
            ))
        }
    }
}
