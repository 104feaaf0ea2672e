use regex::Captures;
use unicode_segmentation::UnicodeSegmentation;

use super::cap;
use crate::context::ExecutionContext;
use crate::value::{list_repr, RuntimeError, Value};

impl ExecutionContext {
    pub(crate) fn make_uppercase(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let text = cap(caps, 1);
        let result = text.to_uppercase();
        self.emit(format!("'{}' in uppercase: '{}'", text, result));
        Ok(format!("print(uppercase(\"{}\"))", text))
    }

    pub(crate) fn make_lowercase(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let text = cap(caps, 1);
        let result = text.to_lowercase();
        self.emit(format!("'{}' in lowercase: '{}'", text, result));
        Ok(format!("print(lowercase(\"{}\"))", text))
    }

    /// Length in grapheme clusters, not bytes or code points.
    pub(crate) fn string_length(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let text = cap(caps, 1);
        let result = text.graphemes(true).count();
        self.emit(format!("Length of '{}': {}", text, result));
        Ok(format!("print(len(\"{}\"))", text))
    }

    pub(crate) fn reverse_string(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let text = cap(caps, 1);
        let result: String = text.graphemes(true).rev().collect();
        self.emit(format!("'{}' reversed: '{}'", text, result));
        Ok(format!("print(reverse(\"{}\"))", text))
    }

    pub(crate) fn replace_string(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let old_text = cap(caps, 1);
        let new_text = cap(caps, 2);
        let source = cap(caps, 3);
        let result = source.replace(old_text, new_text);
        self.emit(format!(
            "Replaced '{}' with '{}' in '{}': '{}'",
            old_text, new_text, source, result
        ));
        Ok(format!(
            "print(replace(\"{}\", \"{}\", \"{}\"))",
            source, old_text, new_text
        ))
    }

    pub(crate) fn split_string(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let text = cap(caps, 1);
        let delimiter = cap(caps, 2);
        let parts: Vec<Value> = text
            .split(delimiter)
            .map(|p| Value::Str(p.to_string()))
            .collect();
        self.emit(format!(
            "Split '{}' by '{}': {}",
            text,
            delimiter,
            list_repr(&parts)
        ));
        Ok(format!("print(split(\"{}\", \"{}\"))", text, delimiter))
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::Interpreter;

    fn run(cmd: &str) -> String {
        let mut interp = Interpreter::new();
        interp.process_command(cmd).expect("not fatal");
        interp.take_output()
    }

    #[test]
    fn uppercase_and_lowercase() {
        assert!(run("make \"hello\" uppercase").contains("'hello' in uppercase: 'HELLO'"));
        assert!(run("make \"HELLO\" lowercase").contains("'HELLO' in lowercase: 'hello'"));
    }

    #[test]
    fn length_counts_graphemes() {
        assert!(run("get the length of \"hello\"").contains("Length of 'hello': 5"));
        // One family emoji is a single grapheme cluster.
        assert!(run("get the length of \"a\u{1F469}\u{200D}\u{1F469}\u{200D}\u{1F466}b\"").contains(": 3"));
    }

    #[test]
    fn reverse_and_replace_and_split() {
        assert!(run("reverse \"hello\"").contains("'hello' reversed: 'olleh'"));
        assert!(
            run("replace \"old\" with \"new\" in \"hello old world\"")
                .contains(": 'hello new world'")
        );
        assert!(
            run("split \"apple,banana,cherry\" by \",\"")
                .contains("['apple', 'banana', 'cherry']")
        );
    }
}
