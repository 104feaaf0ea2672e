use regex::Captures;

use super::{cap, strip_quotes};
use crate::context::ExecutionContext;
use crate::value::{RuntimeError, Value};

impl ExecutionContext {
    pub(crate) fn set_string_variable(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let name = cap(caps, 1).to_string();
        let value = cap(caps, 2).to_string();
        self.emit(format!("Variable '{}' set to '{}'", name, value));
        self.variables.insert(name.clone(), Value::Str(value.clone()));
        Ok(format!("{} = \"{}\"", name, value))
    }

    pub(crate) fn set_number_variable(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let name = cap(caps, 1).to_string();
        let text = cap(caps, 2);
        let value = if text.contains('.') {
            Value::Float(
                text.parse::<f64>()
                    .map_err(|_| RuntimeError::new(format!("'{}' is not a number", text)))?,
            )
        } else {
            Value::Int(
                text.parse::<i64>()
                    .map_err(|_| RuntimeError::new(format!("'{}' is not a number", text)))?,
            )
        };
        self.emit(format!("Variable '{}' set to {}", name, value));
        let descriptor = format!("{} = {}", name, value);
        self.variables.insert(name, value);
        Ok(descriptor)
    }

    pub(crate) fn create_variable(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let name = cap(caps, 1).to_string();
        let raw = cap(caps, 2);
        // Integers parse; anything else is kept as an unquoted string.
        match raw.trim().parse::<i64>() {
            Ok(number) => {
                self.emit(format!("Variable '{}' created with value {}", name, number));
                self.variables.insert(name.clone(), Value::Int(number));
                Ok(format!("{} = {}", name, number))
            }
            Err(_) => {
                let text = strip_quotes(raw).to_string();
                self.emit(format!("Variable '{}' created with value '{}'", name, text));
                self.variables.insert(name.clone(), Value::Str(text.clone()));
                Ok(format!("{} = \"{}\"", name, text))
            }
        }
    }

    fn existing(&self, name: &str) -> Result<&Value, RuntimeError> {
        self.variables
            .get(name)
            .ok_or_else(|| RuntimeError::new(format!("Variable '{}' does not exist!", name)))
    }

    pub(crate) fn check_variable_type(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let name = cap(caps, 1).to_string();
        let type_name = self.existing(&name)?.type_name();
        self.emit(format!("Variable '{}' is of type: {}", name, type_name));
        Ok(format!("type({})", name))
    }

    pub(crate) fn is_string_type(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let name = cap(caps, 1).to_string();
        let is_string = matches!(self.existing(&name)?, Value::Str(_));
        self.emit(format!(
            "Variable '{}' is {}",
            name,
            if is_string { "a string" } else { "not a string" }
        ));
        Ok(format!("is_string({})", name))
    }

    pub(crate) fn is_number_type(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let name = cap(caps, 1).to_string();
        let is_number = self.existing(&name)?.is_numeric();
        self.emit(format!(
            "Variable '{}' is {}",
            name,
            if is_number { "a number" } else { "not a number" }
        ));
        Ok(format!("is_number({})", name))
    }

    pub(crate) fn is_boolean_type(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let name = cap(caps, 1).to_string();
        let is_boolean = matches!(self.existing(&name)?, Value::Bool(_));
        self.emit(format!(
            "Variable '{}' is {}",
            name,
            if is_boolean { "a boolean" } else { "not a boolean" }
        ));
        Ok(format!("is_boolean({})", name))
    }

    pub(crate) fn convert_to_string(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let name = cap(caps, 1).to_string();
        let old = self.existing(&name)?.clone();
        let new_value = Value::Str(old.to_string());
        self.emit(format!(
            "Variable '{}' converted from {} to string: '{}'",
            name,
            old.type_name(),
            new_value
        ));
        self.variables.insert(name.clone(), new_value);
        Ok(format!("{} = string({})", name, name))
    }

    pub(crate) fn convert_to_number(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let name = cap(caps, 1).to_string();
        let old = self.existing(&name)?.clone();
        let new_value = match &old {
            Value::Str(s) => {
                if s.contains('.') {
                    Value::Float(s.trim().parse::<f64>().map_err(|_| {
                        RuntimeError::new(format!("Cannot convert '{}' to a number!", s))
                    })?)
                } else {
                    Value::Int(s.trim().parse::<i64>().map_err(|_| {
                        RuntimeError::new(format!("Cannot convert '{}' to a number!", s))
                    })?)
                }
            }
            Value::Bool(b) => Value::Float(if *b { 1.0 } else { 0.0 }),
            other => other.clone(),
        };
        self.emit(format!("Variable '{}' converted to number: {}", name, new_value));
        self.variables.insert(name.clone(), new_value);
        Ok(format!("{} = number({})", name, name))
    }

    pub(crate) fn convert_to_boolean(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let name = cap(caps, 1).to_string();
        let old = self.existing(&name)?.clone();
        let new_value = match &old {
            Value::Str(s) => {
                let lower = s.to_lowercase();
                if ["true", "yes", "1", "on"].contains(&lower.as_str()) {
                    Value::Bool(true)
                } else if ["false", "no", "0", "off", ""].contains(&lower.as_str()) {
                    Value::Bool(false)
                } else {
                    Value::Bool(old.truthy())
                }
            }
            other => Value::Bool(other.truthy()),
        };
        self.emit(format!(
            "Variable '{}' converted to boolean: {}",
            name, new_value
        ));
        self.variables.insert(name.clone(), new_value);
        Ok(format!("{} = boolean({})", name, name))
    }

    pub(crate) fn delete_variable(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let name = cap(caps, 1).to_string();
        if self.variables.remove(&name).is_some() {
            self.emit(format!("Variable '{}' deleted.", name));
            Ok(format!("delete {}", name))
        } else {
            Err(RuntimeError::new(format!("Variable '{}' doesn't exist!", name)))
        }
    }

    pub(crate) fn list_variables(&mut self, _caps: &Captures<'_>) -> Result<String, RuntimeError> {
        if self.variables.is_empty() {
            self.emit("No variables defined.");
        } else {
            self.emit("Variables:");
            let mut names: Vec<&String> = self.variables.keys().collect();
            names.sort_unstable();
            let lines: Vec<String> = names
                .iter()
                .map(|name| format!("  {} = {}", name, self.variables[*name].repr()))
                .collect();
            for line in lines {
                self.emit(line);
            }
        }
        Ok("print(variables)".to_string())
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::Interpreter;
    use crate::value::Value;

    #[test]
    fn set_parses_int_float_and_string() {
        let mut interp = Interpreter::new();
        interp.process_command("set x to 5").unwrap();
        interp.process_command("set y to 2.5").unwrap();
        interp.process_command("set name to \"Ada\"").unwrap();
        let ctx = interp.context();
        assert_eq!(ctx.variables["x"], Value::Int(5));
        assert_eq!(ctx.variables["y"], Value::Float(2.5));
        assert_eq!(ctx.variables["name"], Value::Str("Ada".to_string()));
    }

    #[test]
    fn create_variable_parses_ints_only() {
        let mut interp = Interpreter::new();
        interp.process_command("create variable a with value 100").unwrap();
        interp.process_command("create variable b with value 2.5").unwrap();
        let ctx = interp.context();
        assert_eq!(ctx.variables["a"], Value::Int(100));
        assert_eq!(ctx.variables["b"], Value::Str("2.5".to_string()));
    }

    #[test]
    fn type_check_and_conversion() {
        let mut interp = Interpreter::new();
        interp.process_command("set x to 5").unwrap();
        let outcome = interp.process_command("check the type of x").unwrap();
        assert!(outcome.is_some());
        assert!(interp.take_output().contains("Variable 'x' is of type: integer"));

        interp.process_command("convert x to string").unwrap();
        assert_eq!(interp.context().variables["x"], Value::Str("5".to_string()));
        interp.process_command("convert x to number").unwrap();
        assert_eq!(interp.context().variables["x"], Value::Int(5));
        interp.process_command("convert x to boolean").unwrap();
        assert_eq!(interp.context().variables["x"], Value::Bool(true));
    }

    #[test]
    fn convert_non_numeric_string_fails_softly() {
        let mut interp = Interpreter::new();
        interp.process_command("set s to \"banana\"").unwrap();
        let outcome = interp.process_command("convert s to number").unwrap();
        assert!(outcome.is_none());
        assert!(interp
            .take_output()
            .contains("Error: Cannot convert 'banana' to a number!"));
        assert_eq!(
            interp.context().variables["s"],
            Value::Str("banana".to_string())
        );
    }

    #[test]
    fn delete_missing_variable_reports() {
        let mut interp = Interpreter::new();
        let outcome = interp.process_command("delete variable ghost").unwrap();
        assert!(outcome.is_none());
        assert!(interp.take_output().contains("Error: Variable 'ghost' doesn't exist!"));
    }
}
