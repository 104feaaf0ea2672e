use regex::Captures;

use super::{cap, split_values};
use crate::context::ExecutionContext;
use crate::value::{list_repr, RuntimeError, Value};

impl ExecutionContext {
    pub(crate) fn create_list(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let name = cap(caps, 1).to_string();
        let values = split_values(cap(caps, 2));
        self.emit(format!(
            "List '{}' created with values: {}",
            name,
            list_repr(&values)
        ));
        let descriptor = format!("{} = {}", name, list_repr(&values));
        self.lists.insert(name, values);
        Ok(descriptor)
    }

    pub(crate) fn create_anonymous_list(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let values = split_values(cap(caps, 1));
        self.emit(format!("List created with values: {}", list_repr(&values)));
        let descriptor = format!("current_list = {}", list_repr(&values));
        self.current_list = values;
        Ok(descriptor)
    }

    pub(crate) fn add_to_list(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let value = Value::from_literal(cap(caps, 1));
        let name = cap(caps, 2).to_string();
        let items = match self.lists.get_mut(&name) {
            Some(items) => items,
            None => return Err(self.unknown_list_error(&name)),
        };
        items.push(value.clone());
        let shown = list_repr(items);
        self.emit(format!(
            "Added {} to list '{}'. List is now: {}",
            value, name, shown
        ));
        Ok(format!("{}.append({})", name, value.repr()))
    }

    pub(crate) fn add_to_anonymous_list(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let value = Value::from_literal(cap(caps, 1));
        self.current_list.push(value.clone());
        let shown = list_repr(&self.current_list);
        self.emit(format!("Added {} to list. List is now: {}", value, shown));
        Ok(format!("current_list.append({})", value.repr()))
    }

    pub(crate) fn show_list(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let name = cap(caps, 1).to_string();
        let items = self
            .lists
            .get(&name)
            .ok_or_else(|| RuntimeError::new(format!("List '{}' doesn't exist!", name)))?;
        let shown = list_repr(items);
        self.emit(format!("List '{}': {}", name, shown));
        Ok(format!("print({})", name))
    }

    pub(crate) fn show_anonymous_list(&mut self, _caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let shown = list_repr(&self.current_list);
        self.emit(format!("Current list: {}", shown));
        Ok("print(current_list)".to_string())
    }

    pub(crate) fn delete_list(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let name = cap(caps, 1).to_string();
        if self.lists.remove(&name).is_some() {
            self.emit(format!("List '{}' deleted.", name));
            Ok(format!("delete {}", name))
        } else {
            Err(RuntimeError::new(format!("List '{}' doesn't exist!", name)))
        }
    }

    pub(crate) fn list_lists(&mut self, _caps: &Captures<'_>) -> Result<String, RuntimeError> {
        if self.lists.is_empty() {
            self.emit("No lists defined.");
        } else {
            self.emit("Lists:");
            let mut names: Vec<&String> = self.lists.keys().collect();
            names.sort_unstable();
            let lines: Vec<String> = names
                .iter()
                .map(|name| format!("  {} = {}", name, list_repr(&self.lists[*name])))
                .collect();
            for line in lines {
                self.emit(line);
            }
        }
        Ok("print(lists)".to_string())
    }

    /// Shared "no such list" report with context-aware hints.
    pub(crate) fn unknown_list_error(&self, name: &str) -> RuntimeError {
        let err = RuntimeError::new(format!("List '{}' doesn't exist!", name));
        if self.lists.is_empty() {
            err.with_hint("No lists exist yet. Create one with 'create list name with item1, item2'")
        } else {
            let mut names: Vec<&str> = self.lists.keys().map(|k| k.as_str()).collect();
            names.sort_unstable();
            names.truncate(5);
            err.with_hint(format!(
                "Available lists: {}\nTip: Create it first with 'create list {} with item1, item2'",
                names.join(", "),
                name
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::Interpreter;
    use crate::value::Value;

    #[test]
    fn create_append_show() {
        let mut interp = Interpreter::new();
        interp
            .process_command("create list fruits with apple, banana")
            .unwrap();
        interp.process_command("add cherry to list fruits").unwrap();
        let outcome = interp.process_command("show list fruits").unwrap();
        assert!(outcome.is_some());
        let output = interp.take_output();
        assert!(output.contains("List 'fruits' created with values: ['apple', 'banana']"));
        assert!(output.contains("Added cherry to list 'fruits'. List is now: ['apple', 'banana', 'cherry']"));
        assert!(output.contains("List 'fruits': ['apple', 'banana', 'cherry']"));
    }

    #[test]
    fn numeric_items_are_parsed() {
        let mut interp = Interpreter::new();
        interp.process_command("create list nums with 1, 2, 3").unwrap();
        assert_eq!(
            interp.context().lists["nums"],
            vec![Value::Int(1), Value::Int(2), Value::Int(3)]
        );
    }

    #[test]
    fn anonymous_list_operations() {
        let mut interp = Interpreter::new();
        interp.process_command("create a list with 1, 2").unwrap();
        interp.process_command("add 3 to the list").unwrap();
        interp.process_command("show the list").unwrap();
        assert!(interp.take_output().contains("Current list: [1, 2, 3]"));
    }

    #[test]
    fn adding_to_missing_list_hints() {
        let mut interp = Interpreter::new();
        let outcome = interp.process_command("add 4 to list ghosts").unwrap();
        assert!(outcome.is_none());
        let output = interp.take_output();
        assert!(output.contains("Error: List 'ghosts' doesn't exist!"));
        assert!(output.contains("No lists exist yet."));
    }
}
