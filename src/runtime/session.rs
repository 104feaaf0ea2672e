use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use regex::Captures;

use super::{cap, json_to_value, value_to_json};
use crate::context::{ExecutionContext, ProcedureBody};
use crate::value::{RuntimeError, Value};

impl ExecutionContext {
    /// Persist the full mutable state as JSON. Block-form procedures hold
    /// a parse-tree reference and are not serialized; only inline bodies
    /// survive a save/load cycle.
    pub(crate) fn save_session(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let filename = cap(caps, 1).to_string();

        let variables: BTreeMap<&String, serde_json::Value> = self
            .variables
            .iter()
            .map(|(k, v)| (k, value_to_json(v)))
            .collect();
        let lists: BTreeMap<&String, serde_json::Value> = self
            .lists
            .iter()
            .map(|(k, items)| {
                (
                    k,
                    serde_json::Value::Array(items.iter().map(value_to_json).collect()),
                )
            })
            .collect();
        let functions: BTreeMap<&String, &String> = self
            .procedures
            .iter()
            .filter_map(|(k, body)| match body {
                ProcedureBody::Inline(action) => Some((k, action)),
                ProcedureBody::Block { .. } => None,
            })
            .collect();
        let current_list: Vec<serde_json::Value> =
            self.current_list.iter().map(value_to_json).collect();

        let session = serde_json::json!({
            "variables": &variables,
            "lists": &lists,
            "functions": &functions,
            "current_list": &current_list,
        });
        let body = serde_json::to_string_pretty(&session)
            .map_err(|e| RuntimeError::new(format!("Failed to save session: {}", e)))?;
        fs::write(&filename, body)
            .map_err(|e| RuntimeError::new(format!("Failed to save session: {}", e)))?;

        let functions_len = functions.len();
        self.emit(format!("Session saved to '{}'", filename));
        self.emit(format!(
            "Saved: {} variables, {} lists, {} functions",
            self.variables.len(),
            self.lists.len(),
            functions_len
        ));
        Ok(format!("session_save(\"{}\")", filename))
    }

    pub(crate) fn load_session(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let filename = cap(caps, 1).to_string();
        if !Path::new(&filename).exists() {
            return Err(RuntimeError::new(format!(
                "Session file '{}' does not exist!",
                filename
            )));
        }
        let body = fs::read_to_string(&filename)
            .map_err(|e| RuntimeError::new(format!("Failed to load session: {}", e)))?;
        let session: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| RuntimeError::new(format!("Failed to load session: {}", e)))?;

        self.reset();

        if let Some(variables) = session.get("variables").and_then(|v| v.as_object()) {
            for (name, value) in variables {
                self.variables.insert(name.clone(), json_to_value(value));
            }
        }
        if let Some(lists) = session.get("lists").and_then(|v| v.as_object()) {
            for (name, value) in lists {
                let items = match json_to_value(value) {
                    Value::List(items) => items,
                    other => vec![other],
                };
                self.lists.insert(name.clone(), items);
            }
        }
        if let Some(functions) = session.get("functions").and_then(|v| v.as_object()) {
            for (name, action) in functions {
                if let Some(action) = action.as_str() {
                    self.procedures
                        .insert(name.clone(), ProcedureBody::Inline(action.to_string()));
                }
            }
        }
        if let Some(items) = session.get("current_list").and_then(|v| v.as_array()) {
            self.current_list = items.iter().map(json_to_value).collect();
        }

        self.emit(format!("Session loaded from '{}'", filename));
        self.emit(format!(
            "Loaded: {} variables, {} lists, {} functions",
            self.variables.len(),
            self.lists.len(),
            self.procedures.len()
        ));
        Ok(format!("session_load(\"{}\")", filename))
    }

    pub(crate) fn reset_all(&mut self, _caps: &Captures<'_>) -> Result<String, RuntimeError> {
        self.reset();
        self.emit("All variables, lists, and functions have been reset.");
        Ok("reset()".to_string())
    }
}
