use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use regex::Captures;

use super::{cap, json_to_value, split_strings, value_to_json};
use crate::context::ExecutionContext;
use crate::value::{list_repr, RuntimeError, Value};

impl ExecutionContext {
    pub(crate) fn check_file_exists(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let filename = cap(caps, 1).to_string();
        let exists = Path::new(&filename).exists();
        self.emit(format!(
            "File '{}' {}",
            filename,
            if exists { "exists" } else { "does not exist" }
        ));
        Ok(format!("exists(\"{}\")", filename))
    }

    pub(crate) fn save_to_file(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let text = cap(caps, 1).to_string();
        let filename = cap(caps, 2).to_string();
        fs::write(&filename, &text)
            .map_err(|e| RuntimeError::new(format!("Failed to save to '{}': {}", filename, e)))?;
        self.emit(format!("Saved text to '{}'", filename));
        Ok(format!("write(\"{}\", \"{}\")", filename, text))
    }

    pub(crate) fn read_file(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let filename = cap(caps, 1).to_string();
        let content = fs::read_to_string(&filename)
            .map_err(|_| RuntimeError::new(format!("File '{}' not found!", filename)))?;
        self.emit(format!("Contents of '{}':", filename));
        self.emit(&content);
        Ok(format!("read(\"{}\")", filename))
    }

    // ── CSV ────────────────────────────────────────────────────────────

    pub(crate) fn create_csv(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let filename = cap(caps, 1).to_string();
        let headers = split_strings(cap(caps, 2));
        fs::write(&filename, format!("{}\n", headers.join(",")))
            .map_err(|e| RuntimeError::new(format!("Failed to create CSV: {}", e)))?;
        let shown: Vec<Value> = headers.iter().map(|h| Value::Str(h.clone())).collect();
        self.emit(format!(
            "Created CSV file '{}' with headers: {}",
            filename,
            list_repr(&shown)
        ));
        Ok(format!("csv_create(\"{}\")", filename))
    }

    pub(crate) fn add_csv_row(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let row = split_strings(cap(caps, 1));
        let filename = cap(caps, 2).to_string();
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&filename)
            .map_err(|e| RuntimeError::new(format!("Failed to add to CSV: {}", e)))?;
        writeln!(file, "{}", row.join(","))
            .map_err(|e| RuntimeError::new(format!("Failed to add to CSV: {}", e)))?;
        let shown: Vec<Value> = row.iter().map(|r| Value::Str(r.clone())).collect();
        self.emit(format!("Added row {} to '{}'", list_repr(&shown), filename));
        Ok(format!("csv_append(\"{}\")", filename))
    }

    pub(crate) fn read_csv(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let filename = cap(caps, 1).to_string();
        let content = fs::read_to_string(&filename)
            .map_err(|_| RuntimeError::new(format!("CSV file '{}' not found!", filename)))?;
        self.emit(format!("Contents of CSV '{}':", filename));
        let lines: Vec<String> = content
            .lines()
            .enumerate()
            .map(|(i, line)| {
                let row: Vec<Value> = line
                    .split(',')
                    .map(|f| Value::Str(f.to_string()))
                    .collect();
                format!("  Row {}: {}", i + 1, list_repr(&row))
            })
            .collect();
        for line in lines {
            self.emit(line);
        }
        Ok(format!("csv_read(\"{}\")", filename))
    }

    // ── JSON ───────────────────────────────────────────────────────────

    pub(crate) fn save_list_to_json(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let name = cap(caps, 1).to_string();
        let filename = cap(caps, 2).to_string();
        let items = self
            .lists
            .get(&name)
            .ok_or_else(|| RuntimeError::new(format!("List '{}' doesn't exist!", name)))?;
        let json: Vec<serde_json::Value> = items.iter().map(value_to_json).collect();
        let body = serde_json::to_string_pretty(&json)
            .map_err(|e| RuntimeError::new(format!("Failed to save to JSON: {}", e)))?;
        fs::write(&filename, body)
            .map_err(|e| RuntimeError::new(format!("Failed to save to JSON: {}", e)))?;
        self.emit(format!("Saved list '{}' to '{}'", name, filename));
        Ok(format!("json_dump({}, \"{}\")", name, filename))
    }

    pub(crate) fn load_list_from_json(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let filename = cap(caps, 1).to_string();
        let body = fs::read_to_string(&filename)
            .map_err(|_| RuntimeError::new(format!("JSON file '{}' not found!", filename)))?;
        let json: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| RuntimeError::new(format!("Failed to load JSON: {}", e)))?;
        let items = match json_to_value(&json) {
            Value::List(items) => items,
            other => vec![other],
        };
        self.emit(format!(
            "Loaded list from '{}': {}",
            filename,
            list_repr(&items)
        ));
        self.current_list = items;
        Ok(format!("json_load(\"{}\")", filename))
    }

    // ── XML ────────────────────────────────────────────────────────────
    //
    // The persistence schema is a flat <vernacular_data> document with a
    // <variables> and a <lists> section; only documents written by the
    // matching save operation are expected back.

    pub(crate) fn save_to_xml(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let filename = cap(caps, 1).to_string();
        let mut doc = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<vernacular_data>\n");
        doc.push_str("  <variables>\n");
        let variables: BTreeMap<&String, &Value> = self.variables.iter().collect();
        for (name, value) in variables {
            let tag = match value {
                Value::Int(_) => "int",
                Value::Float(_) => "float",
                Value::Bool(_) => "bool",
                _ => "str",
            };
            doc.push_str(&format!(
                "    <variable name=\"{}\" type=\"{}\">{}</variable>\n",
                xml_escape(name),
                tag,
                xml_escape(&value.to_string())
            ));
        }
        doc.push_str("  </variables>\n  <lists>\n");
        let lists: BTreeMap<&String, &Vec<Value>> = self.lists.iter().collect();
        for (name, items) in lists {
            doc.push_str(&format!("    <list name=\"{}\">\n", xml_escape(name)));
            for item in items.iter() {
                doc.push_str(&format!(
                    "      <item>{}</item>\n",
                    xml_escape(&item.to_string())
                ));
            }
            doc.push_str("    </list>\n");
        }
        doc.push_str("  </lists>\n</vernacular_data>\n");
        fs::write(&filename, doc)
            .map_err(|e| RuntimeError::new(format!("Failed to save to XML: {}", e)))?;
        self.emit(format!("Data saved to XML file '{}'", filename));
        self.emit(format!(
            "Saved: {} variables, {} lists",
            self.variables.len(),
            self.lists.len()
        ));
        Ok(format!("xml_dump(\"{}\")", filename))
    }

    pub(crate) fn load_from_xml(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let filename = cap(caps, 1).to_string();
        if !Path::new(&filename).exists() {
            return Err(RuntimeError::new(format!(
                "XML file '{}' does not exist!",
                filename
            )));
        }
        let body = fs::read_to_string(&filename)
            .map_err(|e| RuntimeError::new(format!("Failed to load from XML: {}", e)))?;

        let variable_re =
            regex::Regex::new(r#"<variable name="([^"]*)" type="([^"]*)">([^<]*)</variable>"#)
                .expect("static xml pattern");
        let list_re =
            regex::Regex::new(r#"(?s)<list name="([^"]*)">(.*?)</list>"#).expect("static xml pattern");
        let item_re = regex::Regex::new(r"<item>([^<]*)</item>").expect("static xml pattern");

        self.variables.clear();
        self.lists.clear();

        for caps in variable_re.captures_iter(&body) {
            let name = xml_unescape(&caps[1]);
            let text = xml_unescape(&caps[3]);
            let value = match &caps[2] {
                "int" => text.parse::<i64>().map(Value::Int).unwrap_or(Value::Str(text)),
                "float" => text
                    .parse::<f64>()
                    .map(Value::Float)
                    .unwrap_or(Value::Str(text)),
                "bool" => Value::Bool(text.eq_ignore_ascii_case("true")),
                _ => Value::Str(text),
            };
            self.variables.insert(name, value);
        }

        for caps in list_re.captures_iter(&body) {
            let name = xml_unescape(&caps[1]);
            let items: Vec<Value> = item_re
                .captures_iter(&caps[2])
                .map(|item| Value::Str(xml_unescape(&item[1])))
                .collect();
            self.lists.insert(name, items);
        }

        self.emit(format!("Data loaded from XML file '{}'", filename));
        self.emit(format!(
            "Loaded: {} variables, {} lists",
            self.variables.len(),
            self.lists.len()
        ));
        Ok(format!("xml_load(\"{}\")", filename))
    }

    // ── YAML ───────────────────────────────────────────────────────────

    pub(crate) fn save_to_yaml(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let filename = cap(caps, 1).to_string();
        let variables: BTreeMap<String, serde_json::Value> = self
            .variables
            .iter()
            .map(|(k, v)| (k.clone(), value_to_json(v)))
            .collect();
        let lists: BTreeMap<String, serde_json::Value> = self
            .lists
            .iter()
            .map(|(k, items)| {
                (
                    k.clone(),
                    serde_json::Value::Array(items.iter().map(value_to_json).collect()),
                )
            })
            .collect();
        let mut data = BTreeMap::new();
        data.insert("lists", serde_json::json!(lists));
        data.insert("variables", serde_json::json!(variables));
        let body = serde_yaml::to_string(&data)
            .map_err(|e| RuntimeError::new(format!("Failed to save to YAML: {}", e)))?;
        fs::write(&filename, body)
            .map_err(|e| RuntimeError::new(format!("Failed to save to YAML: {}", e)))?;
        self.emit(format!("Data saved to YAML file '{}'", filename));
        self.emit(format!(
            "Saved: {} variables, {} lists",
            self.variables.len(),
            self.lists.len()
        ));
        Ok(format!("yaml_dump(\"{}\")", filename))
    }

    pub(crate) fn load_from_yaml(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let filename = cap(caps, 1).to_string();
        if !Path::new(&filename).exists() {
            return Err(RuntimeError::new(format!(
                "YAML file '{}' does not exist!",
                filename
            )));
        }
        let body = fs::read_to_string(&filename)
            .map_err(|e| RuntimeError::new(format!("Failed to load from YAML: {}", e)))?;
        let data: serde_json::Value = serde_yaml::from_str(&body)
            .map_err(|e| RuntimeError::new(format!("Failed to load from YAML: {}", e)))?;

        self.variables.clear();
        self.lists.clear();

        if let Some(variables) = data.get("variables").and_then(|v| v.as_object()) {
            for (name, value) in variables {
                self.variables.insert(name.clone(), json_to_value(value));
            }
        }
        if let Some(lists) = data.get("lists").and_then(|v| v.as_object()) {
            for (name, value) in lists {
                let items = match json_to_value(value) {
                    Value::List(items) => items,
                    other => vec![other],
                };
                self.lists.insert(name.clone(), items);
            }
        }

        self.emit(format!("Data loaded from YAML file '{}'", filename));
        self.emit(format!(
            "Loaded: {} variables, {} lists",
            self.variables.len(),
            self.lists.len()
        ));
        Ok(format!("yaml_load(\"{}\")", filename))
    }

    // ── Plain file management ──────────────────────────────────────────

    pub(crate) fn delete_file(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let filename = cap(caps, 1).to_string();
        if !Path::new(&filename).exists() {
            return Err(RuntimeError::new(format!(
                "File '{}' does not exist!",
                filename
            )));
        }
        fs::remove_file(&filename)
            .map_err(|e| RuntimeError::new(format!("Failed to delete file: {}", e)))?;
        self.emit(format!("File '{}' deleted successfully", filename));
        Ok(format!("remove(\"{}\")", filename))
    }

    pub(crate) fn copy_file(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let source = cap(caps, 1).to_string();
        let destination = cap(caps, 2).to_string();
        if !Path::new(&source).exists() {
            return Err(RuntimeError::new(format!(
                "Source file '{}' does not exist!",
                source
            )));
        }
        fs::copy(&source, &destination)
            .map_err(|e| RuntimeError::new(format!("Failed to copy file: {}", e)))?;
        self.emit(format!("File copied from '{}' to '{}'", source, destination));
        Ok(format!("copy(\"{}\", \"{}\")", source, destination))
    }
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn xml_unescape(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&gt;", ">")
        .replace("&lt;", "<")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::{xml_escape, xml_unescape};

    #[test]
    fn escape_round_trip() {
        let original = "a < b & \"c\" > d";
        assert_eq!(xml_unescape(&xml_escape(original)), original);
    }
}
