//! Output formatting

use serde_json::{Map, Value};

/// Output builder: a JSON object in `--json` mode, plain lines otherwise
pub struct Output {
    json_mode: bool,
    fields: Map<String, Value>,
    lines: Vec<String>,
}

impl Output {
    /// Create a new output builder
    pub fn new(json_mode: bool) -> Self {
        Self {
            json_mode,
            fields: Map::new(),
            lines: Vec::new(),
        }
    }

    /// Add a string field, also shown as a `key value` line
    pub fn field(mut self, key: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        self.lines.push(format!("{key} {value}"));
        self.fields.insert(key.to_string(), Value::String(value));
        self
    }

    /// Add a u64 field
    pub fn field_u64(mut self, key: &str, value: u64) -> Self {
        self.lines.push(format!("{key} {value}"));
        self.fields.insert(key.to_string(), Value::Number(value.into()));
        self
    }

    /// Add a human-only line
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Render without printing
    pub fn render(&self) -> String {
        if self.json_mode {
            serde_json::to_string_pretty(&self.fields).unwrap_or_default()
        } else {
            self.lines.join("\n")
        }
    }

    /// Print the output
    pub fn print(self) {
        println!("{}", self.render());
    }
}
