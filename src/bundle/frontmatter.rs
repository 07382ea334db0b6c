//! YAML front matter in markdown bundle files

use serde_yaml::Value;

/// Split content into YAML front matter (between the first `---` line and the
/// next `---` line) and the remaining body.
///
/// Returns `None` when the delimiters are missing, the YAML does not parse, or
/// the front matter is neither a mapping nor empty.
pub fn parse_frontmatter_and_body(content: &str) -> Option<(Value, String)> {
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() < 2 || lines[0].trim() != "---" {
        return None;
    }
    let end_idx = lines[1..].iter().position(|l| l.trim() == "---")? + 1;
    let frontmatter_str = lines[1..end_idx].join("\n");
    let body = lines[end_idx + 1..].join("\n");
    let value: Value = serde_yaml::from_str(&frontmatter_str).ok()?;
    if value.as_mapping().is_none() && !value.is_null() {
        return None;
    }
    Some((value, body))
}

/// Get a scalar from a mapping as a string
pub fn get_str(value: &Value, key: &str) -> Option<String> {
    scalar_to_string(value.as_mapping()?.get(key)?)
}

/// Render a YAML scalar as a string (`1.0` and `true` included)
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
