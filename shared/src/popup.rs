use crate::Properties;
use serde_json::Value;

const SEPARATOR: &str = "<br />";

/// Builds the popup body for a clicked feature.
///
/// Each configured property present on the feature becomes a
/// `<strong>name</strong> value` line, in configured order. Properties that are
/// missing or `null` are skipped. Returns `None` when nothing matched.
pub fn popup_html(properties: &Properties, label_properties: &[String]) -> Option<String> {
    let lines: Vec<String> = label_properties
        .iter()
        .filter_map(|name| {
            let value = display_value(properties.get(name)?)?;
            Some(format!(
                "<strong>{}</strong> {}",
                escape_html(name),
                escape_html(&value)
            ))
        })
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join(SEPARATOR))
    }
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
