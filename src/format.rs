//! Message building for failed checks.
//!
//! Messages are assembled from fragments only once a check has failed. The first
//! fragment is a template; each later fragment fills the next `{}` placeholder, or is
//! appended after a comma when no placeholder is left:
//!
//! ```
//! use integrity_check::deferred_string;
//!
//! assert_eq!(deferred_string!("abc {} def", 1), "abc 1 def");
//! assert_eq!(deferred_string!(1, "one", true), "1, one, true");
//! assert_eq!(deferred_string!("{} {} {}", 1, 2, 3, 4), "1 2 3, 4");
//! ```

use crate::{
    error::InspectError,
    settings,
    value::{Inspect, Value},
};

/// Appended to the template when a fragment cannot be rendered
pub const FALLBACK_MARKER: &str = " << exception while replacing parameters >>";

const ELLIPSIS: &str = "...";

/// Human oriented type label
///
/// The order of the checks matters: `null` before `NaN` before `undefined` before
/// `Infinity` before `Array`, then the plain type tag.
pub fn pretty_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Number(n) if n.is_nan() => "NaN",
        Value::Undefined => "undefined",
        v if loosely_infinite(v) => "Infinity",
        Value::Array(_) => "Array",
        other => other.type_name(),
    }
}

// Loose equality with positive infinity: numeric text and single-element arrays
// compare through their numeric conversion
fn loosely_infinite(value: &Value) -> bool {
    match value {
        Value::Number(n) => *n == f64::INFINITY,
        Value::String(s) => {
            let s = s.trim();
            match s {
                "Infinity" | "+Infinity" => true,
                _ if s.to_ascii_lowercase().contains("inf") => false,
                _ => s.parse::<f64>() == Ok(f64::INFINITY),
            }
        }
        Value::Array(items) if items.len() == 1 => loosely_infinite(&items[0]),
        _ => false,
    }
}

/// Render a value as text, cut to `limit` characters plus "..."
pub fn stringify(value: &Value, limit: usize) -> String {
    truncate(render(value), limit)
}

/// "Expected <expected>, but was <type>" with the value appended when it adds information
pub fn default_message(expected: &str, actual: &Value, limit: usize) -> String {
    let pretty = pretty_type(actual);
    let value = stringify(actual, limit);

    let mut message = format!("Expected {}, but was {}", expected, pretty);
    // Skip redundant output such as "was NaN, value was 'NaN'"
    if pretty.to_uppercase() != value.to_uppercase() {
        message.push_str(&format!(", value was '{}'", value));
    }
    message
}

/// Build a message from fragments, or return `default` when there are none
///
/// Never fails: if a fragment cannot be inspected, the result is the first fragment
/// followed by [`FALLBACK_MARKER`].
pub fn format_message(default: &str, fragments: &[&dyn Inspect], limit: usize) -> String {
    let Some(first) = fragments.first() else {
        return default.to_string();
    };

    match expand(fragments, limit) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!(error = %e, "Discarding fragment that could not be rendered");
            let template = first.inspect().map(|v| render(&v)).unwrap_or_default();
            format!("{}{}", template, FALLBACK_MARKER)
        }
    }
}

/// Build a string from fragments using the process-wide truncation limit
pub fn deferred_string(fragments: &[&dyn Inspect]) -> String {
    format_message("", fragments, settings::truncation_limit())
}

fn expand(fragments: &[&dyn Inspect], limit: usize) -> Result<String, InspectError> {
    let mut message = String::new();
    for (i, fragment) in fragments.iter().enumerate() {
        // The template is truncated like any other fragment, which can cut off placeholders
        let text = stringify(&fragment.inspect()?, limit);
        if i == 0 {
            message = text;
            continue;
        }

        match message.find("{}") {
            Some(pos) => message.replace_range(pos..pos + 2, &text),
            None => {
                message.push_str(", ");
                message.push_str(&text);
            }
        }
    }
    Ok(message)
}

fn render(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::String(s) => s.clone(),
        Value::Function(f) => format!("function {}() {{ [native code] }}", f.name()),
        Value::Array(_) | Value::Object(_) => {
            serde_json::to_string(value).unwrap_or_else(|_| "[object Object]".to_string())
        }
    }
}

/// Shortest round-trip form, exponent notation outside [1e-6, 1e21)
fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == f64::INFINITY {
        return "Infinity".to_string();
    }
    if n == f64::NEG_INFINITY {
        return "-Infinity".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return n.to_string();
    }

    let exp = format!("{:e}", n);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}

fn truncate(text: String, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text,
    }
}
