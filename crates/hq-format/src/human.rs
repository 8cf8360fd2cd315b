//! Per-type human renderings of machine values.
//!
//! Every function here is total: absent (`null`) or mistyped input degrades
//! to a zero or placeholder rendering instead of failing.

use chrono::DateTime;
use serde_json::Value;

/// Integer view of a numeric value. Floats are truncated.
pub fn as_integer(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f.trunc() as i64))
}

/// Plain number: the JSON rendering of the value (`1.2345`, `7`).
///
/// Text passes through so that update hooks may turn codes into labels.
pub fn number(value: &Value) -> String {
    match value {
        Value::Null => "0".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Text passthrough.
pub fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Share ratio: `-1` is "n/a", `-2` is "inf", anything else two decimals.
pub fn ratio(value: &Value) -> String {
    match value.as_f64() {
        Some(v) if v == -1.0 => "n/a".to_string(),
        Some(v) if v == -2.0 => "inf".to_string(),
        Some(v) => format!("{v:.2}"),
        None => "0.00".to_string(),
    }
}

/// Fraction in `0..1` rendered as a whole percentage.
pub fn percent(value: &Value) -> String {
    match value.as_f64() {
        Some(v) => format!("{} %", (v * 100.0).round() as i64),
        None => "0 %".to_string(),
    }
}

pub fn boolean(value: &Value) -> String {
    let truthy = match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    };
    let label = if truthy { "true" } else { "false" };
    label.to_string()
}

/// Filesystem path with the home prefix collapsed to `~`.
///
/// Trailing separators are dropped; directories get exactly one back.
pub fn path(value: &Value, home_dir: Option<&str>, dir: bool) -> String {
    let Value::String(raw) = value else {
        return String::new();
    };
    let mut out = collapse_home(raw, home_dir);
    let trimmed_len = out.trim_end_matches('/').len();
    out.truncate(trimmed_len);
    if dir {
        out.push('/');
    }
    out
}

fn collapse_home(raw: &str, home_dir: Option<&str>) -> String {
    let home = match home_dir.map(|h| h.trim_end_matches('/')) {
        Some(h) if !h.is_empty() => h,
        _ => return raw.to_string(),
    };
    match raw.strip_prefix(home) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => format!("~{rest}"),
        _ => raw.to_string(),
    }
}

/// Epoch seconds as a UTC timestamp. The daemon uses `0` for "never".
pub fn date(value: &Value) -> String {
    as_integer(value)
        .filter(|secs| *secs > 0)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "n/a".to_string())
}

const SPANS: [(i64, &str); 4] = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];

/// Duration in seconds, shown with its two most significant units.
///
/// `-1` and `-2` are the daemon's "not available" and "unknown" markers.
pub fn timespan(value: &Value) -> String {
    let secs = match as_integer(value) {
        None => 0,
        Some(-1) => return "n/a".to_string(),
        Some(s) if s < 0 => return "unknown".to_string(),
        Some(s) => s,
    };
    let mut rest = secs;
    let mut parts = Vec::with_capacity(2);
    for (size, suffix) in SPANS {
        let count = rest / size;
        rest %= size;
        if count > 0 {
            parts.push(format!("{count}{suffix}"));
        }
        if parts.len() == 2 {
            break;
        }
    }
    if parts.is_empty() {
        return "0s".to_string();
    }
    parts.join(" ")
}
