//! Type tags carried by schema leaves and their default renderings.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::bytes::format_magnitude;
use crate::config::FormatConfig;
use crate::error::Error;
use crate::human;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Float,
    /// Numeric with `-1` / `-2` sentinels.
    Ratio,
    Int,
    Str,
    Boolean,
    /// Fraction in `0..1`.
    Percent,
    PathDir,
    PathFile,
    Url,
    BytesSize,
    BytesRate,
    /// Epoch seconds.
    Date,
    /// Seconds.
    Timespan,
}

impl TypeTag {
    pub const ALL: [TypeTag; 13] = [
        TypeTag::Float,
        TypeTag::Ratio,
        TypeTag::Int,
        TypeTag::Str,
        TypeTag::Boolean,
        TypeTag::Percent,
        TypeTag::PathDir,
        TypeTag::PathFile,
        TypeTag::Url,
        TypeTag::BytesSize,
        TypeTag::BytesRate,
        TypeTag::Date,
        TypeTag::Timespan,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Float => "float",
            TypeTag::Ratio => "ratio",
            TypeTag::Int => "int",
            TypeTag::Str => "str",
            TypeTag::Boolean => "boolean",
            TypeTag::Percent => "percent",
            TypeTag::PathDir => "path_dir",
            TypeTag::PathFile => "path_file",
            TypeTag::Url => "url",
            TypeTag::BytesSize => "bytes_size",
            TypeTag::BytesRate => "bytes_rate",
            TypeTag::Date => "date",
            TypeTag::Timespan => "timespan",
        }
    }

    /// The built-in human rendering for this tag.
    pub fn prettify(self, value: &Value, cfg: &FormatConfig) -> String {
        match self {
            TypeTag::Float | TypeTag::Int => human::number(value),
            TypeTag::Str | TypeTag::Url => human::text(value),
            TypeTag::Ratio => human::ratio(value),
            TypeTag::Boolean => human::boolean(value),
            TypeTag::Percent => human::percent(value),
            TypeTag::PathDir => human::path(value, cfg.home_dir.as_deref(), true),
            TypeTag::PathFile => human::path(value, cfg.home_dir.as_deref(), false),
            TypeTag::BytesSize => {
                let (negative, magnitude) = bytes_of(value);
                format_magnitude(negative, magnitude, cfg.byte_base, cfg.verbose_bytes)
            }
            TypeTag::BytesRate => {
                let (negative, magnitude) = bytes_of(value);
                format_magnitude(negative, magnitude, cfg.byte_base, cfg.verbose_bytes) + "/s"
            }
            TypeTag::Date => human::date(value),
            TypeTag::Timespan => human::timespan(value),
        }
    }
}

/// Sign and magnitude of a byte count. Counts above `i64::MAX` keep their
/// exact value.
fn bytes_of(value: &Value) -> (bool, u64) {
    if let Some(count) = value.as_u64() {
        return (false, count);
    }
    match value.as_f64() {
        Some(f) if f >= 0.0 => (false, f.trunc() as u64),
        _ => {
            let count = human::as_integer(value).unwrap_or(0);
            (count < 0, count.unsigned_abs())
        }
    }
}

impl FromStr for TypeTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| Error::UnknownTypeTag(s.to_string()))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
