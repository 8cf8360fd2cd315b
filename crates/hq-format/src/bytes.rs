//! Byte quantity rendering.

use crate::config::ByteBase;

const DECIMAL_SHORT: [&str; 5] = ["k", "M", "G", "T", "P"];
const DECIMAL_LONG: [&str; 5] = ["kilo", "mega", "giga", "tera", "peta"];
const BINARY_SHORT: [&str; 5] = ["Ki", "Mi", "Gi", "Ti", "Pi"];
const BINARY_LONG: [&str; 5] = ["kibi", "mebi", "gibi", "tebi", "pebi"];

fn symbols(base: ByteBase, verbose: bool) -> &'static [&'static str; 5] {
    match (base, verbose) {
        (ByteBase::Decimal, false) => &DECIMAL_SHORT,
        (ByteBase::Decimal, true) => &DECIMAL_LONG,
        (ByteBase::Binary, false) => &BINARY_SHORT,
        (ByteBase::Binary, true) => &BINARY_LONG,
    }
}

/// Render a byte count scaled to the largest unit it reaches.
///
/// Scaled values get two decimals below 10, one decimal below 100 (dropped
/// when it is zero) and none above. Counts below the first unit stay plain
/// integers.
///
/// # Examples
///
/// ```
/// use hq_format::{format_bytes, ByteBase};
///
/// assert_eq!(format_bytes(123, ByteBase::Decimal, false), "123 B");
/// assert_eq!(format_bytes(1000, ByteBase::Decimal, false), "1.00 kB");
/// assert_eq!(format_bytes(1073741824, ByteBase::Binary, false), "1.00 GiB");
/// assert_eq!(format_bytes(2048, ByteBase::Binary, true), "2.00 kibibytes");
/// ```
pub fn format_bytes(bytes: i64, base: ByteBase, verbose: bool) -> String {
    format_magnitude(bytes < 0, bytes.unsigned_abs(), base, verbose)
}

/// [`format_bytes`] over a sign and a magnitude, covering the full `u64`
/// range.
pub(crate) fn format_magnitude(
    negative: bool,
    magnitude: u64,
    base: ByteBase,
    verbose: bool,
) -> String {
    let sign = if negative { "-" } else { "" };
    let symbols = symbols(base, verbose);
    let multiplier = base.multiplier();

    let mut unit: Option<(usize, u64)> = None;
    let mut size = 1u64;
    for idx in 0..symbols.len() {
        size = size.saturating_mul(multiplier);
        if magnitude < size {
            break;
        }
        unit = Some((idx, size));
    }

    let (number, symbol, one) = match unit {
        None => (magnitude.to_string(), "", magnitude == 1),
        Some((idx, size)) => {
            // Two-decimal rounding happens before the precision band is picked.
            let scaled = (magnitude as f64 / size as f64 * 100.0).round() / 100.0;
            (render_scaled(scaled), symbols[idx], scaled == 1.0)
        }
    };

    let unit_name = if !verbose {
        "B"
    } else if one {
        "byte"
    } else {
        "bytes"
    };
    format!("{sign}{number} {symbol}{unit_name}")
}

/// Like [`format_bytes`] with a `/s` suffix.
pub fn format_rate(bytes_per_sec: i64, base: ByteBase, verbose: bool) -> String {
    let mut out = format_bytes(bytes_per_sec, base, verbose);
    out.push_str("/s");
    out
}

fn render_scaled(value: f64) -> String {
    if value < 10.0 {
        format!("{value:.2}")
    } else if value < 100.0 {
        let text = format!("{value:.1}");
        match text.strip_suffix(".0") {
            Some(whole) => whole.to_string(),
            None => text,
        }
    } else {
        format!("{}", value.trunc() as u64)
    }
}
