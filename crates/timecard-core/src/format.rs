//! Human-scaled console forms for metric values.

const BYTE_SYMBOLS: [char; 9] = ['B', 'K', 'M', 'G', 'T', 'P', 'E', 'Z', 'Y'];

/// Format a byte count with binary prefixes ("1.00K", "1023.00B").
///
/// Zero renders as a single blank so idle columns stay quiet.
pub fn format_bytes(n: i64) -> String {
    if n == 0 {
        return " ".to_string();
    }

    let wide = i128::from(n);
    for (i, symbol) in BYTE_SYMBOLS.iter().enumerate().skip(1).rev() {
        let prefix = 1i128 << (i * 10);
        if wide >= prefix {
            return format!("{:.2}{}", n as f64 / prefix as f64, symbol);
        }
    }
    format!("{:.2}{}", n as f64, BYTE_SYMBOLS[0])
}

/// Format seconds as "50ms", "1.23s" or "1.5m".
pub fn format_duration(secs: f64) -> String {
    if secs < 0.1 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}

/// Shortest round-trip form of a float, always with a fractional part ("1.0").
///
/// Exponents carry a sign and at least two digits ("1e+16", "1e-05"), and
/// non-finite values are lowercase ("inf", "nan").
pub fn format_float_exact(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }

    let repr = format!("{:?}", v);
    let Some((mantissa, exponent)) = repr.split_once('e') else {
        return repr;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

pub(crate) fn rjust(text: &str, width: usize) -> String {
    format!("{:>width$}", text, width = width)
}

pub(crate) fn center(text: &str, width: usize, fill: char) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let pad = width - len;
    // An odd fill goes left when the width is odd, right otherwise.
    let left = pad / 2 + (pad & width & 1);
    let mut out = String::with_capacity(width);
    out.extend(std::iter::repeat_n(fill, left));
    out.push_str(text);
    out.extend(std::iter::repeat_n(fill, pad - left));
    out
}
