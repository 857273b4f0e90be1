//! Numeric rendering rules shared by every report.

/// Values at or above this magnitude render in scientific form.
pub const SCIENTIFIC_THRESHOLD: f64 = 1e15;

const NOT_AVAILABLE: &str = "N/A";

const MAGNITUDE_SUFFIXES: [(f64, &str); 4] = [(1e24, "Y"), (1e21, "Z"), (1e18, "E"), (1e15, "P")];

/// Direction of a change, decided by strict sign comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn from_change(v: f64) -> Self {
        if v > 0.0 {
            Self::Up
        } else if v < 0.0 {
            Self::Down
        } else {
            Self::Flat
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Up => "▲",
            Self::Down => "▼",
            Self::Flat => "■",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Flat => "flat",
        }
    }
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Fixed-point with thousands separators: `1234567.891, 2` → `1,234,567.89`.
pub fn thousands(v: f64, decimals: usize) -> String {
    if !v.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let fixed = format!("{:.*}", decimals, v.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let sign = if v < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{sign}{}.{f}", group_digits(int_part)),
        None => format!("{sign}{}", group_digits(int_part)),
    }
}

/// `$1,234.56`; negative amounts render as `-$1,234.56`.
pub fn currency(v: f64) -> String {
    if !v.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let body = thousands(v.abs(), 2);
    if v < 0.0 && body != "0.00" {
        format!("-${body}")
    } else {
        format!("${body}")
    }
}

/// Unsigned percentage with two decimals: `12.34%`.
pub fn percent(v: f64) -> String {
    if !v.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{v:.2}%")
}

/// Percentage with explicit sign: `+1.23%`, `-0.50%`, `+0.00%`.
pub fn signed_percent(v: f64) -> String {
    if !v.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    if v >= 0.0 {
        // `+ 0.0` folds negative zero into positive zero
        format!("+{:.2}%", v + 0.0)
    } else {
        format!("{v:.2}%")
    }
}

/// Signed percentage for a ratio that may be undefined.
pub fn signed_percent_opt(v: Option<f64>) -> String {
    v.map_or_else(|| NOT_AVAILABLE.to_string(), signed_percent)
}

/// `part / total * 100`, or `None` when `total` is zero.
pub fn percent_of(part: f64, total: f64) -> Option<f64> {
    if total == 0.0 || !total.is_finite() || !part.is_finite() {
        return None;
    }
    Some(part / total * 100.0)
}

/// Rendered share of a total, `N/A` for a zero total.
pub fn ratio_percent(part: f64, total: f64) -> String {
    percent_of(part, total).map_or_else(|| NOT_AVAILABLE.to_string(), percent)
}

/// Relative change from `previous` to `current` in percent, `None` when
/// `previous` is zero.
pub fn percent_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 || !previous.is_finite() || !current.is_finite() {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

/// Normalized scientific notation with a two-decimal mantissa: `1.00e+15`.
pub fn scientific(v: f64) -> String {
    if !v.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    if v == 0.0 {
        return "0.00e+0".to_string();
    }
    let mut exp = v.abs().log10().floor() as i32;
    let mut mantissa = (v / 10f64.powi(exp) * 100.0).round() / 100.0;
    if mantissa.abs() >= 10.0 {
        mantissa /= 10.0;
        exp += 1;
    } else if mantissa.abs() < 1.0 {
        mantissa *= 10.0;
        exp -= 1;
    }
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa:.2}e{sign}{}", exp.abs())
}

/// Large magnitudes such as difficulty.
///
/// At or above [`SCIENTIFIC_THRESHOLD`] the value renders as
/// `1.23e+15 (1.23 P)`; below it, as a rounded integer with separators.
pub fn large_magnitude(v: f64) -> String {
    if !v.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    if v.abs() < SCIENTIFIC_THRESHOLD {
        return thousands(v.round(), 0);
    }
    let scaled = MAGNITUDE_SUFFIXES
        .iter()
        .find(|(div, _)| v.abs() >= *div)
        .map_or_else(String::new, |(div, suffix)| {
            format!(" ({:.2} {suffix})", v / div)
        });
    format!("{}{scaled}", scientific(v))
}

/// Small positive values that would read as all zeros at `decimals`
/// fixed-point digits render in scientific form instead.
pub fn small_magnitude(v: f64, decimals: usize) -> String {
    if !v.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let floor = 1.0 / 10f64.powi(decimals as i32);
    if v > 0.0 && v < floor {
        scientific(v)
    } else {
        format!("{v:.decimals$}")
    }
}

/// Hashes per second scaled to EH/s: `612.30 EH/s`.
pub fn hashrate_ehs(hashes_per_second: f64) -> String {
    format!("{} EH/s", thousands(hashes_per_second / 1e18, 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_formats() {
        assert_eq!(currency(5000.0), "$5,000.00");
        assert_eq!(currency(1_234_567.891), "$1,234,567.89");
        assert_eq!(currency(0.0), "$0.00");
        assert_eq!(currency(-12.5), "-$12.50");
        assert_eq!(currency(-0.001), "$0.00");
        assert_eq!(currency(f64::NAN), "N/A");
    }

    #[test]
    fn signed_percent_formats() {
        assert_eq!(signed_percent(1.234), "+1.23%");
        assert_eq!(signed_percent(0.0), "+0.00%");
        assert_eq!(signed_percent(-0.0), "+0.00%");
        assert_eq!(signed_percent(-2.5), "-2.50%");
        assert_eq!(signed_percent(f64::INFINITY), "N/A");
        assert_eq!(signed_percent_opt(None), "N/A");
    }

    #[test]
    fn trend_uses_strict_sign() {
        assert_eq!(Trend::from_change(0.01), Trend::Up);
        assert_eq!(Trend::from_change(-0.01), Trend::Down);
        assert_eq!(Trend::from_change(0.0), Trend::Flat);
        assert_eq!(Trend::from_change(f64::NAN), Trend::Flat);
    }

    #[test]
    fn large_magnitude_threshold() {
        assert_eq!(large_magnitude(1e15), "1.00e+15 (1.00 P)");
        assert_eq!(large_magnitude(999_999_999_999_999.0), "999,999,999,999,999");
        assert_eq!(large_magnitude(126_982_285_146_989.3), "126,982,285,146,989");
        assert_eq!(large_magnitude(2.5e18), "2.50e+18 (2.50 E)");
    }

    #[test]
    fn scientific_normalizes_mantissa() {
        assert_eq!(scientific(9.999e15), "1.00e+16");
        assert_eq!(scientific(0.000_001_4), "1.40e-6");
        assert_eq!(scientific(0.0), "0.00e+0");
    }

    #[test]
    fn small_magnitude_switches_below_precision() {
        assert_eq!(small_magnitude(0.000_001_4, 4), "1.40e-6");
        assert_eq!(small_magnitude(0.0001, 4), "0.0001");
        assert_eq!(small_magnitude(0.1234, 4), "0.1234");
        assert_eq!(small_magnitude(0.0, 4), "0.0000");
    }

    #[test]
    fn ratios_with_zero_denominator() {
        assert_eq!(percent_of(5.0, 0.0), None);
        assert_eq!(ratio_percent(5.0, 0.0), "N/A");
        assert_eq!(ratio_percent(1.0, 4.0), "25.00%");
        assert_eq!(percent_change(10.0, 0.0), None);
        assert_eq!(percent_change(150.0, 100.0), Some(50.0));
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(thousands(999.0, 0), "999");
        assert_eq!(thousands(1000.0, 0), "1,000");
        assert_eq!(thousands(-1_234_567.0, 2), "-1,234,567.00");
        assert_eq!(hashrate_ehs(612.3e18), "612.30 EH/s");
    }
}
