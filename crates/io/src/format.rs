//! A `%.11g`-equivalent float formatter, since Rust's `{}` and `{:e}` don't
//! implement C's "shortest of fixed/scientific, strip trailing zeros" `%g`
//! behavior and no printf-compatible crate is in the dependency graph.

/// Formats `value` the way C's `printf("%.11g", value)` would: 11
/// significant digits, fixed notation unless the exponent falls outside
/// `[-4, precision)`, trailing zeros and a bare trailing `.` stripped.
#[must_use]
pub fn format_g11(value: f64) -> String {
    format_g(value, 11)
}

fn format_g(value: f64, precision: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return if value.is_nan() { "nan".to_string() } else if value > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }

    let exponent = value.abs().log10().floor() as i32;
    let precision = precision.max(1);

    if exponent < -4 || exponent >= precision as i32 {
        let decimals = precision - 1;
        let rendered = format!("{value:.decimals$e}");
        strip_scientific(&rendered)
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        let rendered = format!("{value:.decimals$}");
        strip_fixed(&rendered)
    }
}

fn strip_fixed(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    let trimmed = s.trim_end_matches('0');
    trimmed.trim_end_matches('.').to_string()
}

fn strip_scientific(s: &str) -> String {
    let Some((mantissa, exp)) = s.split_once('e') else {
        return s.to_string();
    };
    let mantissa = strip_fixed(mantissa);
    let exp_num: i32 = exp.parse().unwrap_or(0);
    format!("{mantissa}e{}{:02}", if exp_num < 0 { "-" } else { "+" }, exp_num.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_value_has_no_decimal_point() {
        assert_eq!(format_g11(3.0), "3");
    }

    #[test]
    fn strips_trailing_zeros_in_fixed_notation() {
        assert_eq!(format_g11(0.5), "0.5");
        assert_eq!(format_g11(1.0 / 3.0), "0.33333333333");
    }

    #[test]
    fn large_magnitude_switches_to_scientific() {
        let s = format_g11(1.5e20);
        assert!(s.starts_with("1.5e+"));
    }

    #[test]
    fn small_magnitude_switches_to_scientific() {
        let s = format_g11(1.5e-7);
        assert!(s.starts_with("1.5e-"));
    }

    #[test]
    fn zero_formats_as_bare_zero() {
        assert_eq!(format_g11(0.0), "0");
    }

    #[test]
    fn negative_value_keeps_sign() {
        assert_eq!(format_g11(-2.5), "-2.5");
    }
}
