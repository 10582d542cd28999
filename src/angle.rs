//! Angle strings (`"90deg"`, `"1.57rad"`) to radians

use regex::Regex;
use std::f64::consts::PI;
use std::sync::OnceLock;

const DEGREE_SUFFIX: &str = "deg";
const RADIAN_SUFFIX: &str = "rad";

fn leading_float_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?")
            .expect("leading float pattern is valid")
    })
}

/// Parse the longest numeric prefix of `s`.
///
/// `"90deg"` gives 90, `"-1.5e1rad"` gives -15, and a string with no
/// numeric prefix gives NaN.
pub fn leading_float(s: &str) -> f64 {
    leading_float_regex()
        .find(s)
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// True when the angle string names a unit this crate understands.
pub fn has_angle_unit(s: &str) -> bool {
    s.contains(DEGREE_SUFFIX) || s.contains(RADIAN_SUFFIX)
}

/// Convert an angle string to radians.
///
/// Values ending in `rad` are taken as radians; anything else is read as
/// degrees.
pub fn convert_to_radians(s: &str) -> f64 {
    let value = leading_float(s);
    if s.trim_end().ends_with(RADIAN_SUFFIX) {
        value
    } else {
        value * PI / 180.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_leading_float() {
        assert_eq!(leading_float("90deg"), 90.0);
        assert_eq!(leading_float("  -45.5deg"), -45.5);
        assert_eq!(leading_float(".5rad"), 0.5);
        assert_eq!(leading_float("1.5e1deg"), 15.0);
        assert_eq!(leading_float("+3rad"), 3.0);
        assert_eq!(leading_float("7."), 7.0);
        assert!(leading_float("deg").is_nan());
        assert!(leading_float("").is_nan());
    }

    #[test]
    fn test_degrees() {
        assert!(approx_eq(convert_to_radians("180deg"), PI));
        assert!(approx_eq(convert_to_radians("90deg"), PI / 2.0));
        assert!(approx_eq(convert_to_radians("-90deg"), -PI / 2.0));
        assert_eq!(convert_to_radians("0deg"), 0.0);
    }

    #[test]
    fn test_radians_pass_through() {
        assert_eq!(convert_to_radians("3.14159265rad"), 3.14159265);
        assert_eq!(convert_to_radians("1rad "), 1.0);
    }

    #[test]
    fn test_unitless_reads_as_degrees() {
        assert!(approx_eq(convert_to_radians("90"), PI / 2.0));
    }

    #[test]
    fn test_unparsable_is_nan() {
        assert!(convert_to_radians("bigdeg").is_nan());
    }

    #[test]
    fn test_has_angle_unit() {
        assert!(has_angle_unit("90deg"));
        assert!(has_angle_unit("1rad"));
        assert!(!has_angle_unit("90"));
        assert!(!has_angle_unit("90turn"));
    }
}
