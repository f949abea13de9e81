//! Human-readable rendering of upstream numeric strings.

use crate::model::parse_numeric;

/// Scales a kilometre distance to `M km` / `K km` / `km` with two decimals.
///
/// Thresholds are strict: exactly one million renders in `K km`.
pub fn format_distance(kilometers: &str) -> String {
    let km = parse_numeric(kilometers);
    if km > 1_000_000.0 {
        format!("{:.2}M km", km / 1_000_000.0)
    } else if km > 1_000.0 {
        format!("{:.2}K km", km / 1_000.0)
    } else {
        format!("{:.2} km", km)
    }
}

pub fn format_velocity(kilometers_per_hour: &str) -> String {
    format!("{:.2} km/h", parse_numeric(kilometers_per_hour))
}

pub fn format_velocity_kms(kilometers_per_second: &str) -> String {
    format!("{:.2} km/s", parse_numeric(kilometers_per_second))
}

/// Lunar distances, two decimals.
pub fn format_lunar(lunar: &str) -> String {
    format!("{:.2} LD", parse_numeric(lunar))
}

/// Astronomical units, six decimals.
pub fn format_astronomical(astronomical: &str) -> String {
    format!("{:.6} AU", parse_numeric(astronomical))
}

pub fn format_diameter(kilometers: f64, decimals: usize) -> String {
    format!("{:.*} km", decimals, kilometers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_distance_scales() {
        assert_eq!(format_distance("500"), "500.00 km");
        assert_eq!(format_distance("2500"), "2.50K km");
        assert_eq!(format_distance("3000000"), "3.00M km");
    }

    #[test]
    fn test_format_distance_thresholds_are_strict() {
        assert_eq!(format_distance("1000"), "1000.00 km");
        assert_eq!(format_distance("1000000"), "1000.00K km");
    }

    #[test]
    fn test_format_distance_no_grouping() {
        assert_eq!(format_distance("45290298.225725659"), "45.29M km");
    }

    #[test]
    fn test_format_distance_non_numeric_propagates_nan() {
        assert_eq!(format_distance("n/a"), "NaN km");
    }

    #[test]
    fn test_format_velocity() {
        assert_eq!(format_velocity("45000"), "45000.00 km/h");
        assert_eq!(format_velocity("65260.5699103704"), "65260.57 km/h");
    }

    #[test]
    fn test_detail_units() {
        assert_eq!(format_lunar("117.7685618773"), "117.77 LD");
        assert_eq!(format_astronomical("0.3027469457"), "0.302747 AU");
        assert_eq!(format_velocity_kms("18.1279360862"), "18.13 km/s");
        assert_eq!(format_diameter(0.35118, 3), "0.351 km");
    }
}
