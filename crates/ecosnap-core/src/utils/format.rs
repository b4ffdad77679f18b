/// Render an age in minutes the way cache listings show it.
/// Rounds to the nearest larger unit once past the halfway mark.
pub fn format_age_minutes(minutes: i64) -> String {
    if minutes < 1 {
        // Covers clock skew (negative ages) too
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        let remaining_hours = (minutes % 1440) / 60;
        if remaining_hours >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

/// Format a number with a fixed count of decimals the way `Number.toFixed` does.
///
/// The double's exact value is rounded, so `10.35` (stored as 10.3499...)
/// reads "10.3". Only exact ties go to the larger magnitude: `4.5` reads "5"
/// where `format!("{:.0}", 4.5)` would round to even and give "4".
pub fn to_fixed(value: f64, decimals: usize) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    match round_exact_tie(value.abs(), decimals) {
        Some(digits) if value < 0.0 => format!("-{}", digits),
        Some(digits) => digits,
        None => format!("{:.*}", decimals, value),
    }
}

/// Returns the rounded-up digits when `value` lies exactly halfway between
/// two representable results, `None` otherwise.
fn round_exact_tie(value: f64, decimals: usize) -> Option<String> {
    // Above 2^53 every double is an integer, so there are no halves
    if !value.is_finite() || value >= 9_007_199_254_740_992.0 || decimals > 20 {
        return None;
    }
    let extended = format!("{:.*}", decimals + 1, value);
    if !extended.ends_with('5') || extended.parse::<f64>().ok()? != value {
        return None;
    }
    let scaled: u128 = extended.replace('.', "").parse().ok()?;
    // A decimal ending in 5 is exactly representable only if the power of
    // five in its denominator cancels
    if scaled % 5u128.pow(decimals as u32 + 1) != 0 {
        return None;
    }

    let rounded = scaled / 10 + 1;
    if decimals == 0 {
        return Some(rounded.to_string());
    }
    let unit = 10u128.pow(decimals as u32);
    Some(format!(
        "{}.{:0width$}",
        rounded / unit,
        rounded % unit,
        width = decimals
    ))
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_age_minutes() {
        assert_eq!(format_age_minutes(-5), "just now");
        assert_eq!(format_age_minutes(0), "just now");
        assert_eq!(format_age_minutes(5), "5m ago");
        assert_eq!(format_age_minutes(89), "1h ago");
        assert_eq!(format_age_minutes(90), "2h ago");
        assert_eq!(format_age_minutes(1440 * 3), "3d ago");
        assert_eq!(format_age_minutes(1440 + 12 * 60), "2d ago");
    }

    #[test]
    fn test_to_fixed_rounds_exact_ties_up() {
        assert_eq!(to_fixed(4.5, 0), "5");
        assert_eq!(to_fixed(0.5, 0), "1");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(1.25, 1), "1.3");
        assert_eq!(to_fixed(-2.5, 0), "-3");
        assert_eq!(to_fixed(150.0, 0), "150");
        assert_eq!(to_fixed(23.000000000000004, 1), "23.0");
        assert_eq!(to_fixed(1.0, 2), "1.00");
        assert_eq!(to_fixed(0.0, 1), "0.0");
        assert_eq!(to_fixed(-0.0, 1), "0.0");
    }

    #[test]
    fn test_to_fixed_rounds_the_stored_value() {
        // Each product is stored just below the decimal half
        assert_eq!(to_fixed(1.005, 2), "1.00");
        assert_eq!(to_fixed(45.0 * 0.23, 1), "10.3");
        assert_eq!(to_fixed(155.0 * 0.23, 1), "35.6");
        assert_eq!(to_fixed(205.0 * 0.23, 1), "47.1");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }
}
