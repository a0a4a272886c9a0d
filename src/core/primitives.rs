use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds half away from zero to `dp` places, avoiding binary float drift
/// such as `1.005 -> 1.00`.
#[must_use]
pub fn round_half_away(value: f64, dp: u32) -> Option<Decimal> {
    Decimal::from_f64(value)
        .map(|decimal| decimal.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
}

/// Formats a dollar amount as `$1,234.56`; negative values keep a leading `-`.
#[must_use]
pub fn format_dollars(value: f64) -> String {
    let Some(rounded) = round_half_away(value, 2) else {
        return "$-".to_owned();
    };
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}${}.{fraction}", group_thousands(whole))
}

/// Formats a percentage with two decimals and an explicit sign, e.g. `+10.00%`.
#[must_use]
pub fn format_signed_percent(value: f64) -> String {
    match round_half_away(value, 2) {
        Some(rounded) if rounded.is_sign_negative() && !rounded.is_zero() => {
            format!("{rounded:.2}%")
        }
        Some(rounded) => format!("+{:.2}%", rounded.abs()),
        None => "-".to_owned(),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }

    #[test]
    fn dollars_round_half_away_from_zero() {
        assert_eq!(format_dollars(5.0), "$5.00");
        assert_eq!(format_dollars(1.005), "$1.01");
        assert_eq!(format_dollars(-2.5), "-$2.50");
        assert_eq!(format_dollars(1234.5), "$1,234.50");
        assert_eq!(format_dollars(f64::NAN), "$-");
    }

    #[test]
    fn percent_carries_sign() {
        assert_eq!(format_signed_percent(10.0), "+10.00%");
        assert_eq!(format_signed_percent(-3.456), "-3.46%");
        assert_eq!(format_signed_percent(0.0), "+0.00%");
    }
}
