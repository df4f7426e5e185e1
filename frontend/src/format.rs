pub const CURRENCY_SYMBOL: &str = "$";

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn format_with_commas(value: u128) -> String {
    let digits = value.to_string().chars().rev().collect::<Vec<char>>();
    let mut out = Vec::new();
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(*ch);
    }
    out.into_iter().rev().collect()
}

/// `-1234.5` becomes `-$ 1,234.50`. Out-of-range amounts saturate and NaN
/// renders as zero.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let cents = (amount * 100.0).round() as i128;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!(
        "{}{} {}.{:02}",
        sign,
        symbol,
        format_with_commas(cents / 100),
        cents % 100
    )
}

/// 1-based month to its English name.
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|index| MONTH_NAMES.get(index as usize))
        .copied()
        .unwrap_or("?")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands_and_keeps_cents() {
        assert_eq!(format_currency(1234567.891, "$"), "$ 1,234,567.89");
        assert_eq!(format_currency(-700.5, "$"), "-$ 700.50");
        assert_eq!(format_currency(0.0, "€"), "€ 0.00");
    }

    #[test]
    fn extreme_amounts_saturate_instead_of_overflowing() {
        let min = format_currency(-1e300, "$");
        assert!(min.starts_with("-$ 1,701,411,834,604,692,317,316,873,037,158,841,057"));
        assert!(format_currency(f64::INFINITY, "$").starts_with("$ 1,701,411"));
        assert_eq!(format_currency(f64::NAN, "$"), "$ 0.00");
    }

    #[test]
    fn month_names_are_one_based() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "?");
        assert_eq!(month_name(13), "?");
    }
}
