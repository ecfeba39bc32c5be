//! Display formatting for the dashboard.

use chrono::NaiveDate;

use crate::Cents;

/// Format cents as US dollars with thousands separators, e.g. `$1,234.56`.
#[must_use]
pub fn format_currency(amount: Cents) -> String {
    let cents = amount.as_i64();
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let dollars = abs / 100;
    let remainder = abs % 100;

    format!("{sign}${}.{remainder:02}", group_thousands(dollars))
}

/// Format a date the way the invoice tables show it, e.g. `Dec 6, 2022`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Cents::new(0)), "$0.00");
        assert_eq!(format_currency(Cents::new(5)), "$0.05");
        assert_eq!(format_currency(Cents::new(3450)), "$34.50");
        assert_eq!(format_currency(Cents::new(123_456)), "$1,234.56");
        assert_eq!(format_currency(Cents::new(100_000_000)), "$1,000,000.00");
        assert_eq!(format_currency(Cents::new(-2599)), "-$25.99");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2022, 12, 6);
        assert_eq!(date.map(format_date).as_deref(), Some("Dec 6, 2022"));
    }
}
