/// Форматирует число с разделителями тысяч (запятыми)
///
/// # Примеры
/// ```ignore
/// use crate::shared::format::format_thousands;
/// assert_eq!(format_thousands(1234567), "1,234,567");
/// assert_eq!(format_thousands(42), "42");
/// ```
pub fn format_thousands(n: u64) -> String {
    group_digits(&n.to_string())
}

/// Денежное значение: знак доллара, разделители тысяч, `decimals` знаков после точки
///
/// `format_currency(1234.567, 2)` → `"$1,234.57"`, `format_currency(-50.0, 0)` → `"-$50"`
pub fn format_currency(value: f64, decimals: usize) -> String {
    let sign = if value < 0.0 && round_to(value.abs(), decimals) > 0.0 {
        "-"
    } else {
        ""
    };
    format!("{}${}", sign, format_decimal(value.abs(), decimals))
}

/// Число с разделителями тысяч без знака валюты
pub fn format_amount(value: f64, decimals: usize) -> String {
    if value < 0.0 && round_to(value.abs(), decimals) > 0.0 {
        format!("-{}", format_decimal(value.abs(), decimals))
    } else {
        format_decimal(value.abs(), decimals)
    }
}

fn format_decimal(abs: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, abs);
    match fixed.split_once('.') {
        Some((int_part, frac_part)) => format!("{}.{}", group_digits(int_part), frac_part),
        None => group_digits(&fixed),
    }
}

fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10_f64.powi(decimals.min(9) as i32);
    (value * factor).round() / factor
}

fn group_digits(digits: &str) -> String {
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(42), "42");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
        assert_eq!(format_thousands(1234567890), "1,234,567,890");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0, 0), "$0");
        assert_eq!(format_currency(0.0, 2), "$0.00");
        assert_eq!(format_currency(180.0, 0), "$180");
        assert_eq!(format_currency(1234567.4, 0), "$1,234,567");
        assert_eq!(format_currency(1234.567, 2), "$1,234.57");
        assert_eq!(format_currency(999.999, 2), "$1,000.00");
        assert_eq!(format_currency(-1500.0, 0), "-$1,500");
    }

    #[test]
    fn test_negative_zero_has_no_sign() {
        assert_eq!(format_currency(-0.001, 2), "$0.00");
        assert_eq!(format_amount(-0.2, 0), "0");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(150.0, 0), "150");
        assert_eq!(format_amount(22638.48, 0), "22,638");
        assert_eq!(format_amount(-2500.5, 1), "-2,500.5");
    }
}
