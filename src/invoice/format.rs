/// Group an integer with comma thousands separators.
pub fn format_grouped_int(value: i64) -> String {
    group_digits(&value.to_string())
}

/// Round half to even to a whole amount and group it, e.g. `1234.6` -> `1,235`.
pub fn format_whole(value: f64) -> String {
    let rounded = value.round_ties_even();
    if rounded == 0.0 {
        return "0".to_string();
    }
    group_digits(&format!("{:.0}", rounded))
}

fn group_digits(number: &str) -> String {
    let (sign, digits) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    let grouped: String = out.chars().rev().collect();
    format!("{sign}{grouped}")
}

/// Whole amount followed by the currency label, e.g. `2,250,000 COP`.
pub fn format_money(value: f64, currency_label: &str) -> String {
    format!("{} {}", format_whole(value), currency_label)
}

/// Plain number for weights and rates: up to three decimals, trailing zeros dropped.
pub fn format_quantity(value: f64) -> String {
    let fixed = format!("{:.3}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
