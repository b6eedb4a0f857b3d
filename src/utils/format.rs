//! Display and parsing helpers for the pt-BR surfaces of the pipeline.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a wire date string leniently. The backend has emitted RFC 3339,
/// bare datetimes, and bare dates for the same columns.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(parsed.and_utc());
        }
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(parsed.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

/// Truncate a wire date to the ISO `YYYY-MM-DD` form used by date inputs.
/// Unparseable or empty values become the empty string.
pub fn iso_date(value: &str) -> String {
    match parse_datetime(value) {
        Some(parsed) => parsed.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

/// Render a date in the pt-BR `dd/mm/yyyy` form. Unparseable values are
/// returned unchanged.
pub fn format_date_br(value: &str) -> String {
    match parse_datetime(value) {
        Some(parsed) => parsed.format("%d/%m/%Y").to_string(),
        None => value.to_string(),
    }
}

/// Render a date-time in the pt-BR form, or "-" when absent/unparseable.
pub fn format_datetime_br(value: &str) -> String {
    match parse_datetime(value) {
        Some(parsed) => parsed.format("%d/%m/%Y %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}

/// Render a wire number as the string form carried in ficha maps and seeds:
/// integer-valued floats drop the decimal part, absent values become "".
pub fn number_to_text(value: Option<f64>) -> String {
    match value {
        Some(number) if number.fract() == 0.0 => format!("{}", number as i64),
        Some(number) => number.to_string(),
        None => String::new(),
    }
}

/// Render an amount as BRL currency (`R$ 1.234,56`), or "-" when absent.
pub fn format_currency_brl(value: Option<f64>) -> String {
    let Some(number) = value else {
        return "-".to_string();
    };
    let negative = number < 0.0;
    let cents = (number.abs() * 100.0).round() as u64;
    let integer = cents / 100;
    let fraction = cents % 100;
    let mut grouped = String::new();
    let digits = integer.to_string();
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let sign = if negative { "-" } else { "" };
    format!("{sign}R$ {grouped},{fraction:02}")
}
