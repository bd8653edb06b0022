//! Internal helpers for input validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! field parsing so every record type reports errors the same way.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::{EngineError, Money, ResultEngine};

/// Trim a required text field, rejecting missing or blank values.
pub(crate) fn required_text(value: Option<&str>, field: &str) -> ResultEngine<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| EngineError::Validation(format!("{field} is required")))
}

/// Trim an optional text field, mapping blank values to `None`.
pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Parse a calendar date. Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp
/// (the date part is kept).
pub(crate) fn parse_date(value: &str, field: &str) -> ResultEngine<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc).date_naive());
    }
    Err(EngineError::Validation(format!(
        "{field} must be a date (YYYY-MM-DD), got '{value}'"
    )))
}

/// Parse a point in time. Accepts RFC 3339, the `YYYY-MM-DDTHH:MM` shape of
/// HTML `datetime-local` inputs (read as UTC), or a plain date (midnight UTC).
pub(crate) fn parse_timestamp(value: &str, field: &str) -> ResultEngine<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    Err(EngineError::Validation(format!(
        "{field} must be a date or RFC 3339 timestamp, got '{value}'"
    )))
}

/// Parse an optional non-negative money field; blank means zero.
pub(crate) fn non_negative_money(value: Option<&str>, field: &str) -> ResultEngine<Money> {
    let Some(raw) = optional_text(value) else {
        return Ok(Money::ZERO);
    };
    let amount: Money = raw.parse()?;
    ensure_non_negative(amount, field)
}

pub(crate) fn ensure_non_negative(amount: Money, field: &str) -> ResultEngine<Money> {
    if amount.is_negative() {
        return Err(EngineError::InvalidAmount(format!(
            "{field} must be a non-negative number"
        )));
    }
    if amount > Money::MAX_AMOUNT {
        return Err(EngineError::InvalidAmount(format!(
            "{field} must not exceed {}",
            Money::MAX_AMOUNT
        )));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text(Some("  Asha "), "name").unwrap(), "Asha");
        assert_eq!(
            required_text(Some("   "), "name"),
            Err(EngineError::Validation("name is required".to_string()))
        );
        assert!(required_text(None, "name").is_err());
    }

    #[test]
    fn dates_accept_plain_and_rfc3339() {
        let date = parse_date("2001-04-09", "dob").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2001, 4, 9));
        let date = parse_date("2001-04-09T10:00:00Z", "dob").unwrap();
        assert_eq!(date.day(), 9);
        assert!(parse_date("09/04/2001", "dob").is_err());
    }

    #[test]
    fn timestamps_accept_datetime_local() {
        let ts = parse_timestamp("2025-03-01T14:30", "date").unwrap();
        assert_eq!((ts.hour(), ts.minute()), (14, 30));
        let ts = parse_timestamp("2025-03-01", "date").unwrap();
        assert_eq!(ts.hour(), 0);
        assert!(parse_timestamp("tomorrow", "date").is_err());
    }

    #[test]
    fn money_fields_reject_negative() {
        assert_eq!(non_negative_money(None, "fees").unwrap(), Money::ZERO);
        assert_eq!(non_negative_money(Some("1500"), "fees").unwrap(), Money::new(150_000));
        assert_eq!(
            non_negative_money(Some("-5"), "fees"),
            Err(EngineError::InvalidAmount(
                "fees must be a non-negative number".to_string()
            ))
        );
    }

    #[test]
    fn money_fields_reject_huge_amounts() {
        assert_eq!(
            ensure_non_negative(Money::MAX_AMOUNT, "amount").unwrap(),
            Money::MAX_AMOUNT
        );
        assert!(matches!(
            non_negative_money(Some("90000000000000000"), "fees"),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            ensure_non_negative(Money::new(Money::MAX_AMOUNT.minor() + 1), "amount"),
            Err(EngineError::InvalidAmount(_))
        ));
    }
}
