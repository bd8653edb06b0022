//! Age derived from a date of birth.

use chrono::{Datelike, NaiveDate};

/// Full years between `dob` and `today`.
///
/// One year is subtracted while today's (month, day) is still before the
/// birthday. A `dob` after `today` yields 0.
#[must_use]
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> u32 {
    if dob > today {
        return 0;
    }
    let mut years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}
