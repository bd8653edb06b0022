//! Classification of a patient's next appointment relative to today.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Badge shown next to a patient's appointment date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScheduleStatus {
    NoAppointment,
    PastDue,
    Today,
    /// Between 1 and 7 calendar days ahead.
    ThisWeek,
    Scheduled,
}

impl ScheduleStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoAppointment => "No Appointment",
            Self::PastDue => "Past Due",
            Self::Today => "Today",
            Self::ThisWeek => "This Week",
            Self::Scheduled => "Scheduled",
        }
    }
}

/// Classifies `date` by its calendar-day distance from `today`, both read
/// as calendar dates in `tz`.
#[must_use]
pub fn classify<Z: TimeZone>(
    date: Option<DateTime<Utc>>,
    today: NaiveDate,
    tz: &Z,
) -> ScheduleStatus {
    let Some(date) = date else {
        return ScheduleStatus::NoAppointment;
    };
    match (date.with_timezone(tz).date_naive() - today).num_days() {
        d if d < 0 => ScheduleStatus::PastDue,
        0 => ScheduleStatus::Today,
        1..=7 => ScheduleStatus::ThisWeek,
        _ => ScheduleStatus::Scheduled,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, FixedOffset};

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn at(days: i64, hour: u32) -> Option<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2026, 10, 17, hour, 0, 0).unwrap();
        Some(base + Duration::days(days))
    }

    #[test]
    fn no_date() {
        assert_eq!(classify(None, today(), &Utc), ScheduleStatus::NoAppointment);
    }

    #[test]
    fn same_day_at_any_hour_is_today() {
        assert_eq!(classify(at(0, 0), today(), &Utc), ScheduleStatus::Today);
        assert_eq!(classify(at(0, 23), today(), &Utc), ScheduleStatus::Today);
    }

    #[test]
    fn next_seven_days_are_this_week() {
        for days in 1..=7 {
            assert_eq!(classify(at(days, 10), today(), &Utc), ScheduleStatus::ThisWeek);
        }
        assert_eq!(classify(at(8, 10), today(), &Utc), ScheduleStatus::Scheduled);
    }

    #[test]
    fn yesterday_is_past_due() {
        assert_eq!(classify(at(-1, 23), today(), &Utc), ScheduleStatus::PastDue);
        assert_eq!(ScheduleStatus::PastDue.label(), "Past Due");
    }

    #[test]
    fn days_follow_the_given_timezone() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        // 02:00 IST on the 18th.
        let early = Utc.with_ymd_and_hms(2026, 10, 17, 20, 30, 0).single();
        assert_eq!(classify(early, today, &ist), ScheduleStatus::Today);
        assert_eq!(classify(early, today, &Utc), ScheduleStatus::PastDue);
        // 23:30 IST on the 17th.
        let late = Utc.with_ymd_and_hms(2026, 10, 17, 18, 0, 0).single();
        assert_eq!(classify(late, today, &ist), ScheduleStatus::PastDue);
    }
}
