//! Aggregations behind the Overview and Reports pages.
//!
//! Everything here is pure: callers load the records, pass them in together
//! with the current time, and get plain data back. Sums are kept in [`Money`]
//! so that grouped totals always add up to the ungrouped total.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, Months, Utc};

use crate::{
    Appointment, Expense, ExpenseType, Money, Patient, macros::labeled_enum,
};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Short English name of a 0-based month index.
#[must_use]
pub fn month_label(index: usize) -> &'static str {
    MONTH_LABELS.get(index).copied().unwrap_or("")
}

/// Sum of `amount` over `items`.
pub fn total<T>(items: &[T], amount: impl Fn(&T) -> Money) -> Money {
    items.iter().map(amount).sum()
}

/// Sums `amount` per `key`.
///
/// The values of the returned map always add up to [`total`] over the same
/// items.
pub fn sum_by_key<T, K: Ord>(
    items: &[T],
    key: impl Fn(&T) -> K,
    amount: impl Fn(&T) -> Money,
) -> BTreeMap<K, Money> {
    let mut groups = BTreeMap::new();
    for item in items {
        *groups.entry(key(item)).or_insert(Money::ZERO) += amount(item);
    }
    groups
}

/// Counts dates per calendar month (index 0 is January), ignoring the year.
pub fn count_by_month(dates: impl IntoIterator<Item = DateTime<Utc>>) -> [u64; 12] {
    let mut buckets = [0u64; 12];
    for date in dates {
        buckets[date.month0() as usize] += 1;
    }
    buckets
}

/// Sums `amount` per calendar month of `date`.
pub fn sum_by_month<T>(
    items: &[T],
    date: impl Fn(&T) -> DateTime<Utc>,
    amount: impl Fn(&T) -> Money,
) -> [Money; 12] {
    let mut buckets = [Money::ZERO; 12];
    for item in items {
        buckets[date(item).month0() as usize] += amount(item);
    }
    buckets
}

/// `part` as a percentage of `total`; 0.0 when `total` is zero.
#[must_use]
pub fn percentage(part: Money, total: Money) -> f64 {
    if total == Money::ZERO {
        return 0.0;
    }
    part.minor() as f64 / total.minor() as f64 * 100.0
}

labeled_enum! {
    /// How far back the Reports page looks.
    TimeRange("range") {
        All => "all",
        Week => "week",
        Month => "month",
        Year => "year",
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::All
    }
}

impl TimeRange {
    /// Oldest instant still inside the range, `None` for [`TimeRange::All`].
    #[must_use]
    pub fn since(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::All => None,
            Self::Week => Some(now - Duration::days(7)),
            Self::Month => now.checked_sub_months(Months::new(1)),
            Self::Year => now.checked_sub_months(Months::new(12)),
        }
    }
}

/// Expense selection used by the Reports page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseFilter {
    pub range: TimeRange,
    /// Case-insensitive substring of the type label or the category.
    pub search: Option<String>,
}

impl ExpenseFilter {
    #[must_use]
    pub fn matches(&self, expense: &Expense, now: DateTime<Utc>) -> bool {
        if let Some(since) = self.range.since(now)
            && expense.date < since
        {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                expense.expense_type.as_str().to_lowercase().contains(&term)
                    || expense
                        .category
                        .as_deref()
                        .is_some_and(|c| c.to_lowercase().contains(&term))
            }
        }
    }

    /// Matching expenses, in their original order.
    #[must_use]
    pub fn apply(&self, expenses: &[Expense], now: DateTime<Utc>) -> Vec<Expense> {
        expenses
            .iter()
            .filter(|e| self.matches(e, now))
            .cloned()
            .collect()
    }
}

/// Figures shown on the Overview page.
#[derive(Clone, Debug, PartialEq)]
pub struct OverviewReport {
    pub total_patients: u64,
    pub total_appointments: u64,
    pub total_expenses: Money,
    /// Appointment count times the per-appointment fee.
    pub total_earnings: Money,
    pub net_profit: Money,
    pub appointments_by_month: [u64; 12],
    /// Every expense type, in declaration order, zero included.
    pub expenses_by_type: Vec<(ExpenseType, Money)>,
    pub expenses_by_category: Vec<(String, Money)>,
}

#[must_use]
pub fn overview(
    patients: &[Patient],
    appointments: &[Appointment],
    expenses: &[Expense],
    appointment_fee: Money,
) -> OverviewReport {
    let total_appointments = appointments.len() as u64;
    let total_expenses = total(expenses, |e| e.amount);
    let total_earnings = appointment_fee.times(total_appointments);
    let by_type = sum_by_key(expenses, |e| e.expense_type, |e| e.amount);

    OverviewReport {
        total_patients: patients.len() as u64,
        total_appointments,
        total_expenses,
        total_earnings,
        net_profit: total_earnings - total_expenses,
        appointments_by_month: count_by_month(appointments.iter().map(|a| a.date)),
        expenses_by_type: ExpenseType::ALL
            .iter()
            .map(|t| (*t, by_type.get(t).copied().unwrap_or(Money::ZERO)))
            .collect(),
        expenses_by_category: sum_by_key(
            expenses,
            |e| e.category_or_general().to_string(),
            |e| e.amount,
        )
        .into_iter()
        .collect(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Money,
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyBucket {
    /// Calendar month, 1-12.
    pub month: u32,
    pub label: &'static str,
    pub count: u64,
    pub amount: Money,
}

/// Figures shown on the Reports page for a filtered set of expenses.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpenseReport {
    pub filter: ExpenseFilter,
    pub total_expenses: Money,
    pub total_patients: u64,
    pub average_per_patient: Money,
    /// Sorted by amount, largest first, then by name.
    pub by_category: Vec<CategoryShare>,
    pub dental_percentage: f64,
    /// Months with at least one expense, January first.
    pub monthly: Vec<MonthlyBucket>,
    pub top_categories: Vec<CategoryShare>,
    /// Five latest expenses by date.
    pub recent: Vec<Expense>,
}

#[must_use]
pub fn expense_report(
    expenses: &[Expense],
    total_patients: u64,
    filter: &ExpenseFilter,
    now: DateTime<Utc>,
) -> ExpenseReport {
    let filtered = filter.apply(expenses, now);
    let total_expenses = total(&filtered, |e| e.amount);

    let mut by_category: Vec<CategoryShare> = sum_by_key(
        &filtered,
        |e| e.category_or_general().to_string(),
        |e| e.amount,
    )
    .into_iter()
    .map(|(category, amount)| CategoryShare {
        percentage: percentage(amount, total_expenses),
        category,
        amount,
    })
    .collect();
    by_category.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));

    let dental: Money = by_category
        .iter()
        .filter(|c| c.category.eq_ignore_ascii_case("dental"))
        .map(|c| c.amount)
        .sum();

    let counts = count_by_month(filtered.iter().map(|e| e.date));
    let amounts = sum_by_month(&filtered, |e| e.date, |e| e.amount);
    let monthly = (0..12)
        .filter(|&m| counts[m] > 0)
        .map(|m| MonthlyBucket {
            month: m as u32 + 1,
            label: month_label(m),
            count: counts[m],
            amount: amounts[m],
        })
        .collect();

    let mut recent = filtered.clone();
    recent.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then(b.created_at.cmp(&a.created_at))
            .then(a.id.cmp(&b.id))
    });
    recent.truncate(5);

    ExpenseReport {
        filter: filter.clone(),
        total_expenses,
        total_patients,
        average_per_patient: total_expenses.div_round(total_patients),
        dental_percentage: percentage(dental, total_expenses),
        top_categories: by_category.iter().take(3).cloned().collect(),
        by_category,
        monthly,
        recent,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    fn expense(kind: ExpenseType, minor: i64, days_ago: i64, category: Option<&str>) -> Expense {
        let date = now() - Duration::days(days_ago);
        Expense {
            id: Uuid::new_v4(),
            expense_type: kind,
            description: "item".to_string(),
            amount: Money::new(minor),
            date,
            category: category.map(ToString::to_string),
            created_at: date,
            updated_at: date,
        }
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense(ExpenseType::Rent, 2_000_000, 2, None),
            expense(ExpenseType::Materials, 350_050, 10, Some("Dental")),
            expense(ExpenseType::Materials, 149_950, 40, Some("dental")),
            expense(ExpenseType::Utilities, 80_000, 200, Some("Office")),
            expense(ExpenseType::Rent, 2_000_000, 400, None),
        ]
    }

    #[test]
    fn grouped_sums_add_up_to_total() {
        let expenses = sample();
        let groups = sum_by_key(&expenses, |e| e.expense_type, |e| e.amount);
        let grouped: Money = groups.values().sum();

        assert_eq!(grouped, total(&expenses, |e| e.amount));
        assert_eq!(groups[&ExpenseType::Rent], Money::new(4_000_000));
    }

    #[test]
    fn percentage_of_zero_total_is_zero() {
        assert_eq!(percentage(Money::new(100), Money::ZERO), 0.0);
        assert_eq!(percentage(Money::new(25), Money::new(100)), 25.0);
    }

    #[test]
    fn months_are_zero_based() {
        let dates = [
            Utc.with_ymd_and_hms(2025, 1, 31, 23, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 12, 5, 0, 0, 0).unwrap(),
        ];
        let buckets = count_by_month(dates);
        assert_eq!(buckets[0], 2);
        assert_eq!(buckets[11], 1);
        assert_eq!(buckets.iter().sum::<u64>(), 3);
    }

    #[test]
    fn time_ranges() {
        let expenses = sample();
        let count = |range| {
            ExpenseFilter { range, search: None }
                .apply(&expenses, now())
                .len()
        };
        assert_eq!(count(TimeRange::All), 5);
        assert_eq!(count(TimeRange::Week), 1);
        assert_eq!(count(TimeRange::Month), 2);
        assert_eq!(count(TimeRange::Year), 4);
    }

    #[test]
    fn search_matches_type_or_category() {
        let expenses = sample();
        let filter = |term: &str| ExpenseFilter {
            range: TimeRange::All,
            search: Some(term.to_string()),
        };
        assert_eq!(filter("DENT").apply(&expenses, now()).len(), 2);
        assert_eq!(filter("rent").apply(&expenses, now()).len(), 2);
        assert_eq!(filter("  ").apply(&expenses, now()).len(), 5);
    }

    #[test]
    fn expense_report_figures() {
        let report = expense_report(&sample(), 4, &ExpenseFilter::default(), now());

        assert_eq!(report.total_expenses, Money::new(4_580_000));
        assert_eq!(report.average_per_patient, Money::new(1_145_000));
        assert_eq!(report.by_category[0].category, "General");
        assert_eq!(report.by_category[0].amount, Money::new(4_000_000));
        // "Dental" and "dental" are distinct categories but both count as dental.
        assert_eq!(report.by_category.len(), 4);
        let expected = 500_000.0 / 4_580_000.0 * 100.0;
        assert!((report.dental_percentage - expected).abs() < 1e-9);
        assert_eq!(report.top_categories.len(), 3);
        assert_eq!(report.recent.len(), 5);
        assert_eq!(report.recent[0].amount, Money::new(2_000_000));
        assert!(report.monthly.windows(2).all(|w| w[0].month < w[1].month));
        let monthly_total: Money = report.monthly.iter().map(|m| m.amount).sum();
        assert_eq!(monthly_total, report.total_expenses);
    }

    #[test]
    fn report_without_patients_or_expenses() {
        let report = expense_report(&[], 0, &ExpenseFilter::default(), now());
        assert_eq!(report.average_per_patient, Money::ZERO);
        assert_eq!(report.dental_percentage, 0.0);
        assert!(report.monthly.is_empty());
    }

    #[test]
    fn overview_lists_every_type() {
        let report = overview(&[], &[], &sample(), Money::new(50_000));
        assert_eq!(report.expenses_by_type.len(), ExpenseType::ALL.len());
        assert_eq!(report.total_earnings, Money::ZERO);
        assert_eq!(report.net_profit, Money::new(-4_580_000));
        assert_eq!(
            report.expenses_by_category,
            vec![
                ("Dental".to_string(), Money::new(350_050)),
                ("General".to_string(), Money::new(4_000_000)),
                ("Office".to_string(), Money::new(80_000)),
                ("dental".to_string(), Money::new(149_950)),
            ]
        );
    }

    #[test]
    fn recent_breaks_date_ties_by_latest_entry() {
        let mut expenses: Vec<Expense> = (0..7)
            .map(|i| {
                let mut e = expense(ExpenseType::Materials, 1_000 + i, 3, None);
                e.created_at = now() - Duration::minutes(60 - i);
                e
            })
            .collect();
        expenses.reverse();
        let mut shuffled = expenses.clone();
        shuffled.rotate_left(3);

        let first = expense_report(&expenses, 1, &ExpenseFilter::default(), now());
        let second = expense_report(&shuffled, 1, &ExpenseFilter::default(), now());

        let amounts: Vec<i64> = first.recent.iter().map(|e| e.amount.minor()).collect();
        assert_eq!(amounts, vec![1_006, 1_005, 1_004, 1_003, 1_002]);
        assert_eq!(first.recent, second.recent);
    }
}
