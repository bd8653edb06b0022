//! Per-page state containers.
//!
//! Each page owns the records it loaded, the selection, the current page
//! number and whatever form or delete confirmation is open on it.

use api_types::{
    appointment::AppointmentView,
    expense::ExpenseView,
    patient::PatientView,
    report::{ExpenseReport, OverviewReport},
};
use engine::{
    ExpenseType, Money,
    pagination::{Page, paginate, total_pages},
    reports::{TimeRange, sum_by_key},
};
use uuid::Uuid;

use crate::forms::Form;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageId {
    Overview,
    Patients,
    Expenses,
    Appointments,
    Reports,
}

impl PageId {
    pub const ALL: [PageId; 5] = [
        Self::Overview,
        Self::Patients,
        Self::Expenses,
        Self::Appointments,
        Self::Reports,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Patients => "Patients",
            Self::Expenses => "Expenses",
            Self::Appointments => "Appointments",
            Self::Reports => "Reports",
        }
    }

    /// Digit that switches to the page.
    pub fn shortcut(self) -> char {
        match self {
            Self::Overview => '1',
            Self::Patients => '2',
            Self::Expenses => '3',
            Self::Appointments => '4',
            Self::Reports => '5',
        }
    }

    pub fn from_shortcut(ch: char) -> Option<Self> {
        Self::ALL.into_iter().find(|page| page.shortcut() == ch)
    }
}

/// Current page and highlighted row of a paginated table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    /// 1-based.
    pub page: usize,
    /// Row index within the current page.
    pub selected: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            page: 1,
            selected: 0,
        }
    }
}

impl Pager {
    pub fn next_page(&mut self, total_items: usize, page_size: usize) {
        if self.page < total_pages(total_items, page_size) {
            self.page += 1;
            self.selected = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
            self.selected = 0;
        }
    }

    pub fn select_next(&mut self, rows_on_page: usize) {
        if rows_on_page > 0 {
            self.selected = (self.selected + 1).min(rows_on_page - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keeps page and selection inside the list after it shrank.
    pub fn clamp(&mut self, total_items: usize, page_size: usize) {
        let pages = total_pages(total_items, page_size).max(1);
        self.page = self.page.clamp(1, pages);
        let rows = paginate_len(total_items, self.page, page_size);
        self.selected = self.selected.min(rows.saturating_sub(1));
    }

    /// Position of the highlighted row in the full list.
    pub fn index(&self, page_size: usize) -> usize {
        (self.page - 1) * page_size + self.selected
    }
}

fn paginate_len(total_items: usize, page: usize, page_size: usize) -> usize {
    let start = (page - 1) * page_size;
    total_items.saturating_sub(start).min(page_size)
}

#[derive(Debug, Default)]
pub struct OverviewState {
    pub report: Option<OverviewReport>,
}

#[derive(Debug, Default)]
pub struct PatientsState {
    pub items: Vec<PatientView>,
    pub pager: Pager,
    pub show_profile: bool,
    pub form: Option<Form>,
    pub pending_delete: Option<Uuid>,
}

impl PatientsState {
    pub fn page(&self, page_size: usize) -> Page<'_, PatientView> {
        paginate(&self.items, self.pager.page, page_size)
    }

    pub fn selected(&self, page_size: usize) -> Option<&PatientView> {
        self.items.get(self.pager.index(page_size))
    }

    pub fn set_items(&mut self, items: Vec<PatientView>, page_size: usize) {
        self.items = items;
        self.pager.clamp(self.items.len(), page_size);
    }
}

#[derive(Debug, Default)]
pub struct ExpensesState {
    pub items: Vec<ExpenseView>,
    /// `None` shows every type.
    pub type_filter: Option<ExpenseType>,
    pub pager: Pager,
    pub form: Option<Form>,
    pub pending_delete: Option<Uuid>,
}

impl ExpensesState {
    pub fn filtered(&self) -> Vec<&ExpenseView> {
        self.items
            .iter()
            .filter(|e| match self.type_filter {
                None => true,
                Some(t) => ExpenseType::try_from(e.expense_type.as_str()).ok() == Some(t),
            })
            .collect()
    }

    pub fn page(&self, page_size: usize) -> Page<'_, ExpenseView> {
        let filtered = self.filtered();
        let page = paginate(&filtered, self.pager.page, page_size);
        Page {
            items: page.items.into_iter().copied().collect(),
            page: page.page,
            total_pages: page.total_pages,
            total_items: page.total_items,
        }
    }

    pub fn selected(&self, page_size: usize) -> Option<&ExpenseView> {
        self.filtered().get(self.pager.index(page_size)).copied()
    }

    /// Totals per type over the whole list, every type listed.
    pub fn totals_by_type(&self) -> Vec<(ExpenseType, Money)> {
        let sums = sum_by_key(
            &self.items,
            |e| ExpenseType::try_from(e.expense_type.as_str()).ok(),
            |e| Money::new(e.amount_minor),
        );
        ExpenseType::ALL
            .iter()
            .map(|t| (*t, sums.get(&Some(*t)).copied().unwrap_or_default()))
            .collect()
    }

    /// Steps through "all types" followed by each type.
    pub fn cycle_filter(&mut self) {
        self.type_filter = match self.type_filter {
            None => ExpenseType::ALL.first().copied(),
            Some(current) => ExpenseType::ALL
                .iter()
                .skip_while(|t| **t != current)
                .nth(1)
                .copied(),
        };
        self.pager = Pager::default();
    }

    pub fn set_items(&mut self, items: Vec<ExpenseView>, page_size: usize) {
        self.items = items;
        let len = self.filtered().len();
        self.pager.clamp(len, page_size);
    }
}

#[derive(Debug, Default)]
pub struct AppointmentsState {
    pub items: Vec<AppointmentView>,
    /// Loaded alongside to offer patient choices in the form.
    pub patients: Vec<PatientView>,
    pub pager: Pager,
    pub form: Option<Form>,
    pub pending_delete: Option<Uuid>,
}

impl AppointmentsState {
    pub fn page(&self, page_size: usize) -> Page<'_, AppointmentView> {
        paginate(&self.items, self.pager.page, page_size)
    }

    pub fn selected(&self, page_size: usize) -> Option<&AppointmentView> {
        self.items.get(self.pager.index(page_size))
    }

    pub fn set_items(&mut self, items: Vec<AppointmentView>, page_size: usize) {
        self.items = items;
        self.pager.clamp(self.items.len(), page_size);
    }
}

/// Name shown for an appointment whose patient may have been deleted.
pub fn patient_label(appointment: &AppointmentView) -> &str {
    appointment.patient_name.as_deref().unwrap_or("Unknown")
}

#[derive(Debug)]
pub struct ReportsState {
    pub report: Option<ExpenseReport>,
    pub range: TimeRange,
    pub search: String,
    pub editing_search: bool,
}

impl Default for ReportsState {
    fn default() -> Self {
        Self {
            report: None,
            range: TimeRange::Month,
            search: String::new(),
            editing_search: false,
        }
    }
}

impl ReportsState {
    pub fn cycle_range(&mut self) {
        let all = TimeRange::ALL;
        let index = all.iter().position(|r| *r == self.range).unwrap_or(0);
        self.range = all[(index + 1) % all.len()];
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn expense(expense_type: &str, amount_minor: i64) -> ExpenseView {
        let now = Utc::now();
        ExpenseView {
            id: Uuid::new_v4(),
            expense_type: expense_type.to_string(),
            description: "supplies".to_string(),
            amount_minor,
            date: now,
            category: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn pager_stays_inside_the_list() {
        let mut pager = Pager::default();
        pager.next_page(25, 10);
        pager.next_page(25, 10);
        pager.next_page(25, 10);
        assert_eq!(pager.page, 3);

        pager.select_next(3);
        pager.select_next(3);
        pager.select_next(3);
        assert_eq!(pager.selected, 2);
        assert_eq!(pager.index(10), 22);

        pager.clamp(21, 10);
        assert_eq!((pager.page, pager.selected), (3, 0));
        pager.clamp(0, 10);
        assert_eq!((pager.page, pager.selected), (1, 0));

        pager.prev_page();
        assert_eq!(pager.page, 1);
    }

    #[test]
    fn expense_filter_cycles_through_all_types() {
        let mut state = ExpensesState::default();
        state.cycle_filter();
        assert_eq!(state.type_filter, Some(ExpenseType::Groceries));
        for _ in 1..ExpenseType::ALL.len() {
            state.cycle_filter();
        }
        assert_eq!(state.type_filter, Some(ExpenseType::CosmeticDentistry));
        state.cycle_filter();
        assert_eq!(state.type_filter, None);
    }

    #[test]
    fn filtered_page_and_totals() {
        let mut state = ExpensesState::default();
        state.set_items(
            vec![
                expense("Rent", 2_000_000),
                expense("Materials", 45_000),
                expense("materials", 5_000),
            ],
            2,
        );

        state.type_filter = Some(ExpenseType::Materials);
        let page = state.page(2);
        assert_eq!(page.total_items, 2);
        assert_eq!(page.items.len(), 2);
        assert_eq!(state.selected(2).unwrap().amount_minor, 45_000);

        let totals = state.totals_by_type();
        assert_eq!(totals.len(), ExpenseType::ALL.len());
        assert!(totals.contains(&(ExpenseType::Materials, Money::new(50_000))));
        assert!(totals.contains(&(ExpenseType::Groceries, Money::ZERO)));
        let sum: Money = totals.iter().map(|(_, m)| *m).sum();
        assert_eq!(sum, Money::new(2_050_000));
    }

    #[test]
    fn dangling_appointment_shows_unknown() {
        let view = AppointmentView {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            patient_name: None,
            date: Utc::now(),
            treatment: "Dental Surgery".to_string(),
            status: "Pending".to_string(),
        };
        assert_eq!(patient_label(&view), "Unknown");
    }

    #[test]
    fn reports_range_starts_at_month_and_wraps() {
        let mut state = ReportsState::default();
        assert_eq!(state.range, TimeRange::Month);
        state.cycle_range();
        assert_eq!(state.range, TimeRange::Year);
        state.cycle_range();
        assert_eq!(state.range, TimeRange::All);
    }

    #[test]
    fn page_shortcuts() {
        assert_eq!(PageId::from_shortcut('4'), Some(PageId::Appointments));
        assert_eq!(PageId::from_shortcut('9'), None);
    }
}
