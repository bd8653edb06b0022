mod pages;

use std::{
    path::Path,
    time::{Duration, Instant},
};

use api_types::appointment::AppointmentNew;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use crossterm::event::{self, Event, KeyEvent};
use engine::{AppointmentStatus, export::ExportFormat};
use uuid::Uuid;

use crate::{
    client::{Client, ClientError, ExportKind},
    config::AppConfig,
    error::{AppError, Result},
    forms::{Form, FormKind},
    notify::{Notifier, ToastQueue},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

pub use pages::{
    AppointmentsState, ExpensesState, OverviewState, PageId, PatientsState, ReportsState,
    patient_label,
};

#[derive(Debug)]
pub struct AppState {
    pub page: PageId,
    pub overview: OverviewState,
    pub patients: PatientsState,
    pub expenses: ExpensesState,
    pub appointments: AppointmentsState,
    pub reports: ReportsState,
    pub toasts: ToastQueue,
    pub help: bool,
    pub last_refresh: Option<DateTime<Tz>>,
    /// False after a request failed to reach the server.
    pub connected: bool,
    pub today: NaiveDate,
    pub tz: Tz,
    pub page_size: usize,
    pub base_url: String,
}

impl AppState {
    fn new(config: &AppConfig, tz: Tz) -> Self {
        Self {
            page: PageId::Overview,
            overview: OverviewState::default(),
            patients: PatientsState::default(),
            expenses: ExpensesState::default(),
            appointments: AppointmentsState::default(),
            reports: ReportsState::default(),
            toasts: ToastQueue::default(),
            help: false,
            last_refresh: None,
            connected: true,
            today: Utc::now().with_timezone(&tz).date_naive(),
            tz,
            page_size: config.page_size,
            base_url: config.base_url.clone(),
        }
    }

    pub fn form(&self) -> Option<&Form> {
        match self.page {
            PageId::Patients => self.patients.form.as_ref(),
            PageId::Expenses => self.expenses.form.as_ref(),
            PageId::Appointments => self.appointments.form.as_ref(),
            PageId::Overview | PageId::Reports => None,
        }
    }

    fn form_slot(&mut self) -> Option<&mut Option<Form>> {
        match self.page {
            PageId::Patients => Some(&mut self.patients.form),
            PageId::Expenses => Some(&mut self.expenses.form),
            PageId::Appointments => Some(&mut self.appointments.form),
            PageId::Overview | PageId::Reports => None,
        }
    }

    pub fn pending_delete(&self) -> Option<Uuid> {
        match self.page {
            PageId::Patients => self.patients.pending_delete,
            PageId::Expenses => self.expenses.pending_delete,
            PageId::Appointments => self.appointments.pending_delete,
            PageId::Overview | PageId::Reports => None,
        }
    }

    fn delete_slot(&mut self) -> Option<&mut Option<Uuid>> {
        match self.page {
            PageId::Patients => Some(&mut self.patients.pending_delete),
            PageId::Expenses => Some(&mut self.expenses.pending_delete),
            PageId::Appointments => Some(&mut self.appointments.pending_delete),
            PageId::Overview | PageId::Reports => None,
        }
    }

    /// Rows visible on the current page of the active table.
    fn rows_on_page(&self) -> usize {
        match self.page {
            PageId::Patients => self.patients.page(self.page_size).items.len(),
            PageId::Expenses => self.expenses.page(self.page_size).items.len(),
            PageId::Appointments => self.appointments.page(self.page_size).items.len(),
            PageId::Overview | PageId::Reports => 0,
        }
    }

    fn pager_mut(&mut self) -> Option<(&mut pages::Pager, usize)> {
        match self.page {
            PageId::Patients => Some((&mut self.patients.pager, self.patients.items.len())),
            PageId::Expenses => {
                let len = self.expenses.filtered().len();
                Some((&mut self.expenses.pager, len))
            }
            PageId::Appointments => Some((
                &mut self.appointments.pager,
                self.appointments.items.len(),
            )),
            PageId::Overview | PageId::Reports => None,
        }
    }

    fn selected_id(&self) -> Option<Uuid> {
        let size = self.page_size;
        match self.page {
            PageId::Patients => self.patients.selected(size).map(|p| p.id),
            PageId::Expenses => self.expenses.selected(size).map(|e| e.id),
            PageId::Appointments => self.appointments.selected(size).map(|a| a.id),
            PageId::Overview | PageId::Reports => None,
        }
    }
}

/// Why a form could not be saved.
enum SaveError {
    Invalid(String),
    Client(ClientError),
}

async fn write_export(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(dir).await?;
    }
    tokio::fs::write(path, bytes).await
}

pub struct App {
    config: AppConfig,
    client: Client,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config.base_url)?;
        let tz = config.tz()?;
        let state = AppState::new(&config, tz);

        Ok(Self {
            config,
            client,
            state,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        self.refresh().await;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            self.state.toasts.tick(Instant::now());
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key).await,
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        let action = map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }

        if self.state.help {
            if matches!(action, AppAction::Cancel | AppAction::Input('?')) {
                self.state.help = false;
            }
            return;
        }

        if self.state.pending_delete().is_some() {
            match action {
                AppAction::Submit | AppAction::Input('y' | 'Y') => self.confirm_delete().await,
                AppAction::Cancel | AppAction::Input('n' | 'N') => {
                    if let Some(slot) = self.state.delete_slot() {
                        *slot = None;
                    }
                }
                _ => {}
            }
            return;
        }

        if self.state.form().is_some() {
            self.handle_form_key(action).await;
            return;
        }

        if self.state.page == PageId::Reports && self.state.reports.editing_search {
            self.handle_search_key(action).await;
            return;
        }

        match action {
            AppAction::Cancel => self.state.toasts.dismiss(),
            AppAction::Up => self.select(false),
            AppAction::Down => self.select(true),
            AppAction::Left => self.turn_page(false),
            AppAction::Right => self.turn_page(true),
            AppAction::Submit => {
                if self.state.page == PageId::Patients {
                    self.state.patients.show_profile = !self.state.patients.show_profile;
                }
            }
            AppAction::Input(ch) => self.handle_char(ch).await,
            _ => {}
        }
    }

    async fn handle_char(&mut self, ch: char) {
        if let Some(page) = PageId::from_shortcut(ch) {
            self.state.page = page;
            self.refresh().await;
            return;
        }

        match ch {
            'q' | 'Q' => self.should_quit = true,
            '?' => self.state.help = true,
            'r' | 'R' => self.refresh().await,
            'j' => self.select(true),
            'k' => self.select(false),
            'n' => self.turn_page(true),
            'p' => self.turn_page(false),
            _ => self.handle_page_char(ch).await,
        }
    }

    async fn handle_page_char(&mut self, ch: char) {
        let tz = self.state.tz;
        let size = self.state.page_size;
        match (self.state.page, ch) {
            (PageId::Overview, 'x') => self.export(ExportKind::Overview, ExportFormat::Pdf).await,
            (PageId::Overview, 'w') => self.export(ExportKind::Overview, ExportFormat::Docx).await,
            (PageId::Expenses, 'x') => self.export(ExportKind::Expenses, ExportFormat::Pdf).await,
            (PageId::Expenses, 'w') => self.export(ExportKind::Expenses, ExportFormat::Docx).await,
            (PageId::Expenses, 'f') => self.state.expenses.cycle_filter(),
            (PageId::Patients, 'v') => {
                self.state.patients.show_profile = !self.state.patients.show_profile;
            }
            (PageId::Patients, 'a') => {
                self.state.patients.form = Some(Form::new_patient(self.state.today));
            }
            (PageId::Expenses, 'a') => {
                self.state.expenses.form = Some(Form::new_expense(self.state.today));
            }
            (PageId::Appointments, 'a') => {
                let now = Utc::now().with_timezone(&tz);
                self.state.appointments.form =
                    Some(Form::new_appointment(&self.state.appointments.patients, now));
            }
            (PageId::Patients, 'e') => {
                let form = self
                    .state
                    .patients
                    .selected(size)
                    .map(|p| Form::edit_patient(p, tz));
                self.state.patients.form = form;
            }
            (PageId::Expenses, 'e') => {
                let form = self
                    .state
                    .expenses
                    .selected(size)
                    .map(|e| Form::edit_expense(e, tz));
                self.state.expenses.form = form;
            }
            (PageId::Appointments, 'e') => {
                let appointments = &self.state.appointments;
                let form = appointments
                    .selected(size)
                    .map(|a| Form::edit_appointment(a, &appointments.patients, tz));
                self.state.appointments.form = form;
            }
            (PageId::Patients | PageId::Expenses | PageId::Appointments, 'd') => {
                let id = self.state.selected_id();
                if let (Some(id), Some(slot)) = (id, self.state.delete_slot()) {
                    *slot = Some(id);
                }
            }
            (PageId::Appointments, 's') => self.cycle_status().await,
            (PageId::Reports, 't') => {
                self.state.reports.cycle_range();
                self.refresh().await;
            }
            (PageId::Reports, '/') => self.state.reports.editing_search = true,
            (PageId::Reports, 'c') => {
                self.state.reports.search.clear();
                self.refresh().await;
            }
            _ => {}
        }
    }

    async fn handle_form_key(&mut self, action: AppAction) {
        if action == AppAction::Submit {
            self.submit_form().await;
            return;
        }
        let Some(slot) = self.state.form_slot() else {
            return;
        };
        if action == AppAction::Cancel {
            *slot = None;
            return;
        }
        let Some(form) = slot.as_mut() else {
            return;
        };
        match action {
            AppAction::NextField | AppAction::Down => form.next_field(),
            AppAction::PrevField | AppAction::Up => form.prev_field(),
            AppAction::Left => form.cycle(false),
            AppAction::Right => form.cycle(true),
            AppAction::Backspace => form.backspace(),
            AppAction::Input(ch) => form.input(ch),
            _ => {}
        }
    }

    async fn handle_search_key(&mut self, action: AppAction) {
        let reports = &mut self.state.reports;
        match action {
            AppAction::Input(ch) => reports.search.push(ch),
            AppAction::Backspace => {
                reports.search.pop();
            }
            AppAction::Submit => {
                reports.editing_search = false;
                self.refresh().await;
            }
            AppAction::Cancel => reports.editing_search = false,
            _ => {}
        }
    }

    fn select(&mut self, down: bool) {
        let rows = self.state.rows_on_page();
        if let Some((pager, _)) = self.state.pager_mut() {
            if down {
                pager.select_next(rows);
            } else {
                pager.select_prev();
            }
        }
    }

    fn turn_page(&mut self, forward: bool) {
        let size = self.state.page_size;
        if let Some((pager, len)) = self.state.pager_mut() {
            if forward {
                pager.next_page(len, size);
            } else {
                pager.prev_page();
            }
        }
    }

    /// Reports a failed request and remembers whether the server is reachable.
    fn fail(&mut self, err: ClientError) {
        if matches!(err, ClientError::Transport(_)) {
            self.state.connected = false;
        }
        self.state.toasts.error(&err.message());
    }

    /// Re-fetches whatever the current page shows.
    async fn refresh(&mut self) {
        let now = Utc::now().with_timezone(&self.state.tz);
        self.state.today = now.date_naive();
        match self.load_page(self.state.page).await {
            Ok(()) => {
                self.state.connected = true;
                self.state.last_refresh = Some(now);
            }
            Err(err) => self.fail(err),
        }
    }

    async fn load_page(&mut self, page: PageId) -> std::result::Result<(), ClientError> {
        let size = self.state.page_size;
        match page {
            PageId::Overview => {
                self.state.overview.report = Some(self.client.overview().await?);
            }
            PageId::Patients => {
                let items = self.client.patients().await?;
                self.state.patients.set_items(items, size);
            }
            PageId::Expenses => {
                let items = self.client.expenses().await?;
                self.state.expenses.set_items(items, size);
            }
            PageId::Appointments => {
                let items = self.client.appointments().await?;
                let patients = self.client.patients().await?;
                self.state.appointments.patients = patients;
                self.state.appointments.set_items(items, size);
            }
            PageId::Reports => {
                let reports = &self.state.reports;
                let report = self
                    .client
                    .expense_report(reports.range.as_str(), &reports.search)
                    .await?;
                self.state.reports.report = Some(report);
            }
        }
        Ok(())
    }

    async fn save(&self, form: &Form) -> std::result::Result<&'static str, SaveError> {
        let tz = self.state.tz;
        match form.kind {
            FormKind::Patient => {
                let upload = form.patient_upload(tz).map_err(SaveError::Invalid)?;
                match form.target {
                    Some(id) => self.client.update_patient(id, upload).await,
                    None => self.client.create_patient(upload).await,
                }
                .map_err(SaveError::Client)?;
                Ok("Patient")
            }
            FormKind::Expense => {
                let payload = form.expense_payload(tz).map_err(SaveError::Invalid)?;
                match form.target {
                    Some(id) => self.client.update_expense(id, &payload).await,
                    None => self.client.create_expense(&payload).await,
                }
                .map_err(SaveError::Client)?;
                Ok("Expense")
            }
            FormKind::Appointment => {
                let payload = form.appointment_payload(tz).map_err(SaveError::Invalid)?;
                match form.target {
                    Some(id) => self.client.update_appointment(id, &payload).await,
                    None => self.client.create_appointment(&payload).await,
                }
                .map_err(SaveError::Client)?;
                Ok("Appointment")
            }
        }
    }

    /// Saves the open form; it stays open when the save fails.
    async fn submit_form(&mut self) {
        let Some(form) = self.state.form_slot().and_then(Option::take) else {
            return;
        };
        match self.save(&form).await {
            Ok(noun) => {
                let verb = if form.target.is_some() { "updated" } else { "added" };
                self.state.toasts.success(&format!("{noun} {verb}"));
                self.refresh().await;
            }
            Err(err) => {
                match err {
                    SaveError::Invalid(message) => self.state.toasts.error(&message),
                    SaveError::Client(err) => self.fail(err),
                }
                if let Some(slot) = self.state.form_slot() {
                    *slot = Some(form);
                }
            }
        }
    }

    async fn confirm_delete(&mut self) {
        let Some(id) = self.state.delete_slot().and_then(Option::take) else {
            return;
        };
        let result = match self.state.page {
            PageId::Patients => self.client.delete_patient(id).await,
            PageId::Expenses => self.client.delete_expense(id).await,
            PageId::Appointments => self.client.delete_appointment(id).await,
            PageId::Overview | PageId::Reports => return,
        };
        match result {
            Ok(message) => {
                self.state.toasts.success(&message.message);
                self.refresh().await;
            }
            Err(err) => self.fail(err),
        }
    }

    /// Moves the highlighted appointment to the next status.
    async fn cycle_status(&mut self) {
        let Some(appointment) = self.state.appointments.selected(self.state.page_size) else {
            return;
        };
        let status = AppointmentStatus::try_from(appointment.status.as_str())
            .unwrap_or_default()
            .next();
        let id = appointment.id;
        let payload = AppointmentNew {
            patient_id: appointment.patient_id,
            date: appointment.date.fixed_offset(),
            treatment: appointment.treatment.clone(),
            status: Some(status.as_str().to_string()),
        };
        match self.client.update_appointment(id, &payload).await {
            Ok(_) => {
                self.state.toasts.success(&format!("Status set to {status}"));
                self.refresh().await;
            }
            Err(err) => self.fail(err),
        }
    }

    async fn export(&mut self, kind: ExportKind, format: ExportFormat) {
        let expense_type = match kind {
            ExportKind::Expenses => self.state.expenses.type_filter.map(|t| t.as_str()),
            ExportKind::Overview => None,
        };
        self.state.toasts.info("Generating report...");
        match self.client.export(kind, format, expense_type).await {
            Ok(bytes) => {
                let path = self.config.export_dir.join(kind.file_name(format));
                match write_export(&path, &bytes).await {
                    Ok(()) => self
                        .state
                        .toasts
                        .success(&format!("Saved {}", path.display())),
                    Err(err) => self
                        .state
                        .toasts
                        .error(&format!("Cannot save {}: {err}", path.display())),
                }
            }
            Err(err) => self.fail(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn export_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir
            .path()
            .join("reports")
            .join(ExportKind::Overview.file_name(ExportFormat::Pdf));
        write_export(&path, b"%PDF-1.3").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.3");
    }

    #[test]
    fn form_and_delete_slots_follow_the_page() {
        let config = AppConfig::default();
        let mut state = AppState::new(&config, chrono_tz::UTC);
        assert!(state.form_slot().is_none());

        state.page = PageId::Expenses;
        let today = state.today;
        if let Some(slot) = state.form_slot() {
            *slot = Some(Form::new_expense(today));
        }
        assert_eq!(state.form().map(|f| f.kind), Some(FormKind::Expense));

        state.page = PageId::Patients;
        assert!(state.form().is_none());
        let id = Uuid::new_v4();
        if let Some(slot) = state.delete_slot() {
            *slot = Some(id);
        }
        assert_eq!(state.pending_delete(), Some(id));
        assert_eq!(state.expenses.pending_delete, None);
    }
}
