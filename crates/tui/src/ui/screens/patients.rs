use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row},
};

use api_types::patient::PatientView;
use engine::{
    Money,
    schedule::{ScheduleStatus, classify},
};

use crate::{
    app::AppState,
    ui::{
        components::card::Card,
        screens::{pager_line, render_table},
        theme::Theme,
    },
};

pub(crate) fn badge_style(status: ScheduleStatus, theme: &Theme) -> Style {
    let color = match status {
        ScheduleStatus::PastDue => theme.error,
        ScheduleStatus::Today => theme.warning,
        ScheduleStatus::ThisWeek => theme.accent,
        ScheduleStatus::Scheduled => theme.positive,
        ScheduleStatus::NoAppointment => theme.dim,
    };
    Style::default().fg(color)
}

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let patients = &state.patients;
    let (list_area, profile_area) = if patients.show_profile {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area);
        (cols[0], Some(cols[1]))
    } else {
        (area, None)
    };

    let rows_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(list_area);

    let page = patients.page(state.page_size);
    let rows: Vec<Row<'static>> = page
        .items
        .iter()
        .map(|p| {
            let status = classify(p.appointment_date, state.today, &state.tz);
            let next_visit = p
                .appointment_date
                .map(|d| d.with_timezone(&state.tz).format("%d %b %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            Row::new(vec![
                Cell::from(p.name.clone()),
                Cell::from(p.age.to_string()),
                Cell::from(p.gender.clone()),
                Cell::from(p.treatment.clone().unwrap_or_else(|| "N/A".to_string())),
                Cell::from(next_visit),
                Cell::from(Span::styled(status.label(), badge_style(status, theme))),
                Cell::from(Money::new(p.fees_minor).to_string()),
            ])
        })
        .collect();

    let title = format!("Patients ({})", page.total_items);
    render_table(
        frame,
        rows_area[0],
        &title,
        &["Name", "Age", "Gender", "Treatment", "Next visit", "Status", "Fees"],
        rows,
        &[
            Constraint::Percentage(22),
            Constraint::Length(4),
            Constraint::Length(7),
            Constraint::Percentage(18),
            Constraint::Length(13),
            Constraint::Length(15),
            Constraint::Min(10),
        ],
        patients.pager.selected,
        theme,
    );
    frame.render_widget(
        Paragraph::new(pager_line(page.page, page.total_pages, theme)),
        rows_area[1],
    );

    if let Some(profile_area) = profile_area {
        render_profile(frame, profile_area, state, theme);
    }
}

fn field_line(label: &'static str, value: String, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<12}"), Style::default().fg(theme.text_muted)),
        Span::styled(value, Style::default().fg(theme.text)),
    ])
}

fn profile_lines(patient: &PatientView, state: &AppState, theme: &Theme) -> Vec<Line<'static>> {
    let status = classify(patient.appointment_date, state.today, &state.tz);
    let image = patient
        .image
        .as_ref()
        .map(|name| format!("{}/uploads/{name}", state.base_url.trim_end_matches('/')))
        .unwrap_or_else(|| "No image".to_string());
    vec![
        Line::from(Span::styled(
            patient.name.clone(),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field_line(
            "Born",
            format!("{} ({} years)", patient.dob.format("%d %b %Y"), patient.age),
            theme,
        ),
        field_line("Gender", patient.gender.clone(), theme),
        field_line("Contact", patient.contact_details.clone(), theme),
        field_line("Address", patient.address.clone(), theme),
        field_line(
            "City",
            patient.city.clone().unwrap_or_else(|| "-".to_string()),
            theme,
        ),
        field_line(
            "Treatment",
            patient.treatment.clone().unwrap_or_else(|| "N/A".to_string()),
            theme,
        ),
        field_line("Fees", Money::new(patient.fees_minor).to_string(), theme),
        field_line(
            "Registered",
            patient.registered_date.format("%d %b %Y").to_string(),
            theme,
        ),
        Line::from(vec![
            Span::styled(format!("{:<12}", "Next visit"), Style::default().fg(theme.text_muted)),
            Span::styled(status.label(), badge_style(status, theme)),
        ]),
        field_line("Image", image, theme),
    ]
}

fn render_profile(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let lines = match state.patients.selected(state.page_size) {
        Some(patient) => profile_lines(patient, state, theme),
        None => vec![Line::styled("No patient selected", Style::default().fg(theme.dim))],
    };
    Card::new("Profile", theme).render_lines(frame, area, lines);
}
