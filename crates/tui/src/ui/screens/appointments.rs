use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Span,
    widgets::{Cell, Paragraph, Row},
};

use engine::AppointmentStatus;

use crate::{
    app::{AppState, patient_label},
    ui::{
        screens::{pager_line, render_table},
        theme::Theme,
    },
};

fn status_style(status: &str, theme: &Theme) -> Style {
    let color = match AppointmentStatus::try_from(status) {
        Ok(AppointmentStatus::Pending) => theme.warning,
        Ok(AppointmentStatus::Confirmed) => theme.accent,
        Ok(AppointmentStatus::Completed) => theme.positive,
        Ok(AppointmentStatus::Cancelled) => theme.error,
        Err(_) => theme.dim,
    };
    Style::default().fg(color)
}

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let appointments = &state.appointments;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let page = appointments.page(state.page_size);
    let rows: Vec<Row<'static>> = page
        .items
        .iter()
        .map(|a| {
            let name = patient_label(a);
            let name_style = if a.patient_name.is_some() {
                Style::default().fg(theme.text)
            } else {
                Style::default().fg(theme.dim)
            };
            Row::new(vec![
                Cell::from(Span::styled(name.to_string(), name_style)),
                Cell::from(
                    a.date
                        .with_timezone(&state.tz)
                        .format("%d %b %Y %H:%M")
                        .to_string(),
                ),
                Cell::from(a.treatment.clone()),
                Cell::from(Span::styled(a.status.clone(), status_style(&a.status, theme))),
            ])
        })
        .collect();

    let title = format!("Appointments ({})", page.total_items);
    render_table(
        frame,
        layout[0],
        &title,
        &["Patient", "Date", "Treatment", "Status"],
        rows,
        &[
            Constraint::Percentage(30),
            Constraint::Length(18),
            Constraint::Percentage(30),
            Constraint::Min(10),
        ],
        appointments.pager.selected,
        theme,
    );
    frame.render_widget(
        Paragraph::new(pager_line(page.page, page.total_pages, theme)),
        layout[1],
    );
}
