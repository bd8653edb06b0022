use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
};

use engine::{Money, reports::month_label};

use crate::{
    app::AppState,
    ui::{
        components::{
            card::{Card, StatCard},
            charts::{render_bar_chart, render_bar_list},
            money::profit_style,
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(report) = state.overview.report.as_ref() else {
        Card::new("Overview", theme).render_lines(
            frame,
            area,
            vec![Line::styled("Loading...", Style::default().fg(theme.dim))],
        );
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // Summary cards
            Constraint::Min(10),    // Charts
            Constraint::Length(8),  // Categories
        ])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(layout[0]);
    StatCard::new("Total Patients", report.total_patients.to_string(), theme)
        .render(frame, cards[0]);
    StatCard::new("Appointments", report.total_appointments.to_string(), theme)
        .render(frame, cards[1]);
    StatCard::new(
        "Total Earnings",
        Money::new(report.total_earnings_minor).to_string(),
        theme,
    )
    .value_style(Style::default().fg(theme.positive))
    .render(frame, cards[2]);
    StatCard::new(
        "Total Expenses",
        Money::new(report.total_expenses_minor).to_string(),
        theme,
    )
    .value_style(Style::default().fg(theme.negative))
    .render(frame, cards[3]);
    StatCard::new(
        "Net Profit",
        Money::new(report.net_profit_minor).to_string(),
        theme,
    )
    .value_style(profit_style(report.net_profit_minor, theme))
    .render(frame, cards[4]);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(layout[1]);

    let months: Vec<(String, u64)> = report
        .appointments_by_month
        .iter()
        .enumerate()
        .map(|(i, count)| (month_label(i).to_string(), *count))
        .collect();
    render_bar_chart(frame, charts[0], "Appointments per Month", &months, theme);

    let by_type: Vec<(String, u64, String)> = report
        .expenses_by_type
        .iter()
        .map(|row| {
            (
                row.key.clone(),
                row.amount_minor.max(0).unsigned_abs(),
                Money::new(row.amount_minor).to_string(),
            )
        })
        .collect();
    render_bar_list(frame, charts[1], "Expenses by Type", &by_type, theme);

    let by_category: Vec<(String, u64, String)> = report
        .expenses_by_category
        .iter()
        .map(|row| {
            (
                row.key.clone(),
                row.amount_minor.max(0).unsigned_abs(),
                Money::new(row.amount_minor).to_string(),
            )
        })
        .collect();
    render_bar_list(frame, layout[2], "Expenses by Category", &by_category, theme);
}
