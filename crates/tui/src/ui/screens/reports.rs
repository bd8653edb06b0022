use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use api_types::report::{CategoryShare, ExpenseReport};
use engine::Money;

use crate::{
    app::AppState,
    ui::{
        components::{
            card::{Card, StatCard},
            charts::{percentage_bar, render_bar_list},
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(9),
        ])
        .split(area);

    render_filter(frame, layout[0], state, theme);

    let Some(report) = state.reports.report.as_ref() else {
        Card::new("Reports", theme).render_lines(
            frame,
            layout[2],
            vec![Line::styled("Loading...", Style::default().fg(theme.dim))],
        );
        return;
    };

    render_cards(frame, layout[1], report, theme);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(layout[2]);
    render_categories(frame, middle[0], &report.by_category, theme);

    let monthly: Vec<(String, u64, String)> = report
        .monthly
        .iter()
        .map(|bucket| {
            (
                bucket.label.clone(),
                bucket.amount_minor.max(0).unsigned_abs(),
                format!("{} ({})", Money::new(bucket.amount_minor), bucket.count),
            )
        })
        .collect();
    render_bar_list(frame, middle[1], "Monthly Trend", &monthly, theme);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(layout[3]);
    render_top(frame, bottom[0], &report.top_categories, theme);
    render_recent(frame, bottom[1], report, state, theme);
}

fn render_filter(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let reports = &state.reports;
    let search = if reports.editing_search {
        format!("{}_", reports.search)
    } else if reports.search.is_empty() {
        "-".to_string()
    } else {
        reports.search.clone()
    };
    let search_style = if reports.editing_search {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    let line = Line::from(vec![
        Span::styled(" Range: ", Style::default().fg(theme.text_muted)),
        Span::styled(reports.range.as_str(), Style::default().fg(theme.accent)),
        Span::styled("   Search: ", Style::default().fg(theme.text_muted)),
        Span::styled(search, search_style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_cards(frame: &mut Frame<'_>, area: Rect, report: &ExpenseReport, theme: &Theme) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);
    StatCard::new(
        "Total Expenses",
        Money::new(report.total_expenses_minor).to_string(),
        theme,
    )
    .render(frame, cards[0]);
    StatCard::new("Patients", report.total_patients.to_string(), theme).render(frame, cards[1]);
    StatCard::new(
        "Avg per Patient",
        Money::new(report.average_per_patient_minor).to_string(),
        theme,
    )
    .render(frame, cards[2]);
    StatCard::new(
        "Dental Share",
        format!("{:.1}%", report.dental_percentage),
        theme,
    )
    .render(frame, cards[3]);
}

fn render_categories(frame: &mut Frame<'_>, area: Rect, shares: &[CategoryShare], theme: &Theme) {
    let card = Card::new("By Category", theme);
    let inner = card.inner(area);
    let name_width = shares.iter().map(|s| s.category.len()).max().unwrap_or(0);
    let bar_width = (inner.width as usize)
        .saturating_sub(name_width + 26)
        .clamp(4, 30);
    let lines: Vec<Line<'_>> = if shares.is_empty() {
        vec![Line::styled("No expenses in range", Style::default().fg(theme.dim))]
    } else {
        shares
            .iter()
            .map(|share| {
                Line::from(vec![
                    Span::styled(
                        format!("{:<name_width$} ", share.category),
                        Style::default().fg(theme.text_muted),
                    ),
                    Span::styled(
                        percentage_bar(share.percentage, bar_width),
                        Style::default().fg(theme.accent),
                    ),
                    Span::styled(
                        format!("  {}", Money::new(share.amount_minor)),
                        Style::default().fg(theme.text),
                    ),
                ])
            })
            .collect()
    };
    card.render_lines(frame, area, lines);
}

fn render_top(frame: &mut Frame<'_>, area: Rect, top: &[CategoryShare], theme: &Theme) {
    let lines: Vec<Line<'_>> = top
        .iter()
        .enumerate()
        .map(|(i, share)| {
            Line::from(vec![
                Span::styled(format!("{}. ", i + 1), Style::default().fg(theme.accent)),
                Span::styled(share.category.clone(), Style::default().fg(theme.text)),
                Span::styled(
                    format!("  {}  {:.1}%", Money::new(share.amount_minor), share.percentage),
                    Style::default().fg(theme.dim),
                ),
            ])
        })
        .collect();
    Card::new("Top Categories", theme).render_lines(frame, area, lines);
}

fn render_recent(
    frame: &mut Frame<'_>,
    area: Rect,
    report: &ExpenseReport,
    state: &AppState,
    theme: &Theme,
) {
    let lines: Vec<Line<'_>> = report
        .recent
        .iter()
        .map(|e| {
            Line::from(vec![
                Span::styled(
                    e.date.with_timezone(&state.tz).format("%d %b  ").to_string(),
                    Style::default().fg(theme.dim),
                ),
                Span::styled(
                    format!("{:<18}", e.expense_type),
                    Style::default().fg(theme.text_muted),
                ),
                Span::styled(
                    format!("{:>14}  ", Money::new(e.amount_minor).to_string()),
                    Style::default().fg(theme.text),
                ),
                Span::styled(e.description.clone(), Style::default().fg(theme.dim)),
            ])
        })
        .collect();
    Card::new("Recent Expenses", theme).render_lines(frame, area, lines);
}
