use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row},
};

use engine::Money;

use crate::{
    app::AppState,
    ui::{
        components::charts::render_bar_list,
        screens::{pager_line, render_table},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let expenses = &state.expenses;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(cols[0]);

    let filter = expenses
        .type_filter
        .map_or("All types", |t| t.as_str());
    let filtered_total: Money = expenses
        .filtered()
        .iter()
        .map(|e| Money::new(e.amount_minor))
        .sum();
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" Type: ", Style::default().fg(theme.text_muted)),
            Span::styled(filter, Style::default().fg(theme.accent)),
            Span::styled("   Total: ", Style::default().fg(theme.text_muted)),
            Span::styled(filtered_total.to_string(), Style::default().fg(theme.text)),
        ])),
        left[0],
    );

    let page = expenses.page(state.page_size);
    let rows: Vec<Row<'static>> = page
        .items
        .iter()
        .map(|e| {
            Row::new(vec![
                Cell::from(e.expense_type.clone()),
                Cell::from(e.description.clone()),
                Cell::from(Money::new(e.amount_minor).to_string()),
                Cell::from(e.date.with_timezone(&state.tz).format("%d %b %Y").to_string()),
                Cell::from(e.category.clone().unwrap_or_else(|| "General".to_string())),
            ])
        })
        .collect();
    let title = format!("Expenses ({})", page.total_items);
    render_table(
        frame,
        left[1],
        &title,
        &["Type", "Description", "Amount", "Date", "Category"],
        rows,
        &[
            Constraint::Length(18),
            Constraint::Percentage(30),
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Min(8),
        ],
        expenses.pager.selected,
        theme,
    );
    frame.render_widget(
        Paragraph::new(pager_line(page.page, page.total_pages, theme)),
        left[2],
    );

    let totals: Vec<(String, u64, String)> = expenses
        .totals_by_type()
        .into_iter()
        .map(|(expense_type, amount)| {
            (
                expense_type.as_str().to_string(),
                amount.minor().max(0).unsigned_abs(),
                amount.to_string(),
            )
        })
        .collect();
    render_bar_list(frame, cols[1], "Totals by Type", &totals, theme);
}
