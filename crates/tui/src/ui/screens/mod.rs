pub mod appointments;
pub mod expenses;
pub mod overview;
pub mod patients;
pub mod reports;

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Row, Table, TableState},
};

use engine::pagination::page_window;

use crate::ui::{components::card::Card, theme::Theme};

/// Numbered pager shown under the list tables: `< 1 [2] 3 4 5 >`.
pub(crate) fn pager_line(page: usize, total_pages: usize, theme: &Theme) -> Line<'static> {
    let mut spans = vec![Span::styled("< ", Style::default().fg(theme.dim))];
    for number in page_window(page, total_pages, 5) {
        if number == page {
            spans.push(Span::styled(
                format!("[{number}] "),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(
                format!("{number} "),
                Style::default().fg(theme.text_muted),
            ));
        }
    }
    spans.push(Span::styled(">", Style::default().fg(theme.dim)));
    spans.push(Span::styled(
        format!("  page {page} of {}", total_pages.max(1)),
        Style::default().fg(theme.dim),
    ));
    Line::from(spans)
}

/// Carded table with a highlighted row.
pub(crate) fn render_table(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    header: &[&'static str],
    rows: Vec<Row<'static>>,
    widths: &[Constraint],
    selected: usize,
    theme: &Theme,
) {
    let card = Card::new(title, theme).focused(true);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let empty = rows.is_empty();
    let header = Row::new(header.iter().map(|h| Cell::from(*h))).style(
        Style::default()
            .fg(theme.text_muted)
            .add_modifier(Modifier::BOLD),
    );
    let table = Table::new(rows, widths.to_vec())
        .header(header)
        .row_highlight_style(
            Style::default()
                .fg(theme.background)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD),
        );
    let mut state = TableState::default().with_selected((!empty).then_some(selected));
    frame.render_stateful_widget(table, inner, &mut state);
}
