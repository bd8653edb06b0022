use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{
    app::{AppState, PageId},
    ui::{
        components::{centered_rect, tabs},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    if !state.help {
        return;
    }

    let theme = Theme::default();
    let popup = centered_rect(70, 70, area);
    let block = Block::default()
        .title("Keybinds")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .style(Style::default().bg(theme.surface_bright));
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(help_lines(state.page, &theme)).block(block),
        popup,
    );
}

fn key_line(keys: &[(&'static str, &'static str)], theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    for (key, what) in keys {
        spans.push(Span::styled(*key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {what}  ")));
    }
    Line::from(spans)
}

fn help_lines(page: PageId, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(tabs::tab_shortcuts(theme)),
        key_line(
            &[("r", "refresh"), ("?", "help"), ("Esc", "close"), ("q", "quit")],
            theme,
        ),
        Line::from(""),
        Line::from(Span::styled(
            page.label(),
            Style::default().fg(theme.text_muted),
        )),
    ];

    let list = [
        ("j/k", "select"),
        ("n/p", "page"),
        ("a", "add"),
        ("e", "edit"),
        ("d", "delete"),
    ];
    match page {
        PageId::Overview => {
            lines.push(key_line(&[("x", "export PDF"), ("w", "export Word")], theme));
        }
        PageId::Patients => {
            lines.push(key_line(&list, theme));
            lines.push(key_line(&[("Enter/v", "profile")], theme));
        }
        PageId::Expenses => {
            lines.push(key_line(&list, theme));
            lines.push(key_line(
                &[("f", "type filter"), ("x", "export PDF"), ("w", "export Word")],
                theme,
            ));
        }
        PageId::Appointments => {
            lines.push(key_line(&list, theme));
            lines.push(key_line(&[("s", "next status")], theme));
        }
        PageId::Reports => {
            lines.push(key_line(
                &[("t", "time range"), ("/", "search"), ("c", "clear search")],
                theme,
            ));
        }
    }
    lines
}
