pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, PageId};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tabs
            Constraint::Min(0),    // Page
            Constraint::Length(1), // Hints
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    components::tabs::render_tabs(frame, layout[1], state.page, &theme);

    let content = layout[2];
    match state.page {
        PageId::Overview => screens::overview::render(frame, content, state, &theme),
        PageId::Patients => screens::patients::render(frame, content, state, &theme),
        PageId::Expenses => screens::expenses::render(frame, content, state, &theme),
        PageId::Appointments => screens::appointments::render(frame, content, state, &theme),
        PageId::Reports => screens::reports::render(frame, content, state, &theme),
    }

    render_bottom_bar(frame, layout[3], state, &theme);

    if let Some(form) = state.form() {
        components::form::render(frame, area, form, &theme);
    } else if state.pending_delete().is_some() {
        let what = match state.page {
            PageId::Patients => "patient",
            PageId::Expenses => "expense",
            _ => "appointment",
        };
        components::form::render_confirm(frame, area, what, &theme);
    }
    components::help_overlay::render(frame, area, state);
    components::toast::render(frame, area, state.toasts.current());
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let refresh = state
        .last_refresh
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let (status, status_style) = if state.connected {
        ("OK", Style::default().fg(theme.positive))
    } else {
        ("OFFLINE", Style::default().fg(theme.error))
    };

    let line = Line::from(vec![
        Span::styled("Dental Clinic", Style::default().fg(theme.accent)),
        Span::raw("  "),
        Span::styled("Server", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled("Today", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.today.format("%d %b %Y"))),
        Span::styled("Refresh", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {refresh}  ")),
        Span::styled(status, status_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = components::tabs::tab_shortcuts(theme);

    let context_hints = context_hints(state, theme);
    if !context_hints.is_empty() {
        parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
        parts.extend(context_hints);
    }

    parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
    parts.push(Span::styled("?", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" help  "));
    parts.push(Span::styled("q", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" quit"));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

fn hint(key: &'static str, what: &'static str, theme: &Theme) -> [Span<'static>; 2] {
    [
        Span::styled(key, Style::default().fg(theme.accent)),
        Span::raw(what),
    ]
}

fn context_hints(state: &AppState, theme: &Theme) -> Vec<Span<'static>> {
    let keys: &[(&'static str, &'static str)] = match state.page {
        PageId::Overview => &[("x", " pdf  "), ("w", " word  "), ("r", " refresh")],
        PageId::Patients => &[
            ("a", " add  "),
            ("e", " edit  "),
            ("d", " delete  "),
            ("Enter", " profile  "),
            ("←/→", " page"),
        ],
        PageId::Expenses => &[
            ("a", " add  "),
            ("e", " edit  "),
            ("d", " delete  "),
            ("f", " type  "),
            ("x/w", " export"),
        ],
        PageId::Appointments => &[
            ("a", " add  "),
            ("e", " edit  "),
            ("d", " delete  "),
            ("s", " status"),
        ],
        PageId::Reports if state.reports.editing_search => {
            &[("Enter", " apply  "), ("Esc", " stop editing")]
        }
        PageId::Reports => &[("t", " range  "), ("/", " search  "), ("c", " clear")],
    };
    keys.iter()
        .flat_map(|(key, what)| hint(*key, *what, theme))
        .collect()
}
