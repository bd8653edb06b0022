use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    forms::Form,
    ui::{components::centered_rect, theme::Theme},
};

/// Modal form; choice fields show `< value >`.
pub fn render(frame: &mut Frame<'_>, area: Rect, form: &Form, theme: &Theme) {
    let popup = centered_rect(60, 70, area);
    let label_width = form.fields.iter().map(|f| f.label.len()).max().unwrap_or(0);

    let mut lines = Vec::with_capacity(form.fields.len() + 2);
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let label_style = if focused {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text_muted)
        };
        let value = if field.is_choice() {
            format!("< {} >", field.display())
        } else if focused {
            format!("{}_", field.value)
        } else {
            field.value.clone()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:>label_width$}  ", field.label), label_style),
            Span::styled(value, Style::default().fg(theme.text)),
        ]));
    }
    lines.push(Line::from(""));
    let mut hints = vec![
        Span::styled("Tab", Style::default().fg(theme.accent)),
        Span::raw(" next  "),
    ];
    if form.focused().is_some_and(|f| f.is_choice()) {
        hints.push(Span::styled("←/→", Style::default().fg(theme.accent)));
        hints.push(Span::raw(" choose  "));
    }
    hints.extend([
        Span::styled("Enter", Style::default().fg(theme.accent)),
        Span::raw(" save  "),
        Span::styled("Esc", Style::default().fg(theme.accent)),
        Span::raw(" cancel"),
    ]);
    lines.push(Line::from(hints));

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", form.title),
            Style::default().fg(theme.accent),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.surface_bright));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

/// "Delete this record?" prompt.
pub fn render_confirm(frame: &mut Frame<'_>, area: Rect, what: &str, theme: &Theme) {
    let popup = centered_rect(40, 20, area);
    let lines = vec![
        Line::from(Span::styled(
            format!("Delete this {what}?"),
            Style::default().fg(theme.warning).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(theme.accent)),
            Span::raw(" delete  "),
            Span::styled("n", Style::default().fg(theme.accent)),
            Span::raw(" keep"),
        ]),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.warning))
        .style(Style::default().bg(theme.surface_bright));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
