use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::ui::theme::Theme;

/// Rounded panel used by every page.
pub struct Card<'a> {
    title: &'a str,
    theme: &'a Theme,
    focused: bool,
}

impl<'a> Card<'a> {
    pub fn new(title: &'a str, theme: &'a Theme) -> Self {
        Self {
            title,
            theme,
            focused: false,
        }
    }

    /// Accent border for the panel holding the selection.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn block(&self) -> Block<'a> {
        let border_color = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border
        };

        Block::default()
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default().fg(self.theme.accent),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(self.theme.surface_bright))
    }

    pub fn inner(&self, area: Rect) -> Rect {
        self.block().inner(area)
    }

    pub fn render_frame(&self, frame: &mut Frame<'_>, area: Rect) {
        frame.render_widget(self.block(), area);
    }

    pub fn render_lines(&self, frame: &mut Frame<'_>, area: Rect, lines: Vec<Line<'_>>) {
        let inner = self.inner(area);
        self.render_frame(frame, area);
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

/// Summary figure with a title, e.g. "Total Patients / 42".
pub struct StatCard<'a> {
    title: &'a str,
    value: String,
    value_style: Option<Style>,
    subtitle: Option<String>,
    theme: &'a Theme,
}

impl<'a> StatCard<'a> {
    pub fn new(title: &'a str, value: impl Into<String>, theme: &'a Theme) -> Self {
        Self {
            title,
            value: value.into(),
            value_style: None,
            subtitle: None,
            theme,
        }
    }

    pub fn value_style(mut self, style: Style) -> Self {
        self.value_style = Some(style);
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let style = self
            .value_style
            .unwrap_or_else(|| Style::default().fg(self.theme.text))
            .add_modifier(Modifier::BOLD);
        let mut lines = vec![Line::from(Span::styled(self.value.clone(), style))];
        if let Some(sub) = &self.subtitle {
            lines.push(Line::from(Span::styled(
                sub.clone(),
                Style::default().fg(self.theme.dim),
            )));
        }
        Card::new(self.title, self.theme).render_lines(frame, area, lines);
    }
}
