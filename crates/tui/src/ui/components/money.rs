use ratatui::style::{Modifier, Style};

use crate::ui::theme::Theme;

/// Style of a profit figure: green when positive, red when negative.
#[must_use]
pub fn profit_style(minor: i64, theme: &Theme) -> Style {
    let color = match minor.signum() {
        1 => theme.positive,
        -1 => theme.negative,
        _ => theme.text,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}
