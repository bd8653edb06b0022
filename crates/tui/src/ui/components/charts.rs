use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Paragraph},
};

use crate::ui::{components::card::Card, theme::Theme};

/// Vertical bar chart inside a card, one bar per `(label, value)`.
pub fn render_bar_chart(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    data: &[(String, u64)],
    theme: &Theme,
) {
    let bars: Vec<Bar<'_>> = data
        .iter()
        .map(|(label, value)| Bar::default().label(Line::from(label.as_str())).value(*value))
        .collect();
    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(3)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme.accent))
        .value_style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
        .label_style(Style::default().fg(theme.dim));

    let card = Card::new(title, theme);
    let inner = card.inner(area);
    card.render_frame(frame, area);
    frame.render_widget(chart, inner);
}

/// Horizontal ASCII bars with the formatted value on the right, for labels
/// too long for a vertical chart.
pub fn render_bar_list(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    data: &[(String, u64, String)],
    theme: &Theme,
) {
    let card = Card::new(title, theme);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let max = data.iter().map(|(_, value, _)| *value).max().unwrap_or(0);
    let label_width = data.iter().map(|(label, _, _)| label.len()).max().unwrap_or(0);
    let bar_width = (inner.width as usize).saturating_sub(label_width + 16).max(4);
    let lines: Vec<Line<'_>> = data
        .iter()
        .map(|(label, value, shown)| {
            Line::from(vec![
                Span::styled(
                    format!("{label:<label_width$} "),
                    Style::default().fg(theme.text_muted),
                ),
                Span::styled(ascii_bar(*value, max, bar_width), Style::default().fg(theme.accent)),
                Span::styled(format!(" {shown}"), Style::default().fg(theme.text)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

/// `████████░░░░` proportional to `value / max`.
#[must_use]
pub fn ascii_bar(value: u64, max: u64, width: usize) -> String {
    if max == 0 {
        return "░".repeat(width);
    }

    let ratio = (value as f64 / max as f64).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64) as usize).min(width);
    let empty = width.saturating_sub(filled);

    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// `████████░░  80.0%`
#[must_use]
pub fn percentage_bar(percentage: f64, width: usize) -> String {
    let clamped = percentage.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0 * width as f64) as usize).min(width);
    let empty = width.saturating_sub(filled);
    format!(
        "{}{} {:>5.1}%",
        "█".repeat(filled),
        "░".repeat(empty),
        percentage
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_bar_scales_to_max() {
        assert_eq!(ascii_bar(5, 10, 4), "██░░");
        assert_eq!(ascii_bar(0, 0, 3), "░░░");
        assert_eq!(ascii_bar(20, 10, 2), "██");
    }

    #[test]
    fn percentage_bar_shows_one_decimal() {
        assert_eq!(percentage_bar(50.0, 4), "██░░  50.0%");
        assert_eq!(percentage_bar(0.0, 2), "░░   0.0%");
    }
}
