use chrono::TimeDelta;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::PrayerRecord;
use crate::tui::theme;
use crate::utils::format::{format_countdown, format_time};

/// Current prayer card. `time_left` is `None` once the window has closed.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    current: Option<(&PrayerRecord, Option<TimeDelta>)>,
    showing_today: bool,
) {
    let block = Block::default()
        .title(Span::styled(" Current Prayer ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let content: Vec<Line> = match current {
        None if !showing_today => vec![
            Line::from(""),
            Line::from(Span::styled("  Press [t] to return to today", theme::dim())),
        ],
        None => vec![
            Line::from(""),
            Line::from(Span::styled("  No current prayer", theme::dim())),
        ],
        Some((r, time_left)) => {
            let countdown = match time_left {
                Some(left) => Span::styled(
                    format_countdown(left),
                    theme::green().add_modifier(Modifier::BOLD),
                ),
                None => Span::styled("Prayer time ended", theme::red()),
            };
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("  {}", r.name().display_name().to_uppercase()),
                    theme::gold().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("  {} – {}", format_time(r.start()), format_time(r.end())),
                    theme::dim(),
                )),
                Line::from(""),
                Line::from(vec![Span::styled("  ends in  ", theme::dim()), countdown]),
            ]
        }
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}
