use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::PrayerRecord;
use crate::tui::theme;
use crate::utils::format::{format_duration_secs, format_time};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    next: Option<&(&PrayerRecord, i64)>,
    today: NaiveDate,
) {
    let block = Block::default()
        .title(Span::styled(" Next Prayer ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let content: Vec<Line> = match next {
        None => vec![
            Line::from(""),
            Line::from(Span::styled("  No data", theme::dim())),
        ],
        Some((r, secs)) => {
            let when = if r.date() == today {
                format!("  today at {}", format_time(r.start()))
            } else {
                format!("  {} at {}", r.date().format("%a %b %d"), format_time(r.start()))
            };
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("  {}", r.name().display_name().to_uppercase()),
                    theme::gold().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(when, theme::dim())),
                Line::from(""),
                Line::from(vec![
                    Span::styled("  in  ", theme::dim()),
                    Span::styled(
                        format_duration_secs(*secs),
                        theme::amber().add_modifier(Modifier::BOLD),
                    ),
                ]),
            ]
        }
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}
