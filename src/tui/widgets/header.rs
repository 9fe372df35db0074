use chrono::{NaiveDate, NaiveTime};
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;
use crate::utils::format::{format_date_long, format_time};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    selected: NaiveDate,
    today: NaiveDate,
    now: NaiveTime,
    tz_name: &str,
) {
    let title_line = Line::from(vec![
        Span::styled("  نماز  ", theme::gold().add_modifier(Modifier::BOLD)),
        Span::styled("namaz", theme::gold()),
    ]);

    let (date_label, date_style) = if selected == today {
        (format!("Today · {}", format_date_long(selected)), theme::amber())
    } else {
        (selected.format("%A, %b %d, %Y").to_string(), theme::bold())
    };

    let date_line = Line::from(vec![
        Span::styled(date_label, date_style),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(format!("{} {}", format_time(now), tz_name), theme::dim()),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold().add_modifier(Modifier::BOLD))
        .style(theme::base());

    let paragraph = Paragraph::new(vec![title_line, Line::from(""), date_line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
