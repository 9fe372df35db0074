use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::PrayerRecord;
use crate::prayer_times::csv_import::EXPECTED_HEADER;
use crate::tui::app::RowState;
use crate::tui::theme;
use crate::utils::format::format_time;

pub fn render(frame: &mut Frame, area: Rect, rows: &[(&PrayerRecord, RowState)], no_data: bool) {
    let block = Block::default()
        .title(Span::styled(" Prayer Times ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    if rows.is_empty() {
        let hint = if no_data {
            vec![
                Line::from(""),
                Line::from(Span::styled("  No prayer times imported", theme::amber())),
                Line::from(""),
                Line::from(Span::styled("  namaz import <file.csv>", theme::gold())),
                Line::from(Span::styled(format!("  header: {}", EXPECTED_HEADER), theme::dim())),
            ]
        } else {
            vec![
                Line::from(""),
                Line::from(Span::styled("  No prayer times for this date", theme::dim())),
            ]
        };
        frame.render_widget(Paragraph::new(hint).block(block), area);
        return;
    }

    let items: Vec<ListItem> = rows
        .iter()
        .map(|(r, state)| {
            let (icon, icon_style, label) = match state {
                RowState::Current => ("●", theme::green(), "now"),
                RowState::Next => ("◑", theme::amber(), "next"),
                RowState::Past => ("○", theme::dim(), "ended"),
                RowState::Upcoming => ("○", theme::bold(), ""),
            };

            let name_style = match state {
                RowState::Current => theme::green().add_modifier(Modifier::BOLD),
                RowState::Next => theme::gold().add_modifier(Modifier::BOLD),
                RowState::Past => theme::dim(),
                RowState::Upcoming => theme::bold(),
            };

            let line = Line::from(vec![
                Span::styled(format!("  {:<8}", r.name().display_name()), name_style),
                Span::styled(
                    format!("{} – {}  ", format_time(r.start()), format_time(r.end())),
                    theme::dim(),
                ),
                Span::styled(icon, icon_style),
                Span::styled(format!("  {}", label), theme::dim()),
            ]);

            ListItem::new(line)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
