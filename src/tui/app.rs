use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta};
use chrono_tz::Tz;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::models::PrayerRecord;
use crate::prayer_times::{
    available_dates, current_prayer, next_prayer, records_for_date, time_until_end, PrayerStore,
};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{current_prayer as current_card, header, next_prayer as next_card};
use crate::tui::widgets::{prayers, statusbar};
use crate::utils::time::now_in;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Browse,
    Help,
}

/// How a row in the prayer list relates to the present moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    Past,
    Current,
    Next,
    Upcoming,
}

pub struct App {
    pub view: View,
    pub should_quit: bool,
    pub tz: Tz,
    pub records: Arc<[PrayerRecord]>,
    pub dates: Vec<NaiveDate>,
    pub selected: NaiveDate,
    pub today: NaiveDate,
    pub now: NaiveTime,
}

impl App {
    pub fn new(config: &AppConfig, records: Arc<[PrayerRecord]>, now: DateTime<Tz>) -> Self {
        let dates = available_dates(&records);
        let today = now.date_naive();
        App {
            view: View::Browse,
            should_quit: false,
            tz: config.notifications.tz(),
            records,
            dates,
            selected: today,
            today,
            now: now.time(),
        }
    }

    /// Advance the clock. Keeps the selection on "today" if it was there.
    pub fn tick(&mut self, now: DateTime<Tz>) {
        let date = now.date_naive();
        if date != self.today {
            log::debug!("Day rolled over to {}", date);
            if self.selected == self.today {
                self.selected = date;
            }
            self.today = date;
        }
        self.now = now.time();
    }

    pub fn current(&self) -> Option<&PrayerRecord> {
        current_prayer(&self.records, self.today, self.now)
    }

    pub fn next(&self) -> Option<&PrayerRecord> {
        next_prayer(&self.records, self.today, self.now)
    }

    /// Remaining time in the current window; `None` once it has ended.
    pub fn time_left(&self) -> Option<TimeDelta> {
        self.current().and_then(|r| time_until_end(r, self.now))
    }

    pub fn rows(&self) -> Vec<(&PrayerRecord, RowState)> {
        let current = self.current();
        let next = self.next();
        records_for_date(&self.records, self.selected)
            .into_iter()
            .map(|r| {
                let state = if current == Some(r) && r.contains(self.now) {
                    RowState::Current
                } else if next == Some(r) {
                    RowState::Next
                } else if r.date() < self.today || (r.date() == self.today && r.end() < self.now) {
                    RowState::Past
                } else {
                    RowState::Upcoming
                };
                (r, state)
            })
            .collect()
    }

    pub fn select_previous_date(&mut self) {
        if let Some(d) = self.dates.iter().rev().find(|d| **d < self.selected) {
            self.selected = *d;
        }
    }

    pub fn select_next_date(&mut self) {
        if let Some(d) = self.dates.iter().find(|d| **d > self.selected) {
            self.selected = *d;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Only handle actual key presses — ignore release/repeat events from some terminals
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.view {
            View::Browse => self.handle_browse_key(key),
            View::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                    self.view = View::Browse;
                }
            }
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.view = View::Help,
            KeyCode::Left | KeyCode::Char('h') => self.select_previous_date(),
            KeyCode::Right | KeyCode::Char('l') => self.select_next_date(),
            KeyCode::Char('t') => self.selected = self.today,
            _ => {}
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        self.draw_browse(frame);
        if self.view == View::Help {
            self.draw_help_overlay(frame);
        }
    }

    fn draw_browse(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(frame, outer_chunks[0], self.selected, self.today, self.now, self.tz.name());
        statusbar::render(frame, outer_chunks[2]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(outer_chunks[1]);

        prayers::render(frame, columns[0], &self.rows(), self.records.is_empty());

        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(8), // current prayer
                Constraint::Length(8), // next prayer
                Constraint::Min(0),
            ])
            .split(columns[1]);

        let current = (self.selected == self.today)
            .then(|| self.current().map(|r| (r, self.time_left())))
            .flatten();
        current_card::render(frame, right_chunks[0], current, self.selected == self.today);

        let next = self.next().map(|r| {
            let secs = (r.date().and_time(r.start()) - self.today.and_time(self.now)).num_seconds();
            (r, secs)
        });
        next_card::render(frame, right_chunks[1], next.as_ref(), self.today);
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();

        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 4,
            width: area.width / 2,
            height: (area.height / 2).min(12),
        };

        frame.render_widget(Clear, popup_area);

        let bindings = [
            ("  [← / h]  ", "Previous date"),
            ("  [→ / l]  ", "Next date"),
            ("  [t]      ", "Back to today"),
            ("  [?]      ", "Toggle help"),
            ("  [Esc/q]  ", "Quit"),
        ];

        let mut help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::gold().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        help_text.extend(bindings.iter().map(|(key, what)| {
            Line::from(vec![
                Span::styled(*key, theme::gold()),
                Span::styled(*what, theme::dim()),
            ])
        }));

        let block = Block::default()
            .title(Span::styled(" Help ", theme::gold()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::gold())
            .style(theme::surface());

        frame.render_widget(Paragraph::new(help_text).block(block), popup_area);
    }
}

/// Run the TUI event loop.
pub fn run(store: &PrayerStore, config: &AppConfig) -> Result<()> {
    let tz = config.notifications.tz();
    let mut app = App::new(config, store.snapshot(), now_in(&tz));

    let mut terminal = ratatui::init();
    let events = EventHandler::new(Duration::from_millis(500));

    let result: Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| app.draw(frame)) {
            break Err(e.into());
        }

        match events.next() {
            Ok(Event::Key(key)) => {
                app.handle_key(key);
                if app.should_quit {
                    break Ok(());
                }
            }
            Ok(Event::Tick) => app.tick(now_in(&tz)),
            Ok(Event::Resize) => {}
            Err(e) => break Err(e.into()),
        }
    };

    ratatui::restore();
    result
}
