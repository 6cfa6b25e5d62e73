use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use reaction_machine::{session::format_hundredths, State};
use unicode_width::UnicodeWidthStr;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;
const MIN_PANEL_WIDTH: u16 = 20;

const KEY_HELP: [(&str, &str); 3] = [("c", "coin"), ("space", "go/stop"), ("esc", "quit")];

fn display_color(state: State) -> Color {
    match state {
        State::Idle => Color::Yellow,
        State::WaitingForGo => Color::Cyan,
        State::WaitingPeriod { .. } => Color::Red,
        State::Measuring => Color::Green,
        State::ShowResult => Color::White,
        State::ShowAverage => Color::Magenta,
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let controller = &self.controller;
        let state = controller.state();
        let text = controller.display().current();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Min(0),    // padding
                Constraint::Length(3), // display panel
                Constraint::Length(1), // padding
                Constraint::Length(1), // session line
                Constraint::Min(0),    // padding
                Constraint::Length(1), // key help
            ])
            .split(area);

        // the panel hugs the text like the cabinet's LED window
        let panel_width = (text.width() as u16 + 6)
            .max(MIN_PANEL_WIDTH)
            .min(chunks[1].width);
        let panel = Rect {
            x: chunks[1].x + (chunks[1].width - panel_width) / 2,
            width: panel_width,
            ..chunks[1]
        };

        Paragraph::new(Span::styled(
            text.to_owned(),
            bold_style.fg(display_color(state)),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(state.to_string()))
        .render(panel, buf);

        let session = controller.session();
        let session_line = if state.in_session() {
            format!(
                "round {}/{}  total {}s",
                session.games_played,
                controller.timing().games_per_coin,
                format_hundredths(session.sum_ticks)
            )
        } else {
            String::new()
        };
        Paragraph::new(Span::styled(session_line, dim_style))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        let help = KEY_HELP
            .iter()
            .map(|(key, action)| format!("({key}) {action}"))
            .join("   ");
        Paragraph::new(Line::from(Span::styled(
            help,
            dim_style.add_modifier(Modifier::ITALIC),
        )))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);
    }
}
