//! Prompt rendering.

use crate::colors;
use quiver_core::{DisplayState, Launcher};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

const PLACEHOLDER: &str = "Type to search";

pub fn draw(f: &mut Frame, launcher: &Launcher, status: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    let query = launcher.query();
    let input_block = Block::default()
        .borders(Borders::ALL)
        .title(" quiver ")
        .style(Style::default().bg(colors::SURFACE))
        .border_style(Style::default().fg(colors::OUTLINE));
    let input_text = if query.is_empty() {
        Span::styled(PLACEHOLDER, Style::default().fg(colors::OUTLINE))
    } else {
        Span::styled(query, Style::default().fg(colors::ON_SURFACE))
    };
    f.render_widget(Paragraph::new(input_text).block(input_block), chunks[0]);

    // Query length is bounded by config, far below u16::MAX
    #[allow(clippy::cast_possible_truncation)]
    let cursor_x = chunks[0].x + query.chars().count() as u16 + 1;
    f.set_cursor_position((cursor_x, chunks[0].y + 1));

    let results = launcher.results();
    let items: Vec<ListItem> = results
        .iter()
        .map(|entry| {
            let mut spans = vec![Span::styled(
                entry.display_name.clone(),
                Style::default().fg(colors::ON_SURFACE),
            )];
            if !entry.match_hint.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", entry.match_hint),
                    Style::default().fg(colors::SUBTEXT),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::NONE))
        .highlight_style(
            Style::default()
                .bg(colors::SURFACE_HIGH)
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !results.is_empty() {
        state.select(Some(launcher.selection()));
    }
    f.render_stateful_widget(list, chunks[1], &mut state);

    let (text, color) = match status {
        Some(message) => (message.to_string(), colors::WARNING),
        None => (status_line(launcher), colors::OUTLINE),
    };
    f.render_widget(
        Paragraph::new(Span::styled(text, Style::default().fg(color))),
        chunks[2],
    );
}

fn status_line(launcher: &Launcher) -> String {
    match launcher.display() {
        DisplayState::Welcome => {
            let stats = launcher.stats();
            format!(
                "{} actions  |  Enter run  Tab/arrows cycle  Esc quit",
                stats.active
            )
        }
        DisplayState::NoMatch => "No match".to_string(),
        DisplayState::Selected {
            name, index, total, ..
        } => format!("{name}  ({}/{total})", index + 1),
    }
}
