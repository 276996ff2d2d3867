use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::state::BrowserState;
use crate::util::{format_timestamp, preview};

pub fn render(frame: &mut Frame, state: &BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search
            Constraint::Min(3),    // records
            Constraint::Length(1), // status
        ])
        .split(frame.area());

    let search = Paragraph::new(state.query.as_str())
        .block(Block::default().title(" Search history ").borders(Borders::ALL));
    frame.render_widget(search, chunks[0]);

    let visible = state.visible();
    let width = usize::from(chunks[1].width).saturating_sub(34).max(10);
    let items: Vec<ListItem> = visible
        .iter()
        .map(|record| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<6}", record.content_type.as_str()),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(" "),
                Span::styled(format_timestamp(record.captured_at), Style::default().fg(Color::DarkGray)),
                Span::raw("  "),
                Span::raw(preview(&record.payload, width)),
            ]))
        })
        .collect();

    let title = format!(" {} of {} ", visible.len(), state.records.len());
    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut list_state = ListState::default();
    if !visible.is_empty() {
        list_state.select(Some(state.selected));
    }
    frame.render_stateful_widget(list, chunks[1], &mut list_state);

    let status = if state.confirm_clear {
        Paragraph::new("Clear all history? (y/N)").style(Style::default().fg(Color::Yellow))
    } else if let Some(ref message) = state.status {
        Paragraph::new(message.as_str()).style(Style::default().fg(Color::Green))
    } else {
        Paragraph::new("type to filter | ↑↓ select | Del delete | Ctrl+X clear all | Esc quit")
            .style(Style::default().fg(Color::DarkGray))
    };
    frame.render_widget(status, chunks[2]);
}
