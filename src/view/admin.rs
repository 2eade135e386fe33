//! Admin panel rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Padding, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::model::{AdminState, NoticeKind};
use super::layout::render_section_tabs;

pub fn render_admin(frame: &mut Frame, area: Rect, state: &AdminState) {
    let banner = state.error.is_some() || state.notice.is_some();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                          // Section tabs
            Constraint::Length(if banner { 1 } else { 0 }), // Notice / error
            Constraint::Min(0),                             // Table
        ])
        .split(area);

    render_section_tabs(frame, chunks[0], state.section);

    if let Some(ref error) = state.error {
        let line = Paragraph::new(format!(" {}", error)).style(Style::default().fg(Color::Red));
        frame.render_widget(line, chunks[1]);
    } else if let Some(ref notice) = state.notice {
        let color = match notice.kind {
            NoticeKind::Success => Color::Green,
            NoticeKind::Error => Color::Red,
        };
        let line = Paragraph::new(format!(" {}", notice.text)).style(Style::default().fg(color));
        frame.render_widget(line, chunks[1]);
    }

    render_table(frame, chunks[2], state);
}

fn render_table(frame: &mut Frame, area: Rect, state: &AdminState) {
    let section = state.section;
    let title = format!(" {} ({}) ", section.label(), state.lists.len(section));
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding::horizontal(1))
        .border_style(Style::default().fg(Color::Yellow));

    if state.loading && state.lists.len(section) == 0 {
        let loading = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        frame.render_widget(loading, area);
        return;
    }

    let columns = section.columns();
    let header = Row::new(columns.iter().map(|c| Cell::from(*c)))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = state
        .lists
        .rows(section)
        .into_iter()
        .map(Row::new)
        .collect();

    let widths: Vec<Constraint> = columns
        .iter()
        .enumerate()
        .map(|(i, _)| if i == 0 { Constraint::Length(12) } else { Constraint::Fill(1) })
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().fg(Color::Black).bg(Color::Yellow))
        .highlight_symbol("▶ ");

    let mut table_state = TableState::default();
    if state.lists.len(section) > 0 {
        table_state.select(Some(state.selected_index()));
    }

    frame.render_stateful_widget(table, area, &mut table_state);
}
