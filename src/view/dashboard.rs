//! Dashboard rendering (card lists, detail pane, search)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, ListItem, Padding, Paragraph, Wrap},
    Frame,
};

use crate::model::{
    CatalogItem, Category, DashboardState, SearchState, format_duration, parse_timestamp,
};
use super::layout::render_category_tabs;
use super::utils::{calculate_num_width, render_scrollable_list, truncate_string};

pub fn render_dashboard(frame: &mut Frame, area: Rect, state: &DashboardState) {
    if let Some(ref error) = state.load_error {
        render_load_error(frame, area, error);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Category tabs
            Constraint::Min(0),    // Cards + detail
        ])
        .split(area);

    let counts = Category::ALL.map(|category| state.len(category));
    render_category_tabs(frame, chunks[0], state.category, counts);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45), // Card list
            Constraint::Percentage(55), // Detail pane
        ])
        .split(chunks[1]);

    if state.search.visible {
        render_search_results(frame, main_chunks[0], &state.search);
    } else {
        render_card_list(frame, main_chunks[0], state);
    }
    render_detail(frame, main_chunks[1], state);

    if state.search.prompt_open {
        render_search_prompt(frame, chunks[1], &state.search);
    }
}

fn render_load_error(frame: &mut Frame, area: Rect, error: &str) {
    let lines = vec![
        Line::styled(error.to_string(), Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Line::raw(""),
        Line::styled("Press L to sign in again", Style::default().fg(Color::Yellow)),
        Line::styled("r retry · q quit", Style::default().fg(Color::DarkGray)),
    ];
    let content = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .centered()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Dashboard ")
                .border_style(Style::default().fg(Color::Red))
                .padding(Padding::uniform(1)),
        );
    frame.render_widget(content, area);
}

fn render_card_list(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let title = format!(" {} ", state.category.label());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding::horizontal(1))
        .border_style(Style::default().fg(Color::Green));

    if state.loading && state.len(state.category) == 0 {
        let loading = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        frame.render_widget(loading, area);
        return;
    }

    let items = state.items(state.category);
    if items.is_empty() {
        let empty = Paragraph::new(format!("No {} yet", state.category.label().to_lowercase()))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let selected = state.selected_index();
    let num_width = calculate_num_width(items.len());
    let content_width = area.width.saturating_sub(4) as usize;
    let text_width = content_width.saturating_sub(num_width + 3);

    let list_items: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let marker = if state.is_open(item.id()) { "▶" } else { " " };
            let style = if i == selected {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let description = item.description();
            let mut lines = vec![Line::from(vec![
                Span::styled(format!("{:>width$} ", i + 1, width = num_width), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{} ", marker), Style::default().fg(Color::Green)),
                Span::styled(truncate_string(item.title(), text_width), style),
            ])];
            if !description.is_empty() {
                lines.push(Line::styled(
                    format!("{:width$}{}", "", truncate_string(description, text_width), width = num_width + 3),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(lines)
        })
        .collect();

    render_scrollable_list(frame, area, list_items, selected, block);
}

fn render_detail(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Details ")
        .padding(Padding::horizontal(1));

    let Some(item) = state.selected_item() else {
        let hint = Paragraph::new("Select a card with ↑/↓")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(hint, area);
        return;
    };

    let label = Style::default().fg(Color::Cyan);
    let mut lines = vec![
        Line::styled(item.title().to_string(), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Line::styled(item.meta_line(), Style::default().fg(Color::Yellow)),
    ];

    if let Some(created) = created_at(&item).and_then(parse_timestamp) {
        lines.push(Line::styled(
            format!("Added {}", created.format("%Y-%m-%d")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let description = item.description();
    if !description.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::raw(description.to_string()));
    }

    lines.push(Line::raw(""));
    let preview = if state.preview.item_id != item.id() || !state.preview.resolved {
        Span::styled("resolving...", Style::default().fg(Color::DarkGray))
    } else {
        match state.preview.url {
            Some(ref url) => Span::raw(url.clone()),
            None => Span::styled("none", Style::default().fg(Color::DarkGray)),
        }
    };
    lines.push(Line::from(vec![Span::styled("Preview: ", label), preview]));

    if let CatalogItem::Playlist(ref playlist) = item {
        lines.push(Line::raw(""));
        lines.push(Line::styled("Tracks", label.add_modifier(Modifier::BOLD)));
        if playlist.musics.is_empty() {
            lines.push(Line::styled("  (empty)", Style::default().fg(Color::DarkGray)));
        }
        for (i, track) in playlist.musics.iter().enumerate() {
            lines.push(Line::raw(format!(
                "{:>3}. {} ({})",
                i + 1,
                track.title,
                format_duration(track.duration)
            )));
        }
    }

    lines.push(Line::raw(""));
    match state.open.as_ref().filter(|card| card.item_id == item.id()) {
        Some(card) => {
            match card.location {
                Some(ref location) => {
                    let source = if card.from_manifest { "HLS manifest" } else { "direct link" };
                    lines.push(Line::from(vec![
                        Span::styled("Opened: ", label),
                        Span::raw(format!("{} ({})", location, source)),
                    ]));
                }
                None => lines.push(Line::styled(
                    "No playable link available",
                    Style::default().fg(Color::Yellow),
                )),
            }
            if let Some(ref error) = card.launch_error {
                lines.push(Line::styled(error.clone(), Style::default().fg(Color::Red)));
            }
            lines.push(Line::styled("Enter/Esc to close", Style::default().fg(Color::DarkGray)));
        }
        None if item.is_openable() => {
            lines.push(Line::styled("Enter to open", Style::default().fg(Color::DarkGray)));
        }
        None => {}
    }

    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(detail, area);
}

fn created_at(item: &CatalogItem) -> Option<&str> {
    match item {
        CatalogItem::Video(v) => v.created_at.as_deref(),
        CatalogItem::Book(b) => b.created_at.as_deref(),
        CatalogItem::Music(m) => m.created_at.as_deref(),
        CatalogItem::Playlist(p) => p.created_at.as_deref(),
    }
}

fn render_search_results(frame: &mut Frame, area: Rect, search: &SearchState) {
    let title = format!(" Search: {} (Enter open · Esc close) ", search.query);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding::horizontal(1))
        .border_style(Style::default().fg(Color::Magenta));

    if search.loading {
        let loading = Paragraph::new("Searching...")
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        frame.render_widget(loading, area);
        return;
    }

    if search.results.is_empty() {
        let empty = Paragraph::new("No matches")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let content_width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = search
        .results
        .iter()
        .enumerate()
        .map(|(i, hit)| {
            let style = if i == search.selected {
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let kind = format!("[{}] ", hit.kind.as_str());
            let score = format!(" {:.2}", hit.score);
            let title_width = content_width
                .saturating_sub(kind.chars().count() + score.chars().count());
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(kind, Style::default().fg(Color::DarkGray)),
                    Span::styled(truncate_string(&hit.title, title_width), style),
                    Span::styled(score, Style::default().fg(Color::Yellow)),
                ]),
                Line::styled(format!("    {}", hit.id), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    render_scrollable_list(frame, area, items, search.selected, block);
}

fn render_search_prompt(frame: &mut Frame, area: Rect, search: &SearchState) {
    let prompt_area = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4).min(60),
        height: 3.min(area.height),
    };

    frame.render_widget(Clear, prompt_area);

    let prompt = Paragraph::new(format!("{}▏", search.query))
        .style(Style::default().fg(Color::Magenta))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Search (Enter to run, Esc to cancel) ")
                .padding(Padding::horizontal(1))
                .border_style(Style::default().fg(Color::Magenta))
                .style(Style::default().bg(Color::Black)),
        );
    frame.render_widget(prompt, prompt_area);
}
