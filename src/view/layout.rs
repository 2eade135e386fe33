//! Layout rendering (top bar, category and section tabs)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Tabs},
    Frame,
};

use crate::model::{AdminSection, Category, Profile, Screen};

pub fn render_top_bar(frame: &mut Frame, area: Rect, screen: Screen, profile: Option<&Profile>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Title + hints
            Constraint::Length(32), // Signed-in user
        ])
        .split(area);

    let hints = match screen {
        Screen::Login => "Tab switch field · Enter sign in · Esc quit",
        Screen::Dashboard => "/ search · Enter open · a admin · o sign out · h help",
        Screen::Admin => "n new · e edit · d delete · b back · h help",
    };

    let title = Paragraph::new(Line::from(vec![
        Span::styled("Media Library", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(title, chunks[0]);

    let user_text = match profile {
        Some(profile) => format!("👤 {} ({})", profile.display_name(), profile.role.as_str()),
        None => "Not signed in".to_string(),
    };
    let user = Paragraph::new(user_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title(" User "));
    frame.render_widget(user, chunks[1]);
}

pub fn render_category_tabs(frame: &mut Frame, area: Rect, active: Category, counts: [usize; 4]) {
    let titles: Vec<Line> = Category::ALL
        .iter()
        .map(|category| {
            Line::from(format!(
                "{} {} ({})",
                category.index() + 1,
                category.label(),
                counts[category.index()]
            ))
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(active.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title(" Library "));
    frame.render_widget(tabs, area);
}

pub fn render_section_tabs(frame: &mut Frame, area: Rect, active: AdminSection) {
    let titles: Vec<Line> = AdminSection::ALL
        .iter()
        .map(|section| Line::from(section.label()))
        .collect();

    let tabs = Tabs::new(titles)
        .select(active.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Admin ")
                .border_style(Style::default().fg(Color::Yellow)),
        );
    frame.render_widget(tabs, area);
}
