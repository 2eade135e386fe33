//! Sign-in screen

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
    Frame,
};

use crate::model::{LoginField, LoginState};
use super::utils::{centered_rect, mask};

pub fn render_login(frame: &mut Frame, area: Rect, login: &LoginState) {
    let form_area = centered_rect(area, 48, 13);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Phone
            Constraint::Length(3), // Password
            Constraint::Length(2), // Submit hint
            Constraint::Min(0),    // Error
        ])
        .split(form_area);

    render_field(frame, chunks[0], " Phone ", &login.phone, login.focus == LoginField::Phone);
    render_field(
        frame,
        chunks[1],
        " Password ",
        &mask(&login.password),
        login.focus == LoginField::Password,
    );

    let hint = if login.submitting {
        Line::styled("Signing in...", Style::default().fg(Color::Yellow))
    } else {
        Line::styled("Press Enter to sign in", Style::default().fg(Color::DarkGray))
    };
    frame.render_widget(Paragraph::new(hint).centered(), chunks[2]);

    if let Some(ref error) = login.error {
        let error = Paragraph::new(error.as_str())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .centered();
        frame.render_widget(error, chunks[3]);
    }
}

fn render_field(frame: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let (border, text) = if focused {
        (
            Style::default().fg(Color::Green),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else {
        (Style::default(), Style::default().fg(Color::White))
    };

    let cursor = if focused { "▏" } else { "" };
    let field = Paragraph::new(format!("{}{}", value, cursor))
        .style(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .padding(Padding::horizontal(1))
                .border_style(border),
        );
    frame.render_widget(field, area);
}
