//! Overlay rendering (error notification, help popup, confirm prompt, admin form)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::model::{ConfirmPrompt, FieldKind, FormState, Screen, UiState};
use super::utils::{centered_rect, mask};

pub fn render_error_notification(frame: &mut Frame, ui_state: &UiState) {
    if let Some(ref error_msg) = ui_state.error_message {
        let area = frame.area();

        // Fixed width popup (responsive to screen size)
        let popup_width = 52.min(area.width.saturating_sub(4));
        let inner_width = popup_width.saturating_sub(4).max(1) as usize; // account for borders

        // Calculate how many lines the error message will take when wrapped
        let error_line_count = ((error_msg.chars().count() as f32) / (inner_width as f32)).ceil() as u16;

        // Height: top border (1) + error lines + bottom border (1)
        let popup_height = (2 + error_line_count.max(1)).min(area.height.saturating_sub(4));

        let popup_area = centered_rect(area, popup_width, popup_height);

        // Clear the area behind the popup first
        frame.render_widget(Clear, popup_area);

        let error_widget = Paragraph::new(error_msg.to_string())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(" Error (Esc to dismiss) ")
                    .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                    .style(Style::default().bg(Color::Black)),
            );

        frame.render_widget(error_widget, popup_area);
    }
}

fn keybindings(screen: Screen) -> Vec<(&'static str, &'static str)> {
    match screen {
        Screen::Login => vec![
            ("", "── Sign in ──"),
            ("Tab / ↑ / ↓", "Switch field"),
            ("Enter", "Sign in"),
            ("Esc", "Quit"),
        ],
        Screen::Dashboard => vec![
            ("", "── Navigation ──"),
            ("← / → / Tab", "Switch category"),
            ("1 - 4", "Jump to category"),
            ("↑ / ↓ / j / k", "Move selection"),
            ("", ""),
            ("", "── Cards ──"),
            ("Enter", "Open / close card"),
            ("Esc", "Close card"),
            ("/", "Search the library"),
            ("r", "Reload"),
            ("", ""),
            ("", "── Account ──"),
            ("a", "Admin panel (admins)"),
            ("o", "Sign out"),
            ("L", "Sign in again"),
            ("", ""),
            ("", "── General ──"),
            ("H / ?", "Toggle this help"),
            ("Q", "Quit"),
        ],
        Screen::Admin => vec![
            ("", "── Navigation ──"),
            ("Tab / ← / →", "Switch section"),
            ("↑ / ↓", "Move selection"),
            ("Esc / b", "Back to dashboard"),
            ("", ""),
            ("", "── Actions ──"),
            ("n", "New entry"),
            ("e", "Edit entry"),
            ("d", "Delete entry"),
            ("A / R", "Archive / restore video"),
            ("r", "Refresh"),
            ("L", "Sign in again"),
            ("", ""),
            ("", "── Forms ──"),
            ("Tab / ↑ / ↓", "Next / previous field"),
            ("← / →", "Cycle choice"),
            ("Enter", "Submit"),
            ("Esc", "Cancel"),
            ("", ""),
            ("", "── General ──"),
            ("H / ?", "Toggle this help"),
            ("Q", "Quit"),
        ],
    }
}

pub fn render_help_popup(frame: &mut Frame, screen: Screen) {
    let area = frame.area();
    let keybindings = keybindings(screen);

    let popup_height = (keybindings.len() as u16 + 2).min(area.height.saturating_sub(4));
    let popup_area = centered_rect(area, 62, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                // Section header or empty line
                Line::from(Span::styled(
                    format!("{:^38}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (H or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}

pub fn render_confirm_prompt(frame: &mut Frame, prompt: &ConfirmPrompt) {
    let area = frame.area();
    let message = prompt.message();
    let popup_width = (message.chars().count() as u16 + 6).clamp(30, 70);
    let popup_area = centered_rect(area, popup_width, 5);

    frame.render_widget(Clear, popup_area);

    let widget = Paragraph::new(message)
        .wrap(Wrap { trim: true })
        .centered()
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Confirm ")
                .title_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        );
    frame.render_widget(widget, popup_area);
}

fn field_text(kind: &FieldKind, value: &str) -> String {
    match kind {
        FieldKind::Secret => mask(value),
        FieldKind::Choice(_) => format!("< {} >", value),
        FieldKind::File if value.is_empty() => "path to a local file".to_string(),
        _ => value.to_string(),
    }
}

pub fn render_form(frame: &mut Frame, form: &FormState) {
    let area = frame.area();

    let mut lines: Vec<Line> = Vec::new();
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let marker = if field.required { "*" } else { " " };
        let label_style = if focused {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let value_style = match field.kind {
            FieldKind::File if field.value.is_empty() => Style::default().fg(Color::DarkGray),
            _ if focused => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            _ => Style::default().fg(Color::White),
        };
        let cursor = if focused && !field.is_choice() { "▏" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("{:>18}{} ", field.label, marker), label_style),
            Span::styled(field_text(&field.kind, &field.value), value_style),
            Span::styled(cursor, label_style),
        ]));
    }

    lines.push(Line::raw(""));
    if form.submitting {
        lines.push(Line::styled("Saving...", Style::default().fg(Color::Yellow)));
    } else if let Some(ref error) = form.error {
        lines.push(Line::styled(error.clone(), Style::default().fg(Color::Red)));
    } else {
        lines.push(Line::styled(
            "Enter save · Esc cancel · * required",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let popup_height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_area = centered_rect(area, 70, popup_height);

    frame.render_widget(Clear, popup_area);

    let title = format!(" {} ", form.kind.title());
    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green))
                .title(title)
                .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        );
    frame.render_widget(widget, popup_area);
}
