//! Status bar rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::model::NowPlaying;
use super::utils::truncate_string;

pub fn render_status_bar(frame: &mut Frame, area: Rect, now_playing: Option<&NowPlaying>) {
    let (status_text, source) = match now_playing {
        Some(playing) => {
            let source = if playing.from_manifest { " HLS manifest " } else { " direct link " };
            (
                format!(" ▶ {} | {}", playing.title, playing.kind.label()),
                Some((source, playing.location.as_str())),
            )
        }
        None => (" Nothing playing".to_string(), None),
    };

    let width = area.width.saturating_sub(4) as usize;
    let location = source
        .map(|(_, location)| truncate_string(location, width))
        .unwrap_or_default();

    let mut block = Block::default().borders(Borders::ALL).title(status_text);
    if let Some((label, _)) = source {
        block = block.title_bottom(Line::from(label).right_aligned());
    }

    let bar = Paragraph::new(location)
        .style(Style::default().fg(Color::Green))
        .block(block);
    frame.render_widget(bar, area);
}
