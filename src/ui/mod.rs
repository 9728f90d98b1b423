mod browse;
mod quiz;
mod result;
mod setup;

use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph},
};

use crate::app::App;
use crate::models::AppState;

const PREVIEW_LENGTH: usize = 60;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.state {
        AppState::Setup => setup::render(frame, area, app),
        AppState::Quiz => quiz::render(frame, area, app),
        AppState::Result => result::render(frame, area, app),
        AppState::Browse => browse::render(frame, area, app),
    }
}

fn grade_color(percentage: u32) -> Color {
    match percentage {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let truncated: String = text.chars().take(max).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

/// First line to show so that `cursor` sits inside a window of `visible` lines.
fn list_scroll(cursor: usize, visible: usize) -> usize {
    (cursor + 1).saturating_sub(visible.max(1))
}

fn render_controls(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text.to_string())
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn test_list_scroll_keeps_cursor_visible() {
        assert_eq!(list_scroll(0, 5), 0);
        assert_eq!(list_scroll(4, 5), 0);
        assert_eq!(list_scroll(5, 5), 1);
        assert_eq!(list_scroll(11, 5), 7);
        assert_eq!(list_scroll(3, 0), 3);
    }

    #[test]
    fn test_grade_color() {
        assert_eq!(grade_color(95), Color::Green);
        assert_eq!(grade_color(70), Color::Cyan);
        assert_eq!(grade_color(50), Color::Yellow);
        assert_eq!(grade_color(10), Color::Red);
    }
}
