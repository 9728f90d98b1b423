use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::{App, BrowseRow};

use super::{PREVIEW_LENGTH, render_controls, truncate};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], app);
    render_categories(frame, chunks[1], app);
    render_controls(
        frame,
        chunks[2],
        "j/k move  ·  enter expand/collapse  ·  b back  ·  q quit",
    );
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let bank = app.bank();
    let content = vec![
        Line::from(Span::styled(
            "ALL QUESTIONS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(Span::styled(
            format!(
                "{} questions total across {} categories",
                bank.len(),
                bank.categories().len()
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(
        Paragraph::new(content).alignment(Alignment::Center),
        area,
    );
}

fn render_categories(frame: &mut Frame, area: Rect, app: &App) {
    let bank = app.bank();
    let rows = app.browse_rows();
    let mut lines: Vec<Line> = Vec::new();
    let mut cursor_line = 0;

    for (row_index, row) in rows.iter().enumerate() {
        let under_cursor = row_index == app.browse_cursor();

        match *row {
            BrowseRow::Category(index) => {
                let Some(category) = bank.categories().get(index) else {
                    continue;
                };
                let expanded = app.is_expanded(&category.id);
                let count = bank.questions_in(&category.id).count();
                let style = if under_cursor {
                    Style::default().fg(Color::Cyan).bold()
                } else {
                    Style::default().fg(Color::White)
                };

                if index > 0 {
                    lines.push(Line::from(""));
                }
                if under_cursor {
                    cursor_line = lines.len();
                }
                lines.push(Line::from(vec![
                    Span::styled(if under_cursor { " > " } else { "   " }, style),
                    Span::styled(if expanded { "▾ " } else { "▸ " }, style),
                    Span::styled(category.name.as_str(), style),
                    Span::styled(
                        format!("  ({} questions)", count),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]));
            }
            BrowseRow::Question { category, position } => {
                let Some(question) = bank
                    .categories()
                    .get(category)
                    .and_then(|c| bank.questions_in(&c.id).nth(position))
                else {
                    continue;
                };
                let prompt_style = if under_cursor {
                    Style::default().fg(Color::Cyan).bold()
                } else {
                    Style::default().fg(Color::White)
                };

                lines.push(Line::from(""));
                if under_cursor {
                    cursor_line = lines.len();
                }
                lines.push(Line::from(vec![
                    Span::styled(
                        if under_cursor { "   > " } else { "     " },
                        prompt_style,
                    ),
                    Span::styled(
                        format!("{}. ", position + 1),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(truncate(&question.prompt, PREVIEW_LENGTH * 2), prompt_style),
                ]));

                for (option_index, option) in question.options.iter().enumerate() {
                    let text = truncate(option, PREVIEW_LENGTH * 2);
                    let line = if option_index == question.correct {
                        Line::from(vec![
                            Span::styled("        ✓ ", Style::default().fg(Color::Green)),
                            Span::styled(text, Style::default().fg(Color::Green)),
                        ])
                    } else {
                        Line::from(vec![
                            Span::raw("          "),
                            Span::styled(text, Style::default().fg(Color::Gray)),
                        ])
                    };
                    lines.push(line);
                }
            }
        }
    }

    // Keep the cursor row a third of the way down so the lines under it show.
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = cursor_line.saturating_sub(visible / 3);

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray)
                .padding(Padding::horizontal(1)),
        )
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::app::{Action, Settings};
    use crate::data::Bank;

    fn big_bank() -> Bank {
        let questions: Vec<String> = (10..30)
            .map(|n| {
                format!(
                    r#"{{"question": "BigQ{n}", "options": ["x", "y", "z"], "correct": 0, "category": "big"}}"#
                )
            })
            .collect();
        let json = format!(
            r#"{{"questions": [{}, {{"question": "SmallQ", "options": ["x", "y"], "correct": 1, "category": "small"}}],
                "categories": [{{"id": "big", "name": "Big"}}, {{"id": "small", "name": "Small"}}]}}"#,
            questions.join(",")
        );
        Bank::from_json_str(&json).unwrap()
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_every_question_of_an_expanded_category_comes_into_view() {
        let mut app = App::new(big_bank(), Settings::default());
        app.update(Action::OpenBrowse);
        app.update(Action::ToggleExpanded);

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        let mut seen = BTreeSet::new();
        for _ in 0..app.browse_rows().len() {
            terminal
                .draw(|frame| {
                    let area = frame.area();
                    render(frame, area, &app);
                })
                .unwrap();
            let text = screen_text(&terminal);
            for n in 10..30 {
                if text.contains(&format!("BigQ{n}")) {
                    seen.insert(n);
                }
            }
            app.update(Action::BrowseNext);
        }

        let missing: Vec<_> = (10..30).filter(|n| !seen.contains(n)).collect();
        assert!(missing.is_empty(), "never shown: {:?}", missing);
    }
}
