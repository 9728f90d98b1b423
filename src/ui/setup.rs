use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::quiz::QuizMode;

use super::{list_scroll, render_controls};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let category_mode = app.configurator().mode() == Some(QuizMode::Category);
    let category_height = if category_mode {
        app.bank().categories().len() as u16 + 2
    } else {
        0
    };

    let chunks = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Max(category_height),
        Constraint::Length(4),
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], app);
    render_modes(frame, chunks[1], app);
    if category_mode {
        render_categories(frame, chunks[2], app);
    }
    render_count(frame, chunks[3], app);
    render_start(frame, chunks[4], app);
    render_controls(
        frame,
        chunks[6],
        "a all · c by category · j/k move · space toggle · h/l count · b browse · q quit",
    );
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let content = vec![
        Line::from(Span::styled(
            "QUIZ PREP",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} questions available", app.bank().len()),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(
        Paragraph::new(content).alignment(Alignment::Center),
        area,
    );
}

fn render_modes(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).split(area);
    let current = app.configurator().mode();

    let cards = [
        (QuizMode::All, "[a] All Questions", "Practice with every question"),
        (QuizMode::Category, "[c] By Category", "Choose specific topics"),
    ];

    for (chunk, (mode, title, description)) in chunks.iter().zip(cards) {
        let active = current == Some(mode);
        let border = if active { Color::Cyan } else { Color::DarkGray };
        let title_style = if active {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::White)
        };

        let widget = Paragraph::new(vec![
            Line::from(Span::styled(title, title_style)),
            Line::from(description.fg(Color::DarkGray)),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .padding(Padding::horizontal(1)),
        );
        frame.render_widget(widget, *chunk);
    }
}

fn render_categories(frame: &mut Frame, area: Rect, app: &App) {
    let config = app.configurator();
    let lines: Vec<Line> = app
        .bank()
        .categories()
        .iter()
        .enumerate()
        .map(|(index, category)| {
            let under_cursor = index == app.category_cursor();
            let selected = config.is_selected(&category.id);
            let marker = if under_cursor { ">" } else { " " };
            let check = if selected { "[x]" } else { "[ ]" };
            let style = match (under_cursor, selected) {
                (true, _) => Style::default().fg(Color::Cyan).bold(),
                (false, true) => Style::default().fg(Color::White),
                (false, false) => Style::default().fg(Color::Gray),
            };
            let count = app.bank().questions_in(&category.id).count();

            Line::from(vec![
                Span::styled(format!(" {} {} ", marker, check), style),
                Span::styled(category.name.as_str(), style),
                Span::styled(format!("  ({})", count), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Color::DarkGray)
        .title(" Select Categories ")
        .title_style(Style::default().fg(Color::Cyan));
    if !config.selected_categories().is_empty() {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {} questions available ", app.max_selectable()),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let visible = area.height.saturating_sub(2) as usize;
    let scroll = list_scroll(app.category_cursor(), visible);
    let widget = Paragraph::new(lines).block(block).scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn render_count(frame: &mut Frame, area: Rect, app: &App) {
    let limit = app.count_limit();
    let content = vec![
        Line::from(vec![
            Span::styled("◀ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                app.question_count().to_string(),
                Style::default().fg(Color::White).bold(),
            ),
            Span::styled(" ▶", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(Span::styled(
            format!("1 to {} questions", limit.max(1)),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .title(" Number of Questions ")
            .title_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(widget, area);
}

fn render_start(frame: &mut Frame, area: Rect, app: &App) {
    let line = if app.can_start() {
        Line::from(vec![
            Span::styled("ENTER", Style::default().fg(Color::Green).bold()),
            Span::styled(" to start", Style::default().fg(Color::DarkGray)),
        ])
    } else {
        let hint = match app.configurator().mode() {
            None => "Choose a mode to start",
            Some(_) => "Select a category with questions to start",
        };
        Line::from(hint.fg(Color::DarkGray))
    };

    let widget = Paragraph::new(line).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::app::{Action, Settings};
    use crate::data::Bank;

    #[test]
    fn test_category_cursor_stays_on_screen() {
        let questions: Vec<String> = (0..30)
            .map(|n| {
                format!(r#"{{"question": "Q{n}", "options": ["x", "y"], "correct": 0, "category": "c{n}"}}"#)
            })
            .collect();
        let categories: Vec<String> = (0..30)
            .map(|n| format!(r#"{{"id": "c{n}", "name": "Topic{n}"}}"#))
            .collect();
        let json = format!(
            r#"{{"questions": [{}], "categories": [{}]}}"#,
            questions.join(","),
            categories.join(",")
        );
        let mut app = App::new(Bank::from_json_str(&json).unwrap(), Settings::default());
        app.update(Action::SelectMode(QuizMode::Category));
        for _ in 0..29 {
            app.update(Action::NextCategory);
        }

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, area, &app);
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Topic29"));
    }
}
