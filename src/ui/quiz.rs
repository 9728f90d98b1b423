use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::quiz::Session;

use super::render_controls;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = app.session() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_progress(frame, chunks[0], session);
    render_progress_bar(frame, chunks[1], session);
    render_question_text(frame, chunks[3], &session.current_question().prompt);
    render_options(frame, chunks[4], session, app.highlighted());

    let controls = if !session.is_current_answered() {
        "j/k navigate  ·  enter select  ·  1-9 answer  ·  x exit  ·  q quit"
    } else if session.is_last() {
        "enter view results  ·  x exit  ·  q quit"
    } else {
        "enter next question  ·  x exit  ·  q quit"
    };
    render_controls(frame, chunks[5], controls);
}

fn render_progress(frame: &mut Frame, area: Rect, session: &Session) {
    let chunks = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);

    let progress = Paragraph::new(format!(
        "Question {} of {}",
        session.cursor() + 1,
        session.len()
    ))
    .fg(Color::White)
    .bold();
    let score = Paragraph::new(format!("Score: {}", session.score()))
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);

    frame.render_widget(progress, chunks[0]);
    frame.render_widget(score, chunks[1]);
}

fn render_progress_bar(frame: &mut Frame, area: Rect, session: &Session) {
    let ratio = (session.cursor() + 1) as f64 / session.len() as f64;
    let widget = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
        .ratio(ratio.clamp(0.0, 1.0))
        .label("");
    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, session: &Session, highlighted: usize) {
    let question = session.current_question();
    let answer = session.current_answer();
    let mut lines: Vec<Line> = Vec::with_capacity(question.options.len() * 2);

    for (index, option) in question.options.iter().enumerate() {
        let (marker, style, mark) = match answer {
            None if index == highlighted => (">", Style::default().fg(Color::Cyan).bold(), ""),
            None => (" ", Style::default().fg(Color::Gray), ""),
            Some(_) if index == question.correct => {
                (" ", Style::default().fg(Color::Green).bold(), "  ✓")
            }
            Some(chosen) if index == chosen => (">", Style::default().fg(Color::Red).bold(), "  ✗"),
            Some(_) => (" ", Style::default().fg(Color::DarkGray), ""),
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", index + 1), style),
            Span::styled(option.as_str(), style),
            Span::styled(mark, style),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray)
            .padding(Padding::vertical(1)),
    );
    frame.render_widget(widget, area);
}
