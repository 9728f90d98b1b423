use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::quiz::{ResultsSummary, Session, percentage};

use super::{PREVIEW_LENGTH, grade_color, render_controls, truncate};

const BAR_WIDTH: usize = 20;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let (Some(session), Some(summary)) = (app.session(), app.summary()) else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(5),
        Constraint::Length(9),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], summary);
    render_stats(frame, chunks[1], summary);
    render_timeline(frame, chunks[2], session, app.result_cursor());
    render_categories(frame, chunks[3], app, summary);

    let controls = if summary.has_incorrect() {
        format!(
            "h/l review  ·  r practice {} incorrect  ·  n new quiz  ·  q quit",
            summary.incorrect.len()
        )
    } else {
        "h/l review  ·  n new quiz  ·  q quit".to_string()
    };
    render_controls(frame, chunks[4], &controls);
}

fn render_header(frame: &mut Frame, area: Rect, summary: &ResultsSummary) {
    let content = vec![
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(Span::styled(
            format!("You've completed {} questions", summary.total),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(
        Paragraph::new(content).alignment(Alignment::Center),
        area,
    );
}

fn render_stats(frame: &mut Frame, area: Rect, summary: &ResultsSummary) {
    let chunks = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .split(area);

    let correct_pct = percentage(summary.correct, summary.total);
    let streak_pct = percentage(summary.best_streak, summary.total);
    let cards = [
        (
            format!("{}%", summary.percentage),
            "Overall Score",
            summary.percentage,
        ),
        (summary.correct.to_string(), "Correct Answers", correct_pct),
        (summary.best_streak.to_string(), "Best Streak", streak_pct),
    ];

    for (chunk, (value, label, pct)) in chunks.iter().zip(cards) {
        render_stat_card(frame, *chunk, &value, label, pct);
    }
}

fn render_stat_card(frame: &mut Frame, area: Rect, value: &str, label: &str, pct: u32) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Color::DarkGray)
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(inner);

    frame.render_widget(
        Paragraph::new(value.to_string()).fg(grade_color(pct)).bold(),
        rows[0],
    );
    frame.render_widget(Paragraph::new(label.to_string()).fg(Color::DarkGray), rows[1]);
    frame.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(grade_color(pct)).bg(Color::DarkGray))
            .percent(pct.min(100) as u16)
            .label(""),
        rows[2],
    );
}

fn render_timeline(frame: &mut Frame, area: Rect, session: &Session, cursor: usize) {
    let questions = session.questions();
    let answers = session.answers();

    let marks: Vec<Span> = questions
        .iter()
        .zip(answers)
        .enumerate()
        .map(|(index, (question, answer))| {
            let (symbol, color) = if question.is_correct(*answer) {
                ("✓", Color::Green)
            } else {
                ("✗", Color::Red)
            };
            let mut style = Style::default().fg(color);
            if index == cursor {
                style = style.bold().reversed();
            }
            Span::styled(format!(" {} ", symbol), style)
        })
        .collect();

    let mut lines = vec![Line::from(marks), Line::from("")];

    if let (Some(question), Some(answer)) = (questions.get(cursor), answers.get(cursor)) {
        let correct = question.is_correct(*answer);
        let answer_color = if correct { Color::Green } else { Color::Red };
        let chosen = answer
            .and_then(|a| question.option(a))
            .unwrap_or("no answer");

        lines.push(Line::from(Span::styled(
            format!("Question {}", cursor + 1),
            Style::default().fg(Color::White).bold(),
        )));
        lines.push(Line::from(Span::styled(
            truncate(&question.prompt, PREVIEW_LENGTH * 2),
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::from(vec![
            Span::styled("Your answer: ", Style::default().fg(Color::DarkGray)),
            Span::styled(chosen, Style::default().fg(answer_color)),
        ]));
        if !correct {
            lines.push(Line::from(vec![
                Span::styled("Correct answer: ", Style::default().fg(Color::DarkGray)),
                Span::styled(question.correct_option(), Style::default().fg(Color::Green)),
            ]));
        }
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .title(" Question Timeline ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_categories(frame: &mut Frame, area: Rect, app: &App, summary: &ResultsSummary) {
    let lines: Vec<Line> = summary
        .categories
        .iter()
        .map(|score| {
            let pct = score.percentage();
            let filled = (pct as usize * BAR_WIDTH + 50) / 100;
            let name = app.bank().category_name(&score.category);

            Line::from(vec![
                Span::styled(
                    format!("{:<28}", truncate(name, 25)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("{:>3} of {:<3} correct  ", score.correct, score.total),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled("█".repeat(filled), Style::default().fg(grade_color(pct))),
                Span::styled(
                    "░".repeat(BAR_WIDTH - filled),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!(" {:>3}%", pct),
                    Style::default().fg(grade_color(pct)).bold(),
                ),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .title(" Category Performance ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}
