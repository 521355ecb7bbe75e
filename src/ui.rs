pub mod flash;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{App, AppState, Illustration};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// Green with time to spare, yellow in the last ten seconds, red in the last five.
pub fn timer_color(seconds_remaining: u32) -> Color {
    match seconds_remaining {
        s if s > 10 => Color::Green,
        s if s > 5 => Color::Yellow,
        _ => Color::Red,
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn italic() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

fn centered_rows(area: Rect, rows: u16) -> Vec<Rect> {
    let pad = area.height.saturating_sub(rows) / 2;
    let mut constraints = vec![Constraint::Length(pad)];
    constraints.extend((0..rows).map(|_| Constraint::Length(1)));
    constraints.push(Constraint::Min(0));

    Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(constraints)
        .split(area)
        .iter()
        .skip(1)
        .take(rows as usize)
        .copied()
        .collect()
}

pub struct StartingView<'a>(pub &'a App);

impl Widget for StartingView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let app = self.0;
        let rows = centered_rows(area, 3);
        if rows.len() < 3 {
            return;
        }

        Paragraph::new(Span::styled("Get ready!", bold().fg(Color::Cyan)))
            .alignment(Alignment::Center)
            .render(rows[0], buf);

        Paragraph::new(Span::styled(
            format!(
                "{} questions, {} seconds each",
                app.total_questions, app.config.seconds_per_question
            ),
            italic(),
        ))
        .alignment(Alignment::Center)
        .render(rows[2], buf);
    }
}

pub struct QuestionView<'a>(pub &'a App);

impl QuestionView<'_> {
    fn answer_style(&self, idx: usize) -> Style {
        let app = self.0;
        if app.eliminated.contains(&idx) {
            return Style::default().add_modifier(Modifier::DIM | Modifier::CROSSED_OUT);
        }

        let Some(reveal) = &app.reveal else {
            return bold();
        };

        let flashing = reveal.selected_index == Some(idx) && app.flash.is_lit();
        let style = if idx == reveal.correct_index {
            bold().fg(Color::Green)
        } else if reveal.selected_index == Some(idx) {
            bold().fg(Color::Red)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };

        if flashing {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        }
    }

    fn verdict(&self) -> Option<Span<'static>> {
        let app = self.0;
        let reveal = app.reveal.as_ref()?;
        let question = app.question.as_ref()?;
        let correct = &question.answers[reveal.correct_index];

        Some(match reveal.selected_index {
            Some(_) if reveal.was_correct => {
                Span::styled("Correct!".to_string(), bold().fg(Color::Green))
            }
            Some(_) => Span::styled(
                format!("Wrong. The answer was {correct}."),
                bold().fg(Color::Red),
            ),
            None => Span::styled(
                format!("No answer. It was {correct}."),
                bold().fg(Color::Yellow),
            ),
        })
    }
}

impl Widget for QuestionView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let app = self.0;
        let Some(question) = &app.question else {
            return;
        };

        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let question_lines =
            ((question.text.width() as f64 / max_chars_per_line as f64).ceil() as u16).max(1);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1),              // header
                Constraint::Length(1),              // timer
                Constraint::Length(1),              // padding
                Constraint::Length(question_lines), // question
                Constraint::Length(1),              // illustration
                Constraint::Length(1),              // padding
                Constraint::Length(4),              // answers
                Constraint::Length(1),              // padding
                Constraint::Length(1),              // verdict
                Constraint::Min(0),
                Constraint::Length(1), // legend
            ])
            .split(area);

        let dim = Style::default().add_modifier(Modifier::DIM);
        let mut header = vec![
            Span::styled(
                format!("Question {}/{}", app.ordinal, app.total_questions),
                bold(),
            ),
            Span::styled(format!("   {}", question.category), dim),
        ];
        if question.difficulty > 1 {
            header.push(Span::styled(format!("   x{}", question.difficulty), dim));
        }
        header.push(Span::styled(
            format!("   Score {}", app.score),
            bold().fg(Color::Cyan),
        ));
        Paragraph::new(Line::from(header)).render(chunks[0], buf);

        Paragraph::new(Span::styled(
            format!("{}s", app.seconds_remaining),
            bold().fg(timer_color(app.seconds_remaining)),
        ))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        Paragraph::new(Span::styled(question.text.clone(), bold()))
            .alignment(if question_lines == 1 {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true })
            .render(chunks[3], buf);

        if let Some(illustration) = &app.illustration {
            let text = match illustration {
                Illustration::Available(path) => format!("[illustration: {}]", path.display()),
                Illustration::Missing(name) => format!("[illustration unavailable: {name}]"),
            };
            Paragraph::new(Span::styled(text, italic().add_modifier(Modifier::DIM)))
                .alignment(Alignment::Center)
                .render(chunks[4], buf);
        }

        let answers = question
            .answers
            .iter()
            .enumerate()
            .map(|(idx, answer)| {
                Line::from(Span::styled(
                    format!("{}) {}", idx + 1, answer),
                    self.answer_style(idx),
                ))
            })
            .collect::<Vec<_>>();
        Paragraph::new(answers).render(chunks[6], buf);

        if let Some(verdict) = self.verdict() {
            Paragraph::new(verdict)
                .alignment(Alignment::Center)
                .render(chunks[8], buf);
        }

        let legend = match app.state {
            AppState::Reveal => "(enter) next / (esc)ape",
            _ if app.hint_used => "(1-4) answer / (s)kip / (esc)ape",
            _ => "(1-4) answer / (h)int -5 / (s)kip / (esc)ape",
        };
        Paragraph::new(Span::styled(legend, italic())).render(chunks[10], buf);
    }
}

pub struct ResultsView<'a>(pub &'a App);

impl Widget for ResultsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let app = self.0;
        let Some(summary) = &app.summary else {
            return;
        };
        let rows = centered_rows(area, 6);
        if rows.len() < 6 {
            return;
        }

        Paragraph::new(Span::styled("Game over", bold().fg(Color::Cyan)))
            .alignment(Alignment::Center)
            .render(rows[0], buf);

        Paragraph::new(Span::styled(
            format!("Score: {}", summary.final_score),
            bold(),
        ))
        .alignment(Alignment::Center)
        .render(rows[2], buf);

        Paragraph::new(Span::raw(format!(
            "Correct answers: {} of {}",
            summary.correct_count, summary.total_questions
        )))
        .alignment(Alignment::Center)
        .render(rows[3], buf);

        Paragraph::new(Span::styled("(n)ew game / (esc)ape", italic()))
            .alignment(Alignment::Center)
            .render(rows[5], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::test_app;
    use quizr::QuizEvent;

    fn rendered<W: Widget>(widget: W) -> String {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        widget.render(area, &mut buffer);
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_timer_color_thresholds() {
        assert_eq!(timer_color(30), Color::Green);
        assert_eq!(timer_color(11), Color::Green);
        assert_eq!(timer_color(10), Color::Yellow);
        assert_eq!(timer_color(6), Color::Yellow);
        assert_eq!(timer_color(5), Color::Red);
        assert_eq!(timer_color(0), Color::Red);
    }

    #[test]
    fn test_starting_view_announces_game() {
        let mut app = test_app();
        app.start();
        let text = rendered(StartingView(&app));
        assert!(text.contains("Get ready!"));
        assert!(text.contains("5 questions"));
    }

    #[test]
    fn test_question_view_shows_question_and_options() {
        let mut app = test_app();
        app.start();
        app.on_elapsed(std::time::Duration::from_secs(1));
        let question = app.question.clone().unwrap();

        let text = rendered(QuestionView(&app));

        assert!(text.contains("Question 1/5"));
        assert!(text.contains(&question.text));
        assert!(text.contains(&format!("1) {}", question.answers[0])));
        assert!(text.contains("Score 0"));
        assert!(text.contains("30s"));
    }

    #[test]
    fn test_question_view_shows_verdict_after_skip() {
        let mut app = test_app();
        app.start();
        app.on_elapsed(std::time::Duration::from_secs(1));
        app.skip();

        let text = rendered(QuestionView(&app));

        assert!(text.contains("No answer."));
        assert!(text.contains("(enter) next"));
    }

    #[test]
    fn test_results_view_reports_summary() {
        let mut app = test_app();
        app.apply_events(vec![QuizEvent::SessionEnded(quizr::SessionSummary {
            final_score: 40,
            correct_count: 4,
            total_questions: 5,
        })]);

        let text = rendered(ResultsView(&app));

        assert!(text.contains("Score: 40"));
        assert!(text.contains("Correct answers: 4 of 5"));
    }

    #[test]
    fn test_small_area_does_not_panic() {
        let mut app = test_app();
        app.start();
        app.on_elapsed(std::time::Duration::from_secs(1));
        let area = Rect::new(0, 0, 20, 5);
        let mut buffer = Buffer::empty(area);
        QuestionView(&app).render(area, &mut buffer);
        ResultsView(&app).render(area, &mut buffer);
        StartingView(&app).render(area, &mut buffer);
    }
}
