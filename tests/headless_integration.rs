use std::collections::HashSet;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use quizr::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use quizr::{QuestionBank, QuizEvent, SessionController, SessionSettings, SessionSummary};

fn bank(n: usize) -> QuestionBank {
    let records = (0..n)
        .map(|i| {
            serde_json::json!({
                "question": format!("Question {i}?"),
                "answers": ["w", "x", "y", "z"],
                "correct": i % 4,
                "difficulty": 1 + i % 3,
            })
        })
        .collect::<Vec<_>>();
    QuestionBank::from_value(serde_json::Value::Array(records)).unwrap()
}

fn settings(total_questions: usize, seconds_per_question: u32) -> SessionSettings {
    SessionSettings {
        total_questions,
        seconds_per_question,
        start_delay: Duration::ZERO,
    }
}

fn ended(events: &[QuizEvent]) -> Option<SessionSummary> {
    events.iter().find_map(|e| match e {
        QuizEvent::SessionEnded(s) => Some(*s),
        _ => None,
    })
}

fn key(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

// Keys and ticks go through the same Runner the terminal loop uses.
#[test]
fn headless_session_driven_by_runner() {
    let mut ctl = SessionController::with_seed(bank(6), 99);
    ctl.start_session(settings(3, 30)).unwrap();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    // answer, advance, answer, advance, skip, advance
    for c in ['1', 'n', '2', 'n', 's', 'n'] {
        tx.send(key(c)).unwrap();
    }

    let mut summary = None;
    for _ in 0..100u32 {
        let events = match runner.step() {
            AppEvent::Tick => ctl.on_elapsed(Duration::from_millis(5)),
            AppEvent::Resize => vec![],
            AppEvent::Key(k) => match k.code {
                KeyCode::Char(c @ '1'..='4') => ctl
                    .select_answer(c as usize - '1' as usize)
                    .unwrap_or_default(),
                KeyCode::Char('s') => ctl.skip().unwrap_or_default(),
                KeyCode::Char('n') => ctl.advance().unwrap_or_default(),
                _ => vec![],
            },
        };
        if let Some(s) = ended(&events) {
            summary = Some(s);
            break;
        }
    }

    let summary = summary.expect("session should have ended");
    assert_eq!(summary.total_questions, 3);
    assert!(!ctl.is_active());
}

#[test]
fn timer_expiry_locks_round_without_input() {
    let mut ctl = SessionController::with_seed(bank(5), 1);
    ctl.start_session(settings(5, 1)).unwrap();

    let (_tx, rx) = mpsc::channel::<AppEvent>();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(10)),
    );

    let mut revealed = None;
    for _ in 0..200u32 {
        if let AppEvent::Tick = runner.step() {
            for event in ctl.on_elapsed(Duration::from_millis(10)) {
                if let QuizEvent::AnswerRevealed { .. } = event {
                    revealed = Some(event);
                }
            }
        }
        if revealed.is_some() {
            break;
        }
    }

    match revealed {
        Some(QuizEvent::AnswerRevealed {
            selected_index,
            was_correct,
            ..
        }) => {
            assert_eq!(selected_index, None);
            assert!(!was_correct);
        }
        other => panic!("expected a reveal, got {other:?}"),
    }
    assert_eq!(ctl.score(), 0);
}

#[test]
fn five_question_bank_ends_early_when_ten_requested() {
    let mut ctl = SessionController::with_seed(bank(5), 5);
    ctl.start_session(settings(10, 30)).unwrap();

    let mut seen = HashSet::new();
    let mut summary = None;
    for _ in 0..10 {
        seen.insert(ctl.round().question_index().unwrap());
        let correct = ctl.current_question().unwrap().correct_index;
        ctl.select_answer(correct).unwrap();
        let events = ctl.advance().unwrap();
        if let Some(s) = ended(&events) {
            summary = Some(s);
            break;
        }
    }

    let summary = summary.unwrap();
    assert_eq!(seen.len(), 5);
    assert_eq!(summary.total_questions, 5);
    // difficulties 1,2,3,1,2 => 90 points
    assert_eq!(summary.final_score, 90);
    assert_eq!(summary.correct_count, 9);
}

#[test]
fn restarting_after_end_plays_a_fresh_game() {
    let mut ctl = SessionController::with_seed(bank(5), 8);
    ctl.start_session(settings(1, 30)).unwrap();
    ctl.skip().unwrap();
    assert!(ended(&ctl.advance().unwrap()).is_some());

    let events = ctl.start_session(settings(1, 30)).unwrap();

    assert!(events
        .iter()
        .any(|e| matches!(e, QuizEvent::QuestionLoaded { ordinal: 1, .. })));
    assert!(ctl.is_active());
}
