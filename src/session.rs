use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::bank::{Question, QuestionBank};
use crate::error::{ConfigurationError, IllegalEventError};
use crate::round::{Advance, Phase, RoundInput, RoundState, Transition};
use crate::timer::{Timer, TimerNotice};

pub use crate::round::SessionSummary;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub total_questions: usize,
    pub seconds_per_question: u32,
    /// Pause between starting a game and showing the first question.
    pub start_delay: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            total_questions: 10,
            seconds_per_question: 30,
            start_delay: Duration::from_secs(1),
        }
    }
}

impl SessionSettings {
    /// Reject settings no game can be played with.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.total_questions == 0 {
            return Err(ConfigurationError::NoQuestionsRequested);
        }
        if self.seconds_per_question == 0 {
            return Err(ConfigurationError::NoTimeBudget);
        }
        Ok(())
    }
}

/// Notifications for the presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub enum QuizEvent {
    SessionStarted {
        total_questions: usize,
    },
    QuestionLoaded {
        question: Question,
        ordinal: usize,
        total_questions: usize,
    },
    Tick {
        seconds_remaining: u32,
    },
    AnswerRevealed {
        correct_index: usize,
        selected_index: Option<usize>,
        was_correct: bool,
    },
    ScoreChanged {
        score: u32,
    },
    HintApplied {
        eliminated: Vec<usize>,
    },
    SessionEnded(SessionSummary),
}

/// Runs whole games: draws questions, drives the countdown, feeds player
/// input to the round and decides when the game is over.
///
/// Everything happens on the caller's thread, one command at a time.
#[derive(Debug)]
pub struct SessionController {
    bank: QuestionBank,
    timer: Timer,
    round: RoundState,
    settings: SessionSettings,
    active: bool,
    pending_start: Option<Duration>,
    rng: StdRng,
}

impl SessionController {
    pub fn new(bank: QuestionBank) -> Self {
        Self::with_rng(bank, StdRng::from_entropy())
    }

    /// Deterministic draws and hints, for tests and replays.
    pub fn with_seed(bank: QuestionBank, seed: u64) -> Self {
        Self::with_rng(bank, StdRng::seed_from_u64(seed))
    }

    fn with_rng(bank: QuestionBank, rng: StdRng) -> Self {
        let settings = SessionSettings::default();
        Self {
            bank,
            timer: Timer::new(),
            round: RoundState::new(settings.seconds_per_question),
            settings,
            active: false,
            pending_start: None,
            rng,
        }
    }

    /// Begin a fresh game, discarding whatever game was in progress.
    pub fn start_session(
        &mut self,
        settings: SessionSettings,
    ) -> Result<Vec<QuizEvent>, ConfigurationError> {
        settings.validate()?;
        if settings.total_questions > self.bank.len() {
            let err = ConfigurationError::BankTooSmall {
                requested: settings.total_questions,
                available: self.bank.len(),
            };
            warn!(error = %err, "session will end early");
        }

        self.timer.cancel();
        self.bank.reset();
        self.round = RoundState::new(settings.seconds_per_question);
        self.active = true;
        self.pending_start = Some(settings.start_delay);
        self.settings = settings;

        info!(
            total_questions = self.settings.total_questions,
            seconds_per_question = self.settings.seconds_per_question,
            "session started"
        );

        let mut events = vec![
            QuizEvent::SessionStarted {
                total_questions: self.settings.total_questions,
            },
            QuizEvent::ScoreChanged { score: 0 },
        ];
        if self.settings.start_delay.is_zero() {
            self.pending_start = None;
            events.extend(self.load_next());
        }
        Ok(events)
    }

    /// Feed wall-clock time to the start delay and the question countdown.
    pub fn on_elapsed(&mut self, elapsed: Duration) -> Vec<QuizEvent> {
        if !self.active {
            return vec![];
        }

        let mut events = vec![];
        let mut elapsed = elapsed;
        if let Some(remaining) = self.pending_start {
            if elapsed < remaining {
                self.pending_start = Some(remaining - elapsed);
                return events;
            }
            // Time past the delay counts against the first question.
            self.pending_start = None;
            elapsed -= remaining;
            events.extend(self.load_next());
        }

        for notice in self.timer.advance(elapsed) {
            match notice {
                TimerNotice::Tick(seconds_remaining) => {
                    if self.round.tick(seconds_remaining) {
                        events.push(QuizEvent::Tick { seconds_remaining });
                    }
                }
                TimerNotice::Expired => {
                    if let Ok(more) = self.handle(RoundInput::TimerExpired) {
                        events.extend(more);
                    }
                }
            }
        }
        events
    }

    pub fn select_answer(&mut self, index: usize) -> Result<Vec<QuizEvent>, IllegalEventError> {
        self.handle(RoundInput::AnswerSelected(index))
    }

    pub fn request_hint(&mut self) -> Result<Vec<QuizEvent>, IllegalEventError> {
        self.handle(RoundInput::HintRequested)
    }

    /// Forfeit the current question, exactly as if time had run out.
    pub fn skip(&mut self) -> Result<Vec<QuizEvent>, IllegalEventError> {
        self.handle(RoundInput::SkipRequested)
    }

    /// Move on from a locked round.
    pub fn advance(&mut self) -> Result<Vec<QuizEvent>, IllegalEventError> {
        self.ensure_active("advance")?;
        let next = self
            .round
            .advance(self.settings.total_questions)
            .inspect_err(|e| debug!(error = %e, "discarding advance"))?;

        Ok(match next {
            Advance::NextQuestion => self.load_next(),
            Advance::EndSession => self.end_session(),
        })
    }

    /// Stop the game and report the result. A no-op when nothing is running.
    pub fn end_session(&mut self) -> Vec<QuizEvent> {
        if !self.active {
            return vec![];
        }
        self.active = false;
        self.pending_start = None;
        self.timer.cancel();

        let summary = self.round.end();
        info!(
            final_score = summary.final_score,
            correct_count = summary.correct_count,
            total_questions = summary.total_questions,
            "session ended"
        );
        vec![QuizEvent::SessionEnded(summary)]
    }

    fn ensure_active(&self, event: &str) -> Result<(), IllegalEventError> {
        if self.active {
            Ok(())
        } else {
            debug!(event, "ignoring event outside an active session");
            Err(IllegalEventError::SessionInactive)
        }
    }

    fn handle(&mut self, input: RoundInput) -> Result<Vec<QuizEvent>, IllegalEventError> {
        self.ensure_active(input.name())?;

        let Some(question) = self.round.question_index().and_then(|i| self.bank.get(i)) else {
            let err = IllegalEventError::WrongPhase {
                event: input.name(),
                phase: self.round.phase(),
            };
            debug!(error = %err, "discarding event");
            return Err(err);
        };

        let transition = self
            .round
            .apply(input, question, &mut self.rng)
            .inspect_err(|e| debug!(error = %e, "discarding event"))?;

        let mut events = vec![];
        match transition {
            Transition::Locked(reveal) => {
                self.timer.cancel();
                debug!(?reveal, "round locked");
                events.push(QuizEvent::AnswerRevealed {
                    correct_index: reveal.correct_index,
                    selected_index: reveal.selected_index,
                    was_correct: reveal.was_correct,
                });
                if reveal.points > 0 {
                    events.push(QuizEvent::ScoreChanged {
                        score: self.round.score(),
                    });
                }
            }
            Transition::HintApplied { eliminated, score } => {
                events.push(QuizEvent::HintApplied { eliminated });
                events.push(QuizEvent::ScoreChanged { score });
            }
        }
        Ok(events)
    }

    fn load_next(&mut self) -> Vec<QuizEvent> {
        let drawn = self
            .bank
            .draw_random(&mut self.rng)
            .map(|(index, question)| (index, question.clone()));
        let Some((index, question)) = drawn else {
            let err = ConfigurationError::BankExhausted {
                played: self.round.ordinal(),
                requested: self.settings.total_questions,
            };
            warn!(error = %err, "ending session early");
            self.round.load(None);
            return self.end_session();
        };

        self.round.load(Some(index));
        self.timer.start(self.settings.seconds_per_question);
        debug!(index, ordinal = self.round.ordinal(), "question loaded");

        vec![
            QuizEvent::QuestionLoaded {
                question,
                ordinal: self.round.ordinal(),
                total_questions: self.settings.total_questions,
            },
            QuizEvent::Tick {
                seconds_remaining: self.settings.seconds_per_question,
            },
        ]
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_starting(&self) -> bool {
        self.pending_start.is_some()
    }

    pub fn phase(&self) -> Phase {
        self.round.phase()
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.round.question_index().and_then(|i| self.bank.get(i))
    }

    pub fn score(&self) -> u32 {
        self.round.score()
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }
}
