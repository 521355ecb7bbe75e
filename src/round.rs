use rand::Rng;

use crate::bank::{Question, ANSWER_COUNT};
use crate::error::IllegalEventError;
use crate::scoring;

/// Where the current round stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Loading,
    AwaitingAnswer,
    Locked,
    SessionEnding,
}

/// Events the round reacts to while a question is up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundInput {
    AnswerSelected(usize),
    HintRequested,
    TimerExpired,
    SkipRequested,
}

impl RoundInput {
    pub fn name(&self) -> &'static str {
        match self {
            RoundInput::AnswerSelected(_) => "select answer",
            RoundInput::HintRequested => "hint",
            RoundInput::TimerExpired => "timer expiry",
            RoundInput::SkipRequested => "skip",
        }
    }
}

/// What the player gets to see once a round locks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reveal {
    pub correct_index: usize,
    pub selected_index: Option<usize>,
    pub was_correct: bool,
    pub points: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    Locked(Reveal),
    HintApplied { eliminated: Vec<usize>, score: u32 },
}

/// Where `advance` leads from a locked round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    NextQuestion,
    EndSession,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub final_score: u32,
    pub correct_count: u32,
    /// Rounds actually played, which is lower than requested when the bank ran dry.
    pub total_questions: usize,
}

/// Per-question state machine: Loading -> AwaitingAnswer -> Locked -> (Loading | SessionEnding).
///
/// The score carries across rounds; everything else resets when a question loads.
/// The current question is kept as an index into the bank that owns it.
#[derive(Debug, Clone)]
pub struct RoundState {
    phase: Phase,
    question: Option<usize>,
    score: u32,
    ordinal: usize,
    budget_secs: u32,
    seconds_remaining: u32,
    answer_locked: bool,
    hint_used: bool,
    eliminated: Vec<usize>,
    reveal: Option<Reveal>,
}

impl RoundState {
    pub fn new(budget_secs: u32) -> Self {
        Self {
            phase: Phase::Loading,
            question: None,
            score: 0,
            ordinal: 0,
            budget_secs,
            seconds_remaining: budget_secs,
            answer_locked: false,
            hint_used: false,
            eliminated: vec![],
            reveal: None,
        }
    }

    /// Install a freshly drawn question, or end the session when the draw came back empty.
    pub fn load(&mut self, drawn: Option<usize>) -> Phase {
        match drawn {
            Some(index) => {
                self.question = Some(index);
                self.ordinal += 1;
                self.seconds_remaining = self.budget_secs;
                self.answer_locked = false;
                self.hint_used = false;
                self.eliminated.clear();
                self.reveal = None;
                self.phase = Phase::AwaitingAnswer;
            }
            None => self.phase = Phase::SessionEnding,
        }
        self.phase
    }

    /// Record a countdown tick. Ignored once the answer is locked.
    pub fn tick(&mut self, seconds_remaining: u32) -> bool {
        if self.phase != Phase::AwaitingAnswer || self.answer_locked {
            return false;
        }
        self.seconds_remaining = seconds_remaining.min(self.seconds_remaining);
        true
    }

    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        input: RoundInput,
        question: &Question,
        rng: &mut R,
    ) -> Result<Transition, IllegalEventError> {
        if self.answer_locked {
            return Err(IllegalEventError::AnswerLocked);
        }
        if self.phase != Phase::AwaitingAnswer {
            return Err(IllegalEventError::WrongPhase {
                event: input.name(),
                phase: self.phase,
            });
        }

        match input {
            RoundInput::AnswerSelected(index) => {
                if index >= ANSWER_COUNT || self.eliminated.contains(&index) {
                    return Err(IllegalEventError::InvalidAnswer { index });
                }
                let was_correct = question.is_correct(index);
                let points = if was_correct {
                    scoring::correct_answer_points(question.difficulty)
                } else {
                    scoring::incorrect_or_timeout_points()
                };
                Ok(Transition::Locked(self.lock(question, Some(index), was_correct, points)))
            }
            RoundInput::HintRequested => {
                if self.hint_used {
                    return Err(IllegalEventError::HintAlreadyUsed);
                }
                self.hint_used = true;
                self.eliminated = scoring::hint_eliminations(question.correct_index, rng);
                self.score = scoring::apply_hint_penalty(self.score);
                Ok(Transition::HintApplied {
                    eliminated: self.eliminated.clone(),
                    score: self.score,
                })
            }
            RoundInput::TimerExpired | RoundInput::SkipRequested => Ok(Transition::Locked(
                self.lock(question, None, false, scoring::incorrect_or_timeout_points()),
            )),
        }
    }

    fn lock(
        &mut self,
        question: &Question,
        selected_index: Option<usize>,
        was_correct: bool,
        points: u32,
    ) -> Reveal {
        self.answer_locked = true;
        self.phase = Phase::Locked;
        self.score = self.score.saturating_add(points);

        let reveal = Reveal {
            correct_index: question.correct_index,
            selected_index,
            was_correct,
            points,
        };
        self.reveal = Some(reveal.clone());
        reveal
    }

    /// Leave a locked round, either towards the next question or the end of the session.
    pub fn advance(&mut self, total_questions: usize) -> Result<Advance, IllegalEventError> {
        if self.phase != Phase::Locked {
            return Err(IllegalEventError::WrongPhase {
                event: "advance",
                phase: self.phase,
            });
        }
        if self.ordinal < total_questions {
            self.phase = Phase::Loading;
            Ok(Advance::NextQuestion)
        } else {
            self.phase = Phase::SessionEnding;
            Ok(Advance::EndSession)
        }
    }

    pub fn end(&mut self) -> SessionSummary {
        self.phase = Phase::SessionEnding;
        self.summary()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            final_score: self.score,
            correct_count: scoring::correct_count(self.score),
            total_questions: self.ordinal,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn question_index(&self) -> Option<usize> {
        self.question
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn is_locked(&self) -> bool {
        self.answer_locked
    }

    pub fn hint_used(&self) -> bool {
        self.hint_used
    }

    pub fn eliminated(&self) -> &[usize] {
        &self.eliminated
    }

    pub fn reveal(&self) -> Option<&Reveal> {
        self.reveal.as_ref()
    }
}
