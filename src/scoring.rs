//! Pure scoring rules.

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::bank::ANSWER_COUNT;

pub const POINTS_PER_DIFFICULTY: u32 = 10;
pub const HINT_PENALTY: u32 = 5;

/// Saturates at `u32::MAX` for absurd difficulties.
pub fn correct_answer_points(difficulty: u32) -> u32 {
    POINTS_PER_DIFFICULTY.saturating_mul(difficulty)
}

pub fn hint_penalty() -> u32 {
    HINT_PENALTY
}

pub fn incorrect_or_timeout_points() -> u32 {
    0
}

/// Deduct the hint penalty without going below zero.
pub fn apply_hint_penalty(score: u32) -> u32 {
    score.saturating_sub(hint_penalty())
}

/// Correct answers implied by a score, one per ten points.
pub fn correct_count(score: u32) -> u32 {
    score / POINTS_PER_DIFFICULTY
}

/// Two of the three wrong options, picked uniformly, in ascending order.
pub fn hint_eliminations<R: Rng + ?Sized>(correct_index: usize, rng: &mut R) -> Vec<usize> {
    let wrong = (0..ANSWER_COUNT)
        .filter(|i| *i != correct_index)
        .collect::<Vec<_>>();
    wrong
        .choose_multiple(rng, wrong.len() - 1)
        .copied()
        .sorted()
        .collect()
}
