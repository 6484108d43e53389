// src/quiz/shuffle.rs

use rand::{Rng, seq::SliceRandom, thread_rng};

use crate::models::question::QuestionBank;

/// Uniform in-place shuffle (Fisher-Yates) using the calling thread's generator.
///
/// `thread_rng` is thread-local and seeded from the OS, so concurrent session
/// starts never share generator state.
pub fn shuffle<T>(items: &mut [T]) {
    items.shuffle(&mut thread_rng());
}

/// Shuffles question order and then the options of every question.
pub fn shuffle_bank(bank: &mut QuestionBank) {
    shuffle_bank_with(bank, &mut thread_rng());
}

pub fn shuffle_bank_with<R: Rng + ?Sized>(bank: &mut QuestionBank, rng: &mut R) {
    bank.questions.shuffle(rng);
    for question in &mut bank.questions {
        question.options.shuffle(rng);
    }
}
