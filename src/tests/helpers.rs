//! Shared test utilities for word streams and trait tables

use crate::{
    stream::{Edition, VerseRef, WordToken},
    traits::TraitStore,
};

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

pub fn builtin_store() -> TraitStore {
    TraitStore::builtin().expect("built-in trait tables load")
}

pub fn verse(reference: &str) -> VerseRef {
    reference.parse().expect("valid verse reference")
}

/// One token per lexical id, indexed from 1.
pub fn id_words(edition: Edition, location: &VerseRef, ids: &[u32]) -> Vec<WordToken> {
    ids.iter()
        .enumerate()
        .map(|(idx, id)| {
            WordToken::new(edition, location.clone(), idx + 1, format!("w{id}")).with_lex_ids([*id])
        })
        .collect()
}

/// One token per surface form, indexed from 1.
pub fn surface_words(edition: Edition, location: &VerseRef, words: &[&str]) -> Vec<WordToken> {
    words
        .iter()
        .enumerate()
        .map(|(idx, word)| WordToken::new(edition, location.clone(), idx + 1, *word))
        .collect()
}

/// Deterministic pseudo-random id sequences for property checks: a small linear congruential
/// generator so that failures reproduce.
pub fn id_sequences(count: usize, max_len: usize, alphabet: u32) -> Vec<Vec<u32>> {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 33) as u32
    };
    (0..count)
        .map(|_| {
            let len = (next() as usize) % (max_len + 1);
            (0..len).map(|_| next() % alphabet + 1).collect()
        })
        .collect()
}
