// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use jokebox_app::{EmojiPicker, Joke, JokeId};
use jokebox_source::{FetchError, JokeSource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

const SETUPS: [&str; 12] = [
    "Why did the scarecrow win an award?",
    "What do you call a fake noodle?",
    "Why don't skeletons fight each other?",
    "What do you call cheese that isn't yours?",
    "Why couldn't the bicycle stand up by itself?",
    "How does a penguin build its house?",
    "Why did the math book look sad?",
    "What do you call a bear with no teeth?",
    "Why do programmers prefer dark mode?",
    "What did the ocean say to the beach?",
    "Why did the coffee file a police report?",
    "What do you call a sleeping dinosaur?",
];

const PUNCHLINES: [&str; 12] = [
    "He was outstanding in his field.",
    "An impasta.",
    "They don't have the guts.",
    "Nacho cheese.",
    "It was two tired.",
    "Igloos it together.",
    "It had too many problems.",
    "A gummy bear.",
    "Because light attracts bugs.",
    "Nothing, it just waved.",
    "It got mugged.",
    "A dino-snore.",
];

const KINDS: [&str; 3] = ["general", "programming", "knock-knock"];

/// Produces plausible jokes with unique, increasing ids.
#[derive(Debug, Clone)]
pub struct JokeFaker {
    rng: StdRng,
    next_id: i64,
}

impl JokeFaker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            next_id: 1,
        }
    }

    pub fn joke(&mut self) -> Joke {
        let index = self.rng.gen_range(0..SETUPS.len());
        let kind = KINDS[self.rng.gen_range(0..KINDS.len())];
        let id = self.next_id;
        self.next_id += 1;
        Joke {
            id: JokeId::new(id),
            setup: SETUPS[index].to_owned(),
            punchline: PUNCHLINES[index].to_owned(),
            kind: kind.to_owned(),
        }
    }
}

/// A `JokeSource` that replays queued outcomes in order. An empty queue
/// fails like an unreachable server.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    outcomes: Mutex<VecDeque<Result<Joke, String>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_joke(&self, joke: Joke) {
        self.queue().push_back(Ok(joke));
    }

    pub fn push_failure(&self, detail: &str) {
        self.queue().push_back(Err(detail.to_owned()));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn queue(&self) -> MutexGuard<'_, VecDeque<Result<Joke, String>>> {
        match self.outcomes.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl JokeSource for ScriptedSource {
    fn fetch_random_joke(&self) -> Result<Joke, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.queue().pop_front() {
            Some(Ok(joke)) => Ok(joke),
            Some(Err(detail)) => Err(FetchError::new(detail)),
            None => Err(FetchError::new("script exhausted")),
        }
    }
}

/// Always picks the same palette slot.
#[derive(Debug, Clone, Copy)]
pub struct FixedPicker(pub usize);

impl EmojiPicker for FixedPicker {
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 { 0 } else { self.0 % len }
    }
}

#[cfg(test)]
mod tests {
    use super::{FixedPicker, JokeFaker, ScriptedSource};
    use jokebox_app::{EMOJI_PALETTE, Joke, pick_emoji};
    use jokebox_source::JokeSource;
    use std::collections::BTreeSet;

    #[test]
    fn same_seed_replays_same_jokes() {
        let mut left = JokeFaker::new(42);
        let mut right = JokeFaker::new(42);
        for _ in 0..8 {
            assert_eq!(left.joke(), right.joke());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let setups = |seed| {
            let mut faker = JokeFaker::new(seed);
            (0..8).map(|_| faker.joke().setup).collect::<Vec<_>>()
        };
        assert_ne!(setups(0), setups(1));
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut faker = JokeFaker::new(5);
        let ids: Vec<i64> = (0..20).map(|_| faker.joke().id.get()).collect();
        assert_eq!(ids, (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn variety_across_seeds() {
        let mut setups = BTreeSet::new();
        for seed in 0_u64..20_u64 {
            let mut faker = JokeFaker::new(seed);
            setups.insert(faker.joke().setup);
        }
        assert!(setups.len() > 3, "only {} distinct setups", setups.len());
    }

    #[test]
    fn scripted_source_replays_then_fails() {
        let source = ScriptedSource::new();
        source.push_joke(Joke::new(1, "S", "P"));
        source.push_failure("offline");

        assert_eq!(source.fetch_random_joke().ok(), Some(Joke::new(1, "S", "P")));
        let error = source.fetch_random_joke().expect_err("scripted failure");
        assert_eq!(error.detail(), "offline");
        let exhausted = source.fetch_random_joke().expect_err("empty script");
        assert_eq!(exhausted.detail(), "script exhausted");
        assert_eq!(source.calls(), 3);
    }

    #[test]
    fn fixed_picker_wraps() {
        assert_eq!(pick_emoji(&mut FixedPicker(3)), EMOJI_PALETTE[3]);
        assert_eq!(
            pick_emoji(&mut FixedPicker(EMOJI_PALETTE.len() + 1)),
            EMOJI_PALETTE[1]
        );
    }
}
