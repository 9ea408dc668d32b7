// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const EMOJI_PALETTE: [&str; 10] = ["😂", "🤣", "💀", "🤡", "🤪", "🤭", "🤐", "😹", "👀", "✨"];
pub const DEFAULT_EMOJI: &str = "😂";

/// Source of palette indices. Implementations must return a value below `len`.
pub trait EmojiPicker {
    fn pick_index(&mut self, len: usize) -> usize;
}

pub fn pick_emoji(picker: &mut impl EmojiPicker) -> &'static str {
    let index = picker.pick_index(EMOJI_PALETTE.len());
    EMOJI_PALETTE
        .get(index)
        .copied()
        .unwrap_or(DEFAULT_EMOJI)
}

#[derive(Debug, Clone)]
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl EmojiPicker for RandomPicker {
    fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}
