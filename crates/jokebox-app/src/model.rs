// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Deserialize;

use crate::ids::JokeId;

pub const FETCH_FAILED_MESSAGE: &str = "Failed to load. Check connection.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    JokeView,
}

impl Page {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::JokeView => "joke",
        }
    }
}

/// A setup/punchline pair as served by the joke source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Joke {
    pub id: JokeId,
    pub setup: String,
    pub punchline: String,
    /// Category label from the source. Display only.
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Joke {
    pub fn new(id: i64, setup: &str, punchline: &str) -> Self {
        Self {
            id: JokeId::new(id),
            setup: setup.to_owned(),
            punchline: punchline.to_owned(),
            kind: String::new(),
        }
    }
}

/// A joke copied into the saved collection, tagged with the emoji that was
/// on screen when it was saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteJoke {
    pub joke: Joke,
    pub emoji: &'static str,
}

impl FavoriteJoke {
    pub const fn id(&self) -> JokeId {
        self.joke.id
    }
}

/// What the joke screen's main panel should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel<'a> {
    Idle,
    Loading,
    Failed(&'a str),
    Showing {
        joke: &'a Joke,
        emoji: &'static str,
        revealed: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::{Joke, JokeId};

    #[test]
    fn joke_decodes_source_payload() {
        let raw = r#"{"type":"general","setup":"S","punchline":"P","id":7}"#;
        let joke: Joke = serde_json::from_str(raw).expect("payload should decode");
        assert_eq!(joke.id, JokeId::new(7));
        assert_eq!(joke.setup, "S");
        assert_eq!(joke.punchline, "P");
        assert_eq!(joke.kind, "general");
    }

    #[test]
    fn joke_type_is_optional() {
        let raw = r#"{"setup":"S","punchline":"P","id":1}"#;
        let joke: Joke = serde_json::from_str(raw).expect("payload should decode");
        assert!(joke.kind.is_empty());
    }
}
