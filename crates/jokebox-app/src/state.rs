// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    DEFAULT_EMOJI, EmojiPicker, FETCH_FAILED_MESSAGE, FavoriteJoke, Joke, JokeId, Page, Panel,
    pick_emoji,
};

/// Handle for one fetch. A result is only applied while its generation is
/// still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub page: Page,
    pub current_joke: Option<Joke>,
    pub current_emoji: &'static str,
    pub revealed: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub favorites: Vec<FavoriteJoke>,
    pub status_line: Option<String>,
    generation: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            page: Page::Home,
            current_joke: None,
            current_emoji: DEFAULT_EMOJI,
            revealed: false,
            loading: false,
            error: None,
            favorites: Vec::new(),
            status_line: None,
            generation: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NavigateHome,
    StartJokeSession,
    RequestNewJoke,
    Reveal,
    AddFavorite,
    RemoveFavorite(JokeId),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    PageChanged(Page),
    FetchRequested(FetchTicket),
    FetchAbandoned { generation: u64 },
    JokeLoaded(JokeId),
    FetchFailed,
    PunchlineRevealed,
    FavoriteAdded(JokeId),
    FavoriteRemoved(JokeId),
    StatusUpdated(String),
    StatusCleared,
}

impl SessionState {
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NavigateHome => self.navigate_home(),
            AppCommand::StartJokeSession => {
                self.page = Page::JokeView;
                let mut events = vec![AppEvent::PageChanged(self.page)];
                events.extend(self.request_new_joke());
                events
            }
            AppCommand::RequestNewJoke => self.request_new_joke(),
            AppCommand::Reveal => self.reveal(),
            AppCommand::AddFavorite => self.add_favorite(),
            AppCommand::RemoveFavorite(id) => self.remove_favorite(id),
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    /// Applies the outcome of the fetch started under `generation`. Results
    /// from a superseded fetch are dropped without touching state.
    pub fn apply_fetch<E>(
        &mut self,
        generation: u64,
        outcome: Result<Joke, E>,
        picker: &mut impl EmojiPicker,
    ) -> Vec<AppEvent> {
        if generation != self.generation || !self.loading {
            return Vec::new();
        }

        self.loading = false;
        match outcome {
            Ok(joke) => {
                let id = joke.id;
                self.current_joke = Some(joke);
                self.current_emoji = pick_emoji(picker);
                self.revealed = false;
                vec![AppEvent::JokeLoaded(id)]
            }
            Err(_) => {
                self.current_joke = None;
                self.error = Some(FETCH_FAILED_MESSAGE.to_owned());
                vec![AppEvent::FetchFailed]
            }
        }
    }

    pub fn panel(&self) -> Panel<'_> {
        if self.loading {
            return Panel::Loading;
        }
        if let Some(error) = &self.error {
            return Panel::Failed(error);
        }
        match &self.current_joke {
            Some(joke) => Panel::Showing {
                joke,
                emoji: self.current_emoji,
                revealed: self.revealed,
            },
            None => Panel::Idle,
        }
    }

    pub fn is_saved(&self, id: JokeId) -> bool {
        self.favorites.iter().any(|favorite| favorite.id() == id)
    }

    pub fn is_current_saved(&self) -> bool {
        self.current_joke
            .as_ref()
            .is_some_and(|joke| self.is_saved(joke.id))
    }

    pub fn can_favorite(&self) -> bool {
        self.revealed && self.current_joke.is_some() && !self.is_current_saved()
    }

    fn navigate_home(&mut self) -> Vec<AppEvent> {
        self.page = Page::Home;
        let mut events = vec![AppEvent::PageChanged(self.page)];
        let abandoned = self.generation;
        self.generation = self.generation.wrapping_add(1);
        if self.loading {
            self.loading = false;
            events.push(AppEvent::FetchAbandoned {
                generation: abandoned,
            });
        }
        events
    }

    fn request_new_joke(&mut self) -> Vec<AppEvent> {
        self.generation = self.generation.wrapping_add(1);
        self.loading = true;
        self.error = None;
        self.current_joke = None;
        self.revealed = false;
        vec![AppEvent::FetchRequested(FetchTicket {
            generation: self.generation,
        })]
    }

    fn reveal(&mut self) -> Vec<AppEvent> {
        if self.revealed || self.loading || self.current_joke.is_none() {
            return Vec::new();
        }
        self.revealed = true;
        vec![AppEvent::PunchlineRevealed]
    }

    fn add_favorite(&mut self) -> Vec<AppEvent> {
        let Some(joke) = self.current_joke.clone() else {
            return Vec::new();
        };
        if !self.revealed {
            return vec![self.set_status("reveal the punchline first")];
        }
        if self.is_saved(joke.id) {
            return vec![self.set_status("already saved")];
        }

        let favorite = FavoriteJoke {
            joke,
            emoji: self.current_emoji,
        };
        let id = favorite.id();
        self.favorites.push(favorite);
        vec![AppEvent::FavoriteAdded(id), self.set_status("saved")]
    }

    fn remove_favorite(&mut self, id: JokeId) -> Vec<AppEvent> {
        let before = self.favorites.len();
        self.favorites.retain(|favorite| favorite.id() != id);
        if self.favorites.len() == before {
            return Vec::new();
        }
        vec![AppEvent::FavoriteRemoved(id), self.set_status("removed")]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
