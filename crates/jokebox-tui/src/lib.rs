// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use jokebox_app::{AppCommand, AppEvent, EmojiPicker, FetchTicket, Joke, Page, Panel, SessionState};
use jokebox_source::FetchError;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);
const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];
const FAVORITE_ROWS: u16 = 2;

/// Runs fetches off the UI thread. Implementations must eventually send
/// exactly one `InternalEvent::JokeFetched` per ticket.
pub trait AppRuntime {
    fn spawn_fetch(&mut self, ticket: FetchTicket, tx: Sender<InternalEvent>) -> Result<()>;
}

#[derive(Debug)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    JokeFetched {
        generation: u64,
        outcome: Result<Joke, FetchError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    favorites_cursor: usize,
    help_visible: bool,
    status_token: u64,
    tick: u64,
}

pub fn run_app<R: AppRuntime, P: EmojiPicker>(
    state: &mut SessionState,
    runtime: &mut R,
    picker: &mut P,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();
    info!("ui started");

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, picker, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }
        view_data.tick = view_data.tick.wrapping_add(1);

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    info!(favorites = state.favorites.len(), "ui stopped");
    result
}

fn process_internal_events<P: EmojiPicker>(
    state: &mut SessionState,
    view_data: &mut ViewData,
    picker: &mut P,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::JokeFetched {
                generation,
                outcome,
            } => {
                let events = state.apply_fetch(generation, outcome, picker);
                if events.is_empty() {
                    debug!(generation, "dropped stale joke result");
                }
                after_events(view_data, tx, &events);
            }
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut SessionState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    let events = state.dispatch(AppCommand::SetStatus(message.into()));
    after_events(view_data, internal_tx, &events);
}

fn after_events(view_data: &mut ViewData, internal_tx: &Sender<InternalEvent>, events: &[AppEvent]) {
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::StatusUpdated(_)))
    {
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
    }
}

fn dispatch<R: AppRuntime>(
    state: &mut SessionState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = state.dispatch(command);
    for event in &events {
        match event {
            AppEvent::FetchRequested(ticket) => {
                if let Err(error) = runtime.spawn_fetch(*ticket, internal_tx.clone()) {
                    let _ = internal_tx.send(InternalEvent::JokeFetched {
                        generation: ticket.generation(),
                        outcome: Err(FetchError::new(format!("start fetch: {error:#}"))),
                    });
                }
            }
            AppEvent::FavoriteRemoved(_) => clamp_favorites_cursor(state, view_data),
            AppEvent::PageChanged(page) => debug!(page = page.label(), "page changed"),
            AppEvent::FetchAbandoned { generation } => {
                debug!(generation, "abandoned in-flight fetch");
            }
            _ => {}
        }
    }
    after_events(view_data, internal_tx, &events);
}

fn clamp_favorites_cursor(state: &SessionState, view_data: &mut ViewData) {
    let last = state.favorites.len().saturating_sub(1);
    view_data.favorites_cursor = view_data.favorites_cursor.min(last);
}

fn handle_key_event<R: AppRuntime>(
    state: &mut SessionState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            view_data.help_visible = false;
        }
        return false;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => return true,
        (KeyCode::Char('?'), _) => {
            view_data.help_visible = true;
            return false;
        }
        _ => {}
    }

    match state.page {
        Page::Home => {
            if key.code == KeyCode::Enter {
                dispatch(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    AppCommand::StartJokeSession,
                );
            }
        }
        Page::JokeView => handle_joke_key(state, runtime, view_data, internal_tx, key),
    }
    false
}

fn handle_joke_key<R: AppRuntime>(
    state: &mut SessionState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('h') => {
            dispatch(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::NavigateHome,
            );
        }
        KeyCode::Char(' ') | KeyCode::Char('v') => {
            dispatch(state, runtime, view_data, internal_tx, AppCommand::Reveal);
        }
        KeyCode::Char('s') => {
            dispatch(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::AddFavorite,
            );
        }
        KeyCode::Char('n') | KeyCode::Enter => {
            if state.loading {
                emit_status(state, view_data, internal_tx, "still fetching");
                return;
            }
            dispatch(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::RequestNewJoke,
            );
        }
        KeyCode::Char('r') => {
            if state.error.is_none() {
                return;
            }
            dispatch(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::RequestNewJoke,
            );
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if view_data.favorites_cursor + 1 < state.favorites.len() {
                view_data.favorites_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.favorites_cursor = view_data.favorites_cursor.saturating_sub(1);
        }
        KeyCode::Char('d') => {
            let Some(favorite) = state.favorites.get(view_data.favorites_cursor) else {
                emit_status(state, view_data, internal_tx, "nothing saved yet");
                return;
            };
            let id = favorite.id();
            dispatch(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::RemoveFavorite(id),
            );
        }
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &SessionState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(frame.area());

    match state.page {
        Page::Home => {
            let area = centered_rect(70, 60, layout[0]);
            let home = Paragraph::new(render_home_text())
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title("jokebox"));
            frame.render_widget(home, area);
        }
        Page::JokeView => render_joke_page(frame, layout[0], state, view_data),
    }

    let status_widget = Paragraph::new(status_text(state))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[1]);

    if view_data.help_visible {
        let area = centered_rect(60, 50, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_joke_page(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &SessionState,
    view_data: &ViewData,
) {
    let favorites_height = if state.favorites.is_empty() {
        0
    } else {
        u16::try_from(state.favorites.len())
            .unwrap_or(u16::MAX)
            .saturating_mul(FAVORITE_ROWS)
            .saturating_add(2)
            .min(area.height / 2)
    };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(favorites_height),
        ])
        .split(area);

    let panel_style = match state.panel() {
        Panel::Failed(_) => Style::default().fg(Color::Red),
        Panel::Loading => Style::default().fg(Color::DarkGray),
        _ => Style::default(),
    };
    let panel = Paragraph::new(render_panel_text(state, view_data.tick))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .style(panel_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("esc back home"),
        );
    frame.render_widget(panel, layout[0]);

    if let Some(actions) = render_actions_text(state) {
        let saved_style = if state.is_current_saved() {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Magenta)
        };
        let actions = Paragraph::new(actions)
            .alignment(Alignment::Center)
            .style(saved_style)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(actions, layout[1]);
    }

    if !state.favorites.is_empty() {
        let visible_rows = layout[2].height.saturating_sub(2);
        let offset = favorites_scroll(view_data.favorites_cursor, visible_rows);
        let favorites = Paragraph::new(render_favorites_text(state, view_data.favorites_cursor))
            .scroll((offset, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("saved collection"),
            );
        frame.render_widget(favorites, layout[2]);
    }
}

fn render_home_text() -> String {
    [
        "",
        ":)",
        "",
        "Need a laugh?",
        "",
        "Discover random jokes to brighten your day.",
        "Simple, fast, and occasionally funny.",
        "",
        "enter get started",
    ]
    .join("\n")
}

fn render_panel_text(state: &SessionState, tick: u64) -> String {
    match state.panel() {
        Panel::Idle => String::new(),
        Panel::Loading => {
            let frame = SPINNER_FRAMES[(tick % SPINNER_FRAMES.len() as u64) as usize];
            format!("\n{frame}\n\nFETCHING JOKE...")
        }
        Panel::Failed(error) => format!("\n{error}\n\nr try again"),
        Panel::Showing {
            joke,
            emoji,
            revealed,
        } => {
            let mut out = format!("\n{emoji}\n\nTHE SETUP\n\n\"{}\"\n\n", joke.setup);
            if revealed {
                out.push_str("THE PUNCHLINE\n\n");
                out.push_str(&joke.punchline);
            } else {
                out.push_str("space reveal answer");
            }
            out
        }
    }
}

fn render_actions_text(state: &SessionState) -> Option<String> {
    if state.loading || state.current_joke.is_none() {
        return None;
    }
    let save = if state.is_current_saved() {
        "saved"
    } else if state.can_favorite() {
        "s save"
    } else {
        "(reveal to save)"
    };
    Some(format!("{save}   |   n next joke"))
}

/// First line to draw so the selected entry's rows fit in `visible_rows`.
/// Entries are not wrapped, so each occupies exactly `FAVORITE_ROWS` lines.
fn favorites_scroll(cursor: usize, visible_rows: u16) -> u16 {
    let cursor = u16::try_from(cursor).unwrap_or(u16::MAX);
    let selected_end = cursor.saturating_add(1).saturating_mul(FAVORITE_ROWS);
    selected_end.saturating_sub(visible_rows)
}

fn render_favorites_text(state: &SessionState, cursor: usize) -> String {
    state
        .favorites
        .iter()
        .enumerate()
        .map(|(index, favorite)| {
            let marker = if index == cursor { ">" } else { " " };
            format!(
                "{marker} {} {}\n    {}",
                favorite.emoji, favorite.joke.setup, favorite.joke.punchline
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn status_text(state: &SessionState) -> String {
    let hints = match state.page {
        Page::Home => "enter start | ? help | q quit",
        Page::JokeView => "space reveal | s save | n next | j/k d saved | esc home | ? help",
    };
    let saved = state.favorites.len();
    match &state.status_line {
        Some(status) => format!("{status} | saved:{saved} | {hints}"),
        None => format!("saved:{saved} | {hints}"),
    }
}

fn help_overlay_text() -> &'static str {
    "global: q or ctrl+q quit | ? help\n\
home: enter get started\n\
joke: space/v reveal | s save | n/enter next joke | r retry after error | esc/h home\n\
saved: j/k move | d remove"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
