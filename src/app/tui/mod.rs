mod actions;
mod render;
mod session;

use std::io;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::content::Content;

use super::config::Settings;
use super::player::{PlaybackController, ProcessMedia, RetryPolicy, SystemClock};
use super::playlist::Playlist;
use super::sync::{ItemSpan, ScrollSync, Viewport};

use self::actions::{
    KeyOutcome, drain_probe_results, handle_home_key, handle_reading_key, handle_summary_key,
    status_info,
};
use self::render::draw_ui;
use self::session::TerminalGuard;

pub(super) type Controller = PlaybackController<ProcessMedia, SystemClock>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Page {
    Home,
    Reading,
    Summary,
}

impl Page {
    pub(crate) fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Reading => "Read me",
            Self::Summary => "Summary",
        }
    }
}

/// Back-stack of visited pages; the root page is never popped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Navigator {
    stack: Vec<Page>,
}

impl Navigator {
    pub(crate) fn new(start: Page) -> Self {
        let stack = match start {
            Page::Home => vec![Page::Home],
            other => vec![Page::Home, other],
        };
        Self { stack }
    }

    pub(crate) fn current(&self) -> Page {
        self.stack.last().copied().unwrap_or(Page::Home)
    }

    pub(crate) fn push(&mut self, page: Page) {
        if self.current() != page {
            self.stack.push(page);
        }
    }

    pub(crate) fn back(&mut self) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        self.stack.pop();
        true
    }
}

#[derive(Debug, Default)]
pub(super) struct ReadingView {
    pub(super) sync: ScrollSync,
    pub(super) playthrough: u64,
    pub(super) spans: Vec<ItemSpan>,
    pub(super) viewport: Option<Viewport>,
    /// Chapter the transcript last scrolled to; manual scrolling sticks until it changes.
    pub(super) followed: Option<usize>,
}

impl ReadingView {
    pub(super) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Records the latest layout and follows the current chapter when it changed.
    pub(super) fn sync_to_chapter(
        &mut self,
        current: usize,
        playthrough: u64,
        spans: Vec<ItemSpan>,
        viewport: Viewport,
    ) -> Option<u16> {
        if self.playthrough != playthrough {
            self.playthrough = playthrough;
            self.sync.reset();
            self.followed = None;
        }
        if self.viewport != Some(viewport) || self.spans != spans {
            self.viewport = Some(viewport);
            self.spans = spans;
        }
        if self.followed == Some(current) {
            return None;
        }
        self.followed = Some(current);
        self.sync.follow(&self.spans, current, viewport)
    }
}

#[derive(Debug, Default)]
pub(super) struct SummaryView {
    pub(super) revealed: usize,
    pub(super) scroll: u16,
}

#[derive(Debug, Clone)]
pub(super) struct ProbeResult {
    /// Reading session the test was started in.
    pub(super) session: u64,
    pub(super) chapter: usize,
    pub(super) outcome: Result<String, String>,
}

pub(super) struct UiState {
    pub(super) nav: Navigator,
    pub(super) home_scroll: u16,
    pub(super) reading: ReadingView,
    pub(super) summary: SummaryView,
    pub(super) status: String,
    pub(super) probe_pending: bool,
    pub(super) probe_session: u64,
}

impl UiState {
    pub(super) fn new(start: Page) -> Self {
        Self {
            nav: Navigator::new(start),
            home_scroll: 0,
            reading: ReadingView::default(),
            summary: SummaryView::default(),
            status: status_info("Ready."),
            probe_pending: false,
            probe_session: 0,
        }
    }
}

pub(crate) fn run_tui(
    content: &Content,
    playlist: Playlist,
    settings: &Settings,
    start: Page,
) -> Result<()> {
    let mut guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("failed to initialize terminal backend")?;
    terminal.clear()?;

    let media = ProcessMedia::new(settings.player.clone());
    let mut controller = PlaybackController::new(
        playlist,
        settings.audio_base.clone(),
        media,
        SystemClock,
        RetryPolicy::for_profile(settings.mobile),
    );
    let mut ui = UiState::new(start);
    let (probe_tx, probe_rx) = mpsc::channel::<ProbeResult>();
    if controller.playlist().is_empty() {
        ui.status = status_info("This letter has no chapters to narrate.");
    }

    loop {
        controller.tick();
        drain_probe_results(&probe_rx, &mut ui);
        if ui.nav.current() == Page::Summary {
            ui.summary.revealed = ui.summary.revealed.saturating_add(3);
        }

        terminal.draw(|frame| draw_ui(frame, content, &controller, &mut ui))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if key.code == KeyCode::Char('q')
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            break;
        }

        let outcome = match ui.nav.current() {
            Page::Home => handle_home_key(key.code, &mut ui, content, &mut controller),
            Page::Reading => handle_reading_key(key.code, &mut ui, &mut controller, &probe_tx),
            Page::Summary => handle_summary_key(key.code, &mut ui, content, &mut controller),
        };
        if outcome == KeyOutcome::Quit {
            break;
        }
    }

    controller.reset();
    guard.restore()?;
    Ok(())
}
