use std::sync::mpsc;

use crossterm::event::KeyCode;

use crate::content::Content;

use super::super::audio::probe_location;
use super::super::text::word_count;
use super::{Controller, Page, ProbeResult, UiState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum KeyOutcome {
    Continue,
    Quit,
}

pub(super) fn status_info(msg: &str) -> String {
    format!("INFO: {msg}")
}

pub(super) fn status_error(msg: &str) -> String {
    format!("ERROR: {msg}")
}

pub(super) fn handle_home_key(
    code: KeyCode,
    ui: &mut UiState,
    content: &Content,
    controller: &mut Controller,
) -> KeyOutcome {
    match code {
        KeyCode::Enter | KeyCode::Char('r') => open_page(ui, controller, Page::Reading),
        KeyCode::Char('s') => open_page(ui, controller, Page::Summary),
        KeyCode::Char(digit @ '1'..='9') => {
            let question = digit as usize - '1' as usize;
            if let Some(start) = controller.playlist().question_start(question) {
                open_page(ui, controller, Page::Reading);
                controller.jump_to(start);
            }
        }
        KeyCode::Char('x') => {
            tracing::info!("share requested");
            ui.status = status_info(&content.share_message());
        }
        KeyCode::Up | KeyCode::Char('k') => ui.home_scroll = ui.home_scroll.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => ui.home_scroll = ui.home_scroll.saturating_add(1),
        _ => {}
    }
    KeyOutcome::Continue
}

pub(super) fn handle_reading_key(
    code: KeyCode,
    ui: &mut UiState,
    controller: &mut Controller,
    probe_tx: &mpsc::Sender<ProbeResult>,
) -> KeyOutcome {
    match code {
        KeyCode::Char(' ') => {
            if controller.playlist().is_empty() {
                ui.status = status_error("Nothing to play.");
            } else {
                let restarting = controller.is_completed();
                let first_play = !controller.has_user_interacted();
                controller.toggle_play_pause();
                if restarting {
                    ui.status = status_info("Starting again from the first question.");
                } else if first_play {
                    ui.status = status_info("Narration started. Space pauses, f changes speed.");
                }
            }
        }
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => go_back(ui, controller),
        KeyCode::Char('s') => open_page(ui, controller, Page::Summary),
        KeyCode::Right | KeyCode::Char('n') => controller.next_chapter(),
        KeyCode::Left | KeyCode::Char('p') => controller.previous_chapter(),
        KeyCode::Up | KeyCode::Char('k') => scroll_transcript(ui, -1),
        KeyCode::Down | KeyCode::Char('j') => scroll_transcript(ui, 1),
        KeyCode::PageUp => scroll_transcript(ui, -10),
        KeyCode::PageDown => scroll_transcript(ui, 10),
        KeyCode::Char('+') | KeyCode::Char('f') => {
            let rate = controller.cycle_playback_rate();
            ui.status = status_info(&format!("Playback speed {rate}x"));
        }
        KeyCode::Char('r') => {
            controller.force_retry();
            ui.status = status_info("Reloading audio from the start of the chapter.");
        }
        KeyCode::Char('t') => spawn_probe(ui, controller, probe_tx),
        _ => {}
    }
    KeyOutcome::Continue
}

pub(super) fn handle_summary_key(
    code: KeyCode,
    ui: &mut UiState,
    content: &Content,
    controller: &mut Controller,
) -> KeyOutcome {
    match code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => go_back(ui, controller),
        KeyCode::Char('r') | KeyCode::Enter => open_page(ui, controller, Page::Reading),
        KeyCode::Char(' ') => ui.summary.revealed = word_count(&content.candidate.summary),
        KeyCode::Up | KeyCode::Char('k') => ui.summary.scroll = ui.summary.scroll.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => {
            ui.summary.scroll = ui.summary.scroll.saturating_add(1)
        }
        _ => {}
    }
    KeyOutcome::Continue
}

pub(super) fn open_page(ui: &mut UiState, controller: &mut Controller, page: Page) {
    let from = ui.nav.current();
    if from == page {
        return;
    }
    leave_page(from, ui, controller);
    ui.nav.push(page);
    enter_page(page, ui);
}

pub(super) fn go_back(ui: &mut UiState, controller: &mut Controller) {
    let from = ui.nav.current();
    if !ui.nav.back() {
        return;
    }
    leave_page(from, ui, controller);
    enter_page(ui.nav.current(), ui);
}

fn leave_page(page: Page, ui: &mut UiState, controller: &mut Controller) {
    if page == Page::Reading {
        controller.reset();
        ui.reading.reset();
        ui.probe_pending = false;
        ui.probe_session = ui.probe_session.wrapping_add(1);
        tracing::debug!("left reading view, playback reset");
    }
}

fn enter_page(page: Page, ui: &mut UiState) {
    match page {
        Page::Reading => {
            ui.reading.reset();
            ui.status = status_info("Press Space to start narration.");
        }
        Page::Summary => {
            ui.summary.revealed = 0;
            ui.summary.scroll = 0;
            ui.status = status_info("Press Space to show the full summary.");
        }
        Page::Home => ui.status = status_info("Ready."),
    }
}

fn scroll_transcript(ui: &mut UiState, delta: i32) {
    let Some(viewport) = ui.reading.viewport else {
        return;
    };
    ui.reading
        .sync
        .scroll_by(delta, &ui.reading.spans, viewport);
}

fn spawn_probe(ui: &mut UiState, controller: &Controller, tx: &mpsc::Sender<ProbeResult>) {
    if ui.probe_pending {
        ui.status = status_info("Audio test already running...");
        return;
    }
    let Some(location) = controller.current_location() else {
        ui.status = status_error("No chapter selected.");
        return;
    };
    ui.probe_pending = true;
    ui.status = status_info(&format!("Testing {location}..."));
    let session = ui.probe_session;
    let chapter = controller.current_chapter();
    let tx = tx.clone();
    std::thread::spawn(move || {
        let outcome = probe_location(&location, 2);
        let _ = tx.send(ProbeResult {
            session,
            chapter,
            outcome,
        });
    });
}

pub(super) fn drain_probe_results(rx: &mpsc::Receiver<ProbeResult>, ui: &mut UiState) {
    while let Ok(result) = rx.try_recv() {
        if !ui.probe_pending || result.session != ui.probe_session {
            tracing::debug!(
                chapter = result.chapter,
                session = result.session,
                "discarding audio test from previous session"
            );
            continue;
        }
        ui.probe_pending = false;
        ui.status = match result.outcome {
            Ok(message) => {
                tracing::info!(chapter = result.chapter, "audio test passed");
                status_info(&message)
            }
            Err(err) => {
                tracing::warn!(chapter = result.chapter, error = %err, "audio test failed");
                status_error(&format!("Audio test failed for chapter {}: {err}", result.chapter + 1))
            }
        };
    }
}
