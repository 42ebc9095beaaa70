use std::collections::BTreeSet;
use std::time::Duration;

use crate::app::audio::{AudioBase, AudioLocation, CacheBust, cache_bust_nonce};
use crate::app::playlist::Playlist;

use super::media::{MediaElement, MediaError, MediaEvent, ReadyState};
use super::retry::{Clock, PendingTimer, RetryPolicy, TimerAction};

pub(crate) const PLAYBACK_RATES: [f32; 6] = [1.0, 1.25, 1.5, 1.75, 2.0, 0.75];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlayerState {
    Idle,
    Paused,
    Playing,
    Retrying { attempt: u32 },
    Completed,
    Errored(MediaError),
}

/// Drives one media element through the playlist: auto-advance, manual
/// control, bounded retries. All timers are polled from `tick`.
pub(crate) struct PlaybackController<M, C> {
    playlist: Playlist,
    audio: AudioBase,
    media: M,
    clock: C,
    policy: RetryPolicy,
    state: PlayerState,
    current: usize,
    completed: BTreeSet<usize>,
    user_interacted: bool,
    last_error: Option<MediaError>,
    saved_offset: Duration,
    // Automatic retries spent on the current chapter.
    failures: u32,
    rate_index: usize,
    playthrough: u64,
    pending: Option<PendingTimer>,
    notice: Option<&'static str>,
}

impl<M: MediaElement, C: Clock> PlaybackController<M, C> {
    pub(crate) fn new(
        playlist: Playlist,
        audio: AudioBase,
        media: M,
        clock: C,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            playlist,
            audio,
            media,
            clock,
            policy,
            state: PlayerState::Idle,
            current: 0,
            completed: BTreeSet::new(),
            user_interacted: false,
            last_error: None,
            saved_offset: Duration::ZERO,
            failures: 0,
            rate_index: 0,
            playthrough: 0,
            pending: None,
            notice: None,
        }
    }

    pub(crate) fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub(crate) fn state(&self) -> &PlayerState {
        &self.state
    }

    pub(crate) fn current_chapter(&self) -> usize {
        self.current
    }

    pub(crate) fn completed(&self) -> &BTreeSet<usize> {
        &self.completed
    }

    pub(crate) fn has_user_interacted(&self) -> bool {
        self.user_interacted
    }

    pub(crate) fn last_error(&self) -> Option<&MediaError> {
        self.last_error.as_ref()
    }

    pub(crate) fn is_completed(&self) -> bool {
        self.state == PlayerState::Completed
    }

    pub(crate) fn is_waiting_for_media(&self) -> bool {
        matches!(
            self.pending,
            Some(PendingTimer {
                action: TimerAction::AutoPlay { .. },
                ..
            })
        )
    }

    pub(crate) fn playback_rate(&self) -> f32 {
        PLAYBACK_RATES[self.rate_index]
    }

    /// Bumped on every restart; lets views reset per-playthrough state.
    pub(crate) fn playthrough(&self) -> u64 {
        self.playthrough
    }

    pub(crate) fn position(&self) -> Duration {
        match self.state {
            PlayerState::Playing => self.media.current_time(),
            _ => self.saved_offset,
        }
    }

    pub(crate) fn error_message(&self) -> Option<&'static str> {
        match &self.state {
            PlayerState::Errored(err) => Some(err.user_message()),
            _ => None,
        }
    }

    pub(crate) fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    pub(crate) fn current_location(&self) -> Option<AudioLocation> {
        self.playlist
            .get(self.current)
            .map(|chapter| self.audio.locate(&chapter.asset, CacheBust::None))
    }

    pub(crate) fn status_label(&self) -> String {
        match &self.state {
            PlayerState::Idle => "Ready".to_string(),
            PlayerState::Paused => "Paused".to_string(),
            PlayerState::Playing if self.is_waiting_for_media() => {
                "Loading next chapter...".to_string()
            }
            PlayerState::Playing => "Playing".to_string(),
            PlayerState::Retrying { attempt } => format!(
                "Retrying playback ({attempt}/{})",
                self.policy.max_attempts()
            ),
            PlayerState::Completed => "Finished".to_string(),
            PlayerState::Errored(_) => "Error".to_string(),
        }
    }

    pub(crate) fn toggle_play_pause(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        match self.state {
            PlayerState::Completed => self.restart(),
            PlayerState::Playing => {
                self.media.pause();
                self.saved_offset = self.media.current_time();
                self.pending = None;
                self.state = PlayerState::Paused;
                tracing::debug!(chapter = self.current, offset = ?self.saved_offset, "paused");
            }
            PlayerState::Retrying { .. } => {
                self.pending = None;
                self.state = PlayerState::Paused;
            }
            PlayerState::Idle | PlayerState::Paused | PlayerState::Errored(_) => {
                self.mark_interacted();
                if self.state == PlayerState::Idle {
                    self.load_current(CacheBust::None);
                }
                self.failures = 0;
                self.notice = None;
                if self.media.current_time() != self.saved_offset {
                    self.media.seek(self.saved_offset);
                }
                self.attempt_play();
            }
        }
    }

    /// Manual escape hatch: cache-busted reload of the current chapter from the start.
    pub(crate) fn force_retry(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        tracing::info!(chapter = self.current, "forcing audio reload");
        self.mark_interacted();
        self.pending = None;
        self.failures = 0;
        self.notice = None;
        self.saved_offset = Duration::ZERO;
        self.load_current(CacheBust::Nonce(cache_bust_nonce()));
        self.media.seek(Duration::ZERO);
        self.attempt_play();
    }

    pub(crate) fn jump_to(&mut self, index: usize) {
        if index >= self.playlist.len() {
            return;
        }
        let resume = matches!(
            self.state,
            PlayerState::Playing | PlayerState::Retrying { .. }
        );
        self.pending = None;
        self.failures = 0;
        self.notice = None;
        self.current = index;
        self.saved_offset = Duration::ZERO;
        self.load_current(CacheBust::None);
        if resume && self.user_interacted {
            self.attempt_play();
        } else {
            self.state = PlayerState::Paused;
        }
    }

    pub(crate) fn next_chapter(&mut self) {
        self.jump_to(self.current + 1);
    }

    pub(crate) fn previous_chapter(&mut self) {
        if let Some(previous) = self.current.checked_sub(1) {
            self.jump_to(previous);
        }
    }

    pub(crate) fn cycle_playback_rate(&mut self) -> f32 {
        self.rate_index = (self.rate_index + 1) % PLAYBACK_RATES.len();
        let rate = PLAYBACK_RATES[self.rate_index];
        self.media.set_playback_rate(rate);
        rate
    }

    /// Leaving the reading view: stop now and forget the session.
    pub(crate) fn reset(&mut self) {
        self.media.stop();
        if self.rate_index != 0 {
            self.media.set_playback_rate(PLAYBACK_RATES[0]);
        }
        self.state = PlayerState::Idle;
        self.current = 0;
        self.completed.clear();
        self.user_interacted = false;
        self.last_error = None;
        self.saved_offset = Duration::ZERO;
        self.failures = 0;
        self.rate_index = 0;
        self.playthrough = 0;
        self.pending = None;
        self.notice = None;
    }

    pub(crate) fn tick(&mut self) {
        while let Some(event) = self.media.poll_event() {
            self.handle_event(event);
        }

        let Some(timer) = self.pending else {
            return;
        };
        if self.clock.now() < timer.due {
            return;
        }
        self.pending = None;
        if timer.chapter != self.current {
            tracing::debug!(
                scheduled = timer.chapter,
                current = self.current,
                "dropping stale playback timer"
            );
            return;
        }
        match timer.action {
            TimerAction::RetryPlay { attempt } => self.fire_retry(attempt),
            TimerAction::AutoPlay { poll } => self.fire_auto_play(poll),
        }
    }

    fn handle_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::Ended => self.finish_chapter(),
            MediaEvent::Error(err) => {
                if self.state == PlayerState::Playing {
                    self.saved_offset = self.media.current_time();
                    self.handle_failure(err);
                } else {
                    tracing::debug!(chapter = self.current, error = %err, "media error while not playing");
                    self.last_error = Some(err);
                }
            }
            MediaEvent::Stalled => {
                if self.state == PlayerState::Playing {
                    self.saved_offset = self.media.current_time();
                    self.handle_failure(MediaError::Network("playback stalled".to_string()));
                }
            }
            MediaEvent::Paused => {
                if self.state == PlayerState::Playing {
                    self.saved_offset = self.media.current_time();
                    self.pending = None;
                    self.state = PlayerState::Paused;
                }
            }
            MediaEvent::Playing => {
                if self.state == PlayerState::Paused {
                    self.state = PlayerState::Playing;
                }
            }
        }
    }

    fn finish_chapter(&mut self) {
        let was_playing = self.state == PlayerState::Playing;
        let finished = self.current;
        self.completed.insert(finished);
        self.saved_offset = Duration::ZERO;
        self.pending = None;
        self.failures = 0;

        if finished + 1 < self.playlist.len() {
            self.current = finished + 1;
            self.load_current(CacheBust::None);
            if was_playing && self.user_interacted {
                self.state = PlayerState::Playing;
                self.schedule(TimerAction::AutoPlay { poll: 0 }, Duration::ZERO);
            } else {
                self.state = PlayerState::Paused;
            }
            tracing::debug!(finished, next = self.current, "chapter finished");
        } else {
            self.media.pause();
            self.state = PlayerState::Completed;
            tracing::info!(chapters = self.playlist.len(), "narration completed");
        }
    }

    fn restart(&mut self) {
        tracing::info!("restarting narration");
        self.current = 0;
        self.completed.clear();
        self.playthrough += 1;
        self.saved_offset = Duration::ZERO;
        self.failures = 0;
        self.pending = None;
        self.last_error = None;
        self.notice = None;
        self.mark_interacted();
        self.load_current(CacheBust::None);
        self.media.seek(Duration::ZERO);
        self.attempt_play();
    }

    fn fire_retry(&mut self, attempt: u32) {
        tracing::info!(chapter = self.current, attempt, "retrying playback");
        self.load_current(CacheBust::Retry(attempt));
        self.media.seek(self.saved_offset);
        self.attempt_play();
    }

    fn fire_auto_play(&mut self, poll: u32) {
        if self.state != PlayerState::Playing {
            return;
        }
        if self.media.ready_state() >= ReadyState::CanPlay {
            self.attempt_play();
            return;
        }
        let next = poll + 1;
        if next < self.policy.readiness_polls {
            self.schedule(
                TimerAction::AutoPlay { poll: next },
                self.policy.readiness_delay * next,
            );
        } else {
            tracing::warn!(chapter = self.current, polls = next, "next chapter never became ready");
            self.state = PlayerState::Paused;
            self.notice = Some("The next chapter is still loading. Press Space to continue.");
        }
    }

    fn attempt_play(&mut self) {
        match self.media.play() {
            Ok(()) => {
                self.state = PlayerState::Playing;
                self.last_error = None;
                self.pending = None;
            }
            Err(err) => self.handle_failure(err),
        }
    }

    fn handle_failure(&mut self, err: MediaError) {
        tracing::warn!(chapter = self.current, failures = self.failures, error = %err, "playback failed");
        self.pending = None;
        self.last_error = Some(err.clone());
        self.media.pause();
        if err.is_transient() {
            let attempt = self.failures + 1;
            if let Some(delay) = self.policy.delay_for(attempt) {
                self.failures = attempt;
                self.state = PlayerState::Retrying { attempt };
                self.schedule(TimerAction::RetryPlay { attempt }, delay);
                return;
            }
        }
        self.state = PlayerState::Errored(err);
    }

    fn schedule(&mut self, action: TimerAction, delay: Duration) {
        self.pending = Some(PendingTimer {
            due: self.clock.now() + delay,
            chapter: self.current,
            action,
        });
    }

    fn load_current(&mut self, bust: CacheBust) {
        let Some(chapter) = self.playlist.get(self.current) else {
            return;
        };
        let location = self.audio.locate(&chapter.asset, bust);
        tracing::debug!(chapter = self.current, source = %location, "loading chapter audio");
        self.media.load(&location);
    }

    fn mark_interacted(&mut self) {
        if !self.user_interacted {
            self.user_interacted = true;
            tracing::debug!("first user interaction recorded");
        }
    }
}

#[cfg(test)]
impl<M, C> PlaybackController<M, C> {
    pub(crate) fn is_playing(&self) -> bool {
        self.state == PlayerState::Playing
    }

    pub(crate) fn saved_offset(&self) -> Duration {
        self.saved_offset
    }

    pub(crate) fn media(&self) -> &M {
        &self.media
    }

    pub(crate) fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }
}
