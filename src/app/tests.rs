use std::collections::VecDeque;
use std::ffi::OsString;
use std::time::Duration;

use clap::Parser;

use crate::cli::Cli;
use crate::content::{Content, parse_content};

use super::audio::{AudioBase, AudioLocation};
use super::config::{Settings, detect_mobile};
use super::player::{
    ManualClock, MediaElement, MediaError, MediaEvent, PlaybackController, PlayerCommand,
    PlayerState, ProcessMedia, ReadyState, RetryPolicy, SystemClock,
};
use super::playlist::{Chapter, ChapterKind, Playlist, sequence_asset};
use super::sync::{ItemSpan, Viewport};
use super::text::{reveal_words, wrap_text};
use super::tui::{Navigator, Page, ReadingView};

struct FakeMedia {
    play_results: VecDeque<Result<(), MediaError>>,
    events: VecDeque<MediaEvent>,
    ready: ReadyState,
    loads: Vec<String>,
    seeks: Vec<Duration>,
    plays: usize,
    pauses: usize,
    stops: usize,
    time: Duration,
    rate: f32,
}

impl Default for FakeMedia {
    fn default() -> Self {
        Self {
            play_results: VecDeque::new(),
            events: VecDeque::new(),
            ready: ReadyState::CanPlay,
            loads: Vec::new(),
            seeks: Vec::new(),
            plays: 0,
            pauses: 0,
            stops: 0,
            time: Duration::ZERO,
            rate: 1.0,
        }
    }
}

impl MediaElement for FakeMedia {
    fn load(&mut self, source: &AudioLocation) {
        self.loads.push(source.to_string());
        self.time = Duration::ZERO;
    }

    fn play(&mut self) -> Result<(), MediaError> {
        self.plays += 1;
        self.play_results.pop_front().unwrap_or(Ok(()))
    }

    fn pause(&mut self) {
        self.pauses += 1;
    }

    fn stop(&mut self) {
        self.stops += 1;
        self.time = Duration::ZERO;
    }

    fn seek(&mut self, offset: Duration) {
        self.seeks.push(offset);
        self.time = offset;
    }

    fn current_time(&self) -> Duration {
        self.time
    }

    fn ready_state(&mut self) -> ReadyState {
        self.ready
    }

    fn set_playback_rate(&mut self, rate: f32) {
        self.rate = rate;
    }

    fn poll_event(&mut self) -> Option<MediaEvent> {
        self.events.pop_front()
    }
}

type TestController = PlaybackController<FakeMedia, ManualClock>;

fn chapter(text: &str, kind: ChapterKind, question_index: usize, position: usize) -> Chapter {
    Chapter {
        text: text.to_string(),
        kind,
        question_index,
        bullet_index: None,
        asset: sequence_asset(position),
    }
}

fn three_chapters() -> Playlist {
    Playlist::from_chapters(vec![
        chapter("Why me", ChapterKind::Question, 0, 0),
        chapter("Because", ChapterKind::Bullet, 0, 1),
        chapter("Why now", ChapterKind::Question, 1, 2),
    ])
}

fn controller_with(playlist: Playlist, media: FakeMedia) -> (TestController, ManualClock) {
    let clock = ManualClock::new();
    let controller = PlaybackController::new(
        playlist,
        AudioBase::parse("https://cdn.example.com/audio"),
        media,
        clock.clone(),
        RetryPolicy::desktop(),
    );
    (controller, clock)
}

fn failing(errors: Vec<MediaError>) -> FakeMedia {
    FakeMedia {
        play_results: errors.into_iter().map(Err).collect(),
        ..FakeMedia::default()
    }
}

fn finish_current(controller: &mut TestController) {
    controller.media_mut().events.push_back(MediaEvent::Ended);
    controller.tick();
}

#[test]
fn playlist_flattens_questions_then_bullets() {
    let content = parse_content(
        r#"{"questions": [
            {"question": "Q1", "answer": ["B1"]},
            {"question": "Q2", "answer": []}
        ]}"#,
    )
    .expect("content should parse");
    let playlist = Playlist::build(&content);

    assert_eq!(playlist.len(), 3);
    let positions: Vec<_> = (0..playlist.len())
        .map(|idx| playlist.position(idx).expect("index in range"))
        .collect();
    assert_eq!(positions, vec![(0, None), (0, Some(0)), (1, None)]);
    assert_eq!(playlist.assets(), vec!["01.mp3", "02.mp3", "03.mp3"]);
    assert_eq!(playlist.position(3), None);
}

#[test]
fn canonical_content_audio_files_match_the_chapter_sequence() {
    let content = Content::default();
    let playlist = Playlist::build(&content);
    let expected_len = content
        .questions
        .iter()
        .map(|question| 1 + question.answer.len())
        .sum::<usize>();

    assert_eq!(playlist.len(), expected_len);
    for (idx, chapter) in playlist.chapters().iter().enumerate() {
        assert_eq!(chapter.asset, sequence_asset(idx), "chapter {idx}");
    }
    assert_eq!(playlist.question_start(1), Some(5));
}

#[test]
fn pre_assigned_audio_file_wins_over_derived_name() {
    let content = parse_content(
        r#"{"questions": [
            {"question": "Q1", "answer": ["B1"], "audioFile": "intro.mp3"},
            {"question": "Q2"}
        ]}"#,
    )
    .expect("content should parse");
    let playlist = Playlist::build(&content);
    assert_eq!(playlist.assets(), vec!["intro.mp3", "02.mp3", "03.mp3"]);
}

#[test]
fn empty_playlist_ignores_play_requests() {
    let (mut controller, _clock) = controller_with(Playlist::default(), FakeMedia::default());
    controller.toggle_play_pause();
    controller.force_retry();
    assert_eq!(controller.state(), &PlayerState::Idle);
    assert!(!controller.has_user_interacted());
    assert_eq!(controller.media().plays, 0);
}

#[test]
fn first_play_records_interaction_and_loads_first_chapter() {
    let (mut controller, _clock) = controller_with(three_chapters(), FakeMedia::default());
    assert!(!controller.has_user_interacted());

    controller.toggle_play_pause();
    assert!(controller.has_user_interacted());
    assert!(controller.is_playing());
    assert_eq!(
        controller.media().loads,
        vec!["https://cdn.example.com/audio/01.mp3".to_string()]
    );

    controller.toggle_play_pause();
    controller.toggle_play_pause();
    assert!(controller.has_user_interacted());
    assert_eq!(controller.media().loads.len(), 1);
}

#[test]
fn pause_keeps_offset_and_resume_seeks_back_to_it() {
    let (mut controller, _clock) = controller_with(three_chapters(), FakeMedia::default());
    controller.toggle_play_pause();
    controller.media_mut().time = Duration::from_secs(7);

    controller.toggle_play_pause();
    assert_eq!(controller.state(), &PlayerState::Paused);
    assert_eq!(controller.saved_offset(), Duration::from_secs(7));
    assert_eq!(controller.position(), Duration::from_secs(7));

    controller.toggle_play_pause();
    assert!(controller.is_playing());
    assert!(controller.media().seeks.is_empty());
    assert_eq!(controller.position(), Duration::from_secs(7));
}

#[test]
fn resume_seeks_when_media_lost_its_position() {
    let (mut controller, _clock) = controller_with(three_chapters(), FakeMedia::default());
    controller.toggle_play_pause();
    controller.media_mut().time = Duration::from_secs(7);
    controller.toggle_play_pause();

    controller.media_mut().time = Duration::ZERO;
    controller.toggle_play_pause();
    assert!(controller.is_playing());
    assert_eq!(controller.media().seeks, vec![Duration::from_secs(7)]);
}

#[cfg(unix)]
#[test]
fn pause_then_resume_continues_the_stopped_player_process() {
    let dir = std::env::temp_dir().join(format!("coverlet-resume-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create audio dir");
    std::fs::write(dir.join("01.mp3"), b"ID3").expect("write audio");

    let playlist = Playlist::from_chapters(vec![chapter("Why me", ChapterKind::Question, 0, 0)]);
    let media = ProcessMedia::new(PlayerCommand {
        program: "sh".into(),
        extra_args: vec!["-c".to_string(), "sleep 5".to_string(), "sh".to_string()],
    });
    let mut controller = PlaybackController::new(
        playlist,
        AudioBase::Local(dir.clone()),
        media,
        SystemClock,
        RetryPolicy::desktop(),
    );

    controller.toggle_play_pause();
    assert!(controller.is_playing());
    let pid = controller.media().child_id();
    assert!(pid.is_some());
    std::thread::sleep(Duration::from_millis(20));

    controller.toggle_play_pause();
    assert_eq!(controller.state(), &PlayerState::Paused);
    controller.toggle_play_pause();
    assert!(controller.is_playing());
    assert_eq!(controller.media().child_id(), pid);

    controller.reset();
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn ended_chapter_advances_and_auto_plays_next() {
    let (mut controller, _clock) = controller_with(three_chapters(), FakeMedia::default());
    controller.toggle_play_pause();

    finish_current(&mut controller);
    assert_eq!(controller.current_chapter(), 1);
    assert!(controller.completed().contains(&0));
    assert!(controller.is_playing());
    assert!(!controller.is_waiting_for_media());
    assert_eq!(controller.media().plays, 2);
    assert_eq!(
        controller.media().loads.last().map(String::as_str),
        Some("https://cdn.example.com/audio/02.mp3")
    );
}

#[test]
fn last_chapter_completes_and_play_restarts_from_the_top() {
    let (mut controller, _clock) = controller_with(three_chapters(), FakeMedia::default());
    controller.toggle_play_pause();
    for _ in 0..3 {
        finish_current(&mut controller);
    }

    assert!(controller.is_completed());
    assert_eq!(controller.completed().len(), 3);
    assert_eq!(controller.status_label(), "Finished");

    controller.toggle_play_pause();
    assert_eq!(controller.current_chapter(), 0);
    assert!(controller.completed().is_empty());
    assert_eq!(controller.playthrough(), 1);
    assert!(controller.is_playing());
}

#[test]
fn ended_while_paused_advances_without_playing() {
    let (mut controller, _clock) = controller_with(three_chapters(), FakeMedia::default());
    controller.toggle_play_pause();
    controller.toggle_play_pause();
    let plays = controller.media().plays;

    finish_current(&mut controller);
    assert_eq!(controller.current_chapter(), 1);
    assert_eq!(controller.state(), &PlayerState::Paused);
    assert_eq!(controller.media().plays, plays);
}

#[test]
fn blocked_playback_shows_sound_hint_and_force_retry_recovers() {
    let media = failing(vec![MediaError::NotAllowed("autoplay".to_string())]);
    let (mut controller, _clock) = controller_with(three_chapters(), media);

    controller.toggle_play_pause();
    assert!(matches!(
        controller.state(),
        PlayerState::Errored(MediaError::NotAllowed(_))
    ));
    let message = controller.error_message().expect("error message shown");
    assert!(message.contains("sound is enabled"));

    controller.media_mut().time = Duration::from_secs(3);
    controller.force_retry();
    assert!(controller.is_playing());
    assert_eq!(controller.saved_offset(), Duration::ZERO);
    assert_eq!(controller.media().seeks.last(), Some(&Duration::ZERO));
    let last_load = controller.media().loads.last().cloned().unwrap_or_default();
    assert!(last_load.starts_with("https://cdn.example.com/audio/01.mp3?t="));
    assert!(controller.error_message().is_none());
}

#[test]
fn failure_while_playing_stops_the_audio_before_showing_the_error() {
    let (mut controller, _clock) = controller_with(three_chapters(), FakeMedia::default());
    controller.toggle_play_pause();
    controller
        .media_mut()
        .events
        .push_back(MediaEvent::Error(MediaError::NotSupported("codec".to_string())));
    controller.tick();

    assert!(controller.error_message().is_some());
    assert_eq!(controller.media().pauses, 1);
}

#[test]
fn unsupported_format_errors_without_retrying() {
    let media = failing(vec![MediaError::NotSupported("codec".to_string())]);
    let (mut controller, clock) = controller_with(three_chapters(), media);
    controller.toggle_play_pause();
    clock.advance(Duration::from_secs(10));
    controller.tick();

    assert!(matches!(
        controller.state(),
        PlayerState::Errored(MediaError::NotSupported(_))
    ));
    assert_eq!(controller.media().plays, 1);
}

#[test]
fn transient_failures_back_off_then_give_up() {
    let errors = (0..4)
        .map(|_| MediaError::Network("connection reset".to_string()))
        .collect();
    let (mut controller, clock) = controller_with(three_chapters(), failing(errors));

    controller.toggle_play_pause();
    assert_eq!(controller.state(), &PlayerState::Retrying { attempt: 1 });

    clock.advance(Duration::from_millis(499));
    controller.tick();
    assert_eq!(controller.media().plays, 1);

    clock.advance(Duration::from_millis(1));
    controller.tick();
    assert_eq!(controller.media().plays, 2);
    assert_eq!(controller.state(), &PlayerState::Retrying { attempt: 2 });
    assert_eq!(
        controller.media().loads.last().map(String::as_str),
        Some("https://cdn.example.com/audio/01.mp3?retry=1")
    );

    clock.advance(Duration::from_millis(1000));
    controller.tick();
    assert_eq!(controller.state(), &PlayerState::Retrying { attempt: 3 });

    clock.advance(Duration::from_millis(2000));
    controller.tick();
    assert!(matches!(
        controller.state(),
        PlayerState::Errored(MediaError::Network(_))
    ));
    assert_eq!(controller.media().plays, 4);

    clock.advance(Duration::from_secs(30));
    controller.tick();
    assert_eq!(controller.media().plays, 4);
}

#[test]
fn retry_succeeds_and_clears_the_error() {
    let media = failing(vec![MediaError::Other("decoder hiccup".to_string())]);
    let (mut controller, clock) = controller_with(three_chapters(), media);
    controller.toggle_play_pause();
    assert!(controller.last_error().is_some());

    clock.advance(Duration::from_millis(500));
    controller.tick();
    assert!(controller.is_playing());
    assert!(controller.last_error().is_none());
}

#[test]
fn pending_retry_is_dropped_after_moving_to_another_chapter() {
    let media = failing(vec![MediaError::Network("timeout".to_string())]);
    let (mut controller, clock) = controller_with(three_chapters(), media);
    controller.toggle_play_pause();
    assert_eq!(controller.state(), &PlayerState::Retrying { attempt: 1 });

    controller.next_chapter();
    assert_eq!(controller.current_chapter(), 1);
    assert!(controller.is_playing());
    let loads = controller.media().loads.len();

    clock.advance(Duration::from_secs(5));
    controller.tick();
    assert_eq!(controller.media().loads.len(), loads);
    assert!(controller.is_playing());
}

#[test]
fn media_error_while_playing_enters_retry() {
    let (mut controller, _clock) = controller_with(three_chapters(), FakeMedia::default());
    controller.toggle_play_pause();
    controller.media_mut().time = Duration::from_secs(4);
    controller
        .media_mut()
        .events
        .push_back(MediaEvent::Error(MediaError::Network("dropped".to_string())));
    controller.tick();

    assert_eq!(controller.state(), &PlayerState::Retrying { attempt: 1 });
    assert_eq!(controller.saved_offset(), Duration::from_secs(4));
    assert_eq!(controller.media().pauses, 1);
    assert!(controller.status_label().starts_with("Retrying playback (1/3)"));
}

#[test]
fn stall_while_playing_counts_as_network_failure() {
    let (mut controller, _clock) = controller_with(three_chapters(), FakeMedia::default());
    controller.toggle_play_pause();
    controller.media_mut().events.push_back(MediaEvent::Stalled);
    controller.tick();
    assert!(matches!(
        controller.last_error(),
        Some(MediaError::Network(_))
    ));
}

#[test]
fn media_error_while_paused_is_only_recorded() {
    let (mut controller, _clock) = controller_with(three_chapters(), FakeMedia::default());
    controller.toggle_play_pause();
    controller.toggle_play_pause();
    controller
        .media_mut()
        .events
        .push_back(MediaEvent::Error(MediaError::Other("late".to_string())));
    controller.tick();
    assert_eq!(controller.state(), &PlayerState::Paused);
    assert!(controller.last_error().is_some());
}

#[test]
fn auto_play_waits_for_readiness_then_pauses_with_notice() {
    let (mut controller, clock) = controller_with(three_chapters(), FakeMedia::default());
    controller.toggle_play_pause();
    controller.media_mut().ready = ReadyState::HaveNothing;

    finish_current(&mut controller);
    assert!(controller.is_waiting_for_media());
    assert_eq!(controller.status_label(), "Loading next chapter...");

    for _ in 0..12 {
        clock.advance(Duration::from_secs(1));
        controller.tick();
    }
    assert_eq!(controller.state(), &PlayerState::Paused);
    assert!(controller.notice().is_some());
    assert_eq!(controller.media().plays, 1);
    assert_eq!(controller.current_chapter(), 1);
}

#[test]
fn auto_play_starts_once_media_becomes_ready() {
    let (mut controller, clock) = controller_with(three_chapters(), FakeMedia::default());
    controller.toggle_play_pause();
    controller.media_mut().ready = ReadyState::HaveMetadata;
    finish_current(&mut controller);
    assert!(controller.is_waiting_for_media());

    controller.media_mut().ready = ReadyState::CanPlay;
    clock.advance(Duration::from_millis(100));
    controller.tick();
    assert!(controller.is_playing());
    assert!(!controller.is_waiting_for_media());
    assert_eq!(controller.media().plays, 2);
}

#[test]
fn jump_while_paused_stays_paused() {
    let (mut controller, _clock) = controller_with(three_chapters(), FakeMedia::default());
    controller.jump_to(2);
    assert_eq!(controller.current_chapter(), 2);
    assert_eq!(controller.state(), &PlayerState::Paused);
    assert_eq!(controller.media().plays, 0);

    controller.previous_chapter();
    assert_eq!(controller.current_chapter(), 1);
    controller.jump_to(10);
    assert_eq!(controller.current_chapter(), 1);
}

#[test]
fn playback_rate_cycles_and_wraps() {
    let (mut controller, _clock) = controller_with(three_chapters(), FakeMedia::default());
    let rates: Vec<f32> = (0..6).map(|_| controller.cycle_playback_rate()).collect();
    assert_eq!(rates, vec![1.25, 1.5, 1.75, 2.0, 0.75, 1.0]);
    assert_eq!(controller.media().rate, 1.0);
}

#[test]
fn reset_returns_controller_to_a_fresh_state() {
    let (mut controller, clock) = controller_with(three_chapters(), failing(vec![]));
    controller.toggle_play_pause();
    finish_current(&mut controller);
    controller.cycle_playback_rate();
    controller
        .media_mut()
        .events
        .push_back(MediaEvent::Error(MediaError::Network("x".to_string())));
    controller.tick();

    controller.reset();
    assert_eq!(controller.state(), &PlayerState::Idle);
    assert_eq!(controller.current_chapter(), 0);
    assert!(controller.completed().is_empty());
    assert!(!controller.has_user_interacted());
    assert!(controller.last_error().is_none());
    assert_eq!(controller.playback_rate(), 1.0);
    assert_eq!(controller.position(), Duration::ZERO);
    assert_eq!(controller.media().stops, 1);
    assert_eq!(controller.media().rate, 1.0);

    let plays = controller.media().plays;
    clock.advance(Duration::from_secs(10));
    controller.tick();
    assert_eq!(controller.media().plays, plays);
}

#[test]
fn retry_policy_profiles_differ_in_patience() {
    let desktop = RetryPolicy::desktop();
    let mobile = RetryPolicy::for_profile(true);
    assert_eq!(desktop.max_attempts(), 3);
    assert_eq!(desktop.delay_for(1), Some(Duration::from_millis(500)));
    assert_eq!(desktop.delay_for(4), None);
    assert_eq!(desktop.delay_for(0), None);
    assert_eq!(mobile.delay_for(3), Some(Duration::from_millis(4000)));
    assert!(mobile.readiness_polls > desktop.readiness_polls);
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
    let pairs: Vec<(String, OsString)> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), OsString::from(value)))
        .collect();
    move |key| {
        pairs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.clone())
    }
}

#[test]
fn settings_prefer_flags_over_environment() {
    let cli = Cli::try_parse_from(["coverlet", "--audio-base", "https://flag.example.com/a/"])
        .expect("flags should parse");
    let env = env_from(&[
        ("COVERLET_AUDIO_BASE", "/srv/audio"),
        ("COVERLET_CONTENT", "letter.json"),
        ("COVERLET_PLAYER", "ffplay"),
        ("COVERLET_PLAYER_ARGS", "-volume 50"),
    ]);
    let settings = Settings::from_sources(&cli, env);

    assert_eq!(
        settings.audio_base,
        AudioBase::Remote("https://flag.example.com/a".to_string())
    );
    assert_eq!(
        settings.content_path.as_deref(),
        Some(std::path::Path::new("letter.json"))
    );
    assert_eq!(settings.player.program, std::path::PathBuf::from("ffplay"));
    assert_eq!(settings.player.extra_args, vec!["-volume", "50"]);
    assert!(!settings.mobile);
}

#[test]
fn settings_fall_back_to_defaults() {
    let cli = Cli::try_parse_from(["coverlet", "playlist"]).expect("flags should parse");
    let settings = Settings::from_sources(&cli, env_from(&[("COVERLET_PLAYER", "")]));
    assert_eq!(settings.audio_base, AudioBase::Local("audio".into()));
    assert_eq!(settings.player.program, std::path::PathBuf::from("mpv"));
    assert!(settings.player.extra_args.is_empty());
    assert_eq!(settings.content_path, None);
}

#[test]
fn mobile_profile_follows_flag_or_termux_environment() {
    assert!(detect_mobile(&env_from(&[("TERMUX_VERSION", "0.118")])));
    assert!(!detect_mobile(&env_from(&[("ANDROID_ROOT", "")])));

    let cli = Cli::try_parse_from(["coverlet", "--mobile"]).expect("flags should parse");
    assert!(Settings::from_sources(&cli, env_from(&[])).mobile);
}

#[test]
fn navigator_back_never_pops_home() {
    let mut nav = Navigator::new(Page::Reading);
    assert_eq!(nav.current(), Page::Reading);
    nav.push(Page::Summary);
    nav.push(Page::Summary);
    assert!(nav.back());
    assert_eq!(nav.current(), Page::Reading);
    assert!(nav.back());
    assert_eq!(nav.current(), Page::Home);
    assert!(!nav.back());
    assert_eq!(nav.current(), Page::Home);
}

#[test]
fn wrap_text_respects_width_and_splits_long_words() {
    let lines = wrap_text("alpha beta gamma supercalifragilistic", 10);
    assert_eq!(
        lines,
        vec!["alpha beta", "gamma", "supercalif", "ragilistic"]
    );
    assert!(lines.iter().all(|line| line.chars().count() <= 10));
    assert_eq!(wrap_text("", 10), vec![String::new()]);
}

#[test]
fn reveal_words_grows_to_full_text() {
    let text = "one two  three";
    assert_eq!(reveal_words(text, 0), "");
    assert_eq!(reveal_words(text, 2), "one two");
    assert_eq!(reveal_words(text, 3), text);
    assert_eq!(reveal_words(text, 99), text);
}

fn transcript_spans() -> Vec<ItemSpan> {
    (0..10)
        .map(|idx| ItemSpan {
            top: idx * 4,
            height: 3,
        })
        .collect()
}

const TRANSCRIPT_VIEW: Viewport = Viewport {
    height: 14,
    reserved_bottom: 2,
};

#[test]
fn manual_transcript_scroll_survives_redraws_of_the_same_chapter() {
    let mut view = ReadingView::default();
    assert_eq!(view.sync_to_chapter(4, 0, transcript_spans(), TRANSCRIPT_VIEW), Some(11));

    view.sync.scroll_by(-11, &view.spans, TRANSCRIPT_VIEW);
    for _ in 0..3 {
        assert_eq!(view.sync_to_chapter(4, 0, transcript_spans(), TRANSCRIPT_VIEW), None);
    }
    assert_eq!(view.sync.offset(), 0);

    assert_eq!(view.sync_to_chapter(5, 0, transcript_spans(), TRANSCRIPT_VIEW), Some(15));
}

#[test]
fn scrolling_to_the_end_early_keeps_following_later_chapters() {
    let mut view = ReadingView::default();
    view.sync_to_chapter(0, 0, transcript_spans(), TRANSCRIPT_VIEW);
    view.sync.scroll_by(100, &view.spans, TRANSCRIPT_VIEW);
    view.sync_to_chapter(0, 0, transcript_spans(), TRANSCRIPT_VIEW);
    assert!(!view.sync.is_latched());

    assert_eq!(view.sync_to_chapter(3, 0, transcript_spans(), TRANSCRIPT_VIEW), Some(7));
}

#[test]
fn new_playthrough_follows_the_first_chapter_again() {
    let mut view = ReadingView::default();
    view.sync_to_chapter(9, 0, transcript_spans(), TRANSCRIPT_VIEW);
    assert!(view.sync.is_latched());

    view.sync.scroll_by(100, &view.spans, TRANSCRIPT_VIEW);
    assert_eq!(view.sync_to_chapter(0, 1, transcript_spans(), TRANSCRIPT_VIEW), None);
    assert!(!view.sync.is_latched());
    assert_eq!(view.sync.offset(), 0);
}
