use std::time::Duration;

use thiserror::Error;

use crate::app::audio::AudioLocation;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum MediaError {
    /// Playback refused until the user acts (autoplay policy, device access).
    #[error("playback not allowed: {0}")]
    NotAllowed(String),
    #[error("audio format not supported: {0}")]
    NotSupported(String),
    #[error("audio could not be loaded: {0}")]
    Network(String),
    #[error("playback failed: {0}")]
    Other(String),
}

impl MediaError {
    pub(crate) fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Other(_))
    }

    pub(crate) fn user_message(&self) -> &'static str {
        match self {
            Self::NotAllowed(_) => {
                "Playback was blocked. Make sure sound is enabled on your device, then press Space to play."
            }
            Self::NotSupported(_) => {
                "This audio format is not supported by the audio player on this device."
            }
            Self::Network(_) | Self::Other(_) => {
                "Audio playback failed. Press r to force a retry or t to test the audio file."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MediaEvent {
    Playing,
    Paused,
    Ended,
    Stalled,
    Error(MediaError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum ReadyState {
    HaveNothing,
    HaveMetadata,
    CanPlay,
}

/// The single audio output the playback controller drives.
pub(crate) trait MediaElement {
    /// Points the element at a new source and rewinds to the start.
    fn load(&mut self, source: &AudioLocation);
    fn play(&mut self) -> Result<(), MediaError>;
    fn pause(&mut self);
    fn stop(&mut self);
    fn seek(&mut self, offset: Duration);
    fn current_time(&self) -> Duration;
    fn ready_state(&mut self) -> ReadyState;
    fn set_playback_rate(&mut self, rate: f32);
    fn poll_event(&mut self) -> Option<MediaEvent>;
}
