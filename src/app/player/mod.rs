mod controller;
mod media;
mod process;
mod retry;

pub(crate) use controller::{PlaybackController, PlayerState};
pub(crate) use process::{PlayerCommand, ProcessMedia};
pub(crate) use retry::{RetryPolicy, SystemClock};

#[cfg(test)]
pub(crate) use media::{MediaElement, MediaError, MediaEvent, ReadyState};
#[cfg(test)]
pub(crate) use retry::ManualClock;
