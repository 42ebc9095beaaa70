use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command as ProcessCommand, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crate::app::audio::AudioLocation;
use crate::http::head_with_retries;

use super::media::{MediaElement, MediaError, MediaEvent, ReadyState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlayerFlavor {
    Mpv,
    Ffplay,
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlayerCommand {
    pub(crate) program: PathBuf,
    pub(crate) extra_args: Vec<String>,
}

impl PlayerCommand {
    pub(crate) fn flavor(&self) -> PlayerFlavor {
        let stem = self
            .program
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match stem.as_str() {
            "mpv" => PlayerFlavor::Mpv,
            "ffplay" => PlayerFlavor::Ffplay,
            _ => PlayerFlavor::Generic,
        }
    }

    pub(crate) fn build(&self, source: &AudioLocation, start: Duration, rate: f32) -> ProcessCommand {
        let mut cmd = ProcessCommand::new(&self.program);
        let seconds = format!("{:.3}", start.as_secs_f64());
        let seeking = !start.is_zero();
        let scaled = (rate - 1.0).abs() > f32::EPSILON;
        match self.flavor() {
            PlayerFlavor::Mpv => {
                cmd.args(["--no-video", "--really-quiet", "--no-terminal"]);
                if seeking {
                    cmd.arg(format!("--start={seconds}"));
                }
                if scaled {
                    cmd.arg(format!("--speed={rate}"));
                }
            }
            PlayerFlavor::Ffplay => {
                cmd.args(["-nodisp", "-autoexit", "-loglevel", "quiet"]);
                if seeking {
                    cmd.arg("-ss").arg(&seconds);
                }
                if scaled {
                    cmd.arg("-af").arg(format!("atempo={rate}"));
                }
            }
            PlayerFlavor::Generic => {
                if seeking || scaled {
                    tracing::debug!(
                        program = %self.program.display(),
                        "player flavor unknown; start offset and speed ignored"
                    );
                }
            }
        }
        cmd.args(&self.extra_args);
        cmd.arg(source.as_arg());
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

fn classify_spawn_error(program: &Path, err: io::Error) -> MediaError {
    match err.kind() {
        io::ErrorKind::NotFound => MediaError::NotSupported(format!(
            "audio player {} not found",
            program.display()
        )),
        io::ErrorKind::PermissionDenied => MediaError::NotAllowed(format!(
            "not permitted to run {}",
            program.display()
        )),
        _ => MediaError::Other(format!("failed to launch {}: {err}", program.display())),
    }
}

fn probe_remote(url: String) -> Result<(), MediaError> {
    let report = head_with_retries(
        &url,
        Duration::from_secs(3),
        Duration::from_secs(5),
        1,
        Duration::ZERO,
    )
    .map_err(MediaError::Network)?;
    if !report.is_audio() {
        return Err(MediaError::NotSupported(format!(
            "{url} is served as {}",
            report.content_type.as_deref().unwrap_or("unknown")
        )));
    }
    Ok(())
}

/// Media element backed by an external player process. Pausing stops the
/// process in place on unix; elsewhere it is killed and respawned at the
/// saved offset.
pub(crate) struct ProcessMedia {
    command: PlayerCommand,
    source: Option<AudioLocation>,
    child: Option<Child>,
    child_paused: bool,
    position: Duration,
    running_since: Option<Instant>,
    rate: f32,
    ready: ReadyState,
    probe_rx: Option<mpsc::Receiver<Result<(), MediaError>>>,
    events: VecDeque<MediaEvent>,
}

impl ProcessMedia {
    pub(crate) fn new(command: PlayerCommand) -> Self {
        Self {
            command,
            source: None,
            child: None,
            child_paused: false,
            position: Duration::ZERO,
            running_since: None,
            rate: 1.0,
            ready: ReadyState::HaveNothing,
            probe_rx: None,
            events: VecDeque::new(),
        }
    }

    fn kill_child(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        self.child_paused = false;
        self.running_since = None;
    }

    fn is_running(&self) -> bool {
        self.child.is_some() && !self.child_paused
    }

    fn respawn_at_current_time(&mut self) {
        self.position = self.current_time();
        self.kill_child();
        if let Err(err) = self.play() {
            self.events.push_back(MediaEvent::Error(err));
        }
    }

    fn drain_probe(&mut self) {
        let Some(rx) = self.probe_rx.as_ref() else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(())) => {
                self.ready = ReadyState::CanPlay;
                self.probe_rx = None;
            }
            Ok(Err(err)) => {
                // The player is the judge of what it can stream; a failed HEAD
                // only means readiness is unknown.
                tracing::warn!(error = %err, "audio source probe failed");
                self.ready = ReadyState::HaveMetadata;
                self.probe_rx = None;
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                self.ready = ReadyState::HaveMetadata;
                self.probe_rx = None;
            }
        }
    }

    fn check_child(&mut self) {
        if self.child_paused {
            return;
        }
        let Some(child) = self.child.as_mut() else {
            return;
        };
        match child.try_wait() {
            Ok(Some(status)) => {
                self.child = None;
                self.running_since = None;
                if status.success() {
                    self.position = Duration::ZERO;
                    self.events.push_back(MediaEvent::Ended);
                } else {
                    self.events.push_back(MediaEvent::Error(MediaError::Other(format!(
                        "audio player exited with {status}"
                    ))));
                }
            }
            Ok(None) => {}
            Err(err) => {
                self.events.push_back(MediaEvent::Error(MediaError::Other(format!(
                    "failed to query audio player: {err}"
                ))));
            }
        }
    }

    #[cfg(unix)]
    fn signal_child(&self, signal: libc::c_int) -> bool {
        let Some(child) = self.child.as_ref() else {
            return false;
        };
        unsafe { libc::kill(child.id() as libc::pid_t, signal) == 0 }
    }

    #[cfg(unix)]
    fn suspend_child(&self) -> bool {
        self.signal_child(libc::SIGSTOP)
    }

    #[cfg(unix)]
    fn resume_child(&self) -> bool {
        self.signal_child(libc::SIGCONT)
    }

    #[cfg(not(unix))]
    fn suspend_child(&self) -> bool {
        false
    }

    #[cfg(not(unix))]
    fn resume_child(&self) -> bool {
        false
    }
}

impl MediaElement for ProcessMedia {
    fn load(&mut self, source: &AudioLocation) {
        self.kill_child();
        self.events.clear();
        self.position = Duration::ZERO;
        self.probe_rx = None;
        self.source = Some(source.clone());

        match source {
            AudioLocation::Local(path) => {
                if path.is_file() {
                    self.ready = ReadyState::CanPlay;
                } else {
                    self.ready = ReadyState::HaveNothing;
                    self.events.push_back(MediaEvent::Error(MediaError::Network(format!(
                        "{} not found",
                        path.display()
                    ))));
                }
            }
            AudioLocation::Remote(url) => {
                self.ready = ReadyState::HaveNothing;
                let (tx, rx) = mpsc::channel();
                let url = url.clone();
                thread::spawn(move || {
                    let _ = tx.send(probe_remote(url));
                });
                self.probe_rx = Some(rx);
            }
        }
    }

    fn play(&mut self) -> Result<(), MediaError> {
        let Some(source) = self.source.clone() else {
            return Err(MediaError::Other("no audio source loaded".to_string()));
        };

        if self.child.is_some() {
            if self.child_paused {
                if !self.resume_child() {
                    return Err(MediaError::Other("failed to resume audio player".to_string()));
                }
                self.child_paused = false;
                self.running_since = Some(Instant::now());
            }
            return Ok(());
        }

        if let AudioLocation::Local(path) = &source
            && !path.is_file()
        {
            return Err(MediaError::Network(format!("{} not found", path.display())));
        }

        let mut cmd = self.command.build(&source, self.position, self.rate);
        let child = cmd
            .spawn()
            .map_err(|err| classify_spawn_error(&self.command.program, err))?;
        tracing::debug!(pid = child.id(), source = %source, "audio player started");
        self.child = Some(child);
        self.child_paused = false;
        self.running_since = Some(Instant::now());
        Ok(())
    }

    fn pause(&mut self) {
        if !self.is_running() {
            return;
        }
        self.position = self.current_time();
        self.running_since = None;
        if self.suspend_child() {
            self.child_paused = true;
            return;
        }
        self.kill_child();
    }

    fn stop(&mut self) {
        self.kill_child();
        self.events.clear();
        self.probe_rx = None;
        self.position = Duration::ZERO;
    }

    fn seek(&mut self, offset: Duration) {
        // A stopped child already sitting at the offset resumes in place.
        if self.child_paused && self.child.is_some() && self.position == offset {
            return;
        }
        let was_running = self.is_running();
        if self.child.is_some() {
            self.kill_child();
        }
        self.position = offset;
        if was_running && let Err(err) = self.play() {
            self.events.push_back(MediaEvent::Error(err));
        }
    }

    fn current_time(&self) -> Duration {
        match self.running_since {
            Some(since) => self.position + since.elapsed().mul_f32(self.rate),
            None => self.position,
        }
    }

    fn ready_state(&mut self) -> ReadyState {
        self.drain_probe();
        self.ready
    }

    fn set_playback_rate(&mut self, rate: f32) {
        if (self.rate - rate).abs() <= f32::EPSILON {
            return;
        }
        if self.is_running() {
            let position = self.current_time();
            self.rate = rate;
            self.position = position;
            self.running_since = None;
            self.respawn_at_current_time();
        } else {
            self.rate = rate;
        }
    }

    fn poll_event(&mut self) -> Option<MediaEvent> {
        self.drain_probe();
        self.check_child();
        self.events.pop_front()
    }
}

#[cfg(test)]
impl ProcessMedia {
    pub(crate) fn child_id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }
}

impl Drop for ProcessMedia {
    fn drop(&mut self) {
        self.kill_child();
    }
}
