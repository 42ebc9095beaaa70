use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::cli::Cli;

use super::audio::AudioBase;
use super::player::PlayerCommand;

const CONTENT_ENV: &str = "COVERLET_CONTENT";
const AUDIO_BASE_ENV: &str = "COVERLET_AUDIO_BASE";
const PLAYER_ENV: &str = "COVERLET_PLAYER";
const PLAYER_ARGS_ENV: &str = "COVERLET_PLAYER_ARGS";
const MOBILE_MARKERS: &[&str] = &["TERMUX_VERSION", "ANDROID_ROOT"];

pub(crate) const DEFAULT_AUDIO_BASE: &str = "audio";
pub(crate) const DEFAULT_PLAYER: &str = "mpv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) content_path: Option<PathBuf>,
    pub(crate) audio_base: AudioBase,
    pub(crate) player: PlayerCommand,
    pub(crate) mobile: bool,
}

impl Settings {
    pub(crate) fn resolve(cli: &Cli) -> Self {
        Self::from_sources(cli, |key| env::var_os(key))
    }

    // Flags win over environment variables, which win over defaults.
    pub(crate) fn from_sources<F>(cli: &Cli, env_lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let content_path = cli.content.clone().or_else(|| {
            env_lookup(CONTENT_ENV)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        });
        let audio_base = cli
            .audio_base
            .clone()
            .or_else(|| {
                env_lookup(AUDIO_BASE_ENV)
                    .filter(|value| !value.is_empty())
                    .map(|value| value.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| DEFAULT_AUDIO_BASE.to_string());
        let player = resolve_player_from_env(env_lookup(PLAYER_ENV), env_lookup(PLAYER_ARGS_ENV));
        let mobile = cli.mobile || detect_mobile(&env_lookup);

        Self {
            content_path,
            audio_base: AudioBase::parse(&audio_base),
            player,
            mobile,
        }
    }
}

pub(crate) fn resolve_player_from_env(
    bin: Option<OsString>,
    args: Option<OsString>,
) -> PlayerCommand {
    let program = match bin {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => PathBuf::from(DEFAULT_PLAYER),
    };
    let extra_args = args
        .map(|value| {
            value
                .to_string_lossy()
                .split_whitespace()
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    PlayerCommand {
        program,
        extra_args,
    }
}

pub(crate) fn detect_mobile<F>(env_lookup: &F) -> bool
where
    F: Fn(&str) -> Option<OsString>,
{
    MOBILE_MARKERS
        .iter()
        .any(|key| env_lookup(key).is_some_and(|value| !value.is_empty()))
}
