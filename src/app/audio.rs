use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::http::head_with_retries;

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "aac", "ogg", "opus", "wav", "flac"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AudioBase {
    Local(PathBuf),
    Remote(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AudioLocation {
    Local(PathBuf),
    Remote(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CacheBust {
    None,
    Retry(u32),
    Nonce(u64),
}

impl AudioBase {
    pub(crate) fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Remote(trimmed.trim_end_matches('/').to_string())
        } else {
            Self::Local(PathBuf::from(trimmed))
        }
    }

    pub(crate) fn locate(&self, asset: &str, bust: CacheBust) -> AudioLocation {
        match self {
            // Files on disk are never cached by the player, so busting is a no-op.
            Self::Local(dir) => AudioLocation::Local(dir.join(asset)),
            Self::Remote(base) => {
                let url = format!("{base}/{}", asset.trim_start_matches('/'));
                let separator = if url.contains('?') { '&' } else { '?' };
                let url = match bust {
                    CacheBust::None => url,
                    CacheBust::Retry(attempt) => format!("{url}{separator}retry={attempt}"),
                    CacheBust::Nonce(nonce) => format!("{url}{separator}t={nonce}"),
                };
                AudioLocation::Remote(url)
            }
        }
    }
}

impl fmt::Display for AudioBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(dir) => write!(f, "{}", dir.display()),
            Self::Remote(url) => f.write_str(url),
        }
    }
}

impl AudioLocation {
    pub(crate) fn as_arg(&self) -> OsString {
        match self {
            Self::Local(path) => path.clone().into_os_string(),
            Self::Remote(url) => OsString::from(url),
        }
    }
}

impl fmt::Display for AudioLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => f.write_str(url),
        }
    }
}

pub(crate) fn cache_bust_nonce() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

pub(crate) fn has_audio_extension(location: &AudioLocation) -> bool {
    let name = match location {
        AudioLocation::Local(path) => path.to_string_lossy().into_owned(),
        AudioLocation::Remote(url) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    name.rsplit_once('.')
        .map(|(_, ext)| AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Reachability check behind the "test audio" action.
pub(crate) fn probe_location(location: &AudioLocation, attempts: usize) -> Result<String, String> {
    match location {
        AudioLocation::Local(path) => {
            let meta = fs::metadata(path)
                .map_err(|err| format!("audio file {} not readable: {err}", path.display()))?;
            if !meta.is_file() {
                return Err(format!("{} is not a file", path.display()));
            }
            if !has_audio_extension(location) {
                return Err(format!(
                    "{} does not look like an audio file",
                    path.display()
                ));
            }
            Ok(format!(
                "Audio file found: {} ({} bytes)",
                path.display(),
                meta.len()
            ))
        }
        AudioLocation::Remote(url) => {
            let report = head_with_retries(
                url,
                Duration::from_secs(3),
                Duration::from_secs(5),
                attempts,
                Duration::from_millis(500),
            )?;
            if !report.is_audio() {
                return Err(format!(
                    "{url} is served as {}, not audio",
                    report.content_type.as_deref().unwrap_or("unknown")
                ));
            }
            let size = report
                .content_length
                .map(|len| format!("{len} bytes"))
                .unwrap_or_else(|| "unknown size".to_string());
            Ok(format!(
                "Audio reachable: HTTP {} ({}, {size})",
                report.status,
                report.content_type.as_deref().unwrap_or("unknown type")
            ))
        }
    }
}
