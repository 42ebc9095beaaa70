use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "coverlet",
    version,
    about = "Read, listen to, or summarise a narrated cover letter"
)]
pub struct Cli {
    /// JSON file replacing the built-in letter content
    #[arg(long, global = true, value_name = "PATH")]
    pub content: Option<PathBuf>,

    /// Directory or http(s) URL holding the chapter audio files
    #[arg(long, global = true, value_name = "DIR|URL")]
    pub audio_base: Option<String>,

    /// Use the slower mobile retry/backoff profile
    #[arg(long, global = true)]
    pub mobile: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive home view (default)
    Tui,
    /// Open straight into the narrated reading view
    Read,
    /// Print the summary page
    Summary,
    /// Print the chapter playlist with resolved audio sources
    Playlist,
    /// Check that every chapter's audio file is reachable
    Probe,
}
