mod audio;
mod config;
mod player;
mod playlist;
mod sync;
mod text;
mod tui;

#[cfg(test)]
mod tests;

use anyhow::Result;

use crate::cli::{Cli, Command};
use crate::content::{Content, load_content};

use self::audio::{AudioBase, CacheBust, probe_location};
use self::config::Settings;
use self::playlist::{ChapterKind, Playlist};
use self::text::{truncate, wrap_text};
use self::tui::Page;

pub fn run(cli: Cli) -> Result<()> {
    let settings = Settings::resolve(&cli);
    let content = load_content(settings.content_path.as_deref())?;
    let playlist = Playlist::build(&content);
    tracing::info!(
        questions = content.questions.len(),
        chapters = playlist.len(),
        audio = %settings.audio_base,
        player = %settings.player.program.display(),
        mobile = settings.mobile,
        "content loaded"
    );

    match cli.command {
        Some(Command::Read) => tui::run_tui(&content, playlist, &settings, Page::Reading)?,
        Some(Command::Summary) => run_summary(&content),
        Some(Command::Playlist) => run_playlist(&playlist, &settings.audio_base),
        Some(Command::Probe) => run_probe(&playlist, &settings.audio_base),
        Some(Command::Tui) | None => tui::run_tui(&content, playlist, &settings, Page::Home)?,
    }

    Ok(())
}

fn run_summary(content: &Content) {
    let candidate = &content.candidate;
    println!("{}", content.title());
    println!("  {}", candidate.name);
    println!("  {} | {}", candidate.designation, candidate.company);
    println!();
    for paragraph in candidate.summary.split('\n') {
        for line in wrap_text(paragraph, 76) {
            println!("  {line}");
        }
    }
}

fn run_playlist(playlist: &Playlist, audio: &AudioBase) {
    if playlist.is_empty() {
        println!("No chapters. Check the questions in your content file.");
        return;
    }

    println!("{:<5} {:<7} {:<10} {:<50}", "#", "ITEM", "AUDIO", "TEXT");
    for (idx, chapter) in playlist.chapters().iter().enumerate() {
        let item = match (chapter.kind, chapter.bullet_index) {
            (ChapterKind::Bullet, Some(bullet)) => {
                format!("Q{}.{}", chapter.question_index + 1, bullet + 1)
            }
            _ => format!("Q{}", chapter.question_index + 1),
        };
        println!(
            "{:<5} {:<7} {:<10} {:<50}",
            idx + 1,
            item,
            chapter.asset,
            truncate(&chapter.text, 50)
        );
    }
    println!("\nAudio base: {audio}");
}

fn run_probe(playlist: &Playlist, audio: &AudioBase) {
    if playlist.is_empty() {
        println!("No chapters to probe.");
        return;
    }

    let mut failures = 0;
    for (idx, chapter) in playlist.chapters().iter().enumerate() {
        let location = audio.locate(&chapter.asset, CacheBust::None);
        match probe_location(&location, 2) {
            Ok(message) => println!("{:>3}  ok    {message}", idx + 1),
            Err(err) => {
                failures += 1;
                tracing::warn!(chapter = idx, source = %location, error = %err, "audio probe failed");
                println!("{:>3}  FAIL  {err}", idx + 1);
            }
        }
    }
    println!(
        "\n{} of {} chapter(s) reachable.",
        playlist.len() - failures,
        playlist.len()
    );
}
