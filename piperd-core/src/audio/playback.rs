//! Playback through an external player subprocess.
//!
//! The audio is framed as WAV into a uniquely named temp file, which is
//! removed on every exit path, then handed to the first platform player
//! that exists and exits successfully.

use std::io::Write;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::audio::wav;
use crate::error::TtsError;

/// Ordered player candidates per platform. On platforms with one canonical
/// player the table has a single entry and there is no fallback.
#[cfg(target_os = "macos")]
const PLAYER_TABLE: &[&[&str]] = &[&["afplay"]];

#[cfg(all(unix, not(target_os = "macos")))]
const PLAYER_TABLE: &[&[&str]] = &[
    &["aplay"],
    &["paplay"],
    &["play"],
    &["ffplay", "-nodisp", "-autoexit", "-loglevel", "error"],
];

/// Frame `pcm` as WAV and play it, blocking until the player exits.
pub async fn play(pcm: &[u8], sample_rate: u32) -> Result<(), TtsError> {
    play_with(pcm, sample_rate, candidate_commands).await
}

async fn play_with<F>(pcm: &[u8], sample_rate: u32, candidates: F) -> Result<(), TtsError>
where
    F: FnOnce(&Path) -> Vec<Command>,
{
    let wav_bytes = wav::frame_as_wav(pcm, sample_rate)?;

    // NamedTempFile removes the file on drop, covering success, player
    // failure, and early returns alike.
    let mut file = tempfile::Builder::new()
        .prefix("piperd-")
        .suffix(".wav")
        .tempfile()?;
    file.write_all(&wav_bytes)?;
    file.flush()?;

    run_candidates(candidates(file.path())).await
}

async fn run_candidates(commands: Vec<Command>) -> Result<(), TtsError> {
    for mut command in commands {
        let program = command.as_std().get_program().to_os_string();
        match command.status().await {
            Ok(status) if status.success() => {
                tracing::debug!(player = ?program, "playback complete");
                return Ok(());
            }
            Ok(status) => {
                tracing::debug!(player = ?program, ?status, "player exited with failure");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(player = ?program, "player not installed");
            }
            Err(e) => {
                tracing::debug!(player = ?program, error = %e, "player failed to start");
            }
        }
    }
    Err(TtsError::Playback("no available audio player".to_string()))
}

/// Build one command per candidate. Player stdio is nulled so a child can
/// never touch the protocol streams.
#[cfg(not(target_os = "windows"))]
fn candidate_commands(wav_path: &Path) -> Vec<Command> {
    PLAYER_TABLE
        .iter()
        .map(|argv| {
            let mut command = Command::new(argv[0]);
            command
                .args(&argv[1..])
                .arg(wav_path)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
            command
        })
        .collect()
}

/// SoundPlayer blocks until the clip finishes; there is no second choice
/// on Windows.
#[cfg(target_os = "windows")]
fn candidate_commands(wav_path: &Path) -> Vec<Command> {
    let script = format!(
        "(New-Object System.Media.SoundPlayer '{}').PlaySync()",
        wav_path.display()
    );
    let mut command = Command::new("powershell");
    command
        .args(["-NoProfile", "-Command", &script])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    vec![command]
}
