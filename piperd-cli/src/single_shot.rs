//! One-request mode: load, synthesize, emit, exit.
//!
//! Kept for invocations that predate service mode. Any failure exits
//! non-zero with the cause on stderr; there is no partial success.

use anyhow::{bail, Context, Result};
use piperd_core::audio::{playback, wav};
use piperd_core::engine::piper::PiperEngine;
use piperd_core::engine::{SynthesisConfig, SynthesisEngine};
use tokio::io::{self, AsyncReadExt, AsyncWriteExt};
use tracing::info;

use crate::Args;

pub async fn run(args: &Args, config: SynthesisConfig) -> Result<()> {
    let text = match &args.text {
        Some(text) => text.trim().to_string(),
        None => read_stdin_text().await?,
    };
    if text.is_empty() {
        bail!("no text provided");
    }

    let engine = PiperEngine::load(&args.model)?;
    let chunks = engine.synthesize(&text, &config)?;
    let audio = chunks.concat();

    if args.output_raw {
        let mut stdout = io::stdout();
        stdout.write_all(wav::frame_as_raw(&audio)).await?;
        stdout.flush().await?;
    } else if let Some(path) = &args.output_file {
        let wav_bytes = wav::frame_as_wav(&audio, engine.sample_rate())?;
        std::fs::write(path, wav_bytes)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "audio written");
    } else {
        playback::play(&audio, engine.sample_rate()).await?;
    }

    Ok(())
}

async fn read_stdin_text() -> Result<String> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .await
        .context("failed to read text from stdin")?;
    Ok(text.trim().to_string())
}
