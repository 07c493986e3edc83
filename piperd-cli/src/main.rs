use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use piperd_core::engine::SynthesisConfig;
use tracing_subscriber::EnvFilter;

mod single_shot;

#[derive(Parser, Debug)]
#[command(name = "piperd")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Piper text-to-speech, one-shot or as a persistent stdin/stdout service")]
struct Args {
    /// Path to the Piper voice model (.onnx) or its config JSON
    #[arg(short, long)]
    model: PathBuf,

    /// Write the synthesized audio to a WAV file instead of playing it
    #[arg(short = 'f', long)]
    output_file: Option<PathBuf>,

    /// Write raw PCM16 audio to stdout instead of playing it
    #[arg(long)]
    output_raw: bool,

    /// Play the audio through the system player (default behavior)
    #[arg(long)]
    play: bool,

    /// Run as a persistent service speaking newline-delimited JSON over
    /// stdin/stdout
    #[arg(long)]
    service: bool,

    /// Phoneme length scale; larger values give slower speech
    #[arg(long, default_value_t = 1.0)]
    length_scale: f32,

    /// Text to synthesize; read from stdin when omitted
    text: Option<String>,
}

fn main() -> Result<()> {
    setup_tracing();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let args = Args::parse();
    let config = SynthesisConfig {
        length_scale: args.length_scale,
    };

    if args.service {
        return piperd_core::run_service(&args.model, config).await;
    }
    single_shot::run(&args, config).await
}

fn setup_tracing() {
    // stdout carries protocol and audio output, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .init();
}
