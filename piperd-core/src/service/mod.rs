//! Persistent service mode: the readiness handshake plus a line-oriented
//! request/response loop over the process's standard streams.

pub mod protocol;
pub mod router;

use std::path::Path;

use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::engine::piper::PiperEngine;
use crate::engine::{SynthesisConfig, SynthesisEngine};
use crate::service::protocol::Response;
use crate::service::router::ServiceContext;

/// Serialize one response as a single flushed line. The parent relies on
/// line-buffered delivery, so the flush is not optional.
async fn write_response<W>(writer: &mut W, response: &Response) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let json = serde_json::to_string(response)?;
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

/// Drive the request/response loop over arbitrary streams.
///
/// Emits the `ready` line first, then writes exactly one response per
/// non-blank input line until a quit request or end of input. Blank lines
/// are skipped without a response. Requests run strictly sequentially; the
/// only blocking points are the next-line read and the player subprocess.
pub async fn serve<E, R, W>(ctx: &ServiceContext<E>, reader: R, mut writer: W) -> anyhow::Result<()>
where
    E: SynthesisEngine,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    write_response(&mut writer, &Response::ready(ctx.engine().sample_rate())).await?;

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let (response, stop) = router::handle_line(&line, ctx).await;
        write_response(&mut writer, &response).await?;
        if stop {
            tracing::info!("quit requested, stopping service");
            break;
        }
    }
    Ok(())
}

/// Load the voice, reporting a failure as one final `error` line on the
/// given writer. On failure `ready` is never emitted and no request is
/// read; the error is returned so the process exits non-zero.
async fn load_engine<W>(model_path: &Path, writer: &mut W) -> anyhow::Result<PiperEngine>
where
    W: AsyncWrite + Unpin,
{
    match PiperEngine::load(model_path) {
        Ok(engine) => Ok(engine),
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            write_response(writer, &Response::error(e.to_string())).await?;
            Err(e.into())
        }
    }
}

/// Service-mode entry point: load the voice once, then serve stdin/stdout
/// until quit or end of input.
pub async fn run_service(model_path: &Path, config: SynthesisConfig) -> anyhow::Result<()> {
    let mut stdout = io::stdout();
    let engine = load_engine(model_path, &mut stdout).await?;

    let ctx = ServiceContext::new(engine, config);
    serve(&ctx, BufReader::new(io::stdin()), stdout).await
}
