use thiserror::Error;

/// Failure kinds for the speech service.
///
/// Only `ModelLoad` is fatal. Every other variant is caught at the
/// per-request boundary, reported as an `error` response, and the service
/// keeps running.
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("model load failed: {0}")]
    ModelLoad(String),

    #[error("no text provided")]
    EmptyText,

    #[error("synthesis failed: {0}")]
    Synthesis(String),

    #[error("audio framing failed: {0}")]
    Framing(String),

    #[error("playback failed: {0}")]
    Playback(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
