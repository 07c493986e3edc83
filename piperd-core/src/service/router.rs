//! Per-request dispatch: decode one line, run the action, produce exactly
//! one response.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::audio::playback;
use crate::engine::{SynthesisConfig, SynthesisEngine};
use crate::error::TtsError;
use crate::service::protocol::{Action, Request, Response};

/// Process-scoped context: the loaded engine and the shared synthesis
/// configuration, both constructed once at startup and immutable for the
/// rest of the process lifetime.
pub struct ServiceContext<E> {
    engine: E,
    config: SynthesisConfig,
}

impl<E: SynthesisEngine> ServiceContext<E> {
    pub fn new(engine: E, config: SynthesisConfig) -> Self {
        Self { engine, config }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }
}

/// Handle one non-empty input line. Returns the response to write and
/// whether the service loop should stop afterwards.
///
/// Request-level failures are converted to `error` responses here and
/// never propagate; only the loop decides what is fatal.
pub async fn handle_line<E: SynthesisEngine>(
    line: &str,
    ctx: &ServiceContext<E>,
) -> (Response, bool) {
    let request = Request::from_line(line);
    tracing::debug!(action = ?request.action, "handling request");

    match request.action {
        Action::Ping => (Response::ok("pong"), false),
        Action::Quit => (Response::ok("service stopped"), true),
        Action::Play | Action::Raw => {
            if request.text.trim().is_empty() {
                return (Response::error(TtsError::EmptyText.to_string()), false);
            }

            let audio = match synthesize_buffer(ctx, &request.text) {
                Ok(audio) => audio,
                Err(e) => {
                    tracing::warn!(error = %e, "synthesis failed");
                    return (Response::error(e.to_string()), false);
                }
            };

            match request.action {
                Action::Raw => (
                    Response::raw_audio(BASE64.encode(&audio), ctx.engine.sample_rate()),
                    false,
                ),
                _ => match playback::play(&audio, ctx.engine.sample_rate()).await {
                    Ok(()) => (Response::ok("playback complete"), false),
                    Err(e) => {
                        tracing::warn!(error = %e, "playback failed");
                        (Response::error(e.to_string()), false)
                    }
                },
            }
        }
    }
}

/// Run one synthesis call and concatenate its chunks in sequence order.
fn synthesize_buffer<E: SynthesisEngine>(
    ctx: &ServiceContext<E>,
    text: &str,
) -> Result<Vec<u8>, TtsError> {
    let chunks = ctx.engine.synthesize(text, &ctx.config)?;
    Ok(chunks.concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockEngine;
    use crate::service::protocol::Status;

    fn context(engine: MockEngine) -> ServiceContext<MockEngine> {
        ServiceContext::new(engine, SynthesisConfig::default())
    }

    #[tokio::test]
    async fn ping_returns_pong_without_synthesis() {
        let ctx = context(MockEngine::new(22050, vec![vec![1, 2]]));
        let (response, stop) = handle_line(r#"{"action":"ping"}"#, &ctx).await;

        assert_eq!(response, Response::ok("pong"));
        assert!(!stop);
        assert_eq!(ctx.engine().synthesize_calls(), 0);
    }

    #[tokio::test]
    async fn quit_acknowledges_and_stops() {
        let ctx = context(MockEngine::new(22050, vec![]));
        let (response, stop) = handle_line(r#"{"action":"quit"}"#, &ctx).await;

        assert_eq!(response, Response::ok("service stopped"));
        assert!(stop);
        assert_eq!(ctx.engine().synthesize_calls(), 0);
    }

    #[tokio::test]
    async fn empty_text_is_an_error_not_a_stop() {
        let ctx = context(MockEngine::new(22050, vec![vec![1]]));
        let (response, stop) = handle_line(r#"{"text":"","action":"play"}"#, &ctx).await;

        assert_eq!(response, Response::error("no text provided"));
        assert!(!stop);
        assert_eq!(ctx.engine().synthesize_calls(), 0);
    }

    #[tokio::test]
    async fn whitespace_only_text_counts_as_empty() {
        let ctx = context(MockEngine::new(22050, vec![vec![1]]));
        let (response, _) = handle_line(r#"{"text":"   ","action":"raw"}"#, &ctx).await;

        assert_eq!(response.status, Status::Error);
        assert_eq!(ctx.engine().synthesize_calls(), 0);
    }

    #[tokio::test]
    async fn raw_returns_base64_of_chunks_in_order() {
        let ctx = context(MockEngine::new(16000, vec![vec![1, 2], vec![3, 4]]));
        let (response, stop) = handle_line(r#"{"text":"hi","action":"raw"}"#, &ctx).await;

        assert!(!stop);
        assert_eq!(response.status, Status::Ok);
        assert_eq!(response.sample_rate, Some(16000));
        let decoded = BASE64.decode(response.audio.unwrap()).unwrap();
        assert_eq!(decoded, vec![1, 2, 3, 4]);
        assert_eq!(ctx.engine().synthesize_calls(), 1);
    }

    #[tokio::test]
    async fn synthesis_failure_becomes_an_error_response() {
        let ctx = context(MockEngine::failing(22050, "model exploded"));
        let (response, stop) = handle_line(r#"{"text":"hi","action":"raw"}"#, &ctx).await;

        assert!(!stop);
        assert_eq!(response.status, Status::Error);
        let message = response.message.unwrap();
        assert!(message.starts_with("synthesis failed:"), "{message}");
        assert!(message.contains("model exploded"));
    }
}
