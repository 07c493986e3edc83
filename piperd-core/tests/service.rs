//! End-to-end tests for the service loop, driven over in-memory streams
//! with a mock engine.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use piperd_core::engine::mock::MockEngine;
use piperd_core::engine::SynthesisConfig;
use piperd_core::service::protocol::{Response, Status};
use piperd_core::{serve, ServiceContext};

async fn run_session(
    engine: MockEngine,
    input: &str,
) -> (Vec<Response>, ServiceContext<MockEngine>) {
    let ctx = ServiceContext::new(engine, SynthesisConfig::default());
    let mut output: Vec<u8> = Vec::new();
    serve(&ctx, input.as_bytes(), &mut output).await.unwrap();

    let responses = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    (responses, ctx)
}

#[tokio::test]
async fn ready_then_ping_raw_quit_session() {
    let input = concat!(
        "{\"action\":\"ping\"}\n",
        "{\"text\":\"hello\",\"action\":\"raw\"}\n",
        "{\"action\":\"quit\"}\n",
        "{\"action\":\"ping\"}\n",
    );
    let engine = MockEngine::new(22050, vec![vec![1, 2], vec![3, 4]]);
    let (responses, ctx) = run_session(engine, input).await;

    // One response per request, plus the handshake; nothing after quit.
    assert_eq!(responses.len(), 4);

    assert_eq!(responses[0].status, Status::Ready);
    assert_eq!(responses[0].sample_rate, Some(22050));

    assert_eq!(responses[1], Response::ok("pong"));

    assert_eq!(responses[2].status, Status::Ok);
    assert_eq!(responses[2].sample_rate, Some(22050));
    let audio = BASE64
        .decode(responses[2].audio.as_deref().unwrap())
        .unwrap();
    assert_eq!(audio, vec![1, 2, 3, 4]);

    assert_eq!(responses[3], Response::ok("service stopped"));

    // Only the raw request hit the engine.
    assert_eq!(ctx.engine().synthesize_calls(), 1);
}

#[tokio::test]
async fn blank_lines_get_no_response() {
    let input = "\n   \n{\"action\":\"ping\"}\n\n";
    let engine = MockEngine::new(22050, vec![]);
    let (responses, _) = run_session(engine, input).await;

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0].status, Status::Ready);
    assert_eq!(responses[1], Response::ok("pong"));
}

#[tokio::test]
async fn empty_text_error_keeps_the_service_alive() {
    let input = concat!(
        "{\"text\":\"\",\"action\":\"play\"}\n",
        "{\"action\":\"ping\"}\n",
    );
    let engine = MockEngine::new(22050, vec![vec![1]]);
    let (responses, ctx) = run_session(engine, input).await;

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[1], Response::error("no text provided"));
    assert_eq!(responses[2], Response::ok("pong"));
    assert_eq!(ctx.engine().synthesize_calls(), 0);
}

#[tokio::test]
async fn synthesis_failure_is_isolated_to_its_request() {
    let input = concat!(
        "{\"text\":\"boom\",\"action\":\"raw\"}\n",
        "{\"action\":\"ping\"}\n",
    );
    let engine = MockEngine::failing(22050, "weights corrupted");
    let (responses, _) = run_session(engine, input).await;

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[1].status, Status::Error);
    let message = responses[1].message.as_deref().unwrap();
    assert!(message.starts_with("synthesis failed:"), "{message}");
    assert_eq!(responses[2], Response::ok("pong"));
}

#[tokio::test]
async fn end_of_input_is_a_clean_stop() {
    let input = "{\"action\":\"ping\"}\n";
    let engine = MockEngine::new(22050, vec![]);
    let (responses, _) = run_session(engine, input).await;

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[1], Response::ok("pong"));
}

#[tokio::test]
async fn raw_audio_round_trips_byte_identically() {
    let pcm: Vec<u8> = (0u8..=255).collect();
    let input = "{\"text\":\"bytes\",\"action\":\"raw\"}\n";
    let engine = MockEngine::new(48000, vec![pcm.clone()]);
    let (responses, _) = run_session(engine, input).await;

    let audio = BASE64
        .decode(responses[1].audio.as_deref().unwrap())
        .unwrap();
    assert_eq!(audio, pcm);
}
