//! Deterministic engine for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::engine::{SynthesisConfig, SynthesisEngine};
use crate::error::TtsError;

/// Test double for [`SynthesisEngine`]. Emits a fixed chunk sequence and
/// counts synthesize calls so tests can assert that `ping` and `quit`
/// never touch the engine.
pub struct MockEngine {
    sample_rate: u32,
    chunks: Vec<Vec<u8>>,
    fail_with: Option<String>,
    calls: AtomicUsize,
}

impl MockEngine {
    pub fn new(sample_rate: u32, chunks: Vec<Vec<u8>>) -> Self {
        Self {
            sample_rate,
            chunks,
            fail_with: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// An engine whose every synthesis call fails with `message`.
    pub fn failing(sample_rate: u32, message: &str) -> Self {
        Self {
            sample_rate,
            chunks: Vec::new(),
            fail_with: Some(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn synthesize_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SynthesisEngine for MockEngine {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn synthesize(
        &self,
        _text: &str,
        _config: &SynthesisConfig,
    ) -> Result<Vec<Vec<u8>>, TtsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_with {
            return Err(TtsError::Synthesis(message.clone()));
        }
        Ok(self.chunks.clone())
    }
}
