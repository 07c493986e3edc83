//! Synthesis engine seam.
//!
//! The service core never talks to a model directly; it goes through the
//! [`SynthesisEngine`] trait so the loop and router are testable without
//! loading a voice. The real backend is [`piper::PiperEngine`].

pub mod mock;
pub mod piper;

use crate::error::TtsError;

/// Immutable synthesis knobs, constructed once from startup parameters and
/// shared read-only by every request.
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    /// Phoneme length scale; larger values produce slower speech.
    pub length_scale: f32,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self { length_scale: 1.0 }
    }
}

/// A loaded text-to-speech voice.
///
/// Implementations return PCM16 little-endian mono chunks in sequence
/// order; callers concatenate them into one buffer per request. A single
/// engine is loaded at process start and kept for the process lifetime.
pub trait SynthesisEngine {
    /// Output sample rate in Hz, fixed for the life of the engine.
    fn sample_rate(&self) -> u32;

    /// Synthesize `text` into a finite sequence of PCM16 chunks.
    fn synthesize(&self, text: &str, config: &SynthesisConfig)
        -> Result<Vec<Vec<u8>>, TtsError>;
}
