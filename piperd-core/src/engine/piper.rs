//! Piper voice model backend.

use std::fs;
use std::path::{Path, PathBuf};

use piper_rs::synth::{AudioOutputConfig, PiperSpeechSynthesizer};

use crate::engine::{SynthesisConfig, SynthesisEngine};
use crate::error::TtsError;

/// A Piper voice loaded once at startup and kept for the process lifetime.
pub struct PiperEngine {
    synth: PiperSpeechSynthesizer,
    sample_rate: u32,
}

impl std::fmt::Debug for PiperEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PiperEngine")
            .field("sample_rate", &self.sample_rate)
            .finish_non_exhaustive()
    }
}

impl PiperEngine {
    /// Load a voice from its config JSON. A `.onnx` model path is accepted
    /// too; the config path is derived by appending `.json`.
    pub fn load(model_path: &Path) -> Result<Self, TtsError> {
        let config_path = voice_config_path(model_path);
        if !config_path.exists() {
            return Err(TtsError::ModelLoad(format!(
                "model file not found: {}",
                config_path.display()
            )));
        }

        let sample_rate = read_sample_rate(&config_path)?;
        let model = piper_rs::from_config_path(&config_path)
            .map_err(|e| TtsError::ModelLoad(e.to_string()))?;
        let synth = PiperSpeechSynthesizer::new(model)
            .map_err(|e| TtsError::ModelLoad(e.to_string()))?;

        tracing::info!(config = %config_path.display(), sample_rate, "voice model loaded");
        Ok(Self { synth, sample_rate })
    }
}

impl SynthesisEngine for PiperEngine {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn synthesize(
        &self,
        text: &str,
        config: &SynthesisConfig,
    ) -> Result<Vec<Vec<u8>>, TtsError> {
        let stream = self
            .synth
            .synthesize_parallel(text.to_string(), output_config(config))
            .map_err(|e| TtsError::Synthesis(e.to_string()))?;

        let mut chunks = Vec::new();
        for part in stream {
            let samples = part
                .map_err(|e| TtsError::Synthesis(e.to_string()))?
                .into_vec();
            chunks.push(f32_to_pcm16(&samples));
        }
        Ok(chunks)
    }
}

/// Resolve the voice config path: Piper ships `<voice>.onnx` next to
/// `<voice>.onnx.json`, and piper-rs loads from the JSON side.
fn voice_config_path(model_path: &Path) -> PathBuf {
    match model_path.extension().and_then(|e| e.to_str()) {
        Some("onnx") => {
            let mut name = model_path.as_os_str().to_owned();
            name.push(".json");
            PathBuf::from(name)
        }
        _ => model_path.to_path_buf(),
    }
}

/// Read `audio.sample_rate` from the voice config JSON.
fn read_sample_rate(config_path: &Path) -> Result<u32, TtsError> {
    let text = fs::read_to_string(config_path).map_err(|e| {
        TtsError::ModelLoad(format!("failed to read {}: {e}", config_path.display()))
    })?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| TtsError::ModelLoad(format!("voice config is not valid JSON: {e}")))?;

    json.get("audio")
        .and_then(|audio| audio.get("sample_rate"))
        .and_then(|rate| rate.as_u64())
        .map(|rate| rate as u32)
        .ok_or_else(|| {
            TtsError::ModelLoad("missing audio.sample_rate in voice config".to_string())
        })
}

/// Piper expresses speed as a 0-100 rate percentage with 50 as neutral;
/// `length_scale` is the inverse (2.0 means twice as long, so half speed).
fn output_config(config: &SynthesisConfig) -> Option<AudioOutputConfig> {
    if (config.length_scale - 1.0).abs() < f32::EPSILON {
        return None;
    }
    let rate = (50.0 / config.length_scale).clamp(0.0, 100.0).round() as u8;
    Some(AudioOutputConfig {
        rate: Some(rate),
        volume: None,
        pitch: None,
        appended_silence_ms: None,
    })
}

fn f32_to_pcm16(samples: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}
