//! Minimal WAV container framing for PCM16 mono buffers.

use std::io::Cursor;

use crate::error::TtsError;

/// Wrap raw PCM16 little-endian mono samples in a standard WAV container
/// (1 channel, 16-bit integer samples, the given sample rate).
pub fn frame_as_wav(pcm: &[u8], sample_rate: u32) -> Result<Vec<u8>, TtsError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(44 + pcm.len()));
    let mut writer = hound::WavWriter::new(&mut cursor, spec)
        .map_err(|e| TtsError::Framing(e.to_string()))?;
    for chunk in pcm.chunks_exact(2) {
        let sample = i16::from_le_bytes([chunk[0], chunk[1]]);
        writer
            .write_sample(sample)
            .map_err(|e| TtsError::Framing(e.to_string()))?;
    }
    writer
        .finalize()
        .map_err(|e| TtsError::Framing(e.to_string()))?;

    Ok(cursor.into_inner())
}

/// Identity passthrough for the raw output paths.
pub fn frame_as_raw(pcm: &[u8]) -> &[u8] {
    pcm
}
