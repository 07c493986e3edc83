//! WAV framing and external-player playback.

pub mod playback;
pub mod wav;
