//! Newline-delimited JSON wire types for service mode.
//!
//! One object per line in both directions, UTF-8, no batching. Inbound
//! lines that are not JSON are accepted as plain text to play; the parent
//! protocol predates the `action` field.

use serde::{Deserialize, Serialize};

/// Requested operation. Absent and unrecognized action values both map to
/// `Play` rather than being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Play,
    Raw,
    Ping,
    Quit,
}

impl Action {
    fn from_wire(action: Option<&str>) -> Self {
        match action {
            Some("raw") => Action::Raw,
            Some("ping") => Action::Ping,
            Some("quit") => Action::Quit,
            _ => Action::Play,
        }
    }
}

/// One canonical inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub action: Action,
    pub text: String,
}

/// Raw JSON shape of an inbound line. `action` stays a string here so an
/// unknown value degrades to the default instead of failing the parse.
#[derive(Debug, Deserialize)]
struct WireRequest {
    #[serde(default)]
    text: String,
    #[serde(default)]
    action: Option<String>,
}

/// Outcome of parsing one line: a well-formed JSON request, or the
/// plain-text fallback carrying the whole line.
#[derive(Debug)]
enum ParsedLine {
    Parsed(WireRequest),
    Fallback(String),
}

fn parse_line(line: &str) -> ParsedLine {
    match serde_json::from_str::<WireRequest>(line) {
        Ok(wire) => ParsedLine::Parsed(wire),
        Err(_) => ParsedLine::Fallback(line.trim().to_string()),
    }
}

impl Request {
    /// Parse one inbound line. Never fails: both parse outcomes produce the
    /// same canonical request shape.
    pub fn from_line(line: &str) -> Self {
        match parse_line(line) {
            ParsedLine::Parsed(wire) => Self {
                action: Action::from_wire(wire.action.as_deref()),
                text: wire.text,
            },
            ParsedLine::Fallback(text) => Self {
                action: Action::Play,
                text,
            },
        }
    }
}

/// Response status over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ready,
    Ok,
    Error,
}

/// One outbound response line. Absent optional fields are omitted from the
/// serialized object entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
}

impl Response {
    /// The one-time readiness handshake, emitted after a successful model
    /// load and before any request is processed.
    pub fn ready(sample_rate: u32) -> Self {
        Self {
            status: Status::Ready,
            message: Some("service ready".to_string()),
            audio: None,
            sample_rate: Some(sample_rate),
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: Status::Ok,
            message: Some(message.into()),
            audio: None,
            sample_rate: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: Some(message.into()),
            audio: None,
            sample_rate: None,
        }
    }

    /// A successful `raw` response carrying base64-encoded PCM16 audio.
    pub fn raw_audio(audio: String, sample_rate: u32) -> Self {
        Self {
            status: Status::Ok,
            message: None,
            audio: Some(audio),
            sample_rate: Some(sample_rate),
        }
    }
}
