//! Live console wire messages and line classification
//!
//! Inbound frames are JSON envelopes `{"type": ..., "data": ...}`. Outbound
//! frames are raw command text and need no type here.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Prefixes (lowercased) that mark an RCON response as an error.
///
/// The backend answers `ERRO: ...`, `ERRO RCON: ...` or `ERRO GERAL: ...`;
/// older builds echo them behind a `< ` prompt.
const RCON_ERROR_PREFIXES: &[&str] = &["< erro", "erro", "error"];

/// Substrings of a status payload that select the console banner.
const RCON_MARKER: &str = "RCON";
const LIVE_MARKERS: &[&str] = &["ao vivo", "live"];

/// A decoded console frame.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConsoleMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: String,
}

impl ConsoleMessage {
    pub fn new(kind: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            data: data.into(),
        }
    }

    /// Decode one inbound text frame.
    pub fn parse(frame: &str) -> Result<Self> {
        serde_json::from_str(frame)
            .map_err(|e| Error::protocol(format!("malformed console frame: {e}")))
    }
}

/// Display style of a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleLineKind {
    Status,
    Log,
    /// A log line that looks like `<player> message`
    Chat,
    RconSent,
    RconResponse,
    RconError,
    /// Unrecognized frame type
    Plain,
    /// Locally generated markers (connecting, disconnected, malformed)
    System,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub kind: ConsoleLineKind,
    pub text: String,
}

impl ConsoleLine {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            kind: ConsoleLineKind::System,
            text: text.into(),
        }
    }
}

/// Title indicator of the console panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleBanner {
    #[default]
    Console,
    Live,
    Rcon,
}

pub fn classify(message: &ConsoleMessage) -> ConsoleLine {
    let kind = match message.kind.as_str() {
        "status" => ConsoleLineKind::Status,
        "log" if is_chat(&message.data) => ConsoleLineKind::Chat,
        "log" => ConsoleLineKind::Log,
        "rcon_sent" => ConsoleLineKind::RconSent,
        "rcon_response" if is_rcon_error(&message.data) => ConsoleLineKind::RconError,
        "rcon_response" => ConsoleLineKind::RconResponse,
        _ => ConsoleLineKind::Plain,
    };
    ConsoleLine {
        kind,
        text: message.data.clone(),
    }
}

/// Banner change carried by a `status` frame, if any.
///
/// The RCON-mode message also says the live log is unavailable, so the RCON
/// marker is checked first.
pub fn banner_for(message: &ConsoleMessage) -> Option<ConsoleBanner> {
    if message.kind != "status" {
        return None;
    }
    if message.data.contains(RCON_MARKER) {
        Some(ConsoleBanner::Rcon)
    } else if LIVE_MARKERS.iter().any(|m| message.data.contains(m)) {
        Some(ConsoleBanner::Live)
    } else {
        None
    }
}

pub fn is_chat(text: &str) -> bool {
    text.contains('<') && text.contains('>')
}

pub fn is_rcon_error(text: &str) -> bool {
    let lower = text.trim_start().to_lowercase();
    RCON_ERROR_PREFIXES.iter().any(|p| lower.starts_with(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame() {
        let msg = ConsoleMessage::parse(r#"{"type":"log","data":"[12:00] Done"}"#).unwrap();
        assert_eq!(msg, ConsoleMessage::new("log", "[12:00] Done"));
    }

    #[test]
    fn test_parse_malformed_frame() {
        let err = ConsoleMessage::parse("not json").unwrap_err();
        assert!(matches!(err, Error::Protocol { .. }));
    }

    #[test]
    fn test_chat_detection() {
        let line = classify(&ConsoleMessage::new("log", "[Server] <Steve> hello"));
        assert_eq!(line.kind, ConsoleLineKind::Chat);
        let line = classify(&ConsoleMessage::new("log", "Steve joined the game"));
        assert_eq!(line.kind, ConsoleLineKind::Log);
    }

    #[test]
    fn test_rcon_error_markers() {
        for text in [
            "ERRO: Servidor não encontrado.",
            "ERRO RCON: timeout",
            "ERRO GERAL: boom",
            "< Erro ao executar",
        ] {
            let line = classify(&ConsoleMessage::new("rcon_response", text));
            assert_eq!(line.kind, ConsoleLineKind::RconError, "{text}");
        }
        let line = classify(&ConsoleMessage::new("rcon_response", "There are 3 of 20 players"));
        assert_eq!(line.kind, ConsoleLineKind::RconResponse);
    }

    #[test]
    fn test_unknown_type_is_plain() {
        let line = classify(&ConsoleMessage::new("heartbeat", "x"));
        assert_eq!(line.kind, ConsoleLineKind::Plain);
        assert_eq!(line.text, "x");
    }

    #[test]
    fn test_banner_rcon_mode_wins() {
        let msg = ConsoleMessage::new(
            "status",
            "Conectado em modo RCON. Log ao vivo indisponível.",
        );
        assert_eq!(banner_for(&msg), Some(ConsoleBanner::Rcon));
    }

    #[test]
    fn test_banner_live() {
        let msg = ConsoleMessage::new("status", "--- Conectado ao console ao vivo ---");
        assert_eq!(banner_for(&msg), Some(ConsoleBanner::Live));
    }

    #[test]
    fn test_banner_ignores_other_frames() {
        assert_eq!(banner_for(&ConsoleMessage::new("log", "RCON")), None);
        assert_eq!(banner_for(&ConsoleMessage::new("status", "ERRO: x")), None);
    }
}
