//! Timeline event detail extraction
//!
//! The backend describes events in Portuguese prose, e.g.
//! `Jogador 'Steve' entrou.` or `Versão alterada de '1.20.1' para '1.20.4'.`
//! Every pattern that reads values back out of that prose lives here, so the
//! rest of the dashboard only sees [`TimelineDetail`].

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::types::{EventKind, RawEvent};

static COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s+jogador").expect("Invalid player count regex"));

static QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'([^']*)'").expect("Invalid quoted value regex"));

/// Values pulled out of an event's detail text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineDetail {
    ServerOnline { players: u32 },
    ServerOffline,
    PlayerJoined { player: String },
    PlayerLeft { player: String },
    NewPeak { players: u32 },
    VersionChanged { from: String, to: String },
    /// Extraction failed; the raw text is shown as is
    Unparsed(String),
}

/// A timeline row ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub timestamp: String,
    pub at: Option<DateTime<Utc>>,
    pub kind: EventKind,
    pub detail: TimelineDetail,
}

pub fn extract_detail(kind: EventKind, text: &str) -> TimelineDetail {
    let extracted = match kind {
        EventKind::ServerOnline => {
            first_count(text).map(|players| TimelineDetail::ServerOnline { players })
        }
        EventKind::ServerOffline => Some(TimelineDetail::ServerOffline),
        EventKind::PlayerJoined => {
            first_quoted(text).map(|player| TimelineDetail::PlayerJoined { player })
        }
        EventKind::PlayerLeft => {
            first_quoted(text).map(|player| TimelineDetail::PlayerLeft { player })
        }
        EventKind::NewPeak => first_count(text).map(|players| TimelineDetail::NewPeak { players }),
        EventKind::VersionChanged => {
            let mut quoted = QUOTED_RE.captures_iter(text).map(|c| c[1].to_string());
            match (quoted.next(), quoted.next()) {
                (Some(from), Some(to)) => Some(TimelineDetail::VersionChanged { from, to }),
                _ => None,
            }
        }
    };
    extracted.unwrap_or_else(|| TimelineDetail::Unparsed(text.to_string()))
}

fn first_count(text: &str) -> Option<u32> {
    COUNT_RE.captures(text).and_then(|c| c[1].parse().ok())
}

fn first_quoted(text: &str) -> Option<String> {
    QUOTED_RE.captures(text).map(|c| c[1].to_string())
}

/// Convert raw event rows, skipping unknown kinds.
pub fn build_timeline(events: &[RawEvent]) -> Vec<TimelineEntry> {
    events
        .iter()
        .filter_map(|event| {
            let Some(kind) = EventKind::from_wire(&event.kind) else {
                tracing::debug!("Skipping timeline event of unknown kind {:?}", event.kind);
                return None;
            };
            let text = event.details.as_deref().unwrap_or_default();
            Some(TimelineEntry {
                timestamp: event.timestamp.clone(),
                at: event.at(),
                kind,
                detail: extract_detail(kind, text),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(kind: &str, details: &str) -> RawEvent {
        RawEvent {
            timestamp: "2024-06-01T12:00:00+00:00".to_string(),
            kind: kind.to_string(),
            details: Some(details.to_string()),
        }
    }

    #[test]
    fn test_online_count() {
        assert_eq!(
            extract_detail(
                EventKind::ServerOnline,
                "Servidor ficou online com 12 jogadores."
            ),
            TimelineDetail::ServerOnline { players: 12 }
        );
    }

    #[test]
    fn test_new_peak_count() {
        assert_eq!(
            extract_detail(
                EventKind::NewPeak,
                "🏆 Novo recorde de jogadores em 24h: 57 jogadores."
            ),
            TimelineDetail::NewPeak { players: 57 }
        );
    }

    #[test]
    fn test_player_names() {
        assert_eq!(
            extract_detail(EventKind::PlayerJoined, "Jogador 'Steve' entrou."),
            TimelineDetail::PlayerJoined {
                player: "Steve".into()
            }
        );
        assert_eq!(
            extract_detail(EventKind::PlayerLeft, "Jogador 'Alex_99' saiu."),
            TimelineDetail::PlayerLeft {
                player: "Alex_99".into()
            }
        );
    }

    #[test]
    fn test_version_change() {
        assert_eq!(
            extract_detail(
                EventKind::VersionChanged,
                "Versão alterada de 'Paper 1.20.1' para 'Paper 1.20.4'."
            ),
            TimelineDetail::VersionChanged {
                from: "Paper 1.20.1".into(),
                to: "Paper 1.20.4".into()
            }
        );
    }

    #[test]
    fn test_offline_needs_no_values() {
        assert_eq!(
            extract_detail(EventKind::ServerOffline, "Servidor ficou offline."),
            TimelineDetail::ServerOffline
        );
    }

    #[test]
    fn test_unparsed_falls_back_to_text() {
        assert_eq!(
            extract_detail(EventKind::PlayerJoined, "someone joined"),
            TimelineDetail::Unparsed("someone joined".into())
        );
        assert_eq!(
            extract_detail(EventKind::VersionChanged, "Versão alterada de 'x'"),
            TimelineDetail::Unparsed("Versão alterada de 'x'".into())
        );
    }

    #[test]
    fn test_build_skips_unknown_kinds() {
        let events = vec![
            raw("JOGADOR_ENTROU", "Jogador 'Steve' entrou."),
            raw("ALGO_NOVO", "?"),
            raw("SERVIDOR_OFFLINE", "Servidor ficou offline."),
        ];
        let timeline = build_timeline(&events);
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].kind, EventKind::PlayerJoined);
        assert!(timeline[0].at.is_some());
        assert_eq!(timeline[1].detail, TimelineDetail::ServerOffline);
    }

    #[test]
    fn test_missing_details_text() {
        let event = RawEvent {
            timestamp: "bad".into(),
            kind: "SERVIDOR_ONLINE".into(),
            details: None,
        };
        let timeline = build_timeline(&[event]);
        assert_eq!(timeline[0].detail, TimelineDetail::Unparsed(String::new()));
        assert!(timeline[0].at.is_none());
    }
}
