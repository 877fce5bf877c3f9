//! Tests to verify recorded backend payloads parse into the domain types

use blockspy_core::{
    build_timeline, history_to_csv, parse_version, strip_codes, CalendarEntry, EventKind,
    HeatmapData, HistoryPoint, PlayerLists, RawEvent, ServerStatus, ServerSummary, StatusBadge,
    TimelineDetail,
};
use chrono::NaiveDate;

fn servers() -> Vec<ServerSummary> {
    serde_json::from_str(include_str!("fixtures/api/servers.json")).unwrap()
}

#[test]
fn test_server_list_fixture_parses() {
    let servers = servers();
    assert_eq!(servers.len(), 3);

    let online = &servers[0];
    assert_eq!(online.badge(), StatusBadge::Online);
    assert_eq!(strip_codes(online.display_name()), "Example Network");
    assert_eq!(online.ping_label(), "38.5ms");
    assert_eq!(online.players_label(), "14 / 100");
    assert!(online.has_custom_icon);
    assert!(online.has_rcon());
    assert_eq!(online.location.as_deref(), Some("São Paulo"));
}

#[test]
fn test_paused_flag_as_string() {
    let paused = &servers()[1];
    assert!(paused.paused);
    assert_eq!(paused.badge(), StatusBadge::Paused);
    assert_eq!(paused.display_name(), "Old world");
    assert_eq!(paused.players_label(), "--");
    assert!(!paused.has_rcon());
}

#[test]
fn test_null_status_is_pending() {
    let fresh = &servers()[2];
    assert_eq!(fresh.status, ServerStatus::Pending);
    assert_eq!(fresh.badge(), StatusBadge::Checking);
    assert_eq!(fresh.display_name(), "new.example.com");
}

#[test]
fn test_version_split_from_fixture() {
    let parsed = parse_version(servers()[0].version.as_deref());
    assert_eq!(parsed.flavor.as_deref(), Some("Paper"));
    assert_eq!(parsed.base_version.as_deref(), Some("1.20.4"));
}

#[test]
fn test_history_fixture_exports() {
    let history: Vec<HistoryPoint> =
        serde_json::from_str(include_str!("fixtures/api/history.json")).unwrap();
    assert_eq!(history.len(), 3);
    assert!(history.iter().all(|p| p.at().is_some()));
    assert_eq!(history[2].players, None);

    let csv = history_to_csv(&history);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("timestamp_utc,"));
    assert!(lines[2].contains(",14,38.5,14,4"));
}

#[test]
fn test_players_fixture_parses() {
    let players: PlayerLists =
        serde_json::from_str(include_str!("fixtures/api/players.json")).unwrap();
    assert_eq!(players.sorted_online(), vec!["Alex", "Steve", "zed"]);
    assert_eq!(players.offline.len(), 2);
    assert_eq!(players.offline[1].last_seen, None);
}

#[test]
fn test_events_fixture_builds_timeline() {
    let events: Vec<RawEvent> =
        serde_json::from_str(include_str!("fixtures/api/events.json")).unwrap();
    let timeline = build_timeline(&events);

    // Unknown kind is skipped
    assert_eq!(timeline.len(), 4);
    assert_eq!(
        timeline[0].detail,
        TimelineDetail::ServerOnline { players: 12 }
    );
    assert_eq!(
        timeline[1].detail,
        TimelineDetail::PlayerJoined {
            player: "Steve".into()
        }
    );
    assert_eq!(
        timeline[2].detail,
        TimelineDetail::VersionChanged {
            from: "1.20.1".into(),
            to: "1.20.4".into()
        }
    );
    assert_eq!(timeline[3].kind, EventKind::NewPeak);
    assert_eq!(
        timeline[3].detail,
        TimelineDetail::Unparsed("sem numero".into())
    );
}

#[test]
fn test_calendar_fixture_lenient_numbers() {
    let entries: Vec<CalendarEntry> =
        serde_json::from_str(include_str!("fixtures/api/calendar.json")).unwrap();
    let data = HeatmapData::from_entries(&entries);

    let day = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
    assert_eq!(data.len(), 3);
    assert_eq!(data.get(day(1)), Some(12.5));
    assert_eq!(data.get(day(2)), Some(80.0));
    assert_eq!(data.get(day(3)), Some(0.0));
}
