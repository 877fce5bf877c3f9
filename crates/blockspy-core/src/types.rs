//! Domain types mirroring the BlockSpy backend payloads
//!
//! Field names follow the backend's JSON (Portuguese column names) through
//! `serde(rename)`, while the Rust side uses English names. The backend
//! stores flags as SQLite integers and some numbers as strings, so a few
//! lenient deserializers live at the bottom of this module.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Server summary
// ─────────────────────────────────────────────────────────────────────────────

/// Monitoring status reported by the backend poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Online,
    Offline,
    #[default]
    Pending,
    #[serde(other)]
    Unknown,
}

/// Account verification classification of a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerType {
    Original,
    Pirata,
    Indefinido,
}

impl ServerType {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("Original") => ServerType::Original,
            Some("Pirata") => ServerType::Pirata,
            _ => ServerType::Indefinido,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServerType::Original => "Original",
            ServerType::Pirata => "Pirata",
            ServerType::Indefinido => "Indefinido",
        }
    }
}

/// Badge shown on a server card, derived from status and pause flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBadge {
    Paused,
    Online,
    Checking,
    Offline,
}

/// One monitored server as returned by `GET /api/servers`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerSummary {
    #[serde(rename = "ip_servidor")]
    pub ip: String,

    /// Advertised MOTD, may carry `§` formatting codes
    #[serde(rename = "nome_servidor", default)]
    pub advertised_name: Option<String>,

    #[serde(rename = "nome_customizado", default)]
    pub custom_name: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ServerStatus,

    #[serde(rename = "pausado", default, deserialize_with = "int_flag")]
    pub paused: bool,

    #[serde(default)]
    pub ping: Option<f64>,

    #[serde(rename = "jogadores_online", default)]
    pub players_online: Option<i64>,

    #[serde(rename = "jogadores_maximos", default)]
    pub players_max: Option<i64>,

    #[serde(rename = "versao", default)]
    pub version: Option<String>,

    #[serde(rename = "tipo_servidor", default)]
    pub server_type: Option<String>,

    #[serde(default)]
    pub country_code: Option<String>,

    #[serde(rename = "localizacao", default)]
    pub location: Option<String>,

    #[serde(rename = "tem_icone_customizado", default, deserialize_with = "int_flag")]
    pub has_custom_icon: bool,

    #[serde(rename = "ultima_verificacao", default)]
    pub last_checked: Option<String>,

    #[serde(default)]
    pub rcon_port: Option<u32>,

    #[serde(default)]
    pub rcon_password: Option<String>,

    #[serde(rename = "caminho_servidor", default)]
    pub server_path: Option<String>,
}

impl ServerSummary {
    /// A summary with only the address set, as the backend creates it on add.
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            advertised_name: None,
            custom_name: None,
            status: ServerStatus::Pending,
            paused: false,
            ping: None,
            players_online: None,
            players_max: None,
            version: None,
            server_type: None,
            country_code: None,
            location: None,
            has_custom_icon: false,
            last_checked: None,
            rcon_port: None,
            rcon_password: None,
            server_path: None,
        }
    }

    /// Custom name, else advertised name, else the address.
    pub fn display_name(&self) -> &str {
        non_empty(self.custom_name.as_deref())
            .or_else(|| non_empty(self.advertised_name.as_deref()))
            .unwrap_or(&self.ip)
    }

    /// Name used for export files: the custom name, else the address.
    ///
    /// The advertised MOTD changes with the server and carries formatting
    /// codes, so it never names a file.
    pub fn export_name(&self) -> &str {
        non_empty(self.custom_name.as_deref()).unwrap_or(&self.ip)
    }

    /// Online and not paused; gates every live metric on the card.
    pub fn is_live(&self) -> bool {
        self.status == ServerStatus::Online && !self.paused
    }

    pub fn badge(&self) -> StatusBadge {
        if self.paused {
            StatusBadge::Paused
        } else if self.status == ServerStatus::Online {
            StatusBadge::Online
        } else if self.status == ServerStatus::Pending {
            StatusBadge::Checking
        } else {
            StatusBadge::Offline
        }
    }

    pub fn kind(&self) -> ServerType {
        ServerType::from_raw(self.server_type.as_deref())
    }

    /// Both RCON port and password are configured, so the console accepts input.
    ///
    /// Port 0 means unset.
    pub fn has_rcon(&self) -> bool {
        self.rcon_port.is_some_and(|port| port != 0)
            && non_empty(self.rcon_password.as_deref()).is_some()
    }

    /// Ping as shown on the card: `42ms` when live, `--` otherwise.
    pub fn ping_label(&self) -> String {
        match (self.is_live(), self.ping) {
            (true, Some(ping)) => format!("{}ms", format_number(ping)),
            _ => "--".to_string(),
        }
    }

    /// Players as shown on the card: `5 / 20` when live, `--` otherwise.
    pub fn players_label(&self) -> String {
        if !self.is_live() {
            return "--".to_string();
        }
        format!(
            "{} / {}",
            self.players_online.unwrap_or(0),
            self.players_max.unwrap_or(0)
        )
    }

    pub fn version_label(&self) -> String {
        match (self.is_live(), non_empty(self.version.as_deref())) {
            (true, Some(v)) => v.to_string(),
            _ => "--".to_string(),
        }
    }

    /// First visible letter of the display name, used as the icon badge.
    pub fn initial(&self) -> char {
        crate::motd::strip_codes(self.display_name())
            .chars()
            .find(|c| !c.is_whitespace())
            .map(|c| c.to_uppercase().next().unwrap_or(c))
            .unwrap_or('?')
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Render a float without a trailing `.0` when it is integral.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Details payloads
// ─────────────────────────────────────────────────────────────────────────────

/// One sample of `GET /api/servers/{ip}/history`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HistoryPoint {
    pub timestamp: String,

    #[serde(rename = "jogadores_online", default)]
    pub players: Option<i64>,

    #[serde(default)]
    pub ping: Option<f64>,

    #[serde(rename = "lotacao_percentual", default)]
    pub occupancy_percent: f64,

    #[serde(rename = "variacao_jogadores", default)]
    pub player_delta: i64,
}

impl HistoryPoint {
    pub fn at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}

/// A player that was seen before but is not online now.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OfflinePlayer {
    #[serde(rename = "nome_jogador")]
    pub name: String,

    #[serde(rename = "ultima_vez_visto", default)]
    pub last_seen: Option<String>,
}

/// `GET /api/servers/{ip}/players`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PlayerLists {
    #[serde(default)]
    pub online: Vec<String>,
    #[serde(default)]
    pub offline: Vec<OfflinePlayer>,
}

impl PlayerLists {
    /// Online names sorted case-insensitively.
    pub fn sorted_online(&self) -> Vec<String> {
        let mut names = self.online.clone();
        names.sort_by_key(|n| n.to_lowercase());
        names
    }
}

/// `GET /api/servers/{ip}/stats`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ServerStats {
    #[serde(default)]
    pub uptime_percent: f64,
    #[serde(default)]
    pub peak_players: i64,
    #[serde(default)]
    pub average_players: f64,
}

/// One day of `GET /api/servers/{ip}/calendar_heatmap`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CalendarEntry {
    /// Unix seconds at the start of the day (the backend sends it as a string)
    #[serde(deserialize_with = "lenient_i64")]
    pub timestamp: i64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub value: f64,
}

/// Closed set of timeline event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum EventKind {
    #[serde(rename = "SERVIDOR_ONLINE")]
    ServerOnline,
    #[serde(rename = "SERVIDOR_OFFLINE")]
    ServerOffline,
    #[serde(rename = "JOGADOR_ENTROU")]
    PlayerJoined,
    #[serde(rename = "JOGADOR_SAIU")]
    PlayerLeft,
    #[serde(rename = "NOVO_PICO_JOGADORES")]
    NewPeak,
    #[serde(rename = "VERSAO_ALTERADA")]
    VersionChanged,
}

impl EventKind {
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "SERVIDOR_ONLINE" => Some(EventKind::ServerOnline),
            "SERVIDOR_OFFLINE" => Some(EventKind::ServerOffline),
            "JOGADOR_ENTROU" => Some(EventKind::PlayerJoined),
            "JOGADOR_SAIU" => Some(EventKind::PlayerLeft),
            "NOVO_PICO_JOGADORES" => Some(EventKind::NewPeak),
            "VERSAO_ALTERADA" => Some(EventKind::VersionChanged),
            _ => None,
        }
    }
}

/// Raw event row from `GET /api/servers/{ip}/events`.
///
/// The kind stays a string here so an unknown kind skips one event instead of
/// failing the whole details refresh.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawEvent {
    pub timestamp: String,
    #[serde(rename = "tipo_evento")]
    pub kind: String,
    #[serde(rename = "detalhes", default)]
    pub details: Option<String>,
}

impl RawEvent {
    pub fn at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings and watchlist
// ─────────────────────────────────────────────────────────────────────────────

/// Backend-wide notification settings (`/api/settings/global`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GlobalSettings {
    #[serde(default)]
    pub discord_webhook_url: Option<String>,
    #[serde(rename = "notificar_online_offline", default, deserialize_with = "int_flag")]
    pub notify_online_offline: bool,
    #[serde(rename = "notificar_pico_jogadores", default, deserialize_with = "int_flag")]
    pub notify_player_peak: bool,
    #[serde(rename = "notificar_marcos_lotacao", default, deserialize_with = "int_flag")]
    pub notify_occupancy_milestones: bool,
    #[serde(rename = "notificar_primeira_entrada", default, deserialize_with = "int_flag")]
    pub notify_first_join: bool,
}

/// A watched player. The backend has answered both bare names and objects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum WatchlistEntry {
    Named {
        #[serde(rename = "nome_jogador")]
        name: String,
    },
    Bare(String),
}

impl WatchlistEntry {
    pub fn name(&self) -> &str {
        match self {
            WatchlistEntry::Named { name } => name,
            WatchlistEntry::Bare(name) => name,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request bodies
// ─────────────────────────────────────────────────────────────────────────────

/// `PATCH /api/servers/{ip}` body; `None` fields are left out of the JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    #[serde(rename = "caminho_servidor", skip_serializing_if = "Option::is_none")]
    pub server_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rcon_port: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rcon_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_ip: Option<String>,
}

/// `POST /api/rcon/test` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RconTestRequest {
    pub ip: String,
    pub rcon_port: u32,
    pub rcon_password: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Timestamps and lenient deserializers
// ─────────────────────────────────────────────────────────────────────────────

/// Parse the timestamp formats the backend emits.
///
/// Python `isoformat()` with offset, plain RFC 3339, and SQLite's
/// `YYYY-MM-DD HH:MM:SS` (taken as UTC) are accepted.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

fn int_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::Bool(b)) => b,
        Some(Lenient::Int(i)) => i != 0,
        Some(Lenient::Float(f)) => f != 0.0,
        Some(Lenient::Text(s)) => matches!(s.trim(), "1" | "true" | "True"),
        None => false,
    })
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Lenient::deserialize(deserializer)? {
        Lenient::Int(i) => Ok(i),
        Lenient::Float(f) => Ok(f as i64),
        Lenient::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
        Lenient::Bool(_) => Err(serde::de::Error::custom("expected unix seconds")),
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::Int(i)) => Ok(i as f64),
        Some(Lenient::Float(f)) => Ok(f),
        Some(Lenient::Text(s)) => s.trim().parse().map_err(serde::de::Error::custom),
        Some(Lenient::Bool(_)) => Err(serde::de::Error::custom("expected a number")),
        None => Ok(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn online_server() -> ServerSummary {
        serde_json::from_str(
            r#"{"ip_servidor":"mc.example.net","nome_servidor":"§aExample","status":"online",
                "pausado":0,"ping":42,"jogadores_online":5,"jogadores_maximos":20,
                "versao":"Paper 1.20.4","tipo_servidor":"Original","tem_icone_customizado":1}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_online_card_labels() {
        let server = online_server();
        assert_eq!(server.badge(), StatusBadge::Online);
        assert_eq!(server.ping_label(), "42ms");
        assert_eq!(server.players_label(), "5 / 20");
        assert_eq!(server.version_label(), "Paper 1.20.4");
        assert!(server.has_custom_icon);
    }

    #[test]
    fn test_paused_server_hides_metrics() {
        let mut server = online_server();
        server.paused = true;
        assert_eq!(server.badge(), StatusBadge::Paused);
        assert_eq!(server.ping_label(), "--");
        assert_eq!(server.players_label(), "--");
    }

    #[test]
    fn test_pending_badge() {
        let server: ServerSummary =
            serde_json::from_str(r#"{"ip_servidor":"a","status":"pending"}"#).unwrap();
        assert_eq!(server.badge(), StatusBadge::Checking);
        assert_eq!(server.ping_label(), "--");
    }

    #[test]
    fn test_null_status_defaults_to_pending() {
        let server: ServerSummary =
            serde_json::from_str(r#"{"ip_servidor":"a","status":null,"pausado":null}"#).unwrap();
        assert_eq!(server.status, ServerStatus::Pending);
        assert!(!server.paused);
    }

    #[test]
    fn test_unknown_status_is_offline_badge() {
        let server: ServerSummary =
            serde_json::from_str(r#"{"ip_servidor":"a","status":"erro"}"#).unwrap();
        assert_eq!(server.status, ServerStatus::Unknown);
        assert_eq!(server.badge(), StatusBadge::Offline);
    }

    #[test]
    fn test_display_name_precedence() {
        let mut server = ServerSummary::new("1.2.3.4");
        assert_eq!(server.display_name(), "1.2.3.4");
        server.advertised_name = Some("Advertised".into());
        assert_eq!(server.display_name(), "Advertised");
        server.custom_name = Some("".into());
        assert_eq!(server.display_name(), "Advertised");
        server.custom_name = Some("Mine".into());
        assert_eq!(server.display_name(), "Mine");
    }

    #[test]
    fn test_initial_strips_motd_codes() {
        let server = online_server();
        assert_eq!(server.initial(), 'E');
    }

    #[test]
    fn test_fractional_ping() {
        let mut server = online_server();
        server.ping = Some(42.5);
        assert_eq!(server.ping_label(), "42.5ms");
    }

    #[test]
    fn test_has_rcon_requires_both() {
        let mut server = ServerSummary::new("a");
        server.rcon_port = Some(25575);
        assert!(!server.has_rcon());
        server.rcon_password = Some("secret".into());
        assert!(server.has_rcon());
    }

    #[test]
    fn test_rcon_port_zero_is_unset() {
        let mut server = ServerSummary::new("a");
        server.rcon_port = Some(0);
        server.rcon_password = Some("secret".into());
        assert!(!server.has_rcon());
    }

    #[test]
    fn test_export_name_ignores_motd() {
        let mut server = ServerSummary::new("1.2.3.4:25565");
        server.advertised_name = Some("§aFancy §lMOTD".into());
        assert_eq!(server.export_name(), "1.2.3.4:25565");
        server.custom_name = Some("  ".into());
        assert_eq!(server.export_name(), "1.2.3.4:25565");
        server.custom_name = Some("Survival".into());
        assert_eq!(server.export_name(), "Survival");
    }

    #[test]
    fn test_server_type_from_raw() {
        assert_eq!(ServerType::from_raw(Some("Pirata")), ServerType::Pirata);
        assert_eq!(ServerType::from_raw(Some("other")), ServerType::Indefinido);
        assert_eq!(ServerType::from_raw(None), ServerType::Indefinido);
    }

    #[test]
    fn test_calendar_entry_accepts_string_timestamp() {
        let entry: CalendarEntry =
            serde_json::from_str(r#"{"timestamp":"1717200000","value":7}"#).unwrap();
        assert_eq!(entry.timestamp, 1_717_200_000);
        assert_eq!(entry.value, 7.0);
    }

    #[test]
    fn test_calendar_entry_accepts_numeric_timestamp() {
        let entry: CalendarEntry =
            serde_json::from_str(r#"{"timestamp":1717200000,"value":null}"#).unwrap();
        assert_eq!(entry.timestamp, 1_717_200_000);
        assert_eq!(entry.value, 0.0);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-06-01T12:00:00.123456+00:00").is_some());
        assert!(parse_timestamp("2024-06-01T12:00:00Z").is_some());
        assert!(parse_timestamp("2024-06-01 12:00:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_watchlist_entry_shapes() {
        let entries: Vec<WatchlistEntry> =
            serde_json::from_str(r#"[{"nome_jogador":"Steve"},"Alex"]"#).unwrap();
        assert_eq!(entries[0].name(), "Steve");
        assert_eq!(entries[1].name(), "Alex");
    }

    #[test]
    fn test_patch_skips_none_fields() {
        let patch = ServerPatch {
            custom_name: Some("Hub".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"custom_name": "Hub"}));
    }

    #[test]
    fn test_global_settings_int_flags() {
        let settings: GlobalSettings = serde_json::from_str(
            r#"{"discord_webhook_url":null,"notificar_online_offline":1,"notificar_pico_jogadores":0}"#,
        )
        .unwrap();
        assert!(settings.notify_online_offline);
        assert!(!settings.notify_player_peak);
        assert!(!settings.notify_first_join);
    }

    #[test]
    fn test_sorted_online_players() {
        let lists = PlayerLists {
            online: vec!["zed".into(), "Alex".into(), "bob".into()],
            offline: vec![],
        };
        assert_eq!(lists.sorted_online(), vec!["Alex", "bob", "zed"]);
    }
}
