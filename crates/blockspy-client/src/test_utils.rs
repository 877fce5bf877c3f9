//! In-memory [`DashboardApi`] double
//!
//! Records every call as `(method, argument)` and answers from canned data.
//! A failure registered for `method` (or for `method:argument`) makes that
//! call return an error instead.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use blockspy_core::prelude::*;
use blockspy_core::types::{
    CalendarEntry, GlobalSettings, HistoryPoint, PlayerLists, RawEvent, RconTestRequest,
    ServerPatch, ServerStats, ServerSummary, WatchlistEntry,
};

use crate::api::DashboardApi;

#[derive(Debug, Clone)]
enum Failure {
    Http(u16, String),
    Transport,
}

#[derive(Debug, Default)]
struct Inner {
    servers: Vec<ServerSummary>,
    history: Vec<HistoryPoint>,
    players: PlayerLists,
    stats: ServerStats,
    events: Vec<RawEvent>,
    calendar: Vec<CalendarEntry>,
    icons: HashMap<String, Vec<u8>>,
    settings: GlobalSettings,
    watchlist: Vec<WatchlistEntry>,
    patches: Vec<(String, ServerPatch)>,
    failures: HashMap<String, Failure>,
    calls: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default)]
pub struct FakeApi {
    inner: Arc<Mutex<Inner>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_servers(servers: Vec<ServerSummary>) -> Self {
        let api = Self::new();
        api.lock().servers = servers;
        api
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_servers(&self, servers: Vec<ServerSummary>) {
        self.lock().servers = servers;
    }

    pub fn set_history(&self, history: Vec<HistoryPoint>) {
        self.lock().history = history;
    }

    pub fn set_players(&self, players: PlayerLists) {
        self.lock().players = players;
    }

    pub fn set_stats(&self, stats: ServerStats) {
        self.lock().stats = stats;
    }

    pub fn set_events(&self, events: Vec<RawEvent>) {
        self.lock().events = events;
    }

    pub fn set_calendar(&self, calendar: Vec<CalendarEntry>) {
        self.lock().calendar = calendar;
    }

    pub fn set_icon(&self, ip: &str, blob: Vec<u8>) {
        self.lock().icons.insert(ip.to_string(), blob);
    }

    pub fn set_settings(&self, settings: GlobalSettings) {
        self.lock().settings = settings;
    }

    pub fn set_watchlist(&self, watchlist: Vec<WatchlistEntry>) {
        self.lock().watchlist = watchlist;
    }

    /// Make `key` (`method` or `method:argument`) answer with an HTTP error.
    pub fn fail_with(&self, key: &str, status: u16, detail: &str) {
        self.lock()
            .failures
            .insert(key.to_string(), Failure::Http(status, detail.to_string()));
    }

    /// Make `key` fail as if the backend were unreachable.
    pub fn fail_transport(&self, key: &str) {
        self.lock()
            .failures
            .insert(key.to_string(), Failure::Transport);
    }

    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.lock().calls.clone()
    }

    pub fn calls_to(&self, method: &str) -> usize {
        self.lock().calls.iter().filter(|(m, _)| m == method).count()
    }

    pub fn patches(&self) -> Vec<(String, ServerPatch)> {
        self.lock().patches.clone()
    }

    /// Record the call and return the registered failure, if any.
    fn record(&self, method: &str, arg: &str) -> Result<()> {
        let mut inner = self.lock();
        inner.calls.push((method.to_string(), arg.to_string()));
        let failure = inner
            .failures
            .get(&format!("{method}:{arg}"))
            .or_else(|| inner.failures.get(method))
            .cloned();
        match failure {
            Some(Failure::Http(status, detail)) => Err(Error::http(status, detail)),
            Some(Failure::Transport) => Err(Error::transport("connection refused")),
            None => Ok(()),
        }
    }
}

impl DashboardApi for FakeApi {
    async fn list_servers(&self) -> Result<Vec<ServerSummary>> {
        self.record("list_servers", "")?;
        Ok(self.lock().servers.clone())
    }

    async fn add_server(&self, ip: &str) -> Result<()> {
        self.record("add_server", ip)?;
        self.lock().servers.push(ServerSummary::new(ip));
        Ok(())
    }

    async fn update_server(&self, ip: &str, patch: &ServerPatch) -> Result<()> {
        self.record("update_server", ip)?;
        self.lock().patches.push((ip.to_string(), patch.clone()));
        Ok(())
    }

    async fn delete_server(&self, ip: &str) -> Result<()> {
        self.record("delete_server", ip)?;
        self.lock().servers.retain(|s| s.ip != ip);
        Ok(())
    }

    async fn toggle_pause(&self, ip: &str) -> Result<()> {
        self.record("toggle_pause", ip)?;
        if let Some(server) = self.lock().servers.iter_mut().find(|s| s.ip == ip) {
            server.paused = !server.paused;
        }
        Ok(())
    }

    async fn history(&self, ip: &str, hours: u32) -> Result<Vec<HistoryPoint>> {
        self.record("history", &format!("{ip}?hours={hours}"))?;
        Ok(self.lock().history.clone())
    }

    async fn players(&self, ip: &str) -> Result<PlayerLists> {
        self.record("players", ip)?;
        Ok(self.lock().players.clone())
    }

    async fn stats(&self, ip: &str) -> Result<ServerStats> {
        self.record("stats", ip)?;
        Ok(self.lock().stats.clone())
    }

    async fn events(&self, ip: &str) -> Result<Vec<RawEvent>> {
        self.record("events", ip)?;
        Ok(self.lock().events.clone())
    }

    async fn calendar_heatmap(
        &self,
        ip: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<CalendarEntry>> {
        self.record("calendar_heatmap", &format!("{ip}/{year}-{month:02}"))?;
        Ok(self.lock().calendar.clone())
    }

    async fn icon(&self, ip: &str) -> Result<Vec<u8>> {
        self.record("icon", ip)?;
        self.lock()
            .icons
            .get(ip)
            .cloned()
            .ok_or_else(|| Error::http(404, "Ícone não encontrado"))
    }

    async fn test_rcon(&self, request: &RconTestRequest) -> Result<()> {
        self.record("test_rcon", &request.ip)
    }

    async fn global_settings(&self) -> Result<GlobalSettings> {
        self.record("global_settings", "")?;
        Ok(self.lock().settings.clone())
    }

    async fn save_global_settings(&self, settings: &GlobalSettings) -> Result<()> {
        self.record("save_global_settings", "")?;
        self.lock().settings = settings.clone();
        Ok(())
    }

    async fn watchlist(&self, ip: &str) -> Result<Vec<WatchlistEntry>> {
        self.record("watchlist", ip)?;
        Ok(self.lock().watchlist.clone())
    }

    async fn add_to_watchlist(&self, ip: &str, player: &str) -> Result<()> {
        self.record("add_to_watchlist", &format!("{ip}/{player}"))?;
        self.lock().watchlist.push(WatchlistEntry::Named {
            name: player.to_string(),
        });
        Ok(())
    }

    async fn remove_from_watchlist(&self, ip: &str, player: &str) -> Result<()> {
        self.record("remove_from_watchlist", &format!("{ip}/{player}"))?;
        self.lock().watchlist.retain(|w| w.name() != player);
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        self.record("shutdown", "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls_and_failures() {
        let api = FakeApi::new();
        api.fail_with("add_server:bad", 400, "Servidor inválido");

        assert!(api.add_server("good").await.is_ok());
        let err = api.add_server("bad").await.unwrap_err();
        assert_eq!(err.user_detail(), "Servidor inválido");

        assert_eq!(api.calls_to("add_server"), 2);
        assert_eq!(api.list_servers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_toggle_pause_flips_flag() {
        let api = FakeApi::with_servers(vec![ServerSummary::new("a")]);
        api.toggle_pause("a").await.unwrap();
        assert!(api.list_servers().await.unwrap()[0].paused);
    }
}
