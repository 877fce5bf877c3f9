//! HTTP client for the BlockSpy backend API
//!
//! Every endpoint is wrapped here so callers only see domain types and
//! [`Error`]. Non-2xx responses carry a FastAPI `{detail}` body which becomes
//! [`Error::Http`]; connection failures become [`Error::Transport`].

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use blockspy_core::prelude::*;
use blockspy_core::types::{
    CalendarEntry, GlobalSettings, HistoryPoint, PlayerLists, RawEvent, RconTestRequest,
    ServerPatch, ServerStats, ServerSummary, WatchlistEntry,
};


/// Characters left as-is in a path segment (RFC 3986 unreserved).
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Backend operations used by the dashboard.
///
/// Background tasks are generic over this trait so they can run against an
/// in-memory double in tests.
#[trait_variant::make(DashboardApi: Send)]
pub trait LocalDashboardApi {
    /// `GET /api/servers`
    async fn list_servers(&self) -> Result<Vec<ServerSummary>>;

    /// `POST /api/servers`
    async fn add_server(&self, ip: &str) -> Result<()>;

    /// `PATCH /api/servers/{ip}`
    async fn update_server(&self, ip: &str, patch: &ServerPatch) -> Result<()>;

    /// `DELETE /api/servers/{ip}`
    async fn delete_server(&self, ip: &str) -> Result<()>;

    /// `POST /api/servers/{ip}/toggle_pause`
    async fn toggle_pause(&self, ip: &str) -> Result<()>;

    /// `GET /api/servers/{ip}/history?hours=N`
    async fn history(&self, ip: &str, hours: u32) -> Result<Vec<HistoryPoint>>;

    /// `GET /api/servers/{ip}/players`
    async fn players(&self, ip: &str) -> Result<PlayerLists>;

    /// `GET /api/servers/{ip}/stats`
    async fn stats(&self, ip: &str) -> Result<ServerStats>;

    /// `GET /api/servers/{ip}/events`
    async fn events(&self, ip: &str) -> Result<Vec<RawEvent>>;

    /// `GET /api/servers/{ip}/calendar_heatmap?year=Y&month=M`
    async fn calendar_heatmap(&self, ip: &str, year: i32, month: u32)
        -> Result<Vec<CalendarEntry>>;

    /// `GET /api/icon/{ip}`
    async fn icon(&self, ip: &str) -> Result<Vec<u8>>;

    /// `POST /api/rcon/test`
    async fn test_rcon(&self, request: &RconTestRequest) -> Result<()>;

    /// `GET /api/settings/global`
    async fn global_settings(&self) -> Result<GlobalSettings>;

    /// `POST /api/settings/global`
    async fn save_global_settings(&self, settings: &GlobalSettings) -> Result<()>;

    /// `GET /api/watchlist/{ip}`
    async fn watchlist(&self, ip: &str) -> Result<Vec<WatchlistEntry>>;

    /// `POST /api/watchlist/{ip}`
    async fn add_to_watchlist(&self, ip: &str, player: &str) -> Result<()>;

    /// `DELETE /api/watchlist/{ip}/{player}`
    async fn remove_from_watchlist(&self, ip: &str, player: &str) -> Result<()>;

    /// `POST /api/shutdown`
    ///
    /// The backend exits while answering, so a dropped connection is success.
    async fn shutdown(&self) -> Result<()>;
}

#[derive(Serialize)]
struct AddServerBody<'a> {
    ip: &'a str,
}

#[derive(Serialize)]
struct WatchlistBody<'a> {
    nome_jogador: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// `reqwest`-backed [`DashboardApi`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Build a client for `base_url` (e.g. `http://127.0.0.1:8000`).
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url.trim())
            .map_err(|e| Error::invalid_url(format!("{base_url}: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(Error::invalid_url(format!(
                "{base_url}: expected an http or https URL"
            )));
        }
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Absolute URL for `segments`, each one percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> String {
        endpoint_url(&self.base, segments)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        debug!("GET {}", url);
        let response = self.http.get(&url).send().await.map_err(transport)?;
        decode(check(response).await?).await
    }

    async fn send_empty(&self, request: reqwest::RequestBuilder) -> Result<()> {
        let response = request.send().await.map_err(transport)?;
        check(response).await?;
        Ok(())
    }
}

pub(crate) fn endpoint_url(base: &Url, segments: &[&str]) -> String {
    let mut url = base.as_str().trim_end_matches('/').to_string();
    for segment in segments {
        url.push('/');
        url.extend(utf8_percent_encode(segment, PATH_SEGMENT));
    }
    url
}

fn transport(err: reqwest::Error) -> Error {
    Error::transport(err.to_string())
}

/// Turn a non-2xx response into [`Error::Http`].
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::http(status.as_u16(), error_detail(status, &body)))
}

fn error_detail(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await.map_err(transport)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| Error::protocol(format!("unexpected response shape: {e}")))
}

impl DashboardApi for ApiClient {
    async fn list_servers(&self) -> Result<Vec<ServerSummary>> {
        self.get_json(self.endpoint(&["api", "servers"])).await
    }

    async fn add_server(&self, ip: &str) -> Result<()> {
        let url = self.endpoint(&["api", "servers"]);
        info!("Adding server {}", ip);
        self.send_empty(self.http.post(url).json(&AddServerBody { ip }))
            .await
    }

    async fn update_server(&self, ip: &str, patch: &ServerPatch) -> Result<()> {
        let url = self.endpoint(&["api", "servers", ip]);
        info!("Updating server {}", ip);
        self.send_empty(self.http.patch(url).json(patch)).await
    }

    async fn delete_server(&self, ip: &str) -> Result<()> {
        let url = self.endpoint(&["api", "servers", ip]);
        info!("Deleting server {}", ip);
        self.send_empty(self.http.delete(url)).await
    }

    async fn toggle_pause(&self, ip: &str) -> Result<()> {
        let url = self.endpoint(&["api", "servers", ip, "toggle_pause"]);
        self.send_empty(self.http.post(url)).await
    }

    async fn history(&self, ip: &str, hours: u32) -> Result<Vec<HistoryPoint>> {
        let url = format!(
            "{}?hours={}",
            self.endpoint(&["api", "servers", ip, "history"]),
            hours
        );
        self.get_json(url).await
    }

    async fn players(&self, ip: &str) -> Result<PlayerLists> {
        self.get_json(self.endpoint(&["api", "servers", ip, "players"]))
            .await
    }

    async fn stats(&self, ip: &str) -> Result<ServerStats> {
        self.get_json(self.endpoint(&["api", "servers", ip, "stats"]))
            .await
    }

    async fn events(&self, ip: &str) -> Result<Vec<RawEvent>> {
        self.get_json(self.endpoint(&["api", "servers", ip, "events"]))
            .await
    }

    async fn calendar_heatmap(
        &self,
        ip: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<CalendarEntry>> {
        let url = format!(
            "{}?year={}&month={}",
            self.endpoint(&["api", "servers", ip, "calendar_heatmap"]),
            year,
            month
        );
        self.get_json(url).await
    }

    async fn icon(&self, ip: &str) -> Result<Vec<u8>> {
        let url = self.endpoint(&["api", "icon", ip]);
        let response = self.http.get(&url).send().await.map_err(transport)?;
        let bytes = check(response).await?.bytes().await.map_err(transport)?;
        Ok(bytes.to_vec())
    }

    async fn test_rcon(&self, request: &RconTestRequest) -> Result<()> {
        let url = self.endpoint(&["api", "rcon", "test"]);
        self.send_empty(self.http.post(url).json(request)).await
    }

    async fn global_settings(&self) -> Result<GlobalSettings> {
        self.get_json(self.endpoint(&["api", "settings", "global"]))
            .await
    }

    async fn save_global_settings(&self, settings: &GlobalSettings) -> Result<()> {
        let url = self.endpoint(&["api", "settings", "global"]);
        self.send_empty(self.http.post(url).json(settings)).await
    }

    async fn watchlist(&self, ip: &str) -> Result<Vec<WatchlistEntry>> {
        self.get_json(self.endpoint(&["api", "watchlist", ip])).await
    }

    async fn add_to_watchlist(&self, ip: &str, player: &str) -> Result<()> {
        let url = self.endpoint(&["api", "watchlist", ip]);
        self.send_empty(self.http.post(url).json(&WatchlistBody {
            nome_jogador: player,
        }))
        .await
    }

    async fn remove_from_watchlist(&self, ip: &str, player: &str) -> Result<()> {
        let url = self.endpoint(&["api", "watchlist", ip, player]);
        self.send_empty(self.http.delete(url)).await
    }

    async fn shutdown(&self) -> Result<()> {
        let url = self.endpoint(&["api", "shutdown"]);
        warn!("Requesting backend shutdown");
        match self.http.post(url).send().await {
            Ok(response) => {
                check(response).await?;
                Ok(())
            }
            Err(e) => {
                debug!("Shutdown request ended without a response: {}", e);
                Ok(())
            }
        }
    }
}
