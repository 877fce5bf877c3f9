//! Lazy icon loading for rows that scrolled into view

use futures_util::stream::{self, StreamExt};
use tokio::sync::mpsc;

use blockspy_client::{load_icon, DashboardApi, IconCache};

use crate::message::Message;

/// Icon fetches in flight at once.
const ICON_CONCURRENCY: usize = 4;

/// Load each icon once, cache first, and report hit or fallback per address.
pub(crate) fn spawn_icon_loads<A>(
    api: A,
    cache: IconCache,
    ips: Vec<String>,
    msg_tx: mpsc::Sender<Message>,
) where
    A: DashboardApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let api = &api;
        let cache = &cache;
        let mut results = stream::iter(ips)
            .map(|ip| async move {
                let found = load_icon(cache, api, &ip).await.is_some();
                (ip, found)
            })
            .buffer_unordered(ICON_CONCURRENCY);

        while let Some((ip, found)) = results.next().await {
            if msg_tx.send(Message::IconLoaded { ip, found }).await.is_err() {
                break;
            }
        }
    });
}
