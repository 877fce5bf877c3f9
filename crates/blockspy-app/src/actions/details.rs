//! Details view fetches: the four-way refresh cycle and the monthly heatmap

use tokio::sync::mpsc;

use blockspy_client::DashboardApi;
use blockspy_core::heatmap::MonthRef;

use crate::details::DetailsPayload;
use crate::message::Message;

/// Fetch history, players, stats and events together.
///
/// A failure of any one of them fails the whole cycle.
pub(crate) async fn fetch_details<A: DashboardApi>(
    api: &A,
    ip: &str,
    hours: u32,
) -> blockspy_core::Result<DetailsPayload> {
    let (history, players, stats, events) = tokio::try_join!(
        api.history(ip, hours),
        api.players(ip),
        api.stats(ip),
        api.events(ip),
    )?;
    Ok(DetailsPayload {
        history,
        players,
        stats,
        events,
    })
}

pub(crate) fn spawn_details_cycle<A>(
    api: A,
    ip: String,
    generation: u64,
    hours: u32,
    msg_tx: mpsc::Sender<Message>,
) where
    A: DashboardApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let message = match fetch_details(&api, &ip, hours).await {
            Ok(payload) => Message::DetailsLoaded {
                ip,
                generation,
                hours,
                payload: Box::new(payload),
            },
            Err(e) => Message::DetailsFailed {
                ip,
                generation,
                hours,
                error: e.user_detail(),
            },
        };
        let _ = msg_tx.send(message).await;
    });
}

pub(crate) fn spawn_heatmap_fetch<A>(
    api: A,
    ip: String,
    generation: u64,
    month: MonthRef,
    msg_tx: mpsc::Sender<Message>,
) where
    A: DashboardApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let message = match api.calendar_heatmap(&ip, month.year, month.month).await {
            Ok(entries) => Message::HeatmapLoaded {
                ip,
                generation,
                month,
                entries,
            },
            Err(e) => Message::HeatmapFailed {
                ip,
                generation,
                month,
                error: e.user_detail(),
            },
        };
        let _ = msg_tx.send(message).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockspy_client::test_utils::FakeApi;
    use blockspy_core::types::{CalendarEntry, ServerStats};

    #[tokio::test]
    async fn test_cycle_success_carries_generation_and_hours() {
        let api = FakeApi::new();
        api.set_stats(ServerStats {
            uptime_percent: 99.5,
            peak_players: 40,
            average_players: 12.0,
        });
        let (tx, mut rx) = mpsc::channel(4);
        spawn_details_cycle(api.clone(), "a".into(), 3, 168, tx);

        match rx.recv().await {
            Some(Message::DetailsLoaded {
                ip,
                generation,
                hours,
                payload,
            }) => {
                assert_eq!((ip.as_str(), generation, hours), ("a", 3, 168));
                assert_eq!(payload.stats.peak_players, 40);
            }
            other => panic!("unexpected message {other:?}"),
        }
        assert_eq!(api.calls_to("history"), 1);
        assert!(api
            .calls()
            .contains(&("history".to_string(), "a?hours=168".to_string())));
    }

    #[tokio::test]
    async fn test_one_failing_fetch_fails_cycle() {
        let api = FakeApi::new();
        api.fail_with("stats", 500, "Erro interno");
        let (tx, mut rx) = mpsc::channel(4);
        spawn_details_cycle(api, "a".into(), 1, 24, tx);

        match rx.recv().await {
            Some(Message::DetailsFailed { error, .. }) => assert_eq!(error, "Erro interno"),
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_heatmap_fetch_uses_month() {
        let api = FakeApi::new();
        api.set_calendar(vec![CalendarEntry {
            timestamp: 1_717_200_000,
            value: 4.5,
        }]);
        let (tx, mut rx) = mpsc::channel(4);
        let month = MonthRef::new(2024, 6);
        spawn_heatmap_fetch(api.clone(), "a".into(), 1, month, tx);

        match rx.recv().await {
            Some(Message::HeatmapLoaded { entries, month: m, .. }) => {
                assert_eq!(m, month);
                assert_eq!(entries.len(), 1);
            }
            other => panic!("unexpected message {other:?}"),
        }
        assert!(api
            .calls()
            .contains(&("calendar_heatmap".to_string(), "a/2024-06".to_string())));
    }
}
