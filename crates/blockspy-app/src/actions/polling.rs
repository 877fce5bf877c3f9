//! Periodic timers: the server list poll and the details refresh.
//!
//! Both are plain `tokio::time::interval` loops that only emit tick messages.
//! The update loop decides whether a tick starts a fetch, so a tick that lands
//! while the previous fetch is still running is skipped there.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;

use crate::message::Message;

/// Lower bound for both intervals.
pub(crate) const MIN_POLL_SECS: u64 = 1;

/// Spawn the server list poll.
///
/// The first tick fires immediately, so the list loads on startup. The loop
/// runs until `shutdown_rx` flips to `true` or the message channel closes.
pub fn spawn_server_list_polling(
    interval_secs: u64,
    msg_tx: mpsc::Sender<Message>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> tokio::task::JoinHandle<()> {
    let period = Duration::from_secs(interval_secs.max(MIN_POLL_SECS));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if msg_tx.send(Message::ServerListTick).await.is_err() {
                        break;
                    }
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("Server list polling stopped");
    })
}

/// Spawn the refresh timer of details view `generation`.
///
/// The timer announces itself with [`Message::DetailsTimerStarted`], which
/// carries the sender that stops it. The immediate first tick is skipped
/// because opening the view already runs one cycle.
pub(crate) fn spawn_details_timer(
    generation: u64,
    interval_secs: u64,
    msg_tx: mpsc::Sender<Message>,
) {
    let period = Duration::from_secs(interval_secs.max(MIN_POLL_SECS));
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    // Message is Clone and watch::Sender is not
    let shutdown_tx = Arc::new(shutdown_tx);

    tokio::spawn(async move {
        if msg_tx
            .send(Message::DetailsTimerStarted {
                generation,
                shutdown_tx,
            })
            .await
            .is_err()
        {
            return;
        }

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if msg_tx.send(Message::DetailsTick { generation }).await.is_err() {
                        break;
                    }
                }
                changed = shutdown_rx.changed() => {
                    // A dropped sender also ends the timer
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("Details refresh timer {} stopped", generation);
    });
}
