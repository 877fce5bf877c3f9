//! Server list and server management requests
//!
//! Each request runs in its own task and reports back with exactly one
//! message, except the bulk add which reports once per address.

use std::path::PathBuf;

use tokio::sync::mpsc;

use blockspy_client::DashboardApi;
use blockspy_core::prelude::*;
use blockspy_core::types::GlobalSettings;

use crate::dialogs::{parse_address_list, EditSubmission};
use crate::message::Message;

pub(crate) fn spawn_fetch_servers<A>(api: A, msg_tx: mpsc::Sender<Message>)
where
    A: DashboardApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let message = match api.list_servers().await {
            Ok(servers) => {
                trace!("Fetched {} servers", servers.len());
                Message::ServersLoaded(servers)
            }
            Err(e) => Message::ServersFailed(e.user_detail()),
        };
        let _ = msg_tx.send(message).await;
    });
}

/// POST each address in order, reporting every result.
pub(crate) async fn add_servers<A: DashboardApi>(
    api: &A,
    addresses: Vec<String>,
    msg_tx: &mpsc::Sender<Message>,
) {
    for address in addresses {
        let error = api.add_server(&address).await.err().map(|e| e.user_detail());
        if msg_tx
            .send(Message::AddProgress { address, error })
            .await
            .is_err()
        {
            return;
        }
    }
    let _ = msg_tx.send(Message::AddFinished).await;
}

pub(crate) fn spawn_add_servers<A>(api: A, addresses: Vec<String>, msg_tx: mpsc::Sender<Message>)
where
    A: DashboardApi + Send + Sync + 'static,
{
    info!("Adding {} servers", addresses.len());
    tokio::spawn(async move {
        add_servers(&api, addresses, &msg_tx).await;
    });
}

pub(crate) fn spawn_import_file(path: PathBuf, msg_tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        let message = match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                let addresses = parse_address_list(&text);
                info!("Importing {} addresses from {:?}", addresses.len(), path);
                Message::ImportLoaded { addresses }
            }
            Err(e) => Message::ImportFailed {
                error: format!("{}: {}", path.display(), e),
            },
        };
        let _ = msg_tx.send(message).await;
    });
}

/// Test the RCON credentials when both are set, then PATCH.
pub(crate) async fn save_server<A: DashboardApi>(api: &A, submission: &EditSubmission) -> Result<()> {
    if let Some(request) = &submission.rcon_test {
        api.test_rcon(request).await?;
    }
    api.update_server(&submission.original_ip, &submission.patch)
        .await
}

pub(crate) fn spawn_save_server<A>(
    api: A,
    submission: EditSubmission,
    reopen_details: bool,
    msg_tx: mpsc::Sender<Message>,
) where
    A: DashboardApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let message = match save_server(&api, &submission).await {
            Ok(()) => Message::ServerSaved {
                final_ip: submission.final_ip,
                reopen_details,
            },
            Err(e) => Message::ServerSaveFailed {
                wrong_password: e.is_wrong_password(),
                detail: e.user_detail(),
            },
        };
        let _ = msg_tx.send(message).await;
    });
}

pub(crate) fn spawn_delete_server<A>(api: A, ip: String, msg_tx: mpsc::Sender<Message>)
where
    A: DashboardApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let message = match api.delete_server(&ip).await {
            Ok(()) => Message::ServerDeleted { ip },
            Err(e) => Message::ServerActionFailed {
                error: e.user_detail(),
            },
        };
        let _ = msg_tx.send(message).await;
    });
}

pub(crate) fn spawn_toggle_pause<A>(api: A, ip: String, msg_tx: mpsc::Sender<Message>)
where
    A: DashboardApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let message = match api.toggle_pause(&ip).await {
            Ok(()) => Message::PauseToggled { ip },
            Err(e) => Message::ServerActionFailed {
                error: e.user_detail(),
            },
        };
        let _ = msg_tx.send(message).await;
    });
}

pub(crate) fn spawn_fetch_players<A>(api: A, ip: String, msg_tx: mpsc::Sender<Message>)
where
    A: DashboardApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let message = match api.players(&ip).await {
            Ok(players) => Message::PlayersLoaded { ip, players },
            Err(e) => Message::PlayersFailed {
                ip,
                error: e.user_detail(),
            },
        };
        let _ = msg_tx.send(message).await;
    });
}

pub(crate) fn spawn_fetch_watchlist<A>(api: A, ip: String, msg_tx: mpsc::Sender<Message>)
where
    A: DashboardApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let message = match api.watchlist(&ip).await {
            Ok(entries) => Message::WatchlistLoaded { ip, entries },
            Err(e) => Message::WatchlistFailed {
                ip,
                error: e.user_detail(),
            },
        };
        let _ = msg_tx.send(message).await;
    });
}

/// Add (`add == true`) or remove one watched player.
pub(crate) fn spawn_watchlist_change<A>(
    api: A,
    ip: String,
    player: String,
    add: bool,
    msg_tx: mpsc::Sender<Message>,
) where
    A: DashboardApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let result = if add {
            api.add_to_watchlist(&ip, &player).await
        } else {
            api.remove_from_watchlist(&ip, &player).await
        };
        let message = match result {
            Ok(()) => Message::WatchlistChanged { ip },
            Err(e) => {
                warn!("Watchlist update for {} failed: {}", ip, e);
                Message::WatchlistFailed {
                    ip,
                    error: e.user_detail(),
                }
            }
        };
        let _ = msg_tx.send(message).await;
    });
}

pub(crate) fn spawn_fetch_settings<A>(api: A, msg_tx: mpsc::Sender<Message>)
where
    A: DashboardApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let message = match api.global_settings().await {
            Ok(settings) => Message::SettingsLoaded(settings),
            Err(e) => Message::SettingsFailed(e.user_detail()),
        };
        let _ = msg_tx.send(message).await;
    });
}

pub(crate) fn spawn_save_settings<A>(api: A, settings: GlobalSettings, msg_tx: mpsc::Sender<Message>)
where
    A: DashboardApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let message = match api.save_global_settings(&settings).await {
            Ok(()) => Message::SettingsSaved,
            Err(e) => Message::SettingsSaveFailed(e.user_detail()),
        };
        let _ = msg_tx.send(message).await;
    });
}

pub(crate) fn spawn_shutdown<A>(api: A, msg_tx: mpsc::Sender<Message>)
where
    A: DashboardApi + Send + Sync + 'static,
{
    warn!("Requesting backend shutdown");
    tokio::spawn(async move {
        let message = match api.shutdown().await {
            Ok(()) => Message::ShutdownComplete,
            Err(e) => Message::ShutdownFailed(e.user_detail()),
        };
        let _ = msg_tx.send(message).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockspy_client::test_utils::FakeApi;
    use blockspy_core::types::{RconTestRequest, ServerPatch};

    fn submission(rcon_test: bool) -> EditSubmission {
        EditSubmission {
            original_ip: "old.net".into(),
            final_ip: "new.net".into(),
            patch: ServerPatch {
                new_ip: Some("new.net".into()),
                ..Default::default()
            },
            rcon_test: rcon_test.then(|| RconTestRequest {
                ip: "new.net".into(),
                rcon_port: 25575,
                rcon_password: "secret".into(),
            }),
        }
    }

    #[tokio::test]
    async fn test_add_servers_reports_each_address() {
        let api = FakeApi::new();
        api.fail_with("add_server:dup.net", 400, "Servidor já existe");
        let (tx, mut rx) = mpsc::channel(8);

        add_servers(&api, vec!["a.net".into(), "dup.net".into()], &tx).await;

        assert!(matches!(
            rx.recv().await,
            Some(Message::AddProgress { ref address, error: None }) if address == "a.net"
        ));
        match rx.recv().await {
            Some(Message::AddProgress { address, error }) => {
                assert_eq!(address, "dup.net");
                assert_eq!(error.as_deref(), Some("Servidor já existe"));
            }
            other => panic!("unexpected message {other:?}"),
        }
        assert!(matches!(rx.recv().await, Some(Message::AddFinished)));
    }

    #[tokio::test]
    async fn test_save_runs_rcon_test_before_patch() {
        let api = FakeApi::new();
        save_server(&api, &submission(true)).await.unwrap();
        let methods: Vec<String> = api.calls().into_iter().map(|(m, _)| m).collect();
        assert_eq!(methods, vec!["test_rcon", "update_server"]);
        assert_eq!(api.patches()[0].0, "old.net");
    }

    #[tokio::test]
    async fn test_wrong_password_skips_patch() {
        let api = FakeApi::new();
        api.fail_with("test_rcon", 400, "Senha RCON incorreta");
        let (tx, mut rx) = mpsc::channel(2);
        spawn_save_server(api.clone(), submission(true), true, tx);

        match rx.recv().await {
            Some(Message::ServerSaveFailed {
                wrong_password,
                detail,
            }) => {
                assert!(wrong_password);
                assert_eq!(detail, "Senha RCON incorreta");
            }
            other => panic!("unexpected message {other:?}"),
        }
        assert_eq!(api.calls_to("update_server"), 0);
    }

    #[tokio::test]
    async fn test_save_without_rcon_only_patches() {
        let api = FakeApi::new();
        let (tx, mut rx) = mpsc::channel(2);
        spawn_save_server(api.clone(), submission(false), false, tx);

        assert!(matches!(
            rx.recv().await,
            Some(Message::ServerSaved { ref final_ip, reopen_details: false }) if final_ip == "new.net"
        ));
        assert_eq!(api.calls_to("test_rcon"), 0);
    }

    #[tokio::test]
    async fn test_import_reads_addresses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("servers.txt");
        std::fs::write(&path, "a.net\n\nb.net:25566\n").unwrap();
        let (tx, mut rx) = mpsc::channel(2);
        spawn_import_file(path, tx);

        match rx.recv().await {
            Some(Message::ImportLoaded { addresses }) => {
                assert_eq!(addresses, vec!["a.net", "b.net:25566"]);
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_import_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, mut rx) = mpsc::channel(2);
        spawn_import_file(dir.path().join("missing.txt"), tx);
        assert!(matches!(rx.recv().await, Some(Message::ImportFailed { .. })));
    }

    #[tokio::test]
    async fn test_delete_failure_is_action_failure() {
        let api = FakeApi::new();
        api.fail_transport("delete_server");
        let (tx, mut rx) = mpsc::channel(2);
        spawn_delete_server(api, "a".into(), tx);
        assert!(matches!(
            rx.recv().await,
            Some(Message::ServerActionFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_shutdown_completes() {
        let api = FakeApi::new();
        let (tx, mut rx) = mpsc::channel(2);
        spawn_shutdown(api, tx);
        assert!(matches!(rx.recv().await, Some(Message::ShutdownComplete)));
    }
}
