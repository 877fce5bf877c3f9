//! Live console connection task

use tokio::sync::mpsc;
use url::Url;

use blockspy_client::{console_url, ConsoleConnection, ConsoleEvent};

use crate::message::Message;

/// Connect the console socket for `ip` and forward its events.
///
/// The handle goes to the update loop first; the session decides there
/// whether to keep it or close it as stale. Events are tagged with
/// `session_id` so a late event of an old session is ignored.
pub(crate) fn spawn_console(
    base_url: &Url,
    session_id: u64,
    ip: String,
    msg_tx: mpsc::Sender<Message>,
) {
    let ws_url = console_url(base_url, &ip);
    tokio::spawn(async move {
        let connected = match ws_url {
            Ok(url) => ConsoleConnection::connect(&url).await,
            Err(e) => Err(e),
        };
        let mut connection = match connected {
            Ok(connection) => connection,
            Err(e) => {
                let _ = msg_tx
                    .send(Message::ConsoleConnectFailed {
                        session_id,
                        error: e.to_string(),
                    })
                    .await;
                return;
            }
        };

        if msg_tx
            .send(Message::ConsoleConnected {
                session_id,
                handle: connection.handle(),
            })
            .await
            .is_err()
        {
            connection.handle().close();
            return;
        }

        while let Some(event) = connection.next_event().await {
            let closed = event == ConsoleEvent::Closed;
            if msg_tx
                .send(Message::Console { session_id, event })
                .await
                .is_err()
            {
                connection.handle().close();
                break;
            }
            if closed {
                break;
            }
        }
        tracing::debug!("Console forwarder for session {} ({}) done", session_id, ip);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_socket_reports_failure() {
        let base = Url::parse("http://127.0.0.1:9").unwrap();
        let (tx, mut rx) = mpsc::channel(4);
        spawn_console(&base, 4, "mc.example.net".into(), tx);

        match rx.recv().await {
            Some(Message::ConsoleConnectFailed { session_id, .. }) => assert_eq!(session_id, 4),
            other => panic!("unexpected message {other:?}"),
        }
    }
}
