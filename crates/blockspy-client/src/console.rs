//! Live console websocket
//!
//! A [`ConsoleConnection`] owns one socket to `/ws/console/{ip}`. A background
//! task splits the socket and runs a `select!` loop over inbound frames and
//! outbound commands:
//!
//! ```text
//!   ConsoleHandle ──cmd──▶ task ──▶ websocket sink
//!   next_event()  ◀──evt── task ◀── websocket stream
//! ```
//!
//! Close requests travel on a separate `watch` channel, so a full command
//! queue never swallows them. The task ends on a Close frame, a read error,
//! a close request, or when every handle is dropped. It always emits
//! [`ConsoleEvent::Closed`] last. There is no reconnection.

use std::sync::Arc;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use url::Url;

use blockspy_core::console::ConsoleMessage;
use blockspy_core::prelude::*;

use crate::api::endpoint_url;

const CMD_CHANNEL_CAPACITY: usize = 32;
const EVENT_CHANNEL_CAPACITY: usize = 256;

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Inbound side of a console connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    Message(ConsoleMessage),
    /// A text frame that is not a `{type, data}` envelope
    Malformed(String),
    /// The socket is gone; no further events follow
    Closed,
}

/// Outbound side of a console connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Send raw command text as one frame
    Send(String),
}

/// Clonable command handle for a live console socket.
#[derive(Debug, Clone)]
pub struct ConsoleHandle {
    cmd_tx: mpsc::Sender<ConsoleCommand>,
    close_tx: Arc<watch::Sender<bool>>,
}

impl ConsoleHandle {
    /// Queue `text` for sending.
    ///
    /// Returns `false` when the socket task has already exited; the command is
    /// dropped in that case.
    pub fn send_command(&self, text: impl Into<String>) -> bool {
        self.cmd_tx.try_send(ConsoleCommand::Send(text.into())).is_ok()
    }

    /// Ask the task to close the socket. Closing twice is harmless.
    pub fn close(&self) {
        self.close_tx.send_replace(true);
    }

    /// Whether [`close`](Self::close) was called on any clone of this handle.
    pub fn close_requested(&self) -> bool {
        *self.close_tx.borrow()
    }

    /// Whether the socket task has exited.
    pub fn is_closed(&self) -> bool {
        self.cmd_tx.is_closed()
    }

    /// A handle whose commands land in the returned receiver.
    #[cfg(any(test, feature = "test-helpers"))]
    pub fn new_for_test() -> (Self, mpsc::Receiver<ConsoleCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::channel(CMD_CHANNEL_CAPACITY);
        let (close_tx, _close_rx) = watch::channel(false);
        let handle = Self {
            cmd_tx,
            close_tx: Arc::new(close_tx),
        };
        (handle, cmd_rx)
    }
}

/// One live console socket.
pub struct ConsoleConnection {
    handle: ConsoleHandle,
    event_rx: mpsc::Receiver<ConsoleEvent>,
}

impl ConsoleConnection {
    /// Open the socket at `ws_url` and spawn its background task.
    pub async fn connect(ws_url: &str) -> Result<Self> {
        info!("Connecting to console at {}", ws_url);
        let (ws_stream, _response) = connect_async(ws_url)
            .await
            .map_err(|e| Error::console(format!("failed to connect to {ws_url}: {e}")))?;

        let (cmd_tx, cmd_rx) = mpsc::channel(CMD_CHANNEL_CAPACITY);
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (close_tx, close_rx) = watch::channel(false);
        tokio::spawn(run_console_task(ws_stream, cmd_rx, close_rx, event_tx));

        Ok(Self {
            handle: ConsoleHandle {
                cmd_tx,
                close_tx: Arc::new(close_tx),
            },
            event_rx,
        })
    }

    pub fn handle(&self) -> ConsoleHandle {
        self.handle.clone()
    }

    /// Next inbound event; `None` after [`ConsoleEvent::Closed`] was taken.
    pub async fn next_event(&mut self) -> Option<ConsoleEvent> {
        self.event_rx.recv().await
    }
}

/// Websocket URL for the console of `ip`: `wss` iff `base` is `https`.
pub fn console_url(base: &Url, ip: &str) -> Result<String> {
    let scheme = if base.scheme() == "https" { "wss" } else { "ws" };
    let mut ws_base = base.clone();
    ws_base
        .set_scheme(scheme)
        .map_err(|_| Error::invalid_url(format!("cannot derive {scheme} URL from {base}")))?;
    Ok(endpoint_url(&ws_base, &["ws", "console", ip]))
}

async fn run_console_task(
    ws_stream: WsStream,
    mut cmd_rx: mpsc::Receiver<ConsoleCommand>,
    mut close_rx: watch::Receiver<bool>,
    event_tx: mpsc::Sender<ConsoleEvent>,
) {
    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    loop {
        tokio::select! {
            biased;

            // Err means every handle is gone
            changed = close_rx.changed() => {
                if changed.is_err() || *close_rx.borrow() {
                    send_close(&mut ws_sink).await;
                    break;
                }
            }

            frame = ws_stream.next() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        if event_tx.send(parse_frame(text.as_str())).await.is_err() {
                            send_close(&mut ws_sink).await;
                            break;
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) => {
                        debug!("Console: received Close frame");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!("Console: websocket read error: {}", err);
                        break;
                    }
                    None => {
                        debug!("Console: websocket stream ended");
                        break;
                    }
                }
            }

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(ConsoleCommand::Send(text)) => {
                        if let Err(err) = ws_sink.send(WsMessage::Text(text.into())).await {
                            warn!("Console: failed to send command: {}", err);
                            break;
                        }
                    }
                    None => {
                        send_close(&mut ws_sink).await;
                        break;
                    }
                }
            }
        }
    }

    let _ = event_tx.send(ConsoleEvent::Closed).await;
    debug!("Console task exiting");
}

fn parse_frame(text: &str) -> ConsoleEvent {
    match ConsoleMessage::parse(text) {
        Ok(message) => ConsoleEvent::Message(message),
        Err(err) => {
            warn!("Console: dropping malformed frame: {}", err);
            ConsoleEvent::Malformed(text.to_string())
        }
    }
}

/// Send a websocket Close frame, ignoring any write errors.
async fn send_close(ws_sink: &mut SplitSink<WsStream, WsMessage>) {
    let _ = ws_sink.send(WsMessage::Close(None)).await;
    let _ = ws_sink.close().await;
}
