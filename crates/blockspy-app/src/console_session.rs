//! Live console session owner
//!
//! At most one console socket exists at a time. [`ConsoleSession`] owns the
//! link to it and is the only place that opens or closes one:
//!
//! ```text
//!   Idle ──open()──▶ Connecting ──attach()──▶ Live ──Closed event──▶ Closed
//!     ▲                  │                      │
//!     └──── teardown() ──┴──────────────────────┘
//! ```
//!
//! Every `open()` bumps the session id. Results that carry an older id
//! belong to a torn down session: a late socket is closed on arrival and
//! late events are ignored.

use std::fmt;
use std::sync::Arc;

use blockspy_client::{ConsoleEvent, ConsoleHandle};
use blockspy_core::console::{banner_for, classify, ConsoleBanner, ConsoleLine};

/// Lines kept in the console scrollback.
const MAX_LINES: usize = 1000;

/// Command side of an open console socket.
pub trait ConsoleLink: fmt::Debug + Send + Sync {
    /// Queue one command frame; `false` if the socket is gone.
    fn send(&self, text: &str) -> bool;

    fn close(&self);
}

impl ConsoleLink for ConsoleHandle {
    fn send(&self, text: &str) -> bool {
        self.send_command(text)
    }

    fn close(&self) {
        ConsoleHandle::close(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Connecting,
    Live,
    Closed,
}

/// Local markers appended to the scrollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemMarker {
    Connecting,
    Disconnected,
    ConnectFailed,
    Malformed,
}

#[derive(Debug, Default)]
pub struct ConsoleSession {
    phase: SessionPhase,
    session_id: u64,
    ip: Option<String>,
    link: Option<Arc<dyn ConsoleLink>>,
    banner: ConsoleBanner,
    lines: Vec<ConsoleLine>,
    markers: Vec<(usize, SystemMarker)>,
    pub input: String,
    /// Lines scrolled up from the bottom
    pub scroll_back: usize,
}

impl ConsoleSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    pub fn ip(&self) -> Option<&str> {
        self.ip.as_deref()
    }

    pub fn banner(&self) -> ConsoleBanner {
        self.banner
    }

    pub fn lines(&self) -> &[ConsoleLine] {
        &self.lines
    }

    /// Marker kind of the line at `index`, if it is a local marker.
    pub fn marker_at(&self, index: usize) -> Option<SystemMarker> {
        self.markers
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, marker)| *marker)
    }

    pub fn is_live(&self) -> bool {
        self.phase == SessionPhase::Live
    }

    /// Start a session for `ip`, closing any current one first.
    ///
    /// Returns the id the connect result must carry.
    pub fn open(&mut self, ip: &str) -> u64 {
        self.teardown();
        self.session_id += 1;
        self.phase = SessionPhase::Connecting;
        self.ip = Some(ip.to_string());
        self.banner = ConsoleBanner::Console;
        self.lines.clear();
        self.markers.clear();
        self.input.clear();
        self.scroll_back = 0;
        self.push_marker(SystemMarker::Connecting, "connecting...");
        tracing::debug!("Console session {} opening for {}", self.session_id, ip);
        self.session_id
    }

    /// Attach the socket opened for `session_id`.
    ///
    /// A socket for any other session is closed immediately and `false` is
    /// returned.
    pub fn attach(&mut self, session_id: u64, link: Arc<dyn ConsoleLink>) -> bool {
        if session_id != self.session_id || self.phase != SessionPhase::Connecting {
            tracing::debug!("Closing stale console socket for session {}", session_id);
            link.close();
            return false;
        }
        self.link = Some(link);
        self.phase = SessionPhase::Live;
        true
    }

    pub fn connect_failed(&mut self, session_id: u64, error: &str) {
        if session_id != self.session_id || self.phase != SessionPhase::Connecting {
            return;
        }
        tracing::warn!("Console connection failed: {}", error);
        self.phase = SessionPhase::Closed;
        self.push_marker(SystemMarker::ConnectFailed, error);
    }

    /// Apply one inbound event; events of other sessions are ignored.
    pub fn handle_event(&mut self, session_id: u64, event: ConsoleEvent) {
        if session_id != self.session_id || self.phase != SessionPhase::Live {
            return;
        }
        match event {
            ConsoleEvent::Message(message) => {
                if let Some(banner) = banner_for(&message) {
                    self.banner = banner;
                }
                self.push_line(classify(&message));
            }
            ConsoleEvent::Malformed(raw) => {
                self.push_marker(SystemMarker::Malformed, &raw);
            }
            ConsoleEvent::Closed => {
                self.link = None;
                self.phase = SessionPhase::Closed;
                self.push_marker(SystemMarker::Disconnected, "disconnected");
            }
        }
    }

    /// Send the input line and clear it.
    ///
    /// Outside the live phase the command is dropped. Returns whether a frame
    /// was queued.
    pub fn submit_input(&mut self) -> bool {
        let text = std::mem::take(&mut self.input);
        if text.is_empty() {
            return false;
        }
        match (&self.link, self.phase) {
            (Some(link), SessionPhase::Live) => link.send(&text),
            _ => {
                tracing::debug!("Dropping console command while not connected");
                false
            }
        }
    }

    /// Close the socket, if any, and return to idle.
    pub fn teardown(&mut self) {
        if let Some(link) = self.link.take() {
            tracing::debug!("Closing console session {}", self.session_id);
            link.close();
        }
        self.phase = SessionPhase::Idle;
        self.ip = None;
    }

    fn push_marker(&mut self, marker: SystemMarker, text: &str) {
        self.markers.push((self.lines.len(), marker));
        self.push_line(ConsoleLine::system(text));
    }

    fn push_line(&mut self, line: ConsoleLine) {
        self.lines.push(line);
        if self.lines.len() > MAX_LINES {
            let excess = self.lines.len() - MAX_LINES;
            self.lines.drain(..excess);
            self.markers.retain(|(i, _)| *i >= excess);
            for (i, _) in &mut self.markers {
                *i -= excess;
            }
        }
    }
}
