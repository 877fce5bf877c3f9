//! # blockspy-client - Backend Access
//!
//! Everything that talks to the BlockSpy backend or the local disk cache.
//!
//! Depends on [`blockspy_core`] for payload types and error handling.
//!
//! ## Public API
//!
//! ### HTTP (`api`)
//! - [`ApiClient`] - `reqwest` client for every `/api/*` endpoint
//! - [`DashboardApi`] - Async trait over the endpoints, implemented by [`ApiClient`]
//!
//! ### Live Console (`console`)
//! - [`ConsoleConnection`] - One websocket to `/ws/console/{ip}`
//! - [`ConsoleHandle`] - Clonable command side of a connection
//! - [`ConsoleEvent`] - Inbound events forwarded by the socket task
//!
//! ### Icons (`icons`)
//! - [`IconCache`] - On-disk blob cache keyed by server address

pub mod api;
pub mod console;
pub mod icons;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use api::{ApiClient, DashboardApi, LocalDashboardApi};
pub use console::{console_url, ConsoleCommand, ConsoleConnection, ConsoleEvent, ConsoleHandle};
pub use icons::{load_icon, IconCache};
