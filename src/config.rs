//! # config.rs – Centralized Parameter Store
//!
//! This module holds all static program parameters used throughout the system.
//! Keeping configuration in one place makes tuning, experimentation, and testing easier.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Mutex;
use std::time::Duration;
use once_cell::sync::Lazy;

//
// ──────────────────────────────────────────────────────────────
//   1. NETWORK SETTINGS
// ──────────────────────────────────────────────────────────────
//

/// Address the dispatch server binds to unless `addr::` is given
pub static DEFAULT_BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Port the dispatch server listens on unless `port::` is given
pub const DEFAULT_PORT: u16 = 50100;

/// Backlog passed to `listen()` on the server socket
pub const LISTEN_BACKLOG: i32 = 128;

/// Longest accepted request line in bytes (newline included)
pub const MAX_LINE_LEN: usize = 8 * 1024;

//
// ──────────────────────────────────────────────────────────────
//   2. TIMING & TIMEOUTS
// ──────────────────────────────────────────────────────────────
//

/// A client connection with no request for this long is closed
pub const CLIENT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout used by [crate::network::client::DispatchClient] when connecting
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout used by the client while waiting for a response line
pub const RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

//
// ──────────────────────────────────────────────────────────────
//   3. LOGGING CONFIGURATION
// ──────────────────────────────────────────────────────────────
//

/// Enable/disable printing of errors
pub static PRINT_ERR_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of warnings
pub static PRINT_WARN_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of success messages
pub static PRINT_OK_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of general info
pub static PRINT_INFO_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of changes to the outstanding requests
pub static PRINT_REQ_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable miscellaneous prints (tables, custom colors)
pub static PRINT_ELSE_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Reads one of the print switches above.
///
/// A poisoned switch is still readable, the stored `bool` cannot be left half-written.
pub fn switch_on(switch: &Mutex<bool>) -> bool {
    match switch.lock() {
        Ok(guard) => *guard,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Sets one of the print switches above.
pub fn set_switch(switch: &Mutex<bool>, on: bool) {
    match switch.lock() {
        Ok(mut guard) => *guard = on,
        Err(poisoned) => *poisoned.into_inner() = on,
    }
}

//
// ──────────────────────────────────────────────────────────────
//   4. RUNTIME SETTINGS
// ──────────────────────────────────────────────────────────────
//

/// Settings resolved at start-up from the command line.
///
/// Built by [crate::init::parse_args]. Defaults come from the constants above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind (server) or connect to (client)
    pub addr: IpAddr,
    /// TCP port. `0` lets the OS pick one, used by the tests
    pub port: u16,
    /// Idle timeout per client connection
    pub idle_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_BIND_ADDR,
            port: DEFAULT_PORT,
            idle_timeout: CLIENT_IDLE_TIMEOUT,
        }
    }
}

impl ServerConfig {
    /// The socket address made from `addr` and `port`.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.addr, self.port)
    }
}
