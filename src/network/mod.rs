//! Network access to the dispatch store.
//!
//! - [`protocol`]: the JSON line messages and how they map onto [crate::dispatch::DispatchStore].
//! - [`tcp_server`]: accepts clients and serves the store.
//! - [`client`]: talks to a running server.

pub mod client;
pub mod protocol;
pub mod tcp_server;
