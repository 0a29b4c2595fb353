#![warn(missing_docs)]
//! # This projects library
//!
//! This library keeps track of the floors an elevator car has been asked to stop at,
//! decides which floor it should visit next, and serves that over TCP.
//!
//! ## Overview
//! - **config**: Static parameters, print switches and the runtime [config::ServerConfig].
//! - **init**: Reading the command line into a [init::RunMode].
//! - **print**: Colored terminal logging and the request table.
//! - **dispatch**: The request store and the next-stop policy.
//! - **network**: The JSON line protocol, the TCP server and a client for it.

pub mod config;

pub mod init;

pub mod print;

pub mod dispatch;

pub mod network;
