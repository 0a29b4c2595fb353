//! ## Line protocol between clients and the dispatch server
//!
//! Every message is one JSON object on its own line (`\n` terminated).
//!
//! | Request                                                  | Response                                   |
//! |----------------------------------------------------------|--------------------------------------------|
//! | `{"op":"add","floor":5}`                                 | `{"status":"ok"}`                          |
//! | `{"op":"remove","floor":5}`                              | `{"status":"removed","removed":true}`      |
//! | `{"op":"list"}`                                          | `{"status":"floors","floors":[5,10]}`      |
//! | `{"op":"next","current_floor":10,"direction":"Up"}`      | `{"status":"next","floor":15}`             |
//!
//! A `next` with nothing to visit answers `{"status":"next","floor":null}`.
//! Failures answer `{"status":"error","kind":...,"message":...}`, where `kind` is
//! `invalid_floor` for a non-positive floor and `bad_request` for a line that could not be parsed.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dispatch::{DispatchError, DispatchStore, TravelDirection};

#[allow(missing_docs)]
/// A request sent by a client, one per line.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Add { floor: i32 },
    Remove { floor: i32 },
    List,
    Next { current_floor: i32, direction: TravelDirection },
}

#[allow(missing_docs)]
/// What went wrong with a request.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidFloor,
    BadRequest,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidFloor => f.write_str("invalid_floor"),
            ErrorKind::BadRequest => f.write_str("bad_request"),
        }
    }
}

#[allow(missing_docs)]
/// The server's answer to one [Request].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Ok,
    Removed { removed: bool },
    Floors { floors: Vec<i32> },
    Next { floor: Option<i32> },
    Error { kind: ErrorKind, message: String },
}

impl Response {
    /// Builds a `bad_request` error response.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Response::Error {
            kind: ErrorKind::BadRequest,
            message: message.into(),
        }
    }
}

impl From<DispatchError> for Response {
    fn from(e: DispatchError) -> Self {
        match e {
            DispatchError::InvalidFloor(_) => Response::Error {
                kind: ErrorKind::InvalidFloor,
                message: e.to_string(),
            },
        }
    }
}

/// An error response received by [crate::network::client::DispatchClient].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("server answered {kind}: {message}")]
pub struct RemoteError {
    /// Error category reported by the server
    pub kind: ErrorKind,
    /// Human readable reason
    pub message: String,
}

/// Runs one request against the store.
pub fn handle_request(store: &DispatchStore, request: Request) -> Response {
    match request {
        Request::Add { floor } => match store.add_request(floor) {
            Ok(()) => Response::Ok,
            Err(e) => e.into(),
        },
        Request::Remove { floor } => match store.remove_request(floor) {
            Ok(removed) => Response::Removed { removed },
            Err(e) => e.into(),
        },
        Request::List => Response::Floors {
            floors: store.outstanding(),
        },
        Request::Next { current_floor, direction } => Response::Next {
            floor: store.next_stop(current_floor, direction),
        },
    }
}

/// Parses one raw line and runs it against the store.
///
/// Surrounding whitespace, including the trailing newline, is ignored.
pub fn handle_line(store: &DispatchStore, line: &[u8]) -> Response {
    match serde_json::from_slice::<Request>(line.trim_ascii()) {
        Ok(request) => handle_request(store, request),
        Err(e) => Response::bad_request(format!("could not parse request: {}", e)),
    }
}

/// Serializes a message as one protocol line, newline included.
pub fn encode_line<T: Serialize>(msg: &T) -> serde_json::Result<Vec<u8>> {
    let mut line = serde_json::to_vec(msg)?;
    line.push(b'\n');
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store_with(floors: &[i32]) -> DispatchStore {
        let store = DispatchStore::new();
        for &f in floors {
            store.add_request(f).unwrap();
        }
        store
    }

    #[test]
    fn requests_use_op_tag() {
        let req: Request = serde_json::from_value(json!({"op": "add", "floor": 5})).unwrap();
        assert_eq!(req, Request::Add { floor: 5 });

        let req: Request = serde_json::from_value(json!({"op": "list"})).unwrap();
        assert_eq!(req, Request::List);

        let req: Request =
            serde_json::from_value(json!({"op": "next", "current_floor": -2, "direction": "down"}))
                .unwrap();
        assert_eq!(
            req,
            Request::Next {
                current_floor: -2,
                direction: TravelDirection::Down
            }
        );
    }

    #[test]
    fn empty_next_is_null() {
        let value = serde_json::to_value(Response::Next { floor: None }).unwrap();
        assert_eq!(value, json!({"status": "next", "floor": null}));
    }

    #[test]
    fn invalid_floor_maps_to_error_kind() {
        let store = DispatchStore::new();
        let resp = handle_request(&store, Request::Add { floor: 0 });
        assert!(matches!(
            resp,
            Response::Error { kind: ErrorKind::InvalidFloor, .. }
        ));
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["kind"], "invalid_floor");
        assert!(store.is_empty());
    }

    #[test]
    fn handle_line_runs_every_operation() {
        let store = store_with(&[5, 10, 15]);
        assert_eq!(handle_line(&store, b"{\"op\":\"add\",\"floor\":20}\n"), Response::Ok);
        assert_eq!(
            handle_line(&store, b"{\"op\":\"list\"}"),
            Response::Floors { floors: vec![5, 10, 15, 20] }
        );
        assert_eq!(
            handle_line(&store, b"  {\"op\":\"next\",\"current_floor\":12,\"direction\":\"Up\"}\r\n"),
            Response::Next { floor: Some(15) }
        );
        assert_eq!(
            handle_line(&store, b"{\"op\":\"remove\",\"floor\":15}"),
            Response::Removed { removed: true }
        );
        assert_eq!(
            handle_line(&store, b"{\"op\":\"remove\",\"floor\":15}"),
            Response::Removed { removed: false }
        );
    }

    #[test]
    fn garbage_is_a_bad_request() {
        let store = DispatchStore::new();
        let lines: [&[u8]; 4] = [
            b"hello",
            b"{\"op\":\"fly\"}",
            b"{\"op\":\"add\"}",
            b"{\"op\":\"add\",\"floor\":\"x\"}",
        ];
        for line in lines {
            assert!(matches!(
                handle_line(&store, line),
                Response::Error { kind: ErrorKind::BadRequest, .. }
            ));
        }
    }

    #[test]
    fn encoded_line_ends_with_newline() {
        let line = encode_line(&Response::Ok).unwrap();
        assert_eq!(line, b"{\"status\":\"ok\"}\n");
    }
}
