//! End-to-end tests: a real server on an OS-picked port, driven over TCP.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use elevatordispatch::config::{self, ServerConfig};
use elevatordispatch::dispatch::{DispatchStore, TravelDirection};
use elevatordispatch::network::client::DispatchClient;
use elevatordispatch::network::protocol::{ErrorKind, RemoteError, Response};
use elevatordispatch::network::tcp_server::{self, ServerHandle};

fn test_config() -> ServerConfig {
    ServerConfig {
        addr: "127.0.0.1".parse().unwrap(),
        port: 0,
        idle_timeout: Duration::from_secs(5),
    }
}

async fn start() -> (ServerHandle, Arc<DispatchStore>) {
    let store = Arc::new(DispatchStore::new());
    let server = tcp_server::spawn_server(&test_config(), Arc::clone(&store))
        .await
        .unwrap();
    (server, store)
}

#[tokio::test]
async fn list_on_fresh_server_is_empty() {
    let (server, _store) = start().await;
    let mut client = DispatchClient::connect(server.local_addr()).await.unwrap();

    assert!(client.list().await.unwrap().is_empty());

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn added_floor_is_listed() {
    let (server, store) = start().await;
    let mut client = DispatchClient::connect(server.local_addr()).await.unwrap();

    client.add(5).await.unwrap();
    client.add(5).await.unwrap();

    assert_eq!(client.list().await.unwrap(), vec![5]);
    assert_eq!(store.outstanding(), vec![5]);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn non_positive_floor_is_rejected() {
    let (server, store) = start().await;
    let mut client = DispatchClient::connect(server.local_addr()).await.unwrap();

    for floor in [0, -1, -10] {
        let err = client.add(floor).await.unwrap_err();
        let remote = err.downcast_ref::<RemoteError>().expect("error should come from the server");
        assert_eq!(remote.kind, ErrorKind::InvalidFloor);

        let err = client.remove(floor).await.unwrap_err();
        assert_eq!(err.downcast_ref::<RemoteError>().unwrap().kind, ErrorKind::InvalidFloor);
    }
    assert!(store.is_empty());

    // Connection is still usable after errors
    client.add(1).await.unwrap();
    assert_eq!(client.list().await.unwrap(), vec![1]);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn next_stop_scenarios() {
    let cases = [
        (TravelDirection::Up, vec![], 5, None),
        (TravelDirection::Down, vec![], 0, None),
        (TravelDirection::Up, vec![5, 10, 15], 10, Some(15)),
        (TravelDirection::Down, vec![5, 10, 15], 9, Some(5)),
        (TravelDirection::Stationary, vec![5, 10, 15], 10, Some(10)),
        (TravelDirection::Stationary, vec![], 5, None),
    ];

    for (direction, floors, current, expected) in cases {
        let (server, _store) = start().await;
        let mut client = DispatchClient::connect(server.local_addr()).await.unwrap();
        for floor in &floors {
            client.add(*floor).await.unwrap();
        }

        assert_eq!(
            client.next(current, direction).await.unwrap(),
            expected,
            "{:?} from {} with {:?}",
            direction,
            current,
            floors
        );
        server.shutdown().await.unwrap();
    }
}

#[tokio::test]
async fn remove_reports_whether_floor_was_outstanding() {
    let (server, _store) = start().await;
    let mut client = DispatchClient::connect(server.local_addr()).await.unwrap();

    assert!(!client.remove(5).await.unwrap());
    client.add(5).await.unwrap();
    assert!(client.remove(5).await.unwrap());
    assert!(client.list().await.unwrap().is_empty());

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn clients_share_one_store() {
    let (server, _store) = start().await;
    let addr = server.local_addr();

    let tasks: Vec<_> = (1..=4)
        .map(|i| {
            tokio::spawn(async move {
                let mut client = DispatchClient::connect(addr).await.unwrap();
                for floor in (i * 10)..(i * 10 + 5) {
                    client.add(floor).await.unwrap();
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    let mut client = DispatchClient::connect(addr).await.unwrap();
    let mut floors = client.list().await.unwrap();
    floors.sort_unstable();
    let expected: Vec<i32> = (1..=4).flat_map(|i| (i * 10)..(i * 10 + 5)).collect();
    assert_eq!(floors, expected);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn malformed_line_gets_bad_request_and_keeps_connection() {
    let (server, _store) = start().await;
    let stream = TcpStream::connect(server.local_addr()).await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    write_half.write_all(b"not json\n").await.unwrap();
    let reply: Response = serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
    assert!(matches!(reply, Response::Error { kind: ErrorKind::BadRequest, .. }));

    // Blank lines are skipped without an answer
    write_half.write_all(b"\n{\"op\":\"add\",\"floor\":3}\n").await.unwrap();
    let reply: Response = serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
    assert_eq!(reply, Response::Ok);

    write_half.write_all(b"{\"op\":\"next\",\"current_floor\":1,\"direction\":\"up\"}\n").await.unwrap();
    let reply: Response = serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
    assert_eq!(reply, Response::Next { floor: Some(3) });

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn oversized_line_closes_connection() {
    let (server, _store) = start().await;
    let stream = TcpStream::connect(server.local_addr()).await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    // Exactly the limit without a newline, so the server has read everything before it closes
    let huge = vec![b'x'; config::MAX_LINE_LEN];
    write_half.write_all(&huge).await.unwrap();

    let reply: Response = serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
    assert!(matches!(reply, Response::Error { kind: ErrorKind::BadRequest, .. }));
    assert!(lines.next_line().await.unwrap().is_none());

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn idle_client_is_disconnected() {
    let store = Arc::new(DispatchStore::new());
    let cfg = ServerConfig {
        idle_timeout: Duration::from_millis(100),
        ..test_config()
    };
    let server = tcp_server::spawn_server(&cfg, store).await.unwrap();

    let stream = TcpStream::connect(server.local_addr()).await.unwrap();
    let mut lines = BufReader::new(stream).lines();
    let closed = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
        .await
        .expect("server should close the idle connection");
    assert!(closed.unwrap().is_none());

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn shutdown_stops_accepting() {
    let (server, _store) = start().await;
    let addr = server.local_addr();
    server.shutdown().await.unwrap();

    assert!(DispatchClient::connect(addr).await.is_err());
}
