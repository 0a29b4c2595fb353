use std::sync::Arc;

use anyhow::{Context, Result};

use elevatordispatch::config::ServerConfig;
use elevatordispatch::dispatch::DispatchStore;
use elevatordispatch::init::{self, ClientCommand, RunMode};
use elevatordispatch::network::{client::DispatchClient, tcp_server};
use elevatordispatch::print;

#[tokio::main]
async fn main() -> Result<()> {
    match init::parse_args()? {
        RunMode::Help => {
            println!("{}", init::HELP);
            Ok(())
        }
        RunMode::Server(cfg) => run_server(cfg).await,
        RunMode::Client(cfg, command) => run_client(cfg, command).await,
    }
}

/// Runs the dispatch server until Ctrl-C.
async fn run_server(cfg: ServerConfig) -> Result<()> {
    print::info("Starter dispatch-server...".to_string());

    // Ein store for heile prosessen, delt med alle klientar
    let store = Arc::new(DispatchStore::new());
    let server = tcp_server::spawn_server(&cfg, Arc::clone(&store)).await?;

    tokio::signal::ctrl_c()
        .await
        .context("Couldnt listen for Ctrl-C")?;

    server.shutdown().await?;
    print::requests(&store.outstanding(), None);
    Ok(())
}

/// Sends one command to a running server and prints the answer.
async fn run_client(cfg: ServerConfig, command: ClientCommand) -> Result<()> {
    let mut client = DispatchClient::connect(cfg.socket_addr()).await?;

    match command {
        ClientCommand::Add(floor) => {
            client.add(floor).await?;
            print::ok(format!("Floor {} requested", floor));
        }
        ClientCommand::Remove(floor) => {
            if client.remove(floor).await? {
                print::ok(format!("Floor {} removed", floor));
            } else {
                print::warn(format!("Floor {} was not requested", floor));
            }
        }
        ClientCommand::List => {
            let floors = client.list().await?;
            print::requests(&floors, None);
        }
        ClientCommand::Next(current_floor, direction) => {
            match client.next(current_floor, direction).await? {
                Some(floor) => {
                    let floors = client.list().await?;
                    print::requests(&floors, Some((floor, direction)));
                    print::ok(format!("Next stop from floor {} going {}: {}", current_floor, direction, floor));
                }
                None => print::info("No outstanding requests".to_string()),
            }
        }
    }
    Ok(())
}
