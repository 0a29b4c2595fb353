//! Start-up: reading the command line into a [RunMode].

use std::env;
use std::net::IpAddr;

use anyhow::{anyhow, bail, Context, Result};

use crate::config::{self, ServerConfig};
use crate::dispatch::TravelDirection;

/// Text printed for the `help` argument.
pub const HELP: &str = "\
Available arguments:
  print_err::true/false
  print_warn::true/false
  print_ok::true/false
  print_info::true/false
  print_req::true/false
  print_else::true/false
  debug                           (only error messages are shown)
  addr::<ip>                      (default 127.0.0.1)
  port::<port>                    (default 50100)
  client add <floor>
  client remove <floor>
  client list
  client next <floor> <up|down|stationary>
  help";

/// One command sent by the `client` run mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    /// Request a stop at the floor
    Add(i32),
    /// Clear the request for the floor
    Remove(i32),
    /// Show the outstanding floors
    List,
    /// Ask for the next stop from a position and direction
    Next(i32, TravelDirection),
}

/// What the program should do, decided from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Run the dispatch server
    Server(ServerConfig),
    /// Send one command to a running server
    Client(ServerConfig, ClientCommand),
    /// Print [HELP] and exit
    Help,
}

/// ### Reads arguments from `cargo run`
///
/// Used to modify what is printed during runtime and where the server lives. Available options:
///
/// `print_err::(true/false)` &rarr; Prints error messages
/// `print_warn::(true/false)` &rarr; Prints warning messages
/// `print_ok::(true/false)` &rarr; Prints OK messages
/// `print_info::(true/false)` &rarr; Prints informational messages
/// `print_req::(true/false)` &rarr; Prints every added and served floor
/// `print_else::(true/false)` &rarr; Prints other messages, including the request table
/// `debug` &rarr; Disables all prints except error messages
/// `addr::<ip>` / `port::<port>` &rarr; Where to listen, or where to connect in client mode
/// `client <command>` &rarr; Sends one command to a running server, see [HELP]
/// `help` &rarr; Displays all possible arguments without starting the program
///
/// If no arguments are provided, all prints are enabled and the server starts on the defaults.
pub fn parse_args() -> Result<RunMode> {
    parse_from(env::args().skip(1))
}

/// Parses `args` (program name already stripped), see [parse_args].
///
/// Print switches are applied to [config] as they are read.
pub fn parse_from<I>(args: I) -> Result<RunMode>
where
    I: IntoIterator<Item = String>,
{
    let mut cfg = ServerConfig::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let lower = arg.to_lowercase();
        if let Some((key, value)) = lower.split_once("::") {
            let is_true = value == "true";
            match key {
                "print_err" => config::set_switch(&config::PRINT_ERR_ON, is_true),
                "print_warn" => config::set_switch(&config::PRINT_WARN_ON, is_true),
                "print_ok" => config::set_switch(&config::PRINT_OK_ON, is_true),
                "print_info" => config::set_switch(&config::PRINT_INFO_ON, is_true),
                "print_req" => config::set_switch(&config::PRINT_REQ_ON, is_true),
                "print_else" => config::set_switch(&config::PRINT_ELSE_ON, is_true),
                "addr" => {
                    cfg.addr = value
                        .parse::<IpAddr>()
                        .with_context(|| format!("'{}' is not an IP address", value))?
                }
                "port" => {
                    cfg.port = value
                        .parse::<u16>()
                        .with_context(|| format!("'{}' is not a port number", value))?
                }
                _ => bail!("Unknown argument '{}', try 'help'", arg),
            }
            continue;
        }

        match lower.as_str() {
            "help" => return Ok(RunMode::Help),
            // Debug modus: Kun error-meldingar
            "debug" => {
                config::set_switch(&config::PRINT_WARN_ON, false);
                config::set_switch(&config::PRINT_OK_ON, false);
                config::set_switch(&config::PRINT_INFO_ON, false);
                config::set_switch(&config::PRINT_REQ_ON, false);
                config::set_switch(&config::PRINT_ELSE_ON, false);
            }
            "client" => {
                let command = parse_client_command(&mut args)?;
                return Ok(RunMode::Client(cfg, command));
            }
            _ => bail!("Unknown argument '{}', try 'help'", arg),
        }
    }

    Ok(RunMode::Server(cfg))
}

/// Reads an integer argument named `what`.
fn next_int(args: &mut impl Iterator<Item = String>, what: &str) -> Result<i32> {
    let raw = args.next().ok_or_else(|| anyhow!("Missing {}", what))?;
    raw.parse::<i32>()
        .with_context(|| format!("{} must be an integer, got '{}'", what, raw))
}

/// Parses the words following `client`.
fn parse_client_command(args: &mut impl Iterator<Item = String>) -> Result<ClientCommand> {
    let verb = args
        .next()
        .ok_or_else(|| anyhow!("'client' needs a command: add, remove, list or next"))?;

    let command = match verb.to_lowercase().as_str() {
        "add" => ClientCommand::Add(next_int(args, "floor")?),
        "remove" => ClientCommand::Remove(next_int(args, "floor")?),
        "list" => ClientCommand::List,
        "next" => {
            let current_floor = next_int(args, "current floor")?;
            let raw = args.next().ok_or_else(|| anyhow!("Missing direction"))?;
            ClientCommand::Next(current_floor, raw.parse::<TravelDirection>()?)
        }
        other => bail!("Unknown client command '{}'", other),
    };

    if let Some(extra) = args.next() {
        bail!("Unexpected argument '{}' after client command", extra);
    }
    Ok(command)
}
