use anyhow::{Context, Result};
use clap::Parser;
use peerscope_client::app::{AppContext, Event, Intent};
use peerscope_client::connection::{run_session, ConnectionManager};
use peerscope_client::surface::MemorySurface;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:8080/ws";

#[derive(Parser, Debug)]
#[command(name = "peerscope", about = "Live dashboard client for a simulated peer network")]
struct Args {
    /// WebSocket endpoint of the simulation server.
    #[arg(long, default_value = "")]
    url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let url = resolve_server_url(&args.url)?;
    let conn = match ConnectionManager::connect(&url).await {
        Ok(conn) => conn,
        Err(err) => {
            error!(error = %err, "could not reach the simulation server");
            return Err(err.into());
        }
    };

    let mut ctx = AppContext::new(MemorySurface::new());
    let (ui_tx, ui_rx) = mpsc::channel::<Event>(64);
    let console = tokio::spawn(console_loop(ui_tx));

    run_session(&mut ctx, conn, ui_rx).await;
    console.abort();

    info!(
        nodes = ctx.surface().node_count(),
        edges = ctx.surface().edge_count(),
        peers = ctx.cache().len(),
        "session ended"
    );
    Ok(())
}

fn init_logging() {
    let level = std::env::var("PEERSCOPE_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_server_url(url_flag: &str) -> Result<Url> {
    let raw = if !url_flag.trim().is_empty() {
        url_flag.to_string()
    } else if let Ok(value) = std::env::var("PEERSCOPE_SERVER_URL") {
        if value.trim().is_empty() {
            DEFAULT_SERVER_URL.to_string()
        } else {
            value
        }
    } else {
        DEFAULT_SERVER_URL.to_string()
    };
    Url::parse(&raw).with_context(|| format!("invalid server url: {raw}"))
}

/// Stand-in for the dashboard controls: one line per operator action.
/// Closing the console (`quit` or EOF) ends the session.
async fn console_loop(ui_tx: mpsc::Sender<Event>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") {
            break;
        }
        match parse_console_line(line) {
            Some(event) => {
                if ui_tx.send(event).await.is_err() {
                    break;
                }
            }
            None => {
                println!("commands: step | reset | play | pause | inspect <peer-id> | quit");
            }
        }
    }
}

fn parse_console_line(line: &str) -> Option<Event> {
    let mut parts = line.split_whitespace();
    let verb = parts.next()?.to_lowercase();
    match verb.as_str() {
        "step" => Some(Event::CommandRequested(Intent::Step)),
        "reset" => Some(Event::CommandRequested(Intent::Reset)),
        "play" => Some(Event::CommandRequested(Intent::Play)),
        "pause" => Some(Event::CommandRequested(Intent::Pause)),
        "inspect" => parts
            .next()
            .map(|peer| Event::SelectionChanged(peer.to_string())),
        _ => None,
    }
}
