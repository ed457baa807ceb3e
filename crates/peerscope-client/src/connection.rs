use crate::app::{AppContext, Effect, Event, Intent};
use crate::dispatcher::PLAYBACK_INTERVAL;
use crate::surface::GraphSurface;
use futures_util::{SinkExt, StreamExt};
use peerscope_core::{decode_snapshot, encode_command, Command};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{info, warn};
use url::Url;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not connected to the simulation server")]
    NotConnected,
    #[error("connect to {url} failed: {source}")]
    Connect {
        url: String,
        source: tokio_tungstenite::tungstenite::Error,
    },
    #[error("websocket send failed: {0}")]
    Transport(tokio_tungstenite::tungstenite::Error),
    #[error(transparent)]
    Wire(#[from] peerscope_core::WireError),
}

/// The one persistent connection for the session. Inbound messages become
/// typed events; outbound commands go through `send_command`, which refuses
/// to queue anything once the socket is gone. There is no reconnect — loss
/// of the connection is terminal for the session.
pub struct ConnectionManager {
    ws: Option<WsStream>,
}

impl ConnectionManager {
    pub async fn connect(url: &Url) -> Result<Self, ClientError> {
        let (ws, _) = connect_async(url.clone())
            .await
            .map_err(|source| ClientError::Connect {
                url: url.to_string(),
                source,
            })?;
        info!(url = %url, "connection established");
        Ok(Self { ws: Some(ws) })
    }

    pub fn is_open(&self) -> bool {
        self.ws.is_some()
    }

    pub async fn send_command(&mut self, command: Command) -> Result<(), ClientError> {
        let ws = self.ws.as_mut().ok_or(ClientError::NotConnected)?;
        let frame = encode_command(command)?;
        ws.send(Message::Text(frame))
            .await
            .map_err(ClientError::Transport)
    }

    /// Next lifecycle event off the wire. Malformed payloads are dropped
    /// with a diagnostic and never surface to the caller. Returns `None`
    /// once the connection is gone and `ConnectionClosed` has been emitted.
    pub async fn next_event(&mut self) -> Option<Event> {
        loop {
            let ws = self.ws.as_mut()?;
            match ws.next().await {
                Some(Ok(Message::Text(text))) => match decode_snapshot(&text) {
                    Ok(snapshot) => return Some(Event::SnapshotReceived(snapshot)),
                    Err(err) => {
                        warn!(error = %err, "dropping malformed snapshot");
                    }
                },
                Some(Ok(Message::Close(_))) | None => {
                    self.mark_closed("server close");
                    return Some(Event::ConnectionClosed);
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    warn!(error = %err, "websocket read error");
                    self.mark_closed("read error");
                    return Some(Event::ConnectionClosed);
                }
            }
        }
    }

    fn mark_closed(&mut self, reason: &str) {
        if self.ws.take().is_some() {
            info!(reason, "connection closed");
        }
    }
}

/// Single cooperative session loop. All mutation runs here, serialized over
/// three sources: inbound snapshots, operator events, and the playback
/// ticker. Mirrors the select-loop shape of the ops-hub clients.
pub async fn run_session<S: GraphSurface>(
    ctx: &mut AppContext<S>,
    mut conn: ConnectionManager,
    mut ui_rx: mpsc::Receiver<Event>,
) {
    let (tick_tx, mut tick_rx) = mpsc::channel::<()>(8);
    let mut ticker: Option<JoinHandle<()>> = None;

    loop {
        tokio::select! {
            event = conn.next_event() => {
                let Some(event) = event else { break };
                let closed = matches!(event, Event::ConnectionClosed);
                let effects = ctx.handle_event(event);
                apply_effects(effects, &mut conn, &mut ticker, &tick_tx, &mut tick_rx).await;
                if closed {
                    break;
                }
            }
            event = ui_rx.recv() => {
                let Some(event) = event else { break };
                let effects = ctx.handle_event(event);
                apply_effects(effects, &mut conn, &mut ticker, &tick_tx, &mut tick_rx).await;
            }
            Some(()) = tick_rx.recv() => {
                let effects = ctx.handle_event(Event::CommandRequested(Intent::Step));
                apply_effects(effects, &mut conn, &mut ticker, &tick_tx, &mut tick_rx).await;
            }
        }
    }

    if let Some(handle) = ticker.take() {
        handle.abort();
    }
}

async fn apply_effects(
    effects: Vec<Effect>,
    conn: &mut ConnectionManager,
    ticker: &mut Option<JoinHandle<()>>,
    tick_tx: &mpsc::Sender<()>,
    tick_rx: &mut mpsc::Receiver<()>,
) {
    for effect in effects {
        match effect {
            Effect::SendCommand(command) => {
                // Fire-and-forget: a send failure is reported, never fatal.
                if let Err(err) = conn.send_command(command).await {
                    warn!(command = %command, error = %err, "command not sent");
                }
            }
            Effect::StartPlayback => {
                if ticker.is_none() {
                    *ticker = Some(spawn_ticker(tick_tx.clone()));
                    info!("playback started");
                }
            }
            Effect::StopPlayback => {
                if let Some(handle) = ticker.take() {
                    handle.abort();
                    // Ticks queued before the abort must not step after pause.
                    while tick_rx.try_recv().is_ok() {}
                    info!("playback paused");
                }
            }
            Effect::ShowDetails(text) => {
                println!("{text}");
            }
        }
    }
}

fn spawn_ticker(tick_tx: mpsc::Sender<()>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PLAYBACK_INTERVAL);
        // The first interval tick completes immediately; consume it so the
        // first step lands one full period after play.
        interval.tick().await;
        loop {
            interval.tick().await;
            if tick_tx.send(()).await.is_err() {
                break;
            }
        }
    })
}
