/*!
 * WebSocket Server
 *
 * Serves the dashboard control channel:
 *
 * ```text
 * ┌─────────────┐   commands    ┌─────────────┐   ws://host:8080   ┌───────────┐
 * │  GcManager  │ <──────────── │  GcServer   │ <────────────────> │ Dashboard │
 * │  (engine)   │ ────────────> │  (this)     │  state / events    │  clients  │
 * └─────────────┘   events      └─────────────┘                    └───────────┘
 * ```
 *
 * Each client gets the full state on connect and again every push interval,
 * every engine event as it happens, and one reply per frame it sends.
 *
 * Engine calls can hold the ledger lock for a whole collection, so they run
 * on tokio's blocking pool rather than on the reactor.
 */

use super::protocol::{ClientMessage, DashboardState, ServerMessage};
use crate::engine::GcManager;
use crate::monitoring::GcEvent;
use futures::{SinkExt, StreamExt};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Pause after an accept failure that is not specific to one connection
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Transport errors, scoped to a single connection
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("Failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Engine task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// WebSocket server bound to a listening socket
pub struct GcServer {
    manager: Arc<GcManager>,
    listener: TcpListener,
    push_interval: Duration,
    clients: Arc<AtomicU32>,
}

impl GcServer {
    /// Bind the listening socket
    pub async fn bind(
        manager: Arc<GcManager>,
        addr: SocketAddr,
        push_interval: Duration,
    ) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "WebSocket server listening");

        Ok(Self {
            manager,
            listener,
            push_interval,
            clients: Arc::new(AtomicU32::new(0)),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept clients until `shutdown` resolves
    pub async fn serve_until<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("WebSocket server shutting down");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => self.spawn_client(stream, peer),
                    Err(e) => {
                        let backoff = accept_backoff(&e);
                        warn!(error = %e, ?backoff, "Failed to accept connection");
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }
    }

    /// Accept clients forever
    pub async fn serve(self) -> std::io::Result<()> {
        self.serve_until(std::future::pending()).await
    }

    fn spawn_client(&self, stream: TcpStream, peer: SocketAddr) {
        let client_id = Uuid::new_v4();
        let manager = Arc::clone(&self.manager);
        let events = manager.subscribe();
        let clients = Arc::clone(&self.clients);
        let push_interval = self.push_interval;

        info!(%client_id, %peer, "New connection");
        tokio::spawn(async move {
            let connected = clients.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(%client_id, connected, "Client registered");

            if let Err(e) = handle_client(stream, manager, events, push_interval).await {
                warn!(%client_id, error = %e, "Client error");
            }

            clients.fetch_sub(1, Ordering::Relaxed);
            info!(%client_id, "Client disconnected");
        });
    }
}

/// Pause before the next accept after a failed one
///
/// Errors tied to the single aborted connection retry at once. Anything else,
/// such as running out of file descriptors, backs off so the loop does not spin.
fn accept_backoff(err: &std::io::Error) -> Duration {
    use std::io::ErrorKind;
    match err.kind() {
        ErrorKind::ConnectionAborted | ErrorKind::ConnectionReset | ErrorKind::Interrupted => {
            Duration::ZERO
        }
        _ => ACCEPT_BACKOFF,
    }
}

/// Serve one WebSocket connection until it closes
async fn handle_client(
    stream: TcpStream,
    manager: Arc<GcManager>,
    mut events: broadcast::Receiver<GcEvent>,
    push_interval: Duration,
) -> Result<(), TransportError> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let (mut write, mut read) = ws_stream.split();

    let initial = capture_state(&manager, false).await?;
    write.send(Message::Text(initial.encode()?)).await?;

    let mut push = interval_at(Instant::now() + push_interval, push_interval);
    push.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = push.tick() => {
                let state = capture_state(&manager, false).await?;
                write.send(Message::Text(state.encode()?)).await?;
            }

            event = events.recv() => {
                match event {
                    Ok(event) => {
                        let frame = ServerMessage::Event(event);
                        write.send(Message::Text(frame.encode()?)).await?;
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "Client lagged behind engine events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = respond(&manager, &text).await?;
                        write.send(Message::Text(reply.encode()?)).await?;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        write.send(Message::Pong(data)).await?;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {
                        debug!("Ignoring non-text frame");
                    }
                    Some(Err(e)) => {
                        debug!(error = %e, "Receive error");
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

/// Decode one client frame and run it against the engine
async fn respond(manager: &Arc<GcManager>, text: &str) -> Result<ServerMessage, TransportError> {
    let message = match ClientMessage::decode(text) {
        Ok(message) => message,
        Err(e) => {
            debug!(error = %e, "Rejected client frame");
            return Ok(ServerMessage::error(&e));
        }
    };

    match message {
        ClientMessage::GetState { include_blocks } => capture_state(manager, include_blocks).await,
        ClientMessage::Command(command) => {
            let engine = Arc::clone(manager);
            let cmd = command.clone();
            let result = tokio::task::spawn_blocking(move || engine.handle_command(cmd)).await?;
            Ok(match result {
                Ok(outcome) => ServerMessage::result(&command, outcome),
                Err(e) => ServerMessage::error(&e),
            })
        }
    }
}

async fn capture_state(
    manager: &Arc<GcManager>,
    include_blocks: bool,
) -> Result<ServerMessage, TransportError> {
    let engine = Arc::clone(manager);
    let state =
        tokio::task::spawn_blocking(move || DashboardState::capture(&engine, include_blocks)).await?;
    Ok(ServerMessage::state(state))
}
