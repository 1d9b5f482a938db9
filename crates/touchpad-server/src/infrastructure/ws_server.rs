//! WebSocket server: accept loop and per-session task management.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Accepting incoming TCP connections from phones.
//! 3. Checking the upgrade request (path and shared token) before switching
//!    protocols.
//! 4. Running one session loop per connection, feeding each frame to the
//!    [`EventDispatcher`] strictly in arrival order.
//! 5. Stopping the accept loop when the `running` flag is cleared.
//!
//! # Blocking host calls
//!
//! Injecting input can block: a smooth pointer move sleeps between steps.
//! Each frame is therefore processed on Tokio's blocking pool with
//! `spawn_blocking`.  The session is moved into the blocking closure and moved
//! back out when it finishes, so the next frame is not read until the previous
//! one is done.  A zoom sequence that has started on the blocking pool always
//! runs to its key-up, even if the connection drops meanwhile.
//!
//! # Concurrency
//!
//! Every connection gets its own Tokio task and its own [`Session`].  The
//! host sink is shared; frames from different phones may interleave at the
//! host.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::StreamExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::{
    accept_hdr_async,
    tungstenite::{
        handshake::server::{ErrorResponse, Request, Response},
        http::StatusCode,
        Error as WsError, Message as WsMessage,
    },
};
use tracing::{debug, error, info, warn};

use crate::application::auth::{presented_token, verify_token, TOKEN_HEADER};
use crate::application::{
    DispatchOutcome, DispatchSettings, EventDispatcher, HostInputSink, Session,
};
use crate::domain::config::ServerConfig;

/// The only path that accepts WebSocket upgrades.
pub const WS_PATH: &str = "/ws";

/// How often the accept loop wakes up to check the shutdown flag.
const ACCEPT_POLL: Duration = Duration::from_millis(200);

// ── Public API ────────────────────────────────────────────────────────────────

/// Binds `config.bind_addr` and serves sessions until `running` is cleared.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot be bound (port in use, missing
/// permission, ...).
pub async fn run_server(
    config: ServerConfig,
    sink: Arc<dyn HostInputSink>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind WebSocket listener on {}", config.bind_addr))?;

    info!(
        "touchpad server listening on ws://{}{WS_PATH}",
        config.bind_addr
    );

    serve(listener, Arc::new(config), sink, running).await
}

/// Runs the accept loop on an already-bound listener.
///
/// Split out from [`run_server`] so tests can bind an ephemeral port first
/// and learn its address before the loop starts.
///
/// # Errors
///
/// Currently never fails; accept errors are logged and the loop continues.
pub async fn serve(
    listener: TcpListener,
    config: Arc<ServerConfig>,
    sink: Arc<dyn HostInputSink>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping accept loop");
            break;
        }

        // Short timeout so the flag is re-checked even when nobody connects.
        match timeout(ACCEPT_POLL, listener.accept()).await {
            Ok(Ok((stream, peer_addr))) => {
                debug!("new connection from {peer_addr}");
                let cfg = Arc::clone(&config);
                let sink = Arc::clone(&sink);
                tokio::spawn(async move {
                    handle_connection(stream, peer_addr, cfg, sink).await;
                });
            }
            Ok(Err(e)) => {
                error!("accept error: {e}");
            }
            Err(_) => {}
        }
    }

    Ok(())
}

// ── Per-session handler ───────────────────────────────────────────────────────

/// Entry point of each per-connection task; logs how the session ended.
async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    config: Arc<ServerConfig>,
    sink: Arc<dyn HostInputSink>,
) {
    match run_session(stream, peer_addr, config, sink).await {
        Ok(()) => info!("connection {peer_addr} closed"),
        Err(e) => warn!("connection {peer_addr} closed with error: {e:#}"),
    }
}

/// Runs the complete lifecycle of one phone session.
///
/// # Errors
///
/// Returns an error if the handshake is rejected or fails, or if a dispatch
/// task panics.
async fn run_session(
    stream: TcpStream,
    peer_addr: SocketAddr,
    config: Arc<ServerConfig>,
    sink: Arc<dyn HostInputSink>,
) -> anyhow::Result<()> {
    // ── Step 1: Handshake ─────────────────────────────────────────────────────
    let expected = config.token.clone();
    let mut ws_stream = accept_hdr_async(stream, |req: &Request, resp: Response| {
        authorize_handshake(req, resp, &expected, peer_addr)
    })
    .await
    .with_context(|| format!("WebSocket handshake failed with {peer_addr}"))?;

    // ── Step 2: Fresh per-session state ───────────────────────────────────────
    let dispatcher = Arc::new(EventDispatcher::new(
        sink,
        DispatchSettings::from(config.as_ref()),
    ));
    let mut session = Session::new(config.session_scales());
    let id = session.id();
    info!("session {id}: phone connected from {peer_addr}");

    // ── Step 3: Frame loop ────────────────────────────────────────────────────
    loop {
        let msg = match ws_stream.next().await {
            Some(Ok(msg)) => msg,
            Some(Err(WsError::ConnectionClosed | WsError::Protocol(_))) => {
                debug!("session {id}: socket closed");
                break;
            }
            Some(Err(e)) => {
                warn!("session {id}: read error: {e}");
                break;
            }
            None => {
                debug!("session {id}: stream ended");
                break;
            }
        };

        let payload = match msg {
            WsMessage::Text(text) => text.into_bytes(),
            WsMessage::Binary(bytes) => bytes,
            WsMessage::Ping(data) => {
                debug!("session {id}: ping ({} bytes)", data.len());
                continue;
            }
            WsMessage::Pong(_) => {
                debug!("session {id}: pong");
                continue;
            }
            WsMessage::Close(_) => {
                debug!("session {id}: close frame received");
                break;
            }
            WsMessage::Frame(_) => {
                debug!("session {id}: raw frame (ignored)");
                continue;
            }
        };

        let (next, outcome) = dispatch_blocking(Arc::clone(&dispatcher), session, payload)
            .await
            .with_context(|| format!("session {id}: dispatch task failed"))?;
        session = next;
        debug!("session {id}: {outcome:?}");
    }

    info!("session {id}: phone disconnected");
    Ok(())
}

/// Processes one frame on the blocking pool and hands the session back.
async fn dispatch_blocking(
    dispatcher: Arc<EventDispatcher>,
    mut session: Session,
    payload: Vec<u8>,
) -> Result<(Session, DispatchOutcome), tokio::task::JoinError> {
    tokio::task::spawn_blocking(move || {
        let outcome = dispatcher.dispatch(&payload, &mut session);
        (session, outcome)
    })
    .await
}

// ── Handshake ─────────────────────────────────────────────────────────────────

/// Accepts the upgrade only on [`WS_PATH`] with the right token.
///
/// Wrong path → 404.  Missing or wrong token → 401.  Nothing about the
/// expected token is echoed back.
pub(crate) fn authorize_handshake(
    req: &Request,
    resp: Response,
    expected: &str,
    peer_addr: SocketAddr,
) -> Result<Response, ErrorResponse> {
    if req.uri().path() != WS_PATH {
        debug!("rejecting {peer_addr}: unknown path {}", req.uri().path());
        return Err(reject(StatusCode::NOT_FOUND, "not found"));
    }

    let header = req
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());
    let presented = presented_token(req.uri().query(), header);

    match verify_token(expected, presented.as_deref()) {
        Ok(()) => Ok(resp),
        Err(e) => {
            warn!("rejecting {peer_addr}: {e}");
            Err(reject(StatusCode::UNAUTHORIZED, "unauthorized"))
        }
    }
}

fn reject(status: StatusCode, body: &str) -> ErrorResponse {
    let mut resp = ErrorResponse::new(Some(body.to_string()));
    *resp.status_mut() = status;
    resp
}

// ── Tests ─────────────────────────────────────────────────────────────────────
