//! End-to-end tests: a real WebSocket client talks to `serve` on an
//! ephemeral port, with a [`RecordingSink`] standing in for the desktop.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::SinkExt;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use touchpad_core::{Key, KeyState};
use touchpad_server::domain::ServerConfig;
use touchpad_server::infrastructure::input_sink::{RecordedAction, RecordingSink};
use touchpad_server::infrastructure::serve;

const TOKEN: &str = "s3cret";

type Client = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

struct TestServer {
    addr: SocketAddr,
    sink: Arc<RecordingSink>,
    running: Arc<AtomicBool>,
    handle: JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let sink = Arc::new(
            RecordingSink::new()
                .with_screen(2000, 2400)
                .with_pointer(100, 100),
        );
        let config = Arc::new(ServerConfig {
            bind_addr: addr,
            token: TOKEN.to_string(),
            smooth_move: Duration::ZERO,
            ..ServerConfig::default()
        });
        let running = Arc::new(AtomicBool::new(true));
        let handle = tokio::spawn(serve(listener, config, sink.clone(), running.clone()));

        Self {
            addr,
            sink,
            running,
            handle,
        }
    }

    fn url(&self, path_and_query: &str) -> String {
        format!("ws://{}{path_and_query}", self.addr)
    }

    async fn connect(&self) -> Client {
        let (ws, _resp) = connect_async(self.url(&format!("/ws?token={TOKEN}")))
            .await
            .expect("handshake must succeed");
        ws
    }

    /// Polls the sink until it holds at least `n` actions or 5 s pass.
    async fn wait_for(&self, n: usize) -> Vec<RecordedAction> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let actions = self.sink.actions();
            if actions.len() >= n || Instant::now() > deadline {
                return actions;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

async fn send(ws: &mut Client, frame: &str) {
    ws.send(Message::Text(frame.to_string())).await.unwrap();
}

fn rejected_status(result: Result<impl Sized, WsError>) -> u16 {
    match result {
        Err(WsError::Http(resp)) => resp.status().as_u16(),
        Err(other) => panic!("expected an HTTP rejection, got {other}"),
        Ok(_) => panic!("expected the handshake to be rejected"),
    }
}

// ── Handshake ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_wrong_token_is_rejected_with_401() {
    let server = TestServer::start().await;

    let result = connect_async(server.url("/ws?token=wrong")).await;

    assert_eq!(rejected_status(result), 401);
}

#[tokio::test]
async fn test_missing_token_is_rejected_with_401() {
    let server = TestServer::start().await;
    let result = connect_async(server.url("/ws")).await;
    assert_eq!(rejected_status(result), 401);
}

#[tokio::test]
async fn test_unknown_path_is_rejected_with_404() {
    let server = TestServer::start().await;
    let result = connect_async(server.url(&format!("/other?token={TOKEN}"))).await;
    assert_eq!(rejected_status(result), 404);
}

#[tokio::test]
async fn test_header_token_is_accepted() {
    // Arrange
    let server = TestServer::start().await;
    let mut request = server.url("/ws").into_client_request().unwrap();
    request
        .headers_mut()
        .insert("X-Auth-Token", TOKEN.parse().unwrap());

    // Act
    let (mut ws, _) = connect_async(request).await.expect("handshake must succeed");
    send(&mut ws, r#"{"type":"click"}"#).await;

    // Assert
    assert_eq!(
        server.wait_for(1).await,
        vec![RecordedAction::Click("left".into())]
    );
}

// ── Session loop ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_frames_are_applied_in_order() {
    // Arrange
    let server = TestServer::start().await;
    let mut ws = server.connect().await;

    // Act
    send(
        &mut ws,
        r#"{"type":"deviceinfo","touchpadWidth":500,"touchpadHeight":800,"screenWidth":1000,"screenHeight":1600}"#,
    )
    .await;
    send(&mut ws, r#"{"type":"move","dx":2,"dy":1}"#).await;
    send(&mut ws, r#"{"type":"zoom","delta":1}"#).await;
    send(&mut ws, r#"{"type":"click","button":"Right"}"#).await;

    // Assert: move scaled by (4, 3), zoom wrapped in ctrl, click last
    assert_eq!(
        server.wait_for(5).await,
        vec![
            RecordedAction::MoveSmooth { x: 108, y: 103 },
            RecordedAction::KeyToggle(Key::Control, KeyState::Down),
            RecordedAction::Scroll { dx: 0, dy: -2 },
            RecordedAction::KeyToggle(Key::Control, KeyState::Up),
            RecordedAction::Click("right".into()),
        ]
    );
}

#[tokio::test]
async fn test_malformed_and_unknown_frames_do_not_end_session() {
    let server = TestServer::start().await;
    let mut ws = server.connect().await;

    send(&mut ws, "{not json").await;
    send(&mut ws, r#"{"type":"rotate"}"#).await;
    ws.send(Message::Binary(br#"{"type":"click"}"#.to_vec()))
        .await
        .unwrap();

    assert_eq!(
        server.wait_for(1).await,
        vec![RecordedAction::Click("left".into())]
    );
}

#[tokio::test]
async fn test_sessions_keep_separate_swipe_state() {
    // Arrange
    let server = TestServer::start().await;
    let mut a = server.connect().await;
    let mut b = server.connect().await;

    // Act: 4 + 4 would cross the threshold if the state were shared
    send(&mut a, r#"{"type":"threeswipe","dx":4,"dy":0}"#).await;
    send(&mut b, r#"{"type":"threeswipe","dx":4,"dy":0}"#).await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(server.sink.actions().is_empty());

    send(&mut a, r#"{"type":"threeswipe","dx":2,"dy":0}"#).await;

    // Assert
    assert_eq!(
        server.wait_for(1).await,
        vec![RecordedAction::KeyTap {
            key: Key::Right,
            modifiers: vec![Key::Control],
        }]
    );
}

#[tokio::test]
async fn test_reconnect_starts_uncalibrated() {
    let server = TestServer::start().await;

    let mut first = server.connect().await;
    send(
        &mut first,
        r#"{"type":"deviceinfo","touchpadWidth":500,"touchpadHeight":800,"screenWidth":1000,"screenHeight":1600}"#,
    )
    .await;
    first.close(None).await.unwrap();

    let mut second = server.connect().await;
    send(&mut second, r#"{"type":"move","dx":2,"dy":1}"#).await;

    assert_eq!(
        server.wait_for(1).await,
        vec![RecordedAction::MoveSmooth { x: 102, y: 101 }]
    );
}

// ── Shutdown ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_clearing_running_flag_stops_accept_loop() {
    let server = TestServer::start().await;

    server.running.store(false, Ordering::Relaxed);
    let result = tokio::time::timeout(Duration::from_secs(2), server.handle).await;

    assert!(matches!(result, Ok(Ok(Ok(())))));
}
