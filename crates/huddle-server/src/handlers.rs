//! Connection handlers for the huddle server.
//!
//! This module owns the WebSocket lifecycle. Each socket is reported to the
//! hub as tagged lifecycle events, and outbound frames are drained from the
//! per-connection channel back onto the socket.

use crate::config::Config;
use crate::metrics::{self, ConnectionMetricsGuard};
use anyhow::Result;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        OriginalUri, State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use huddle_core::{FramePayload, GroupKey, Hub, HubEvent, SessionId};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

/// Shared server state.
pub struct AppState {
    /// The hub registry. Every read and mutation goes through this mutex,
    /// which serializes event dispatch the way the hub requires.
    pub hub: Mutex<Hub>,
    /// Server configuration.
    pub config: Config,
}

impl AppState {
    /// Create new app state.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            hub: Mutex::new(Hub::new()),
            config,
        }
    }
}

/// Run the HTTP/WebSocket server.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(config: Config) -> Result<()> {
    let state = Arc::new(AppState::new(config.clone()));

    // Start metrics server if enabled
    if config.metrics.enabled {
        if let Err(e) = metrics::start_metrics_server(config.metrics.port) {
            error!("Failed to start metrics server: {}", e);
        }
    }

    // Build router
    let app = Router::new()
        .route("/hub/*group", get(ws_handler))
        .route("/health", get(health_handler))
        .with_state(state);

    // Bind and serve
    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr).await?;

    info!("huddle server listening on {}", addr);
    info!("Hub endpoint: ws://{}/hub/<session>", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check handler.
async fn health_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// WebSocket upgrade handler.
async fn ws_handler(
    ws: WebSocketUpgrade,
    OriginalUri(uri): OriginalUri,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let path = uri.path().to_string();
    let max_message_size = state.config.limits.max_message_size;

    ws.max_message_size(max_message_size)
        .on_upgrade(move |socket| handle_socket(socket, path, state))
}

/// Handle one WebSocket connection.
async fn handle_socket(socket: WebSocket, path: String, state: Arc<AppState>) {
    // Record connection metrics
    let _metrics_guard = ConnectionMetricsGuard::new();

    let session = SessionId::next();
    debug!(session = %session, path = %path, "WebSocket connected");

    // Split the WebSocket
    let (mut sender, mut receiver) = socket.split();

    // Outbound frames from the hub; this task drains them onto the socket.
    let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<String>();

    // axum hands the socket over after the upgrade handshake, so the
    // session is already ready and joins its group immediately.
    let joining = GroupKey::from_path(&path).is_some();
    {
        let mut hub = state.hub.lock().await;
        hub.dispatch(HubEvent::SessionStarted {
            session,
            outbound,
            path: Some(path),
            ready: true,
        });
        if joining {
            metrics::record_join();
        }
        metrics::set_active_groups(hub.stats().group_count);
    }

    loop {
        tokio::select! {
            biased;

            // Frames the hub wants delivered to this peer
            Some(text) = outbound_rx.recv() => {
                metrics::record_message(text.len(), "outbound");
                if sender.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }

            // Receive from WebSocket
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let start = Instant::now();
                        metrics::record_message(text.len(), "inbound");

                        state.hub.lock().await.dispatch(HubEvent::MessageReceived {
                            session,
                            frame: FramePayload::Text(text),
                        });

                        metrics::record_latency(start.elapsed().as_secs_f64());
                    }
                    Some(Ok(Message::Binary(data))) => {
                        metrics::record_message(data.len(), "inbound");

                        state.hub.lock().await.dispatch(HubEvent::MessageReceived {
                            session,
                            frame: FramePayload::Binary(Bytes::from(data)),
                        });
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Pong(_))) => {
                        // Ignore pongs
                    }
                    Some(Ok(Message::Close(_))) => {
                        debug!(session = %session, "Received close frame");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(session = %session, error = %e, "WebSocket error");
                        metrics::record_error("websocket");
                        break;
                    }
                    None => {
                        debug!(session = %session, "WebSocket stream ended");
                        break;
                    }
                }
            }
        }
    }

    // The reliable close signal the hub depends on: dispatched exactly once
    // per connection, however the socket loop ended.
    {
        let mut hub = state.hub.lock().await;
        hub.dispatch(HubEvent::SessionEnded { session });
        metrics::set_active_groups(hub.stats().group_count);
    }

    debug!(session = %session, "WebSocket disconnected");
}
