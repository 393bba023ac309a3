//! Native WebSocket client: `tokio-tungstenite`.
//!
//! Full implementation with:
//! - Background tokio task for connection management
//! - Application-level ping/pong health check
//! - Exponential backoff reconnection with jitter
//! - Per-subscription routing of data messages to [`MessageSink`]s
//! - Auto-resubscribe on reconnect
//!
//! A route only starts receiving data once the upstream has acknowledged its
//! subscribe. The upstream processes requests in order, so any message from a
//! subscription released just before arrives ahead of that acknowledgement and
//! is never delivered to the new route.

use std::pin::Pin;
use std::sync::atomic::{AtomicU16, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream, Stream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::error::WsError;
use crate::sync::transport::{MessageSink, SubscriptionHandle, Transport};
use crate::ws::{Kind, MessageIn, MessageOut, ReadyState, SubscribeParams, WsConfig, WsEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type Ack = oneshot::Sender<Result<(), WsError>>;

// ─── Commands from public API to background task ─────────────────────────────

enum Command {
    Subscribe {
        id: u64,
        params: SubscribeParams,
        sink: MessageSink,
        ack: Ack,
    },
    Unsubscribe {
        id: u64,
        ack: Option<Ack>,
    },
    Disconnect,
}

// ─── Disconnect reasons for reconnection decision ────────────────────────────

enum DisconnectReason {
    UserRequested,
    NormalClose,
    PongTimeout,
    RateLimited,
    Error(String),
}

// ─── Background task state ───────────────────────────────────────────────────

/// An acknowledged subscription receiving data.
struct Route {
    id: u64,
    params: SubscribeParams,
    sink: MessageSink,
}

/// A subscribe waiting for the upstream acknowledgement.
struct Pending {
    id: u64,
    params: SubscribeParams,
    sink: MessageSink,
    ack: Ack,
}

struct TaskState {
    config: WsConfig,
    event_tx: mpsc::Sender<WsEvent>,
    cmd_rx: mpsc::Receiver<Command>,
    routes: Vec<Route>,
    pending: Vec<Pending>,
    /// Unsubscribed on this connection; their late acknowledgements answer nothing.
    released: Vec<SubscribeParams>,
    /// Rejected by the upstream. An acknowledgement arriving anyway is undone.
    rejected: Vec<SubscribeParams>,
    reconnect_attempts: u32,
    ready_state: Arc<AtomicU16>,
}

impl TaskState {
    fn emit(&self, event: WsEvent) {
        let _ = self.event_tx.try_send(event);
    }

    fn should_reconnect(&self) -> bool {
        self.config.reconnect && self.reconnect_attempts < self.config.max_reconnect_attempts
    }

    fn is_tracked(&self, params: &SubscribeParams) -> bool {
        self.routes.iter().any(|r| &r.params == params)
            || self.pending.iter().any(|p| &p.params == params)
    }

    /// Every distinct subscription that must exist upstream.
    fn tracked_params(&self) -> Vec<SubscribeParams> {
        let mut out: Vec<SubscribeParams> = Vec::new();
        let all = self
            .routes
            .iter()
            .map(|r| &r.params)
            .chain(self.pending.iter().map(|p| &p.params));
        for params in all {
            if !out.contains(params) {
                out.push(params.clone());
            }
        }
        out
    }

    /// Removes a route or pending entry. Returns its params if nothing else
    /// still needs that upstream subscription.
    fn remove(&mut self, id: u64) -> Option<SubscribeParams> {
        let params = if let Some(pos) = self.routes.iter().position(|r| r.id == id) {
            self.routes.remove(pos).params
        } else if let Some(pos) = self.pending.iter().position(|p| p.id == id) {
            self.pending.remove(pos).params
        } else {
            return None;
        };
        if self.is_tracked(&params) {
            None
        } else {
            Some(params)
        }
    }

    /// Removes a route or pending entry on a live connection. Returns the params to
    /// unsubscribe upstream, recording them as released.
    fn release(&mut self, id: u64) -> Option<SubscribeParams> {
        let params = self.remove(id)?;
        self.released.push(params.clone());
        Some(params)
    }

    /// Fails every pending entry for `params`.
    fn reject(&mut self, params: &SubscribeParams, message: &str) -> usize {
        let (matched, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| &p.params == params);
        self.pending = rest;

        let n = matched.len();
        for p in matched {
            let _ = p
                .ack
                .send(Err(WsError::SubscriptionRejected(message.to_string())));
        }
        if n > 0 {
            self.rejected.push(params.clone());
        }
        n
    }

    /// Moves every pending entry for `params` into the routing table.
    fn acknowledge(&mut self, params: &SubscribeParams) -> usize {
        let (matched, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| &p.params == params);
        self.pending = rest;

        let n = matched.len();
        for p in matched {
            let _ = p.ack.send(Ok(()));
            self.routes.push(Route {
                id: p.id,
                params: p.params,
                sink: p.sink,
            });
        }
        n
    }

    fn route(&self, kind: &Kind) {
        let Some(key) = kind.route_key() else {
            return;
        };
        let mut delivered = false;
        for route in self.routes.iter().filter(|r| r.params.route_key() == key) {
            delivered |= route.sink.deliver(kind.clone());
        }
        if !delivered {
            tracing::trace!(route = %key, "No live route for message");
        }
    }

    fn handle_command_offline(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Subscribe {
                id,
                params,
                sink,
                ack,
            } => {
                self.pending.push(Pending {
                    id,
                    params,
                    sink,
                    ack,
                });
                false
            }
            Command::Unsubscribe { id, ack } => {
                self.remove(id);
                if let Some(ack) = ack {
                    let _ = ack.send(Ok(()));
                }
                false
            }
            Command::Disconnect => true,
        }
    }
}

// ─── Public WsClient ─────────────────────────────────────────────────────────

/// Native WebSocket client using `tokio-tungstenite`.
///
/// Uses a background tokio task for connection management.
/// The public API communicates with it via mpsc channels.
pub struct WsClient {
    config: WsConfig,
    cmd_tx: Option<mpsc::Sender<Command>>,
    event_rx: tokio::sync::Mutex<mpsc::Receiver<WsEvent>>,
    event_tx: mpsc::Sender<WsEvent>,
    task_handle: Option<JoinHandle<()>>,
    ready_state: Arc<AtomicU16>,
    next_id: AtomicU64,
}

impl WsClient {
    /// Create a new WS client. Does not connect yet.
    pub fn new(config: WsConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel(256);
        Self {
            config,
            cmd_tx: None,
            event_rx: tokio::sync::Mutex::new(event_rx),
            event_tx,
            task_handle: None,
            ready_state: Arc::new(AtomicU16::new(ReadyState::Closed as u16)),
            next_id: AtomicU64::new(1),
        }
    }

    /// Connect to the WebSocket server.
    ///
    /// Spawns a background tokio task that manages the connection,
    /// ping/pong keepalive, reconnection, and subscription routing.
    pub async fn connect(&mut self) -> Result<(), WsError> {
        if self.cmd_tx.is_some() {
            return Ok(());
        }

        let (cmd_tx, cmd_rx) = mpsc::channel(64);
        self.cmd_tx = Some(cmd_tx);
        self.ready_state
            .store(ReadyState::Connecting as u16, Ordering::SeqCst);

        let state = TaskState {
            config: self.config.clone(),
            event_tx: self.event_tx.clone(),
            cmd_rx,
            routes: Vec::new(),
            pending: Vec::new(),
            released: Vec::new(),
            rejected: Vec::new(),
            reconnect_attempts: 0,
            ready_state: Arc::clone(&self.ready_state),
        };

        let handle = tokio::spawn(run_task(state));
        self.task_handle = Some(handle);

        Ok(())
    }

    /// Disconnect from the WebSocket server.
    ///
    /// Sends a graceful close to the background task and waits for it to finish.
    /// All routes are dropped.
    pub async fn disconnect(&mut self) -> Result<(), WsError> {
        if let Some(tx) = self.cmd_tx.take() {
            let _ = tx.send(Command::Disconnect).await;
        }

        if let Some(handle) = self.task_handle.take() {
            let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        }

        self.ready_state
            .store(ReadyState::Closed as u16, Ordering::SeqCst);
        Ok(())
    }

    /// Whether the WebSocket is currently open.
    pub fn is_connected(&self) -> bool {
        self.ready_state() == ReadyState::Open
    }

    /// Current connection state.
    pub fn ready_state(&self) -> ReadyState {
        ReadyState::from(self.ready_state.load(Ordering::SeqCst))
    }

    /// Get a stream of lifecycle events from the WebSocket connection.
    ///
    /// The returned stream borrows `self`, so it must be dropped
    /// before calling `disconnect()`.
    pub fn events(&self) -> Pin<Box<dyn Stream<Item = WsEvent> + Send + '_>> {
        Box::pin(futures_util::stream::unfold(
            &self.event_rx,
            |rx| async move {
                let mut guard = rx.lock().await;
                guard.recv().await.map(|event| (event, rx))
            },
        ))
    }
}

impl Drop for WsClient {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

// ─── Transport contract ──────────────────────────────────────────────────────

/// Handle for one routed subscription on a [`WsClient`].
#[derive(Debug)]
pub struct WsSubscription {
    id: u64,
    cmd_tx: mpsc::Sender<Command>,
}

impl SubscriptionHandle for WsSubscription {
    async fn unsubscribe(self) -> Result<(), WsError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Unsubscribe {
                id: self.id,
                ack: Some(ack_tx),
            })
            .await
            .map_err(|_| WsError::NotConnected)?;
        ack_rx.await.map_err(|_| WsError::NotConnected)?
    }
}

impl Transport for WsClient {
    type Handle = WsSubscription;

    async fn subscribe(
        &self,
        params: SubscribeParams,
        sink: MessageSink,
    ) -> Result<WsSubscription, WsError> {
        let tx = self.cmd_tx.clone().ok_or(WsError::NotConnected)?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (ack_tx, ack_rx) = oneshot::channel();

        tx.send(Command::Subscribe {
            id,
            params: params.clone(),
            sink,
            ack: ack_tx,
        })
        .await
        .map_err(|_| WsError::NotConnected)?;

        let wait = Duration::from_millis(self.config.subscribe_timeout_ms as u64);
        match tokio::time::timeout(wait, ack_rx).await {
            Ok(Ok(Ok(()))) => Ok(WsSubscription { id, cmd_tx: tx }),
            Ok(Ok(Err(e))) => Err(e),
            Ok(Err(_)) => Err(WsError::Closed {
                code: None,
                reason: "Transport task ended".into(),
            }),
            Err(_) => {
                let _ = tx.send(Command::Unsubscribe { id, ack: None }).await;
                Err(WsError::Timeout(format!(
                    "no acknowledgement for {}",
                    params.route_key()
                )))
            }
        }
    }
}

// ─── Background task ─────────────────────────────────────────────────────────

async fn run_task(mut state: TaskState) {
    loop {
        // ── 1. Attempt connection ────────────────────────────────────────
        let (sink, stream) = match attempt_connect(&state.config.url).await {
            Ok(parts) => parts,
            Err(e) => {
                tracing::error!("WebSocket {}", e);
                state.emit(WsEvent::Error(e.to_string()));

                if state.should_reconnect() {
                    backoff_sleep(&mut state, false).await;
                    if drain_commands(&mut state) {
                        return;
                    }
                    continue;
                } else {
                    state.emit(WsEvent::MaxReconnectReached);
                    return;
                }
            }
        };

        // ── 2. Connected ─────────────────────────────────────────────────
        state.reconnect_attempts = 0;
        state.released.clear();
        state.rejected.clear();
        state
            .ready_state
            .store(ReadyState::Open as u16, Ordering::SeqCst);
        state.emit(WsEvent::Connected);

        // ── 3. Resubscribe everything routed or awaiting acknowledgement ──
        let mut sink = sink;
        resubscribe_all(&mut sink, &state.tracked_params()).await;

        // ── 4. Inner select! loop ────────────────────────────────────────
        let reason = run_connected(&mut state, sink, stream).await;

        // ── 5. Post-disconnect decision ──────────────────────────────────
        state
            .ready_state
            .store(ReadyState::Closed as u16, Ordering::SeqCst);

        let rate_limited = match reason {
            DisconnectReason::UserRequested | DisconnectReason::NormalClose => return,
            DisconnectReason::RateLimited => true,
            DisconnectReason::PongTimeout => false,
            DisconnectReason::Error(reason) => {
                tracing::warn!(%reason, "Connection lost");
                false
            }
        };

        if !state.should_reconnect() {
            state.emit(WsEvent::MaxReconnectReached);
            return;
        }
        state
            .ready_state
            .store(ReadyState::Connecting as u16, Ordering::SeqCst);
        backoff_sleep(&mut state, rate_limited).await;
        if drain_commands(&mut state) {
            return;
        }
    }
}

/// The inner connected loop: runs until the connection breaks.
async fn run_connected(
    state: &mut TaskState,
    mut sink: SplitSink<WsStream, Message>,
    mut stream: SplitStream<WsStream>,
) -> DisconnectReason {
    let ping_dur = Duration::from_millis(state.config.ping_interval_ms as u64);
    let pong_dur = Duration::from_millis(state.config.pong_timeout_ms as u64);

    let mut ping_interval = tokio::time::interval(ping_dur);
    ping_interval.reset(); // skip immediate first tick

    let mut pong_deadline: Option<tokio::time::Instant> = None;

    let far_future = tokio::time::Instant::now() + Duration::from_secs(86400);
    let pong_sleep = tokio::time::sleep_until(far_future);
    tokio::pin!(pong_sleep);

    loop {
        tokio::select! {
            // ── a) Incoming WS message ───────────────────────────────────
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let text_str: &str = text.as_ref();
                        match serde_json::from_str::<MessageIn>(text_str) {
                            Ok(msg_in) => match msg_in.kind {
                                Kind::Pong => {
                                    pong_deadline = None;
                                    pong_sleep.as_mut().reset(far_future);
                                }
                                Kind::SubscriptionResponse(ack) if ack.is_subscribe() => {
                                    if let Some(orphan) = handle_subscribe_ack(state, ack.params()) {
                                        tracing::debug!(route = %orphan.route_key(), "Withdrawing rejected subscription");
                                        if let Err(e) = send_msg(&mut sink, &MessageOut::unsubscribe(orphan.clone())).await {
                                            tracing::warn!("Unsubscribe send failed: {}", e);
                                        }
                                        state.released.push(orphan);
                                    }
                                }
                                Kind::SubscriptionResponse(ack) => {
                                    handle_unsubscribe_ack(state, ack.params());
                                }
                                Kind::Error(message) => {
                                    handle_upstream_error(state, message);
                                }
                                kind => state.route(&kind),
                            },
                            Err(e) => {
                                let error = WsError::DeserializationError(e.to_string());
                                tracing::debug!("{}; raw: {}", error, text_str);
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Pong(_))) => {}
                    Some(Ok(Message::Close(frame))) => {
                        let (code, reason) = extract_close(frame.as_ref());
                        state.emit(WsEvent::Disconnected {
                            code: Some(code),
                            reason: reason.clone(),
                        });
                        return match code {
                            1000 => DisconnectReason::NormalClose,
                            1008 => DisconnectReason::RateLimited,
                            _ => DisconnectReason::Error(reason),
                        };
                    }
                    Some(Ok(_)) => {} // Binary, Frame: ignore
                    Some(Err(e)) => {
                        let reason = e.to_string();
                        tracing::error!("WebSocket error: {}", reason);
                        state.emit(WsEvent::Disconnected {
                            code: None,
                            reason: reason.clone(),
                        });
                        return DisconnectReason::Error(reason);
                    }
                    None => {
                        state.emit(WsEvent::Disconnected {
                            code: None,
                            reason: "Stream ended".into(),
                        });
                        return DisconnectReason::Error("Stream ended".into());
                    }
                }
            }

            // ── b) Command from public API ───────────────────────────────
            cmd = state.cmd_rx.recv() => {
                match cmd {
                    Some(Command::Subscribe { id, params, sink: route_sink, ack }) => {
                        if state.routes.iter().any(|r| r.params == params) {
                            let _ = ack.send(Ok(()));
                            state.routes.push(Route { id, params, sink: route_sink });
                            continue;
                        }
                        let already_sent = state.pending.iter().any(|p| p.params == params);
                        if !already_sent {
                            tracing::debug!(route = %params.route_key(), "Subscribing");
                            if let Err(e) = send_msg(&mut sink, &MessageOut::subscribe(params.clone())).await {
                                tracing::warn!("Subscribe send failed: {}", e);
                            }
                        }
                        state.pending.push(Pending { id, params, sink: route_sink, ack });
                    }
                    Some(Command::Unsubscribe { id, ack }) => {
                        if let Some(params) = state.release(id) {
                            tracing::debug!(route = %params.route_key(), "Unsubscribing");
                            if let Err(e) = send_msg(&mut sink, &MessageOut::unsubscribe(params)).await {
                                tracing::warn!("Unsubscribe send failed: {}", e);
                            }
                        }
                        if let Some(ack) = ack {
                            let _ = ack.send(Ok(()));
                        }
                    }
                    Some(Command::Disconnect) | None => {
                        let _ = sink.send(Message::Close(Some(CloseFrame {
                            code: CloseCode::Normal,
                            reason: "Client disconnect".into(),
                        }))).await;
                        return DisconnectReason::UserRequested;
                    }
                }
            }

            // ── c) Ping interval ─────────────────────────────────────────
            _ = ping_interval.tick() => {
                if let Err(e) = send_msg(&mut sink, &MessageOut::Ping).await {
                    tracing::warn!("Failed to send ping: {}", e);
                } else {
                    let deadline = tokio::time::Instant::now() + pong_dur;
                    pong_deadline = Some(deadline);
                    pong_sleep.as_mut().reset(deadline);
                }
            }

            // ── d) Pong timeout ──────────────────────────────────────────
            () = &mut pong_sleep, if pong_deadline.is_some() => {
                tracing::warn!(
                    "Pong timeout, no response within {}ms",
                    state.config.pong_timeout_ms
                );
                state.emit(WsEvent::Disconnected {
                    code: None,
                    reason: "Pong timeout".into(),
                });
                let _ = sink.close().await;
                return DisconnectReason::PongTimeout;
            }
        }
    }
}

// ─── Acknowledgements ────────────────────────────────────────────────────────

/// Settles pending subscribes answered by an acknowledgement. Returns params to
/// unsubscribe again when the upstream accepted something it had rejected.
fn handle_subscribe_ack(
    state: &mut TaskState,
    params: Option<SubscribeParams>,
) -> Option<SubscribeParams> {
    let Some(params) = params else {
        tracing::debug!("Unparseable subscription acknowledgement");
        return None;
    };
    if state.acknowledge(&params) > 0 {
        return None;
    }
    if let Some(pos) = state.rejected.iter().position(|p| p == &params) {
        state.rejected.remove(pos);
        return (!state.is_tracked(&params)).then_some(params);
    }
    // A resent route or a just-released descriptor answers nothing pending.
    if state.routes.iter().any(|r| r.params == params) || state.released.contains(&params) {
        return None;
    }
    // The upstream may normalize the echoed descriptor; fall back to the oldest
    // pending entry on the same route.
    let key = params.route_key();
    if let Some(fallback) = state
        .pending
        .iter()
        .find(|p| p.params.route_key() == key)
        .map(|p| p.params.clone())
    {
        state.acknowledge(&fallback);
    }
    None
}

fn handle_unsubscribe_ack(state: &mut TaskState, params: Option<SubscribeParams>) {
    let Some(params) = params else {
        return;
    };
    if let Some(pos) = state.released.iter().position(|p| p == &params) {
        state.released.remove(pos);
    }
}

/// Subscription descriptor quoted in an upstream error, e.g.
/// `Invalid subscription: {"type":"trades","coin":"XYZ"}`.
fn quoted_descriptor(message: &str) -> Option<SubscribeParams> {
    let start = message.find('{')?;
    let end = message.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&message[start..=end]).ok()
}

/// Fails the pending subscribes an upstream error names. Errors naming nothing
/// pending are surfaced as protocol errors and change no subscription state.
fn handle_upstream_error(state: &mut TaskState, message: String) {
    let named = quoted_descriptor(&message)
        .filter(|params| state.pending.iter().any(|p| &p.params == params));

    match named {
        Some(params) if message.starts_with("Already subscribed") => {
            tracing::debug!(route = %params.route_key(), "Already subscribed upstream");
            state.acknowledge(&params);
        }
        Some(params) => {
            tracing::warn!(route = %params.route_key(), "Subscription rejected: {}", message);
            state.reject(&params, &message);
            state.emit(WsEvent::Error(message));
        }
        None => {
            let error = WsError::ProtocolError(message);
            tracing::warn!("Upstream {}", error);
            state.emit(WsEvent::Error(error.to_string()));
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Attempt to establish a WebSocket connection with a 30-second timeout.
async fn attempt_connect(
    url: &str,
) -> Result<(SplitSink<WsStream, Message>, SplitStream<WsStream>), WsError> {
    let (ws_stream, _) = tokio::time::timeout(Duration::from_secs(30), connect_async(url))
        .await
        .map_err(|_| WsError::ConnectionFailed("timeout".into()))?
        .map_err(|e| WsError::ConnectionFailed(e.to_string()))?;

    Ok(ws_stream.split())
}

/// Serialize and send a MessageOut over the sink.
async fn send_msg(sink: &mut SplitSink<WsStream, Message>, msg: &MessageOut) -> Result<(), WsError> {
    let json = serde_json::to_string(msg).map_err(|e| WsError::SendFailed(e.to_string()))?;
    sink.send(Message::Text(json.into()))
        .await
        .map_err(|e| WsError::SendFailed(e.to_string()))
}

/// Extract close code and reason from an optional CloseFrame.
fn extract_close(frame: Option<&CloseFrame>) -> (u16, String) {
    match frame {
        Some(f) => (f.code.into(), f.reason.to_string()),
        None => (1006, "No close frame".into()),
    }
}

async fn resubscribe_all(sink: &mut SplitSink<WsStream, Message>, subs: &[SubscribeParams]) {
    if subs.is_empty() {
        return;
    }
    tracing::info!("Resubscribing to {} tracked subscription(s)", subs.len());
    for sub in subs {
        if let Err(e) = send_msg(sink, &MessageOut::subscribe(sub.clone())).await {
            tracing::warn!("Failed to resubscribe: {}", e);
        }
    }
}

/// Apply commands that arrived while disconnected. Returns `true` if the
/// client asked to shut down.
fn drain_commands(state: &mut TaskState) -> bool {
    while let Ok(cmd) = state.cmd_rx.try_recv() {
        if state.handle_command_offline(cmd) {
            return true;
        }
    }
    false
}

// ─── Reconnection backoff ────────────────────────────────────────────────────

async fn backoff_sleep(state: &mut TaskState, rate_limited: bool) {
    state.reconnect_attempts += 1;

    let exp = (state.reconnect_attempts - 1).min(10);
    let base = state
        .config
        .base_reconnect_delay_ms
        .saturating_mul(1u32 << exp);

    let (jitter_max, cap) = if rate_limited {
        (1000u32, 300_000u32) // up to 5 minutes for rate limits
    } else {
        (500u32, 60_000u32) // up to 60 seconds normally
    };

    let jitter = rand::random::<u32>() % jitter_max;
    let delay = base.saturating_add(jitter).min(cap);

    tracing::info!(
        "Reconnect attempt {}/{} in {}ms{}",
        state.reconnect_attempts,
        state.config.max_reconnect_attempts,
        delay,
        if rate_limited { " (rate-limited)" } else { "" }
    );

    tokio::time::sleep(Duration::from_millis(delay as u64)).await;
}

// ─── Tests ───────────────────────────────────────────────────────────────────
