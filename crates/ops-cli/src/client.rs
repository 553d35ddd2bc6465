//! Gateway WebSocket client for shell operations.
//!
//! The client speaks the shell protocol over a single WebSocket. Round trips
//! are serialized through a lock, so one client can be shared by concurrent
//! invocations. Every request gets a fresh id; replies to requests that
//! already timed out are discarded when they eventually arrive.
//!
//! # Example
//!
//! ```rust,no_run
//! use ops_cli::client::GatewayClient;
//!
//! # async fn example() -> Result<(), ops_cli::CliError> {
//! let client = GatewayClient::connect("ws://localhost:8181").await?;
//! let records = client.list_endpoints().await?;
//! println!("records: {}", records.len());
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use ops_endpoints::{EndpointService, QueryError};
use ops_proto::{
    EndpointRecord, SHELL_PROTOCOL_VERSION, ShellMessage, ShellReply, ShellRequest, ShellResponse,
    WorkflowDescription,
};
use ops_workflow::{BoxFuture, InvocationError, InvocationRequest, WorkflowService};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tracing::{debug, trace, warn};

use crate::error::CliError;

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Client timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Bound on establishing the connection.
    pub connect_timeout: Duration,
    /// Bound on each request/response round trip.
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Creates a config with the default timeouts.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Gateway WebSocket client.
pub struct GatewayClient {
    ws: Mutex<WsStream>,
    next_id: AtomicU64,
    server_version: String,
    request_timeout: Duration,
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("server_version", &self.server_version)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl GatewayClient {
    /// Connect to the gateway at the given URL.
    ///
    /// Performs the handshake to identify as a shell client.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The URL is invalid (must start with `ws://` or `wss://`)
    /// - Connection fails
    /// - Handshake fails
    pub async fn connect(url: &str) -> Result<Self, CliError> {
        Self::connect_with_config(url, ClientConfig::new()).await
    }

    /// Connect with custom timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if connection or handshake fails.
    pub async fn connect_with_config(url: &str, config: ClientConfig) -> Result<Self, CliError> {
        if !url.starts_with("ws://") && !url.starts_with("wss://") {
            return Err(CliError::Config(format!(
                "invalid gateway URL: {url}, must start with ws:// or wss://"
            )));
        }

        debug!(url = %url, "Connecting to gateway");

        let (ws, _response) = timeout(config.connect_timeout, connect_async(url))
            .await
            .map_err(|_| CliError::Timeout("connection timed out".into()))?
            .map_err(|e| CliError::Connection(e.to_string()))?;

        debug!("WebSocket connected, sending handshake");

        let mut client = Self {
            ws: Mutex::new(ws),
            next_id: AtomicU64::new(1),
            server_version: String::new(),
            request_timeout: config.request_timeout,
        };

        let hello = ShellMessage::hello(env!("CARGO_PKG_VERSION"));
        match client.send_request(hello).await? {
            ShellResponse::Welcome {
                server_version,
                protocol_version,
            } => {
                if protocol_version != SHELL_PROTOCOL_VERSION {
                    warn!(
                        server = protocol_version,
                        client = SHELL_PROTOCOL_VERSION,
                        "Protocol version mismatch"
                    );
                }
                client.server_version = server_version;
                debug!(version = %client.server_version, "Handshake complete");
                Ok(client)
            }
            other => Err(CliError::Protocol(format!(
                "unexpected response to hello: {other:?}"
            ))),
        }
    }

    /// Get the server version.
    #[must_use]
    pub fn server_version(&self) -> &str {
        &self.server_version
    }

    /// Send a request and wait for its reply.
    ///
    /// The lock is held for the whole round trip. Replies carrying another
    /// request's id are stale answers to earlier, timed-out requests and are
    /// skipped.
    async fn send_request(&self, request: ShellMessage) -> Result<ShellResponse, CliError> {
        let request_type = request.request_type();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let json = ShellRequest::new(id, request)
            .to_json()
            .map_err(|e| CliError::Protocol(e.to_string()))?;

        let mut ws = self.ws.lock().await;

        trace!(request_type, id, "Sending request");
        timeout(self.request_timeout, ws.send(Message::Text(json)))
            .await
            .map_err(|_| CliError::Timeout(format!("request '{request_type}' timed out")))?
            .map_err(|e| CliError::Connection(e.to_string()))?;

        let reply = timeout(self.request_timeout, next_reply(&mut ws, id))
            .await
            .map_err(|_| CliError::Timeout(format!("request '{request_type}' timed out")))??;
        drop(ws);

        match reply.response {
            ShellResponse::Error { code, message, .. } => Err(CliError::Gateway { code, message }),
            response => {
                trace!(request_type, id, "Received response");
                Ok(response)
            }
        }
    }

    /// Close the connection gracefully.
    ///
    /// # Errors
    ///
    /// Returns an error if the close frame cannot be sent.
    pub async fn close(self) -> Result<(), CliError> {
        self.ws
            .into_inner()
            .close(None)
            .await
            .map_err(|e| CliError::Connection(e.to_string()))
    }

    /// Check the connection with a ping and return the round trip time.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn ping(&self) -> Result<Duration, CliError> {
        let started = tokio::time::Instant::now();
        match self.send_request(ShellMessage::ping()).await? {
            ShellResponse::Pong { .. } => Ok(started.elapsed()),
            other => Err(CliError::Protocol(format!(
                "unexpected response: {other:?}"
            ))),
        }
    }

    /// Ask the workflow engine to run one workflow in one workplace.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Gateway`] if the engine rejected the request,
    /// or another error if the round trip failed.
    pub async fn invoke_workflow(&self, description: WorkflowDescription) -> Result<(), CliError> {
        let workflow_id = description.workflow_id.clone();
        let workplace = description.workplace.clone();

        match self
            .send_request(ShellMessage::InvokeWorkflow(description))
            .await?
        {
            ShellResponse::WorkflowInvoked {
                workflow_id: acked_id,
                workplace: acked_workplace,
            } if acked_id == workflow_id && acked_workplace == workplace => Ok(()),
            other => Err(CliError::Protocol(format!(
                "unexpected response to invoke {workflow_id} in {workplace}: {other:?}"
            ))),
        }
    }

    /// List every endpoint record known to the networking service.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_endpoints(&self) -> Result<Vec<EndpointRecord>, CliError> {
        match self.send_request(ShellMessage::ListEndpoints).await? {
            ShellResponse::Endpoints { endpoints } => Ok(endpoints),
            other => Err(CliError::Protocol(format!(
                "unexpected response: {other:?}"
            ))),
        }
    }
}

/// Waits for the reply to request `id`, skipping control frames and stale
/// replies.
async fn next_reply(ws: &mut WsStream, id: u64) -> Result<ShellReply, CliError> {
    loop {
        let text = next_text(ws).await?;
        let reply = ShellReply::from_json(&text).map_err(|e| CliError::Protocol(e.to_string()))?;
        if reply.answers(id) {
            return Ok(reply);
        }
        debug!(expected = id, received = ?reply.id, "Discarding stale reply");
    }
}

/// Waits for the next text frame, skipping control frames.
async fn next_text(ws: &mut WsStream) -> Result<String, CliError> {
    loop {
        let message = ws
            .next()
            .await
            .ok_or_else(|| CliError::Connection("connection closed".into()))?
            .map_err(|e| CliError::Connection(e.to_string()))?;

        match message {
            Message::Text(text) => return Ok(text),
            Message::Ping(_) | Message::Pong(_) => {}
            Message::Binary(_) => {
                return Err(CliError::Protocol("unexpected binary message".into()));
            }
            Message::Close(_) => {
                return Err(CliError::Connection("connection closed by server".into()));
            }
            Message::Frame(_) => {
                return Err(CliError::Protocol("unexpected message type".into()));
            }
        }
    }
}

impl WorkflowService for GatewayClient {
    fn invoke<'a>(
        &'a self,
        request: &'a InvocationRequest,
    ) -> BoxFuture<'a, Result<(), InvocationError>> {
        Box::pin(async move {
            let description = request.to_description()?;
            self.invoke_workflow(description)
                .await
                .map_err(|err| match err {
                    CliError::Gateway { code, message } => InvocationError::Rejected {
                        workflow_id: request.workflow_id().to_string(),
                        code,
                        message,
                    },
                    CliError::Timeout(_) => InvocationError::TimedOut(self.request_timeout),
                    other => InvocationError::unavailable(other),
                })
        })
    }
}

impl EndpointService for GatewayClient {
    fn endpoints(&self) -> BoxFuture<'_, Result<Vec<EndpointRecord>, QueryError>> {
        Box::pin(async move {
            self.list_endpoints().await.map_err(|err| match err {
                CliError::Gateway { code, message } => QueryError::Service { code, message },
                other => QueryError::unavailable(other),
            })
        })
    }
}
