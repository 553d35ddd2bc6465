//! Test helpers for E2E tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use ops_proto::{
    EndpointRecord, ShellMessage, ShellReply, ShellRequest, ShellResponse, WorkflowDescription,
};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{accept_async, tungstenite::Message as WsMessage};

/// Default test timeout.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How the fake gateway answers.
#[derive(Debug, Clone, Default)]
pub struct GatewayScript {
    /// Records returned for `list_endpoints`.
    pub endpoints: Vec<EndpointRecord>,
    /// Answer `list_endpoints` with this error instead.
    pub endpoints_error: Option<(u32, String)>,
    /// Zero-based invocation indices to reject.
    pub reject: HashSet<usize>,
    /// Zero-based invocation indices to never answer.
    pub hang: HashSet<usize>,
    /// Zero-based invocation indices answered only after a delay.
    pub late: HashMap<usize, Duration>,
}

impl GatewayScript {
    pub fn rejecting(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            reject: indices.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn hanging(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            hang: indices.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn answering_late(indices: impl IntoIterator<Item = usize>, delay: Duration) -> Self {
        Self {
            late: indices.into_iter().map(|index| (index, delay)).collect(),
            ..Self::default()
        }
    }

    pub fn with_endpoints(endpoints: Vec<EndpointRecord>) -> Self {
        Self {
            endpoints,
            ..Self::default()
        }
    }
}

struct GatewayState {
    script: GatewayScript,
    invocations: Mutex<Vec<WorkflowDescription>>,
}

/// What the gateway does with one request.
enum Answer {
    Now(ShellResponse),
    After(Duration, ShellResponse),
    Never,
}

impl GatewayState {
    fn respond(&self, message: ShellMessage) -> Answer {
        let request_type = message.request_type();
        match message {
            ShellMessage::Hello { .. } => Answer::Now(ShellResponse::welcome("fake-gateway")),
            ShellMessage::Ping { timestamp } => Answer::Now(ShellResponse::pong(timestamp)),
            ShellMessage::ListEndpoints => Answer::Now(match &self.script.endpoints_error {
                Some((code, message)) => {
                    ShellResponse::error_for_request(*code, message.clone(), request_type)
                }
                None => ShellResponse::Endpoints {
                    endpoints: self.script.endpoints.clone(),
                },
            }),
            ShellMessage::InvokeWorkflow(description) => {
                let index = {
                    let mut invocations = self.invocations.lock().unwrap();
                    invocations.push(description.clone());
                    invocations.len() - 1
                };
                if self.script.hang.contains(&index) {
                    return Answer::Never;
                }
                let response = if self.script.reject.contains(&index) {
                    ShellResponse::error_for_request(
                        500,
                        format!("workplace {} is locked", description.workplace),
                        request_type,
                    )
                } else {
                    ShellResponse::WorkflowInvoked {
                        workflow_id: description.workflow_id,
                        workplace: description.workplace,
                    }
                };
                match self.script.late.get(&index) {
                    Some(delay) => Answer::After(*delay, response),
                    None => Answer::Now(response),
                }
            }
        }
    }
}

/// In-process gateway speaking the shell protocol.
pub struct TestGateway {
    pub addr: SocketAddr,
    state: Arc<GatewayState>,
    handle: JoinHandle<()>,
}

impl TestGateway {
    /// Start a gateway on an available port.
    pub async fn start(script: GatewayScript) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(GatewayState {
            script,
            invocations: Mutex::new(Vec::new()),
        });

        let accept_state = Arc::clone(&state);
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve_connection(stream, Arc::clone(&accept_state)));
            }
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Get the WebSocket URL for this gateway.
    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Invocations received so far, in arrival order.
    pub fn invocations(&self) -> Vec<WorkflowDescription> {
        self.state.invocations.lock().unwrap().clone()
    }

    /// Stop accepting connections.
    pub fn shutdown(self) {
        self.handle.abort();
    }
}

async fn serve_connection(stream: TcpStream, state: Arc<GatewayState>) {
    let Ok(ws) = accept_async(stream).await else {
        return;
    };
    let (mut sink, mut incoming) = ws.split();

    let (tx, mut rx) = mpsc::unbounded_channel::<ShellReply>();
    tokio::spawn(async move {
        while let Some(reply) = rx.recv().await {
            let json = reply.to_json().unwrap();
            if sink.send(WsMessage::Text(json)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = incoming.next().await {
        let WsMessage::Text(text) = message else {
            continue;
        };
        let request = match ShellRequest::from_json(&text) {
            Ok(request) => request,
            Err(e) => {
                let _ = tx.send(ShellReply::uncorrelated(ShellResponse::error(
                    400,
                    e.to_string(),
                )));
                continue;
            }
        };
        match state.respond(request.message) {
            Answer::Now(response) => {
                let _ = tx.send(ShellReply::to(request.id, response));
            }
            Answer::After(delay, response) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(ShellReply::to(request.id, response));
                });
            }
            Answer::Never => {}
        }
    }
}
