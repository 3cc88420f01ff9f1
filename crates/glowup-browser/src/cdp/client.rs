//! CDP WebSocket client.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace, warn};

use super::error::CdpError;
use super::protocol::{BrowserVersion, CdpRequest, Inbound};
use super::session::PageSession;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value, CdpError>>>>>;

/// Upper bound for a single command round trip.
pub(crate) const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Request/response plumbing shared by the browser connection and every
/// page session attached through it.
pub(crate) struct Transport {
    ws_tx: tokio::sync::Mutex<WsSink>,
    request_id: AtomicU64,
    pending: PendingMap,
}

impl Transport {
    /// Send a command and wait for its response.
    pub(crate) async fn send(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let request = CdpRequest {
            id,
            method,
            params,
            session_id,
        };

        let json = serde_json::to_string(&request)?;
        trace!("CDP send: {}", json);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        {
            let mut ws = self.ws_tx.lock().await;
            if let Err(e) = ws.send(Message::Text(json.into())).await {
                self.pending.lock().remove(&id);
                return Err(e.into());
            }
        }

        match tokio::time::timeout(COMMAND_TIMEOUT, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::Timeout(format!("Request {} timed out", method)))
            }
        }
    }
}

/// Connection to a Chrome instance's browser target.
pub struct CdpClient {
    /// HTTP endpoint used for discovery.
    http_endpoint: String,
    transport: Arc<Transport>,
    _recv_task: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Connect to Chrome at a debugging endpoint such as
    /// `http://127.0.0.1:9222`.
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        let http_endpoint = endpoint.trim_end_matches('/').to_string();
        let version = Self::version(&http_endpoint).await?;
        debug!("Connected to browser: {}", version.browser);

        let (ws_stream, _) = tokio_tungstenite::connect_async(&version.web_socket_debugger_url)
            .await
            .map_err(|e| CdpError::ConnectionFailed(format!("WebSocket: {}", e)))?;

        let (ws_sink, ws_source) = ws_stream.split();
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        let recv_task = {
            let pending = pending.clone();
            tokio::spawn(async move {
                Self::receive_loop(ws_source, pending).await;
            })
        };

        Ok(Self {
            http_endpoint,
            transport: Arc::new(Transport {
                ws_tx: tokio::sync::Mutex::new(ws_sink),
                request_id: AtomicU64::new(1),
                pending,
            }),
            _recv_task: recv_task,
        })
    }

    /// Query `/json/version`; succeeds only when a browser is listening.
    pub async fn version(http_endpoint: &str) -> Result<BrowserVersion, CdpError> {
        let version_url = format!("{}/json/version", http_endpoint.trim_end_matches('/'));
        trace!("Fetching browser version from {}", version_url);

        reqwest::get(&version_url)
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", http_endpoint, e)))?
            .json()
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", http_endpoint, e)))
    }

    async fn receive_loop(mut ws_source: WsSource, pending: PendingMap) {
        while let Some(msg) = ws_source.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    trace!("CDP recv: {}", text);
                    match Inbound::parse(&text) {
                        Ok(Inbound::Reply { id, result }) => {
                            if let Some(tx) = pending.lock().remove(&id) {
                                let _ = tx.send(result.map_err(CdpError::from));
                            }
                        }
                        Ok(Inbound::Event { method, session_id }) => {
                            trace!("CDP event {} ({:?})", method, session_id);
                        }
                        Err(e) => warn!("Failed to parse CDP message: {}", e),
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("WebSocket closed");
                    break;
                }
                Err(e) => {
                    debug!("WebSocket ended: {}", e);
                    break;
                }
                _ => {}
            }
        }
        // Wake every waiter; their senders drop and they see SessionClosed.
        pending.lock().clear();
    }

    /// Send a browser-level command.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport.send(method, params, None).await
    }

    /// Open a blank tab and attach a flattened session to it.
    pub async fn new_page(&self) -> Result<PageSession, CdpError> {
        let created = self
            .call("Target.createTarget", Some(json!({"url": "about:blank"})))
            .await?;
        let target_id = created["targetId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing targetId".to_string()))?
            .to_string();

        let attached = self
            .call(
                "Target.attachToTarget",
                Some(json!({"targetId": target_id, "flatten": true})),
            )
            .await?;
        let session_id = attached["sessionId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing sessionId".to_string()))?
            .to_string();

        debug!("Attached to target {} ({})", target_id, session_id);

        let session = PageSession::new(target_id, session_id, self.transport.clone());
        session.enable_domains().await?;
        Ok(session)
    }

    /// Ask Chrome to exit. The connection drops as the browser goes away.
    pub async fn close_browser(&self) -> Result<(), CdpError> {
        match self.call("Browser.close", None).await {
            Ok(_) | Err(CdpError::SessionClosed) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.http_endpoint
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self._recv_task.abort();
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
