//! Wire types for the DevTools protocol.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outgoing command. Page commands carry the flattened `sessionId` of the
/// target they address; browser commands carry none.
#[derive(Debug, Serialize)]
pub struct CdpRequest<'a> {
    pub id: u64,
    pub method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
}

/// Error object the browser returns in place of a result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProtocolError {
    pub code: i64,
    pub message: String,
}

impl ProtocolError {
    /// DevTools' generic "server error" code, raised for example by
    /// `DOM.getBoxModel` on a node that is not rendered.
    pub const SERVER_ERROR: i64 = -32000;
}

#[derive(Debug, Deserialize)]
struct RawFrame {
    id: Option<u64>,
    result: Option<Value>,
    error: Option<ProtocolError>,
    method: Option<String>,
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

/// One frame received from the browser.
#[derive(Debug, PartialEq)]
pub enum Inbound {
    /// Answer to the command with this id.
    Reply {
        id: u64,
        result: Result<Value, ProtocolError>,
    },
    /// Unsolicited notification. Nothing subscribes to these; they are
    /// parsed only so they can be told apart from replies and traced.
    Event {
        method: String,
        session_id: Option<String>,
    },
}

impl Inbound {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let frame: RawFrame = serde_json::from_str(text)?;
        Ok(match frame.id {
            Some(id) => Inbound::Reply {
                id,
                result: match frame.error {
                    Some(error) => Err(error),
                    None => Ok(frame.result.unwrap_or(Value::Null)),
                },
            },
            None => Inbound::Event {
                method: frame.method.unwrap_or_default(),
                session_id: frame.session_id,
            },
        })
    }
}

/// `/json/version` payload. Chrome mixes PascalCase and camelCase here.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserVersion {
    #[serde(rename = "Browser")]
    pub browser: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

/// Content box of a rendered node.
#[derive(Debug, Clone, Deserialize)]
pub struct BoxModel {
    /// Four corner points, flattened as `x1, y1, .. x4, y4`.
    pub content: Vec<f64>,
}

impl BoxModel {
    /// Midpoint of the content quad, or `None` for a malformed quad.
    pub fn center(&self) -> Option<(f64, f64)> {
        let quad = self.content.get(..8)?;
        let x = (quad[0] + quad[2] + quad[4] + quad[6]) / 4.0;
        let y = (quad[1] + quad[3] + quad[5] + quad[7]) / 4.0;
        Some((x, y))
    }
}

/// Phases of a synthetic left click, in dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MousePhase {
    Moved,
    Pressed,
    Released,
}

impl MousePhase {
    pub const CLICK: [MousePhase; 3] = [MousePhase::Moved, MousePhase::Pressed, MousePhase::Released];

    /// `type` value for `Input.dispatchMouseEvent`.
    pub fn event_type(self) -> &'static str {
        match self {
            MousePhase::Moved => "mouseMoved",
            MousePhase::Pressed => "mousePressed",
            MousePhase::Released => "mouseReleased",
        }
    }

    /// Whether this phase carries a button and click count.
    pub fn is_button_event(self) -> bool {
        !matches!(self, MousePhase::Moved)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
