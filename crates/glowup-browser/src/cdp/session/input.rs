//! Synthetic pointer and text input.

use serde_json::{Value, json};
use tracing::trace;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::MousePhase;

use super::core::PageSession;

fn mouse_event(phase: MousePhase, x: f64, y: f64) -> Value {
    let mut event = json!({"type": phase.event_type(), "x": x, "y": y});
    if phase.is_button_event() {
        event["button"] = json!("left");
        event["clickCount"] = json!(1);
    }
    event
}

impl PageSession {
    /// Left click at viewport coordinates.
    pub async fn click(&self, x: f64, y: f64) -> Result<(), CdpError> {
        for phase in MousePhase::CLICK {
            self.call("Input.dispatchMouseEvent", Some(mouse_event(phase, x, y)))
                .await?;
        }
        trace!("Clicked at ({}, {})", x, y);
        Ok(())
    }

    /// Insert text at the focused element.
    pub async fn insert_text(&self, text: &str) -> Result<(), CdpError> {
        self.call("Input.insertText", Some(json!({"text": text}))).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_has_no_button() {
        let event = mouse_event(MousePhase::Moved, 5.0, 6.0);
        assert_eq!(event["type"], "mouseMoved");
        assert!(event.get("button").is_none());
    }

    #[test]
    fn test_press_is_single_left_click() {
        let event = mouse_event(MousePhase::Pressed, 5.0, 6.0);
        assert_eq!(event["type"], "mousePressed");
        assert_eq!(event["button"], "left");
        assert_eq!(event["clickCount"], 1);
        assert_eq!(event["x"], 5.0);
    }
}
