//! JavaScript execution for CDP page session.

use serde_json::{Value, json};

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Evaluate an expression and return its value by JSON.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            return Err(CdpError::JavaScript(exception_text(exception)));
        }

        Ok(result["result"]["value"].clone())
    }
}

/// Prefer the thrown value's description over the generic "Uncaught".
pub(super) fn exception_text(exception: &Value) -> String {
    exception["exception"]["description"]
        .as_str()
        .or_else(|| exception["text"].as_str())
        .unwrap_or("Unknown error")
        .to_string()
}

/// Quote a Rust string as a JavaScript string literal.
pub(crate) fn js_string(value: &str) -> String {
    // JSON string syntax is a subset of JS string literal syntax.
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}
