//! DOM operations for CDP page session.

use serde_json::json;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::BoxModel;
use crate::driver::{ElementState, TextMatch};

use super::core::PageSession;
use super::js::js_string;

impl PageSession {
    /// Node id of the first element matching `selector`.
    pub async fn query_selector(&self, selector: &str) -> Result<Option<i64>, CdpError> {
        let doc = self.call("DOM.getDocument", Some(json!({"depth": 0}))).await?;
        let root = doc["root"]["nodeId"]
            .as_i64()
            .ok_or_else(|| CdpError::InvalidResponse("Missing root nodeId".to_string()))?;

        let result = self
            .call(
                "DOM.querySelector",
                Some(json!({"nodeId": root, "selector": selector})),
            )
            .await?;

        Ok(result["nodeId"].as_i64().filter(|id| *id != 0))
    }

    /// Box model for a node; `None` when it is not rendered.
    pub async fn get_box_model(&self, node_id: i64) -> Result<Option<BoxModel>, CdpError> {
        match self.call("DOM.getBoxModel", Some(json!({"nodeId": node_id}))).await {
            Ok(r) => Ok(Some(serde_json::from_value(r["model"].clone())?)),
            Err(e) if e.is_server_error() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Scroll the element into view and click its center.
    pub async fn click_selector(&self, selector: &str) -> Result<(), CdpError> {
        let node_id = self
            .query_selector(selector)
            .await?
            .ok_or_else(|| CdpError::ElementNotFound(selector.to_string()))?;

        // Already-visible nodes may reject this; the box model check decides.
        let _ = self
            .call("DOM.scrollIntoViewIfNeeded", Some(json!({"nodeId": node_id})))
            .await;

        let (x, y) = self
            .get_box_model(node_id)
            .await?
            .and_then(|model| model.center())
            .ok_or_else(|| CdpError::ElementNotFound(format!("{} (not visible)", selector)))?;
        self.click(x, y).await
    }

    /// Replace an input's value the way typing would.
    pub async fn fill(&self, selector: &str, value: &str) -> Result<(), CdpError> {
        let node_id = self
            .query_selector(selector)
            .await?
            .ok_or_else(|| CdpError::ElementNotFound(selector.to_string()))?;

        self.call("DOM.focus", Some(json!({"nodeId": node_id}))).await?;
        self.evaluate(&format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                const proto = Object.getPrototypeOf(el);
                const desc = Object.getOwnPropertyDescriptor(proto, 'value');
                if (desc && desc.set) {{ desc.set.call(el, ''); }} else {{ el.value = ''; }}
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
            }})()"#,
            sel = js_string(selector)
        ))
        .await?;

        if !value.is_empty() {
            self.insert_text(value).await?;
        }

        self.evaluate(&format!(
            "document.querySelector({}).dispatchEvent(new Event('change', {{ bubbles: true }}))",
            js_string(selector)
        ))
        .await?;
        Ok(())
    }

    /// Choose a `<select>` option whose value or label equals `value`.
    pub async fn select_option(&self, selector: &str, value: &str) -> Result<(), CdpError> {
        let outcome = self
            .evaluate(&format!(
                r#"(() => {{
                    const el = document.querySelector({sel});
                    if (!el) return 'missing';
                    const want = {val};
                    const opt = Array.from(el.options || []).find(
                        o => o.value === want || o.label.trim() === want || o.text.trim() === want);
                    if (!opt) return 'no-option';
                    el.value = opt.value;
                    el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                    el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                    return 'ok';
                }})()"#,
                sel = js_string(selector),
                val = js_string(value)
            ))
            .await?;

        match outcome.as_str() {
            Some("ok") => Ok(()),
            Some("no-option") => Err(CdpError::ElementNotFound(format!(
                "{} has no option '{}'",
                selector, value
            ))),
            _ => Err(CdpError::ElementNotFound(selector.to_string())),
        }
    }

    /// Disabled state of the first element matching `selector`.
    pub async fn element_state(&self, selector: &str) -> Result<Option<ElementState>, CdpError> {
        let value = self
            .evaluate(&format!(
                r#"(() => {{
                    const el = document.querySelector({sel});
                    if (!el) return null;
                    return {{ disabled: !!el.disabled || el.getAttribute('aria-disabled') === 'true' }};
                }})()"#,
                sel = js_string(selector)
            ))
            .await?;

        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    /// Tag the first element accepted by `matcher` and return a selector for it.
    pub async fn find_by_text(&self, matcher: &TextMatch) -> Result<Option<String>, CdpError> {
        let value = self
            .evaluate(&format!(
                r#"(() => {{
                    const m = {matcher};
                    const nodes = document.querySelectorAll(m.tags.join(','));
                    for (const el of nodes) {{
                        if (el.disabled || el.getAttribute('aria-disabled') === 'true') continue;
                        const text = (el.innerText || el.textContent || '').toLowerCase();
                        if (!text.includes(m.contains)) continue;
                        if (m.excludes.some(x => text.includes(x))) continue;
                        const token = 'm' + Date.now().toString(36) + Math.random().toString(36).slice(2, 8);
                        el.setAttribute('data-glowup-match', token);
                        return '[data-glowup-match="' + token + '"]';
                    }}
                    return null;
                }})()"#,
                matcher = serde_json::to_string(matcher)?
            ))
            .await?;

        Ok(value.as_str().map(|s| s.to_string()))
    }
}
