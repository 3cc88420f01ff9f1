//! Scripted in-memory browser for exercising the engine without Chrome.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use glowup_browser::{
    BrowserDriver, BrowserError, ElementState, LaunchOptions, Page, PageSnapshot, TextMatch,
    WaitUntil,
};

/// An element addressable by selector on a scripted page.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeElement {
    disabled: bool,
    /// Clicks left before the element disappears.
    remaining: Option<u32>,
    navigates_to: Option<String>,
    /// Tag and visible text, for the text heuristic.
    label: Option<(String, String)>,
}

impl FakeElement {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub(crate) fn times(mut self, clicks: u32) -> Self {
        self.remaining = Some(clicks);
        self
    }

    pub(crate) fn navigates_to(mut self, url: &str) -> Self {
        self.navigates_to = Some(url.to_string());
        self
    }

    pub(crate) fn labeled(mut self, tag: &str, text: &str) -> Self {
        self.label = Some((tag.to_string(), text.to_string()));
        self
    }
}

#[derive(Debug, Clone, Default)]
struct FakeDoc {
    title: String,
    text: String,
    elements: Vec<(String, FakeElement)>,
}

impl FakeDoc {
    fn element(&self, selector: &str) -> Option<&FakeElement> {
        self.elements.iter().find(|(s, _)| s == selector).map(|(_, e)| e)
    }
}

#[derive(Default)]
struct FakeState {
    docs: HashMap<String, FakeDoc>,
    redirects: HashMap<String, String>,
    current: String,
    closed: bool,

    fail_launch: bool,
    fail_navigation: HashSet<String>,
    fail_at_op: Option<usize>,
    snapshot_faults_after_click: Option<(String, usize)>,
    failing_snapshots: usize,
    url_after_snapshot: HashMap<usize, String>,

    ops: usize,
    snapshots: usize,
    launches: Vec<LaunchOptions>,
    navigations: Vec<String>,
    clicks: Vec<String>,
    fills: Vec<(String, String)>,
    selects: Vec<(String, String)>,
    screenshots: Vec<PathBuf>,
    close_count: usize,
}

impl FakeState {
    fn doc_mut(&mut self, url: &str) -> &mut FakeDoc {
        self.docs.entry(url.to_string()).or_default()
    }

    fn current_doc(&self) -> Option<&FakeDoc> {
        self.docs.get(&self.current)
    }

    /// Count an operation, failing it if a fault is scheduled here.
    fn begin_op(&mut self, name: &str) -> Result<(), BrowserError> {
        if self.closed {
            return Err(BrowserError::Closed);
        }
        let index = self.ops;
        self.ops += 1;
        if self.fail_at_op == Some(index) {
            return Err(BrowserError::ActionFailed(format!("injected fault in {name}")));
        }
        Ok(())
    }

    fn go(&mut self, url: &str) {
        let landed = self.redirects.get(url).cloned().unwrap_or_else(|| url.to_string());
        self.current = landed;
    }
}

/// A scripted storefront shared by the driver, its pages and the test.
#[derive(Clone, Default)]
pub(crate) struct FakeSite {
    state: Arc<Mutex<FakeState>>,
}

impl FakeSite {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn page(&self, url: &str, text: &str) -> &Self {
        self.state.lock().doc_mut(url).text = text.to_string();
        self
    }

    pub(crate) fn title(&self, url: &str, title: &str) -> &Self {
        self.state.lock().doc_mut(url).title = title.to_string();
        self
    }

    pub(crate) fn element(&self, url: &str, selector: &str, element: FakeElement) -> &Self {
        self.state
            .lock()
            .doc_mut(url)
            .elements
            .push((selector.to_string(), element));
        self
    }

    pub(crate) fn redirect(&self, from: &str, to: &str) -> &Self {
        self.state
            .lock()
            .redirects
            .insert(from.to_string(), to.to_string());
        self
    }

    /// Replace a scripted page with an empty one.
    pub(crate) fn clear_page(&self, url: &str) -> &Self {
        self.state.lock().docs.insert(url.to_string(), FakeDoc::default());
        self
    }

    pub(crate) fn fail_launch(&self) -> &Self {
        self.state.lock().fail_launch = true;
        self
    }

    pub(crate) fn fail_navigation(&self, url: &str) -> &Self {
        self.state.lock().fail_navigation.insert(url.to_string());
        self
    }

    /// Fail the `index`-th counted page operation (0-based).
    pub(crate) fn fail_at_op(&self, index: usize) -> &Self {
        self.state.lock().fail_at_op = Some(index);
        self
    }

    /// Once `selector` is clicked, the next `count` snapshots fail the way
    /// an evaluate does while the document is being replaced.
    pub(crate) fn fail_snapshots_after_click(&self, selector: &str, count: usize) -> &Self {
        self.state.lock().snapshot_faults_after_click = Some((selector.to_string(), count));
        self
    }

    /// After the `n`-th snapshot (1-based) the page shows `url`, as if the
    /// operator had navigated there.
    pub(crate) fn url_after_snapshot(&self, n: usize, url: &str) -> &Self {
        self.state
            .lock()
            .url_after_snapshot
            .insert(n, url.to_string());
        self
    }

    pub(crate) fn driver(&self) -> Arc<dyn BrowserDriver> {
        Arc::new(FakeDriver { site: self.clone() })
    }

    pub(crate) fn ops(&self) -> usize {
        self.state.lock().ops
    }

    pub(crate) fn launches(&self) -> Vec<LaunchOptions> {
        self.state.lock().launches.clone()
    }

    pub(crate) fn navigations(&self) -> Vec<String> {
        self.state.lock().navigations.clone()
    }

    pub(crate) fn clicks(&self) -> Vec<String> {
        self.state.lock().clicks.clone()
    }

    pub(crate) fn fills(&self) -> Vec<(String, String)> {
        self.state.lock().fills.clone()
    }

    pub(crate) fn selects(&self) -> Vec<(String, String)> {
        self.state.lock().selects.clone()
    }

    pub(crate) fn screenshots(&self) -> Vec<PathBuf> {
        self.state.lock().screenshots.clone()
    }

    pub(crate) fn close_count(&self) -> usize {
        self.state.lock().close_count
    }
}

pub(crate) struct FakeDriver {
    site: FakeSite,
}

#[async_trait]
impl BrowserDriver for FakeDriver {
    async fn launch(&self, options: LaunchOptions) -> Result<Box<dyn Page>, BrowserError> {
        let mut state = self.site.state.lock();
        if state.fail_launch {
            return Err(BrowserError::LaunchFailed("injected launch failure".to_string()));
        }
        state.launches.push(options);
        state.current = "about:blank".to_string();
        state.closed = false;
        Ok(Box::new(FakePage {
            site: self.site.clone(),
        }))
    }
}

pub(crate) struct FakePage {
    site: FakeSite,
}

impl FakePage {
    /// Shared path for click, fill and select: the element must exist.
    fn with_element(
        &self,
        op: &str,
        selector: &str,
        record: impl FnOnce(&mut FakeState),
    ) -> Result<(), BrowserError> {
        let mut state = self.site.state.lock();
        state.begin_op(op)?;
        if state.current_doc().and_then(|d| d.element(selector)).is_none() {
            return Err(BrowserError::ElementNotFound(selector.to_string()));
        }
        record(&mut state);
        Ok(())
    }
}

#[async_trait]
impl Page for FakePage {
    async fn navigate(&self, url: &str, _wait: WaitUntil, _timeout: Duration) -> Result<(), BrowserError> {
        let mut state = self.site.state.lock();
        state.begin_op("navigate")?;
        state.navigations.push(url.to_string());
        if state.fail_navigation.contains(url) {
            return Err(BrowserError::NavigationFailed(format!("{url}: net::ERR_CONNECTION_RESET")));
        }
        state.go(url);
        Ok(())
    }

    async fn reload(&self, _wait: WaitUntil, _timeout: Duration) -> Result<(), BrowserError> {
        self.site.state.lock().begin_op("reload")
    }

    async fn snapshot(&self) -> Result<PageSnapshot, BrowserError> {
        let mut state = self.site.state.lock();
        state.begin_op("snapshot")?;
        if state.failing_snapshots > 0 {
            state.failing_snapshots -= 1;
            return Err(BrowserError::ActionFailed(
                "Execution context was destroyed.".to_string(),
            ));
        }
        state.snapshots += 1;
        if let Some(url) = state.url_after_snapshot.get(&state.snapshots).cloned() {
            state.current = url;
        }
        let doc = state.current_doc().cloned().unwrap_or_default();
        Ok(PageSnapshot {
            url: state.current.clone(),
            title: doc.title,
            text: doc.text,
        })
    }

    async fn element_state(&self, selector: &str) -> Result<Option<ElementState>, BrowserError> {
        let mut state = self.site.state.lock();
        state.begin_op("element_state")?;
        Ok(state
            .current_doc()
            .and_then(|d| d.element(selector))
            .map(|e| ElementState { disabled: e.disabled }))
    }

    async fn find_by_text(&self, matcher: &TextMatch) -> Result<Option<String>, BrowserError> {
        let mut state = self.site.state.lock();
        state.begin_op("find_by_text")?;
        Ok(state.current_doc().and_then(|doc| {
            doc.elements.iter().find_map(|(selector, e)| {
                let (tag, text) = e.label.as_ref()?;
                matcher
                    .accepts(tag, text, e.disabled)
                    .then(|| selector.clone())
            })
        }))
    }

    async fn click(&self, selector: &str) -> Result<(), BrowserError> {
        self.with_element("click", selector, |state| {
            state.clicks.push(selector.to_string());
            if let Some((trigger, count)) = &state.snapshot_faults_after_click {
                if trigger == selector {
                    state.failing_snapshots = *count;
                }
            }
            let current = state.current.clone();
            let doc = state.doc_mut(&current);
            let mut target = None;
            if let Some(pos) = doc.elements.iter().position(|(s, _)| s == selector) {
                let element = &mut doc.elements[pos].1;
                target = element.navigates_to.clone();
                let exhausted = match element.remaining.as_mut() {
                    Some(left) => {
                        *left = left.saturating_sub(1);
                        *left == 0
                    }
                    None => false,
                };
                if exhausted {
                    doc.elements.remove(pos);
                }
            }
            if let Some(url) = target {
                state.go(&url);
            }
        })
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<(), BrowserError> {
        self.with_element("fill", selector, |state| {
            state.fills.push((selector.to_string(), value.to_string()));
        })
    }

    async fn select_option(&self, selector: &str, value: &str) -> Result<(), BrowserError> {
        self.with_element("select_option", selector, |state| {
            state.selects.push((selector.to_string(), value.to_string()));
        })
    }

    async fn evaluate(&self, _script: &str) -> Result<Value, BrowserError> {
        self.site.state.lock().begin_op("evaluate")?;
        Ok(Value::Null)
    }

    async fn screenshot(&self, path: &Path) -> Result<(), BrowserError> {
        let mut state = self.site.state.lock();
        if state.closed {
            return Err(BrowserError::Closed);
        }
        state.screenshots.push(path.to_path_buf());
        Ok(())
    }

    async fn close(&self) -> Result<(), BrowserError> {
        let mut state = self.site.state.lock();
        state.close_count += 1;
        state.closed = true;
        Ok(())
    }
}

pub(crate) const HOME: &str = "https://www.ulta.com";
pub(crate) const BAG: &str = "https://www.ulta.com/bag";
pub(crate) const CHECKOUT: &str = "https://www.ulta.com/checkout";
pub(crate) const CONFIRMATION: &str = "https://www.ulta.com/checkout/confirmation";
pub(crate) const LIPSTICK: &str = "https://www.ulta.com/p/matte-lipstick-pimprod2031711";
pub(crate) const SERUM: &str = "https://www.ulta.com/p/vitamin-c-serum-pimprod2018425";

/// A signed-in storefront where every stage succeeds: two stale bag items,
/// two in-stock products, saved address and card, and a confirmation page
/// carrying an order number.
pub(crate) fn storefront() -> FakeSite {
    let site = FakeSite::new();
    site.page(HOME, "Hi, Jane  Sign Out")
        .page(BAG, "Your Bag")
        .element(BAG, "[data-test=\"bag-item-remove\"]", FakeElement::new().times(2))
        .element(
            BAG,
            "button[data-test=\"checkout-button\"]",
            FakeElement::new().navigates_to(CHECKOUT),
        );
    for product in [LIPSTICK, SERUM] {
        site.page(product, "In stock. Free samples with every order.")
            .element(product, "select[data-test=\"item-quantity\"]", FakeElement::new())
            .element(product, "button[data-test=\"add-to-bag\"]", FakeElement::new());
    }
    site.page(CHECKOUT, "Ship to this address  Visa ending in 4242")
        .element(
            CHECKOUT,
            "button[data-test=\"place-order\"]",
            FakeElement::new().navigates_to(CONFIRMATION),
        )
        .page(CONFIRMATION, "Thank you! Order number: 2093341");
    site
}
