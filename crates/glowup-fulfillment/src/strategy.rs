//! Selector fallback chains.
//!
//! A chain is an ordered list of locators tried against the live page. The
//! first locator that resolves to a present, enabled element gets the
//! action and the walk stops. When nothing resolves the chain reports
//! [`ChainOutcome::NotPerformed`]; callers decide whether that is fatal.

use std::fmt;

use tracing::{debug, trace};

use glowup_browser::{BrowserError, Page, TextMatch};

/// One way of finding an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// CSS selector; the first match is used.
    Css(String),
    /// Last-resort text heuristic.
    Text(TextMatch),
}

impl Locator {
    pub fn css(selector: &str) -> Self {
        Locator::Css(selector.to_string())
    }

    /// Any enabled element among `tags` whose text contains `needle`.
    pub fn text(tags: &[&str], needle: &str) -> Self {
        Locator::Text(TextMatch::new(tags, needle))
    }

    pub fn is_heuristic(&self) -> bool {
        matches!(self, Locator::Text(_))
    }

    /// Selector for the element this locator resolves to, if it is usable.
    async fn resolve(&self, page: &dyn Page) -> Result<Option<String>, BrowserError> {
        match self {
            Locator::Css(selector) => Ok(page
                .element_state(selector)
                .await?
                .filter(|state| !state.disabled)
                .map(|_| selector.clone())),
            Locator::Text(matcher) => page.find_by_text(matcher).await,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(selector) => write!(f, "{}", selector),
            Locator::Text(m) => write!(f, "text~\"{}\" in [{}]", m.contains, m.tags.join(",")),
        }
    }
}

/// What to do with the resolved element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Click,
    Fill(String),
    Select(String),
}

impl Action {
    async fn perform(&self, page: &dyn Page, selector: &str) -> Result<(), BrowserError> {
        match self {
            Action::Click => page.click(selector).await,
            Action::Fill(value) => page.fill(selector, value).await,
            Action::Select(value) => page.select_option(selector, value).await,
        }
    }
}

/// Result of walking a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    Performed {
        /// Position of the locator that fired.
        index: usize,
        /// Whether that locator was the text heuristic.
        heuristic: bool,
    },
    NotPerformed,
}

impl ChainOutcome {
    pub fn performed(&self) -> bool {
        matches!(self, ChainOutcome::Performed { .. })
    }

    pub fn used_heuristic(&self) -> bool {
        matches!(self, ChainOutcome::Performed { heuristic: true, .. })
    }
}

/// Named, ordered locator list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackChain {
    name: String,
    locators: Vec<Locator>,
}

impl FallbackChain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locators: Vec::new(),
        }
    }

    /// Chain of CSS selectors in the given order.
    pub fn of_css(name: impl Into<String>, selectors: &[&str]) -> Self {
        selectors
            .iter()
            .fold(Self::new(name), |chain, s| chain.then_css(s))
    }

    pub fn then_css(mut self, selector: &str) -> Self {
        self.locators.push(Locator::css(selector));
        self
    }

    pub fn then_text(mut self, tags: &[&str], needle: &str) -> Self {
        self.locators.push(Locator::text(tags, needle));
        self
    }

    /// Text heuristic that rejects elements mentioning `excluded`.
    pub fn then_text_excluding(mut self, tags: &[&str], needle: &str, excluded: &str) -> Self {
        self.locators
            .push(Locator::Text(TextMatch::new(tags, needle).excluding(excluded)));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn locators(&self) -> &[Locator] {
        &self.locators
    }

    /// Walk the chain and apply `action` to the first usable element.
    ///
    /// Element misses (absent, disabled, or vanished between resolution and
    /// action) move on to the next locator; any other browser error is
    /// returned.
    pub async fn run(&self, page: &dyn Page, action: &Action) -> Result<ChainOutcome, BrowserError> {
        for (index, locator) in self.locators.iter().enumerate() {
            let Some(selector) = locator.resolve(page).await? else {
                trace!(chain = %self.name, "no match for {}", locator);
                continue;
            };

            match action.perform(page, &selector).await {
                Ok(()) => {
                    debug!(chain = %self.name, index, "performed via {}", locator);
                    return Ok(ChainOutcome::Performed {
                        index,
                        heuristic: locator.is_heuristic(),
                    });
                }
                Err(e) if e.is_element_miss() => {
                    debug!(chain = %self.name, "{} resolved but could not be used: {}", locator, e);
                }
                Err(e) => return Err(e),
            }
        }

        debug!(chain = %self.name, "not performed");
        Ok(ChainOutcome::NotPerformed)
    }
}

#[cfg(test)]
#[path = "strategy_tests.rs"]
mod tests;
