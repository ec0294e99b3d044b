// Locator - Lazy element handle with strictness and auto-waiting
//
// A Locator pairs a session with a `Selector` and does nothing until an
// operation runs. Every operation re-queries the live document, so a locator
// never goes stale across navigations.
//
// Strictness rules:
// - Single-element operations (click, fill, inner_text, ...) poll until the
//   selector matches, for up to the action timeout. Zero matches then fails
//   with ElementNotFound; more than one match fails with AmbiguousMatch.
// - is_visible() never fails on a missing element, it reports false.
// - Multi-element reads (count, all_inner_texts) do not wait and return an
//   empty result on zero matches.
//
// See: https://playwright.dev/docs/api/class-locator

use crate::error::{Error, Result};
use crate::selector::Selector;
use crate::session::{SelectBy, SessionHandle};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Element states `Locator::wait_for` can wait on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState {
    /// At least one match is visible
    Visible,
    /// No match is visible (including no match at all)
    Hidden,
    /// At least one match exists
    Attached,
    /// No match exists
    Detached,
}

/// Lazy handle to the element(s) a selector matches.
#[derive(Clone)]
pub struct Locator {
    session: SessionHandle,
    selector: Selector,
}

impl Locator {
    /// Use `SessionHandle::locator` or `PageObject::locator` instead.
    pub(crate) fn new(session: SessionHandle, selector: Selector) -> Self {
        Self { session, selector }
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    fn derive(&self, selector: Selector) -> Locator {
        Locator::new(self.session.clone(), selector)
    }

    /// See: <https://playwright.dev/docs/api/class-locator#locator-first>
    pub fn first(&self) -> Locator {
        self.derive(self.selector.first())
    }

    /// See: <https://playwright.dev/docs/api/class-locator#locator-last>
    pub fn last(&self) -> Locator {
        self.derive(self.selector.last())
    }

    /// The nth (0-based) match.
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-nth>
    pub fn nth(&self, index: usize) -> Locator {
        self.derive(self.selector.nth(index))
    }

    /// Sub-locator searched within this locator's matches.
    pub fn locator(&self, inner: &Selector) -> Locator {
        self.derive(self.selector.within(inner))
    }

    /// Narrows to matches containing `text` (CSS selectors only).
    pub fn with_text(&self, text: &str) -> Locator {
        self.derive(self.selector.with_text(text))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Number of elements matching right now. Does not wait.
    pub async fn count(&self) -> Result<usize> {
        let rendered = self.selector.render()?;
        self.session
            .backend()
            .count(&rendered)
            .await
            .map_err(|e| self.wrap_error_with_selector(e))
    }

    /// True if any match is visible. Zero matches is `false`, never an error.
    pub async fn is_visible(&self) -> Result<bool> {
        let rendered = self.selector.render()?;
        let backend = self.session.backend();
        let count = backend
            .count(&rendered)
            .await
            .map_err(|e| self.wrap_error_with_selector(e))?;

        match count {
            0 => Ok(false),
            1 => backend
                .is_visible(&rendered)
                .await
                .map_err(|e| self.wrap_error_with_selector(e)),
            n => {
                for index in 0..n {
                    let nth = self.selector.nth(index).render()?;
                    if backend.is_visible(&nth).await? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Inner text of every match, in document order. Does not wait.
    pub async fn all_inner_texts(&self) -> Result<Vec<String>> {
        let count = self.count().await?;
        let mut texts = Vec::with_capacity(count);
        for index in 0..count {
            let nth = self.selector.nth(index).render()?;
            texts.push(self.session.backend().inner_text(&nth).await?);
        }
        Ok(texts)
    }

    /// See: <https://playwright.dev/docs/api/class-locator#locator-inner-text>
    pub async fn inner_text(&self) -> Result<String> {
        let selector = self.resolve_one("inner_text").await?;
        self.session
            .backend()
            .inner_text(&selector)
            .await
            .map_err(|e| self.wrap_error_with_selector(e))
    }

    /// See: <https://playwright.dev/docs/api/class-locator#locator-text-content>
    pub async fn text_content(&self) -> Result<Option<String>> {
        let selector = self.resolve_one("text_content").await?;
        self.session
            .backend()
            .text_content(&selector)
            .await
            .map_err(|e| self.wrap_error_with_selector(e))
    }

    pub async fn get_attribute(&self, name: &str) -> Result<Option<String>> {
        let selector = self.resolve_one("get_attribute").await?;
        self.session
            .backend()
            .get_attribute(&selector, name)
            .await
            .map_err(|e| self.wrap_error_with_selector(e))
    }

    pub async fn input_value(&self) -> Result<String> {
        let selector = self.resolve_one("input_value").await?;
        self.session
            .backend()
            .input_value(&selector)
            .await
            .map_err(|e| self.wrap_error_with_selector(e))
    }

    pub async fn is_checked(&self) -> Result<bool> {
        let selector = self.resolve_one("is_checked").await?;
        self.session
            .backend()
            .is_checked(&selector)
            .await
            .map_err(|e| self.wrap_error_with_selector(e))
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// See: <https://playwright.dev/docs/api/class-locator#locator-click>
    pub async fn click(&self) -> Result<()> {
        let selector = self.resolve_one("click").await?;
        tracing::debug!(selector = %selector, "click");
        self.session
            .backend()
            .click(&selector)
            .await
            .map_err(|e| self.wrap_error_with_selector(e))
    }

    /// Replaces the value of an input.
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-fill>
    pub async fn fill(&self, value: &str) -> Result<()> {
        let selector = self.resolve_one("fill").await?;
        tracing::debug!(selector = %selector, value, "fill");
        self.session
            .backend()
            .fill(&selector, value)
            .await
            .map_err(|e| self.wrap_error_with_selector(e))
    }

    /// Focuses the element and presses `key` (e.g. `"Enter"`).
    pub async fn press(&self, key: &str) -> Result<()> {
        let selector = self.resolve_one("press").await?;
        tracing::debug!(selector = %selector, key, "press");
        self.session
            .backend()
            .press(&selector, key)
            .await
            .map_err(|e| self.wrap_error_with_selector(e))
    }

    pub async fn hover(&self) -> Result<()> {
        let selector = self.resolve_one("hover").await?;
        self.session
            .backend()
            .hover(&selector)
            .await
            .map_err(|e| self.wrap_error_with_selector(e))
    }

    pub async fn check(&self) -> Result<()> {
        self.set_checked(true).await
    }

    pub async fn uncheck(&self) -> Result<()> {
        self.set_checked(false).await
    }

    pub async fn set_checked(&self, checked: bool) -> Result<()> {
        let selector = self.resolve_one("set_checked").await?;
        self.session
            .backend()
            .set_checked(&selector, checked)
            .await
            .map_err(|e| self.wrap_error_with_selector(e))
    }

    /// Selects an option of a `<select>` and returns the selected values.
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-select-option>
    pub async fn select_option(&self, option: impl Into<SelectBy>) -> Result<Vec<String>> {
        let option = option.into();
        let selector = self.resolve_one("select_option").await?;
        tracing::debug!(selector = %selector, option = ?option, "select_option");
        self.session
            .backend()
            .select_option(&selector, &option)
            .await
            .map_err(|e| self.wrap_error_with_selector(e))
    }

    // ========================================================================
    // Waiting
    // ========================================================================

    /// Waits until the matches reach `state`, or fails with `Error::Timeout`.
    pub async fn wait_for(&self, state: WaitState, timeout: Duration) -> Result<()> {
        let poll = self.session.timeouts().poll_interval;
        let deadline = Instant::now() + timeout;
        loop {
            let reached = match state {
                WaitState::Visible => self.is_visible().await?,
                WaitState::Hidden => !self.is_visible().await?,
                WaitState::Attached => self.count().await? > 0,
                WaitState::Detached => self.count().await? == 0,
            };
            if reached {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(Error::timeout(
                    format!("waiting for '{}' to be {state:?}", self.selector),
                    timeout,
                ));
            }
            tokio::time::sleep(poll).await;
        }
    }

    /// First visible element among the candidates, tried in priority order.
    ///
    /// Used where the storefront markup offers several possible containers
    /// (e.g. `.hero`, `.banner`, `header`) and a selector union would match
    /// more than one of them. A candidate matching one element is returned
    /// as is; one matching several is narrowed to its first visible match.
    pub async fn first_available(candidates: &[Locator], timeout: Duration) -> Result<Locator> {
        let Some(head) = candidates.first() else {
            return Err(Error::InvalidSelector("no candidate selectors".to_string()));
        };
        let poll = head.session.timeouts().poll_interval;
        let deadline = Instant::now() + timeout;
        loop {
            for candidate in candidates {
                match candidate.count().await? {
                    0 => {}
                    1 => {
                        if candidate.is_visible().await? {
                            return Ok(candidate.clone());
                        }
                    }
                    count => {
                        for index in 0..count {
                            let nth = candidate.nth(index);
                            if nth.is_visible().await? {
                                return Ok(nth);
                            }
                        }
                    }
                }
            }
            if Instant::now() >= deadline {
                let tried: Vec<String> = candidates.iter().map(|c| c.selector.to_string()).collect();
                return Err(Error::ElementNotFound {
                    selector: tried.join(" | "),
                });
            }
            tokio::time::sleep(poll).await;
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Polls until the selector matches exactly one element and returns the
    /// rendered selector. Failures carry `operation` as context.
    pub(crate) async fn resolve_one(&self, operation: &str) -> Result<String> {
        let rendered = self.selector.render()?;
        let timeouts = self.session.timeouts();
        let deadline = Instant::now() + timeouts.action;
        loop {
            let count = self
                .session
                .backend()
                .count(&rendered)
                .await
                .map_err(|e| self.wrap_error_with_selector(e))?;
            match count {
                1 => return Ok(rendered),
                0 if Instant::now() < deadline => tokio::time::sleep(timeouts.poll_interval).await,
                0 => {
                    return Err(Error::ElementNotFound { selector: rendered }.context(operation));
                }
                count => {
                    return Err(Error::AmbiguousMatch {
                        selector: rendered,
                        count,
                    }
                    .context(operation));
                }
            }
        }
    }

    /// One-shot strict read used by assertions: `Ok(None)` when nothing
    /// matches yet, `AmbiguousMatch` on several matches.
    pub(crate) async fn inner_text_now(&self) -> Result<Option<String>> {
        let rendered = self.selector.render()?;
        let backend = self.session.backend();
        match backend.count(&rendered).await? {
            0 => Ok(None),
            1 => Ok(Some(backend.inner_text(&rendered).await?)),
            count => Err(Error::AmbiguousMatch {
                selector: rendered,
                count,
            }),
        }
    }

    /// One-shot strict input value read, `Ok(None)` when nothing matches.
    pub(crate) async fn input_value_now(&self) -> Result<Option<String>> {
        let rendered = self.selector.render()?;
        let backend = self.session.backend();
        match backend.count(&rendered).await? {
            0 => Ok(None),
            1 => Ok(Some(backend.input_value(&rendered).await?)),
            count => Err(Error::AmbiguousMatch {
                selector: rendered,
                count,
            }),
        }
    }

    /// One-shot strict checked read, `Ok(None)` when nothing matches.
    pub(crate) async fn is_checked_now(&self) -> Result<Option<bool>> {
        let rendered = self.selector.render()?;
        let backend = self.session.backend();
        match backend.count(&rendered).await? {
            0 => Ok(None),
            1 => Ok(Some(backend.is_checked(&rendered).await?)),
            count => Err(Error::AmbiguousMatch {
                selector: rendered,
                count,
            }),
        }
    }

    /// Adds the selector to backend errors that do not already name it.
    fn wrap_error_with_selector(&self, error: Error) -> Error {
        match error {
            Error::Session(msg) => Error::Session(format!("{msg} [selector: {}]", self.selector)),
            Error::Timeout { operation, timeout } => Error::Timeout {
                operation: format!("{operation} [selector: {}]", self.selector),
                timeout,
            },
            other => other,
        }
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locator")
            .field("selector", &self.selector.to_string())
            .finish()
    }
}
