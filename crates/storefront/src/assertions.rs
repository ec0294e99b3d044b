// Assertions - Auto-retry expectations over locators and pages
//
// expect(locator) and expect_page(session) poll the live document until the
// expectation holds or the assertion timeout elapses, then fail with
// Error::AssertionFailed naming the selector and the last observed value.
//
// Text expectations are strict: a selector matching several elements fails
// immediately with AmbiguousMatch rather than retrying.
//
// See: https://playwright.dev/docs/test-assertions

use crate::error::{Error, Result};
use crate::locator::Locator;
use crate::session::SessionHandle;
use regex::Regex;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Creates an auto-retrying expectation for a locator.
///
/// The timeout defaults to the suite's assertion timeout.
///
/// # Example
///
/// ```ignore
/// use storefront_pom::{expect, Selector};
///
/// let modal = session.locator(Selector::css(".modal"));
/// expect(modal.clone()).to_be_visible().await?;
/// expect(modal).to_contain_text("Added to cart").await?;
/// ```
///
/// See: <https://playwright.dev/docs/test-assertions>
pub fn expect(locator: Locator) -> Expectation {
    Expectation::new(locator)
}

/// Creates an auto-retrying expectation for the current page.
pub fn expect_page(session: &SessionHandle) -> PageExpectation {
    PageExpectation::new(session.clone())
}

/// Text or URL pattern used by page expectations.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Shell-style glob, e.g. `*products*`. `*` also matches `/`.
    Glob(glob::Pattern),
    Regex(Regex),
    Contains(String),
    Exact(String),
}

impl Pattern {
    pub fn glob(pattern: &str) -> Result<Self> {
        glob::Pattern::new(pattern)
            .map(Pattern::Glob)
            .map_err(|e| Error::InvalidSelector(format!("invalid glob '{pattern}': {e}")))
    }

    pub fn regex(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Pattern::Regex)
            .map_err(|e| Error::InvalidSelector(format!("invalid regex '{pattern}': {e}")))
    }

    pub fn contains(text: impl Into<String>) -> Self {
        Pattern::Contains(text.into())
    }

    pub fn exact(text: impl Into<String>) -> Self {
        Pattern::Exact(text.into())
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Pattern::Glob(glob) => glob.matches(value),
            Pattern::Regex(regex) => regex.is_match(value),
            Pattern::Contains(text) => value.contains(text.as_str()),
            Pattern::Exact(text) => value == text,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Glob(glob) => write!(f, "glob '{}'", glob.as_str()),
            Pattern::Regex(regex) => write!(f, "regex /{}/", regex.as_str()),
            Pattern::Contains(text) => write!(f, "substring '{text}'"),
            Pattern::Exact(text) => write!(f, "'{text}'"),
        }
    }
}

enum Check {
    Visible,
    Text(String),
    ContainsText(String),
    AllContainText(String),
    TextMatching(Regex),
    Count(usize),
    Value(String),
    Checked,
}

impl Check {
    fn describe(&self) -> String {
        match self {
            Check::Visible => "be visible".to_string(),
            Check::Text(text) => format!("have text '{text}'"),
            Check::ContainsText(text) => format!("contain text '{text}'"),
            Check::AllContainText(text) => format!("all contain text '{text}'"),
            Check::TextMatching(regex) => format!("have text matching /{}/", regex.as_str()),
            Check::Count(count) => format!("have count {count}"),
            Check::Value(value) => format!("have value '{value}'"),
            Check::Checked => "be checked".to_string(),
        }
    }
}

/// Expectation over a locator, with auto-retry.
pub struct Expectation {
    locator: Locator,
    timeout: Duration,
    poll_interval: Duration,
    negate: bool,
}

#[allow(clippy::wrong_self_convention)]
impl Expectation {
    pub(crate) fn new(locator: Locator) -> Self {
        let timeouts = locator.session().timeouts();
        Self {
            timeout: timeouts.assertion,
            poll_interval: timeouts.poll_interval,
            locator,
            negate: false,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Negates the expectation.
    #[allow(clippy::should_implement_trait)]
    pub fn not(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-be-visible>
    pub async fn to_be_visible(self) -> Result<()> {
        self.run(Check::Visible).await
    }

    /// Passes when no match is visible, including when nothing matches.
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-be-hidden>
    pub async fn to_be_hidden(self) -> Result<()> {
        self.not().run(Check::Visible).await
    }

    /// Exact match against the trimmed inner text.
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-have-text>
    pub async fn to_have_text(self, expected: &str) -> Result<()> {
        self.run(Check::Text(expected.trim().to_string())).await
    }

    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-contain-text>
    pub async fn to_contain_text(self, expected: &str) -> Result<()> {
        self.run(Check::ContainsText(expected.to_string())).await
    }

    /// Every match contains `expected`, and there is at least one match.
    ///
    /// Unlike the single-element text expectations this one is not strict:
    /// it is meant for lists such as product cards after a filter.
    pub async fn to_all_contain_text(self, expected: &str) -> Result<()> {
        self.run(Check::AllContainText(expected.to_string())).await
    }

    pub async fn to_have_text_regex(self, pattern: &str) -> Result<()> {
        let regex = Regex::new(pattern)
            .map_err(|e| Error::InvalidSelector(format!("invalid regex '{pattern}': {e}")))?;
        self.run(Check::TextMatching(regex)).await
    }

    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-have-count>
    pub async fn to_have_count(self, expected: usize) -> Result<()> {
        self.run(Check::Count(expected)).await
    }

    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-have-value>
    pub async fn to_have_value(self, expected: &str) -> Result<()> {
        self.run(Check::Value(expected.to_string())).await
    }

    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-be-checked>
    pub async fn to_be_checked(self) -> Result<()> {
        self.run(Check::Checked).await
    }

    async fn run(self, check: Check) -> Result<()> {
        let deadline = Instant::now() + self.timeout;
        loop {
            let (holds, observed) = self.observe(&check).await?;
            if holds != self.negate {
                return Ok(());
            }
            if Instant::now() >= deadline {
                let message = format!(
                    "Expected element '{}' {}to {}, but got {} after {:?}",
                    self.locator.selector(),
                    if self.negate { "NOT " } else { "" },
                    check.describe(),
                    observed,
                    self.timeout
                );
                return Err(Error::AssertionFailed(message));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Whether `check` holds right now, and what was observed.
    async fn observe(&self, check: &Check) -> Result<(bool, String)> {
        let locator = &self.locator;
        Ok(match check {
            Check::Visible => {
                let visible = locator.is_visible().await?;
                let observed = if visible { "visible" } else { "not visible" };
                (visible, observed.to_string())
            }
            Check::Text(expected) => match locator.inner_text_now().await? {
                Some(text) => (text.trim() == expected, format!("'{}'", text.trim())),
                None => (false, "no matching element".to_string()),
            },
            Check::ContainsText(expected) => match locator.inner_text_now().await? {
                Some(text) => (text.contains(expected.as_str()), format!("'{}'", text.trim())),
                None => (false, "no matching element".to_string()),
            },
            Check::AllContainText(expected) => match locator.all_inner_texts().await {
                Ok(texts) => {
                    let holds = !texts.is_empty()
                        && texts.iter().all(|text| text.contains(expected.as_str()));
                    let observed: Vec<&str> = texts.iter().map(|text| text.trim()).collect();
                    (holds, format!("{observed:?}"))
                }
                // The list shrank between counting and reading.
                Err(Error::ElementNotFound { .. }) => {
                    (false, "a list being re-rendered".to_string())
                }
                Err(e) => return Err(e),
            },
            Check::TextMatching(regex) => match locator.inner_text_now().await? {
                Some(text) => (regex.is_match(&text), format!("'{}'", text.trim())),
                None => (false, "no matching element".to_string()),
            },
            Check::Count(expected) => {
                let count = locator.count().await?;
                (count == *expected, format!("count {count}"))
            }
            Check::Value(expected) => match locator.input_value_now().await? {
                Some(value) => (&value == expected, format!("'{value}'")),
                None => (false, "no matching element".to_string()),
            },
            Check::Checked => match locator.is_checked_now().await? {
                Some(checked) => {
                    let observed = if checked { "checked" } else { "unchecked" };
                    (checked, observed.to_string())
                }
                None => (false, "no matching element".to_string()),
            },
        })
    }
}

/// Expectation over the current page URL or title, with auto-retry.
pub struct PageExpectation {
    session: SessionHandle,
    timeout: Duration,
    poll_interval: Duration,
    negate: bool,
}

#[allow(clippy::wrong_self_convention)]
impl PageExpectation {
    fn new(session: SessionHandle) -> Self {
        let timeouts = session.timeouts();
        Self {
            timeout: timeouts.assertion,
            poll_interval: timeouts.poll_interval,
            session,
            negate: false,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    /// See: <https://playwright.dev/docs/test-assertions#page-assertions-to-have-url>
    pub async fn to_have_url(self, pattern: &Pattern) -> Result<()> {
        let session = self.session.clone();
        self.run("URL", pattern, || session.url()).await
    }

    /// See: <https://playwright.dev/docs/test-assertions#page-assertions-to-have-title>
    pub async fn to_have_title(self, pattern: &Pattern) -> Result<()> {
        let session = self.session.clone();
        self.run("title", pattern, || session.title()).await
    }

    async fn run<F, Fut>(self, what: &str, pattern: &Pattern, read: F) -> Result<()>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<String>>,
    {
        let deadline = Instant::now() + self.timeout;
        loop {
            let actual = read().await?;
            if pattern.matches(&actual) != self.negate {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(Error::AssertionFailed(format!(
                    "Expected page {what} {}to match {pattern}, but got '{actual}' after {:?}",
                    if self.negate { "NOT " } else { "" },
                    self.timeout
                )));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
