// Session - Browser session capability and the handle page objects hold
//
// The browser engine is an external collaborator. `Session` is the narrow
// surface page objects need from it: navigation, selector-based queries and
// actions, load-state waits and screenshots. Selectors arrive already
// rendered (see `Selector::render`); strictness and auto-waiting live in
// `Locator`, not in the backend.
//
// `SessionHandle` is what every descriptor stores. It pairs the backend with
// the suite configuration and carries the BasePage helpers (open a path,
// wait for the page to settle, capture screenshots).

use crate::config::{SuiteConfig, Timeouts};
use crate::error::Result;
use crate::locator::Locator;
use crate::page::PageObject;
use crate::selector::Selector;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Document lifecycle states a session can wait for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadState {
    /// `DOMContentLoaded` fired
    DomContentLoaded,
    /// `load` fired
    Load,
    /// No network activity for at least 500ms
    NetworkIdle,
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoadState::DomContentLoaded => "domcontentloaded",
            LoadState::Load => "load",
            LoadState::NetworkIdle => "networkidle",
        })
    }
}

/// How `select_option` picks an `<option>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectBy {
    Value(String),
    Label(String),
    Index(usize),
}

/// Browser session capability.
///
/// Every method takes a selector rendered by `Selector::render`. Single
/// element methods may assume the selector matches exactly one element.
#[async_trait]
pub trait Session: Send + Sync {
    /// Navigates to an absolute URL.
    async fn goto(&self, url: &str, timeout: Duration) -> Result<()>;

    /// Current document URL.
    async fn url(&self) -> Result<String>;

    /// Current document title.
    async fn title(&self) -> Result<String>;

    /// Number of elements matching the selector right now.
    async fn count(&self, selector: &str) -> Result<usize>;

    /// Whether the element is visible. Absent elements are not visible.
    async fn is_visible(&self, selector: &str) -> Result<bool>;

    async fn inner_text(&self, selector: &str) -> Result<String>;

    async fn text_content(&self, selector: &str) -> Result<Option<String>>;

    async fn get_attribute(&self, selector: &str, name: &str) -> Result<Option<String>>;

    async fn input_value(&self, selector: &str) -> Result<String>;

    async fn is_checked(&self, selector: &str) -> Result<bool>;

    async fn click(&self, selector: &str) -> Result<()>;

    async fn fill(&self, selector: &str, value: &str) -> Result<()>;

    /// Presses a key with the element focused.
    async fn press(&self, selector: &str, key: &str) -> Result<()>;

    async fn hover(&self, selector: &str) -> Result<()>;

    async fn set_checked(&self, selector: &str, checked: bool) -> Result<()>;

    /// Returns the values of the options that ended up selected.
    async fn select_option(&self, selector: &str, option: &SelectBy) -> Result<Vec<String>>;

    /// Presses a key on the page keyboard, wherever focus is.
    async fn keyboard_press(&self, key: &str) -> Result<()>;

    /// Waits until the document reaches `state`, or fails with `Error::Timeout`.
    async fn wait_for_load_state(&self, state: LoadState, timeout: Duration) -> Result<()>;

    /// PNG bytes of the current viewport (or the full page).
    async fn screenshot(&self, full_page: bool) -> Result<Vec<u8>>;
}

/// Shared handle to one scenario's browser session.
///
/// Cloning is cheap. Handles must not be shared across scenarios.
#[derive(Clone)]
pub struct SessionHandle {
    backend: Arc<dyn Session>,
    config: Arc<SuiteConfig>,
}

impl SessionHandle {
    /// Wraps a backend with the given configuration.
    pub fn new(backend: impl Session + 'static, config: SuiteConfig) -> Self {
        Self::from_arc(Arc::new(backend), Arc::new(config))
    }

    /// Wraps an already shared backend.
    pub fn from_arc(backend: Arc<dyn Session>, config: Arc<SuiteConfig>) -> Self {
        Self { backend, config }
    }

    /// The underlying browser session.
    pub fn backend(&self) -> &dyn Session {
        self.backend.as_ref()
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    pub fn timeouts(&self) -> &Timeouts {
        &self.config.timeouts
    }

    /// Creates a lazy locator. No I/O happens until an operation runs.
    pub fn locator(&self, selector: Selector) -> Locator {
        Locator::new(self.clone(), selector)
    }

    /// Builds a page object bound to this session.
    pub fn page<P: PageObject>(&self) -> P {
        tracing::trace!(page = P::NAME, "Binding page object");
        P::from_session(self.clone())
    }

    /// Resolves a fixture path (e.g. `/cart`) against the configured base URL.
    pub fn resolve_url(&self, path: &str) -> Result<url::Url> {
        let relative = path.trim_start_matches('/');
        Ok(self.config.base_url.join(relative)?)
    }

    /// Navigates to an absolute URL without waiting for the page to settle.
    pub async fn goto(&self, url: &str) -> Result<()> {
        tracing::debug!(url, "goto");
        self.backend
            .goto(url, self.timeouts().very_long)
            .await
            .map_err(|e| e.context(format!("navigating to '{url}'")))
    }

    /// Navigates to `path` under the base URL and waits for the page load.
    pub async fn open(&self, path: &str) -> Result<()> {
        let url = self.resolve_url(path)?;
        self.goto(url.as_str()).await?;
        self.wait_for_page_load().await
    }

    pub async fn url(&self) -> Result<String> {
        self.backend.url().await
    }

    pub async fn title(&self) -> Result<String> {
        self.backend.title().await
    }

    /// Waits for DOM ready, then for network idle.
    ///
    /// DOM ready is required and its timeout propagates. A network-idle
    /// timeout is logged and the page is used as soon as the DOM is ready.
    pub async fn wait_for_page_load(&self) -> Result<()> {
        let timeouts = self.timeouts();
        self.backend
            .wait_for_load_state(LoadState::DomContentLoaded, timeouts.dom_ready)
            .await?;

        match self
            .backend
            .wait_for_load_state(LoadState::NetworkIdle, timeouts.network_idle)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if e.is_timeout() => {
                tracing::warn!(
                    timeout = ?timeouts.network_idle,
                    "Network idle timeout, continuing with DOM ready state"
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Presses a key on the page keyboard.
    pub async fn press_key(&self, key: &str) -> Result<()> {
        self.backend.keyboard_press(key).await
    }

    /// Sleeps for a fixed time. Prefer waiting on a locator state.
    pub async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// Saves a full-page screenshot as `<screenshot_dir>/<name>.png`.
    pub async fn take_screenshot(&self, name: &str) -> Result<PathBuf> {
        let path = self
            .config
            .screenshot_dir
            .join(format!("{}.png", sanitize_file_stem(name)));
        self.write_screenshot(path).await
    }

    /// Saves a timestamped screenshot for a failed scenario.
    ///
    /// The file is `<screenshot_dir>/<name>-<YYYY-MM-DDTHH-MM-SS-mmmZ>.png`.
    pub async fn capture_failure(&self, name: &str) -> Result<PathBuf> {
        let stamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S-%3fZ");
        let path = self
            .config
            .screenshot_dir
            .join(format!("{}-{stamp}.png", sanitize_file_stem(name)));
        self.write_screenshot(path).await
    }

    async fn write_screenshot(&self, path: PathBuf) -> Result<PathBuf> {
        let bytes = self.backend.screenshot(true).await?;
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&path, &bytes).await?;
        tracing::info!(path = %path.display(), "Saved screenshot");
        Ok(path)
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("base_url", &self.config.base_url.as_str())
            .finish_non_exhaustive()
    }
}

fn sanitize_file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "screenshot".to_string()
    } else {
        stem
    }
}

impl From<&str> for SelectBy {
    fn from(value: &str) -> Self {
        SelectBy::Value(value.to_string())
    }
}
