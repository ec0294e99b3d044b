// Playwright backend - `Session` over a real browser page
//
// Built only with the `playwright` feature. Every element action carries the
// configured action timeout; load-state waits poll the document because the
// page is already loaded by the time descriptors ask for a state.
//
// See: https://playwright.dev/docs/api/class-page

use crate::config::{BrowserKind, SuiteConfig};
use crate::error::{Error, Result};
use crate::session::{LoadState, SelectBy, Session, SessionHandle};
use async_trait::async_trait;
use playwright_rs::{
    Browser, CheckOptions, ClickOptions, FillOptions, GotoOptions, HoverOptions, LaunchOptions,
    Page, Playwright, PressOptions, ScreenshotOptions, SelectOption, SelectOptions, WaitUntil,
};
use std::time::Duration;
use tokio::time::Instant;

/// Network is considered idle after this long without new resource entries.
const NETWORK_QUIET: Duration = Duration::from_millis(500);

const LOAD_POLL: Duration = Duration::from_millis(100);

/// `Session` implementation driving one Playwright page.
pub struct PlaywrightSession {
    page: Page,
    action_timeout_ms: f64,
}

impl PlaywrightSession {
    pub fn new(page: Page, action_timeout: Duration) -> Self {
        Self {
            page,
            action_timeout_ms: action_timeout.as_millis() as f64,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    async fn locator(&self, selector: &str) -> playwright_rs::Locator {
        self.page.locator(selector).await
    }

    async fn ready_state(&self) -> Result<String> {
        Ok(self.page.evaluate_value("document.readyState").await?)
    }

    async fn resource_count(&self) -> Result<usize> {
        let raw = self
            .page
            .evaluate_value("String(performance.getEntriesByType('resource').length)")
            .await?;
        raw.trim()
            .parse()
            .map_err(|_| Error::Session(format!("unexpected resource count '{raw}'")))
    }
}

#[async_trait]
impl Session for PlaywrightSession {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<()> {
        let options = GotoOptions::new()
            .timeout(timeout)
            .wait_until(WaitUntil::DomContentLoaded);
        self.page.goto(url, Some(options)).await?;
        Ok(())
    }

    async fn url(&self) -> Result<String> {
        Ok(self.page.url())
    }

    async fn title(&self) -> Result<String> {
        Ok(self.page.title().await?)
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.locator(selector).await.count().await?)
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        Ok(self.locator(selector).await.is_visible().await?)
    }

    async fn inner_text(&self, selector: &str) -> Result<String> {
        Ok(self.locator(selector).await.inner_text().await?)
    }

    async fn text_content(&self, selector: &str) -> Result<Option<String>> {
        Ok(self.locator(selector).await.text_content().await?)
    }

    async fn get_attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        Ok(self.locator(selector).await.get_attribute(name).await?)
    }

    async fn input_value(&self, selector: &str) -> Result<String> {
        Ok(self.locator(selector).await.input_value(None).await?)
    }

    async fn is_checked(&self, selector: &str) -> Result<bool> {
        Ok(self.locator(selector).await.is_checked().await?)
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let options = ClickOptions::builder()
            .timeout(self.action_timeout_ms)
            .build();
        Ok(self.locator(selector).await.click(Some(options)).await?)
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        let options = FillOptions::builder()
            .timeout(self.action_timeout_ms)
            .build();
        Ok(self.locator(selector).await.fill(value, Some(options)).await?)
    }

    async fn press(&self, selector: &str, key: &str) -> Result<()> {
        let options = PressOptions::builder()
            .timeout(self.action_timeout_ms)
            .build();
        Ok(self.locator(selector).await.press(key, Some(options)).await?)
    }

    async fn hover(&self, selector: &str) -> Result<()> {
        let options = HoverOptions::builder()
            .timeout(self.action_timeout_ms)
            .build();
        Ok(self.locator(selector).await.hover(Some(options)).await?)
    }

    async fn set_checked(&self, selector: &str, checked: bool) -> Result<()> {
        let options = CheckOptions::builder()
            .timeout(self.action_timeout_ms)
            .build();
        Ok(self
            .locator(selector)
            .await
            .set_checked(checked, Some(options))
            .await?)
    }

    async fn select_option(&self, selector: &str, option: &SelectBy) -> Result<Vec<String>> {
        let option = match option {
            SelectBy::Value(value) => SelectOption::Value(value.clone()),
            SelectBy::Label(label) => SelectOption::Label(label.clone()),
            SelectBy::Index(index) => SelectOption::Index(*index),
        };
        let options = SelectOptions::builder()
            .timeout(self.action_timeout_ms)
            .build();
        Ok(self
            .locator(selector)
            .await
            .select_option(option, Some(options))
            .await?)
    }

    async fn keyboard_press(&self, key: &str) -> Result<()> {
        Ok(self.page.keyboard().press(key, None).await?)
    }

    async fn wait_for_load_state(&self, state: LoadState, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let mut resources = None;
        let mut quiet_since = Instant::now();

        loop {
            let ready = self.ready_state().await?;
            let reached = match state {
                LoadState::DomContentLoaded => ready == "interactive" || ready == "complete",
                LoadState::Load => ready == "complete",
                LoadState::NetworkIdle => {
                    let count = self.resource_count().await?;
                    if resources != Some(count) {
                        resources = Some(count);
                        quiet_since = Instant::now();
                    }
                    ready == "complete" && quiet_since.elapsed() >= NETWORK_QUIET
                }
            };
            if reached {
                tracing::debug!(%state, "Load state reached");
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(Error::timeout(format!("waiting for {state}"), timeout));
            }
            tokio::time::sleep(LOAD_POLL).await;
        }
    }

    async fn screenshot(&self, full_page: bool) -> Result<Vec<u8>> {
        let options = ScreenshotOptions::builder().full_page(full_page).build();
        Ok(self.page.screenshot(Some(options)).await?)
    }
}

/// A launched browser with one page, owned by a single scenario.
pub struct BrowserSession {
    playwright: Playwright,
    browser: Browser,
    session: SessionHandle,
}

impl BrowserSession {
    /// Launches Playwright, the configured browser and a fresh page.
    pub async fn launch(config: &SuiteConfig) -> Result<Self> {
        tracing::info!(browser = %config.browser, headless = config.headless, "Launching browser");
        let playwright = Playwright::launch()
            .await
            .map_err(|e| Error::from(e).context("launching Playwright"))?;

        let browser_type = match config.browser {
            BrowserKind::Chromium => playwright.chromium(),
            BrowserKind::Firefox => playwright.firefox(),
            BrowserKind::Webkit => playwright.webkit(),
        };
        let browser = browser_type
            .launch_with_options(LaunchOptions::new().headless(config.headless))
            .await
            .map_err(|e| Error::from(e).context(format!("launching {}", config.browser)))?;
        let page = browser.new_page().await?;

        let backend = PlaywrightSession::new(page, config.timeouts.action);
        Ok(Self {
            playwright,
            browser,
            session: SessionHandle::new(backend, config.clone()),
        })
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Closes the browser and stops the Playwright driver.
    pub async fn close(self) -> Result<()> {
        self.browser.close().await?;
        self.playwright.shutdown().await?;
        Ok(())
    }
}
