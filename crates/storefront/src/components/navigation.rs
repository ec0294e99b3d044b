// NavigationBar - Top-level site navigation

use crate::error::Result;
use crate::locator::Locator;
use crate::page::PageObject;
use crate::selector::Selector;
use crate::session::SessionHandle;

/// The `<nav>` bar with the site's main links.
///
/// The active link is whichever element inside the bar carries the `active`
/// class or `aria-current="page"`. Exactly one such element is assumed;
/// reading it fails with `ElementNotFound` on zero and `AmbiguousMatch` on
/// several. Whether the storefront marks a link on first load is not
/// confirmed.
#[derive(Debug, Clone)]
pub struct NavigationBar {
    session: SessionHandle,
}

impl PageObject for NavigationBar {
    const NAME: &'static str = "navigation bar";

    fn from_session(session: SessionHandle) -> Self {
        Self { session }
    }

    fn session(&self) -> &SessionHandle {
        &self.session
    }
}

impl NavigationBar {
    pub fn root(&self) -> Locator {
        self.locator(Selector::css("nav"))
    }

    /// Link whose text contains `name` (case-sensitive).
    pub fn link(&self, name: &str) -> Locator {
        self.root().locator(&Selector::text_containing(name))
    }

    pub fn links(&self) -> Locator {
        self.root().locator(&Selector::css("a"))
    }

    pub fn active_link(&self) -> Locator {
        self.root()
            .locator(&Selector::css(".active, [aria-current=\"page\"]"))
    }

    /// Clicks the link named `name` and waits for the next page to load.
    pub async fn goto(&self, name: &str) -> Result<()> {
        tracing::debug!(link = name, "Navigating via nav bar");
        self.link(name).click().await?;
        self.session.wait_for_page_load().await
    }

    pub async fn is_link_visible(&self, name: &str) -> Result<bool> {
        self.link(name).is_visible().await
    }

    pub async fn active_link_label(&self) -> Result<String> {
        Ok(self.active_link().inner_text().await?.trim().to_string())
    }

    /// Labels of every link in the bar, in document order.
    pub async fn link_labels(&self) -> Result<Vec<String>> {
        Ok(super::trimmed(self.links().all_inner_texts().await?))
    }
}
