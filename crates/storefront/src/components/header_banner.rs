// HeaderBanner - Hero banner with the primary call to action

use crate::error::Result;
use crate::locator::Locator;
use crate::page::PageObject;
use crate::selector::Selector;
use crate::session::SessionHandle;

/// Banner containers, most specific first.
const BANNERS: [&str; 3] = [".hero", ".banner", "header"];

const CTA_TEXT: &str = "Shop Now";

#[derive(Debug, Clone)]
pub struct HeaderBanner {
    session: SessionHandle,
}

impl PageObject for HeaderBanner {
    const NAME: &'static str = "header banner";

    fn from_session(session: SessionHandle) -> Self {
        Self { session }
    }

    fn session(&self) -> &SessionHandle {
        &self.session
    }
}

impl HeaderBanner {
    /// Candidate banner containers in priority order.
    pub fn banner_candidates(&self) -> Vec<Locator> {
        BANNERS
            .iter()
            .map(|css| self.locator(Selector::css(*css)))
            .collect()
    }

    /// The "Shop Now" control inside `banner`.
    pub fn cta_in(&self, banner: &Locator) -> Locator {
        banner.locator(&Selector::text_containing(CTA_TEXT))
    }

    /// Resolves the first banner container present on the page.
    pub async fn banner(&self) -> Result<Locator> {
        Locator::first_available(&self.banner_candidates(), self.session.timeouts().action).await
    }

    /// The "Shop Now" control of the resolved banner. Other "Shop Now"
    /// links on the page are ignored.
    pub async fn cta(&self) -> Result<Locator> {
        Ok(self.cta_in(&self.banner().await?))
    }

    pub async fn banner_text(&self) -> Result<String> {
        Ok(self.banner().await?.inner_text().await?.trim().to_string())
    }

    /// Clicks the call to action and waits for the page it leads to.
    pub async fn click_cta(&self) -> Result<()> {
        self.cta().await?.click().await?;
        self.session.wait_for_page_load().await
    }
}
