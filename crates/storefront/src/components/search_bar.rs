// SearchBar - Product search input

use crate::components::product_grid::CARDS;
use crate::error::Result;
use crate::locator::Locator;
use crate::page::PageObject;
use crate::selector::Selector;
use crate::session::SessionHandle;

#[derive(Debug, Clone)]
pub struct SearchBar {
    session: SessionHandle,
}

impl PageObject for SearchBar {
    const NAME: &'static str = "search bar";

    fn from_session(session: SessionHandle) -> Self {
        Self { session }
    }

    fn session(&self) -> &SessionHandle {
        &self.session
    }
}

impl SearchBar {
    pub fn input(&self) -> Locator {
        self.locator(Selector::css("input[placeholder=\"Search\"]"))
    }

    /// Result cards containing `term`.
    pub fn results_with_text(&self, term: &str) -> Locator {
        self.locator(Selector::css(CARDS).with_text(term))
    }

    /// Types `term` and submits it with Enter. There is no submit button.
    pub async fn search(&self, term: &str) -> Result<()> {
        tracing::debug!(term, "Searching");
        let input = self.input();
        input.fill(term).await?;
        input.press("Enter").await
    }

    pub async fn is_result_visible(&self, term: &str) -> Result<bool> {
        self.results_with_text(term).is_visible().await
    }

    pub async fn current_term(&self) -> Result<String> {
        self.input().input_value().await
    }
}
