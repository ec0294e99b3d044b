// ProductDetail - Single product view

use crate::error::Result;
use crate::locator::Locator;
use crate::page::PageObject;
use crate::selector::Selector;
use crate::session::SessionHandle;

#[derive(Debug, Clone)]
pub struct ProductDetail {
    session: SessionHandle,
}

impl PageObject for ProductDetail {
    const NAME: &'static str = "product detail";

    fn from_session(session: SessionHandle) -> Self {
        Self { session }
    }

    fn session(&self) -> &SessionHandle {
        &self.session
    }
}

impl ProductDetail {
    pub fn title(&self) -> Locator {
        self.locator(Selector::css(".product-title"))
    }

    pub fn price(&self) -> Locator {
        self.locator(Selector::css(".product-price"))
    }

    pub fn add_to_cart_button(&self) -> Locator {
        self.locator(Selector::css("button").with_text("Add to Cart"))
    }

    pub fn reviews(&self) -> Locator {
        self.locator(Selector::css(".review, [data-testid=\"review\"]"))
    }

    pub async fn title_text(&self) -> Result<String> {
        Ok(self.title().inner_text().await?.trim().to_string())
    }

    pub async fn price_text(&self) -> Result<String> {
        Ok(self.price().inner_text().await?.trim().to_string())
    }

    pub async fn add_to_cart(&self) -> Result<()> {
        self.add_to_cart_button().click().await
    }

    /// Review texts; empty when the product has no reviews.
    pub async fn review_texts(&self) -> Result<Vec<String>> {
        Ok(super::trimmed(self.reviews().all_inner_texts().await?))
    }
}
