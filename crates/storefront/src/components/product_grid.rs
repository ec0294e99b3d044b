// ProductGrid - Product listing cards

use crate::components::filter_sort::{Category, FilterSortPanel};
use crate::error::Result;
use crate::locator::Locator;
use crate::page::PageObject;
use crate::selector::Selector;
use crate::session::SessionHandle;
use serde::{Deserialize, Serialize};

pub(crate) const CARDS: &str = ".product-card, [data-testid=\"product-card\"]";

/// Name and price shown on one product card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub name: String,
    pub price: String,
}

/// Grid of product cards. Card indices are 0-based; an index past the last
/// card fails the operation with `ElementNotFound`.
#[derive(Debug, Clone)]
pub struct ProductGrid {
    session: SessionHandle,
}

impl PageObject for ProductGrid {
    const NAME: &'static str = "product grid";

    fn from_session(session: SessionHandle) -> Self {
        Self { session }
    }

    fn session(&self) -> &SessionHandle {
        &self.session
    }
}

impl ProductGrid {
    pub fn cards(&self) -> Locator {
        self.locator(Selector::css(CARDS))
    }

    pub fn card(&self, index: usize) -> Locator {
        self.cards().nth(index)
    }

    pub fn card_title(&self, index: usize) -> Locator {
        self.card(index).locator(&Selector::css(".product-title"))
    }

    pub fn card_price(&self, index: usize) -> Locator {
        self.card(index).locator(&Selector::css(".product-price"))
    }

    pub fn add_to_cart_button(&self, index: usize) -> Locator {
        self.card(index)
            .locator(&Selector::css("button").with_text("Add to Cart"))
    }

    /// Cards containing `text` anywhere (case-insensitive).
    pub fn cards_with_text(&self, text: &str) -> Locator {
        self.cards().with_text(text)
    }

    pub async fn card_count(&self) -> Result<usize> {
        self.cards().count().await
    }

    /// Inner text of every card, in grid order.
    pub async fn card_texts(&self) -> Result<Vec<String>> {
        Ok(super::trimmed(self.cards().all_inner_texts().await?))
    }

    pub async fn product_info(&self, index: usize) -> Result<ProductInfo> {
        let name = self.card_title(index).inner_text().await?;
        let price = self.card_price(index).inner_text().await?;
        Ok(ProductInfo {
            name: name.trim().to_string(),
            price: price.trim().to_string(),
        })
    }

    pub async fn add_to_cart(&self, index: usize) -> Result<()> {
        tracing::debug!(index, "Adding product to cart");
        self.add_to_cart_button(index).click().await
    }

    /// Opens the detail view of the card at `index`.
    pub async fn open_product(&self, index: usize) -> Result<()> {
        self.card(index).click().await?;
        self.session.wait_for_page_load().await
    }

    pub async fn filter_by_category(&self, category: Category) -> Result<()> {
        self.session
            .page::<FilterSortPanel>()
            .filter_by_category(category)
            .await
    }

    pub async fn sort_by(&self, label: &str) -> Result<()> {
        self.session.page::<FilterSortPanel>().sort_by(label).await
    }
}
