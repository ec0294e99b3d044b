// Cart - Cart overview with line items and total

use crate::error::Result;
use crate::locator::Locator;
use crate::page::PageObject;
use crate::selector::Selector;
use crate::session::SessionHandle;

/// Remove controls tried for a line item, highest priority first.
///
/// The storefront gives no single contract for this control. The order is a
/// heuristic: an explicitly labelled control, then a `.remove` class, then
/// any button in the row.
const REMOVE_CONTROLS: [&str; 3] = ["[aria-label=\"Remove\"]", ".remove", "button"];

#[derive(Debug, Clone)]
pub struct Cart {
    session: SessionHandle,
}

impl PageObject for Cart {
    const NAME: &'static str = "cart";

    fn from_session(session: SessionHandle) -> Self {
        Self { session }
    }

    fn session(&self) -> &SessionHandle {
        &self.session
    }
}

impl Cart {
    pub fn items(&self) -> Locator {
        self.locator(Selector::css(".cart-item"))
    }

    pub fn item(&self, index: usize) -> Locator {
        self.items().nth(index)
    }

    pub fn quantity_input(&self, index: usize) -> Locator {
        self.item(index)
            .locator(&Selector::css("input[type=\"number\"]"))
    }

    /// Remove-control candidates for the item at `index`, in priority order.
    pub fn remove_controls(&self, index: usize) -> Vec<Locator> {
        REMOVE_CONTROLS
            .iter()
            .map(|css| self.item(index).locator(&Selector::css(*css)))
            .collect()
    }

    pub fn total(&self) -> Locator {
        self.locator(Selector::css(".cart-total"))
    }

    pub fn checkout_button(&self) -> Locator {
        self.locator(Selector::css("button, a").with_text("Checkout"))
    }

    /// Raw text of every line item.
    pub async fn item_texts(&self) -> Result<Vec<String>> {
        Ok(super::trimmed(self.items().all_inner_texts().await?))
    }

    pub async fn item_count(&self) -> Result<usize> {
        self.items().count().await
    }

    /// Writes `quantity` into the item's quantity field.
    pub async fn update_quantity(&self, index: usize, quantity: u32) -> Result<()> {
        tracing::debug!(index, quantity, "Updating cart quantity");
        self.quantity_input(index).fill(&quantity.to_string()).await
    }

    /// Clicks the first remove control found for the item at `index`.
    pub async fn remove_item(&self, index: usize) -> Result<()> {
        let candidates = self.remove_controls(index);
        let control = Locator::first_available(&candidates, self.session.timeouts().action).await?;
        tracing::debug!(index, control = %control.selector(), "Removing cart item");
        control.click().await
    }

    pub async fn total_text(&self) -> Result<String> {
        Ok(self.total().inner_text().await?.trim().to_string())
    }

    pub async fn proceed_to_checkout(&self) -> Result<()> {
        self.checkout_button().click().await?;
        self.session.wait_for_page_load().await
    }
}
