// Modal - Add-to-cart confirmation popup
//
// Two states: hidden and visible. Add-to-cart shows it; "Continue Shopping"
// or navigating away hides it.

use crate::error::Result;
use crate::locator::{Locator, WaitState};
use crate::page::PageObject;
use crate::selector::Selector;
use crate::session::SessionHandle;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Modal {
    session: SessionHandle,
}

impl PageObject for Modal {
    const NAME: &'static str = "modal";

    fn from_session(session: SessionHandle) -> Self {
        Self { session }
    }

    fn session(&self) -> &SessionHandle {
        &self.session
    }
}

impl Modal {
    /// Every dialog-like element. May match a `.modal` and its inner dialog.
    pub fn root(&self) -> Locator {
        self.locator(Selector::css(".modal, [role=\"dialog\"]"))
    }

    /// Outermost dialog element.
    pub fn dialog(&self) -> Locator {
        self.root().first()
    }

    pub fn continue_button(&self) -> Locator {
        self.dialog()
            .locator(&Selector::css("button").with_text("Continue Shopping"))
    }

    pub fn view_cart_control(&self) -> Locator {
        self.dialog()
            .locator(&Selector::css("button, a").with_text("View Cart"))
    }

    /// False when no dialog is present.
    pub async fn is_visible(&self) -> Result<bool> {
        self.root().is_visible().await
    }

    /// Text shown in the dialog (typically the product just added).
    pub async fn content(&self) -> Result<String> {
        Ok(self.dialog().inner_text().await?.trim().to_string())
    }

    pub async fn continue_shopping(&self) -> Result<()> {
        self.continue_button().click().await?;
        self.wait_until_hidden(self.session.timeouts().medium).await
    }

    pub async fn view_cart(&self) -> Result<()> {
        self.view_cart_control().click().await?;
        self.session.wait_for_page_load().await
    }

    pub async fn wait_until_visible(&self, timeout: Duration) -> Result<()> {
        self.root().wait_for(WaitState::Visible, timeout).await
    }

    pub async fn wait_until_hidden(&self, timeout: Duration) -> Result<()> {
        self.root().wait_for(WaitState::Hidden, timeout).await
    }
}
