// Footer - Quick links, contact block, legal links

use crate::error::Result;
use crate::locator::Locator;
use crate::page::PageObject;
use crate::selector::Selector;
use crate::session::SessionHandle;
use regex::Regex;
use std::sync::LazyLock;

/// House number followed by a street name ending in "St", e.g. "123 Shopping St".
const STREET_PATTERN: &str = r"\d{1,5} [A-Z][A-Za-z ]*? St\b\.?";

const LEGAL_PATTERN: &str = "Privacy Policy|Terms of Service|Shipping Info";

static STREET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(STREET_PATTERN).expect("street pattern should compile"));

#[derive(Debug, Clone)]
pub struct Footer {
    session: SessionHandle,
}

impl PageObject for Footer {
    const NAME: &'static str = "footer";

    fn from_session(session: SessionHandle) -> Self {
        Self { session }
    }

    fn session(&self) -> &SessionHandle {
        &self.session
    }
}

impl Footer {
    pub fn root(&self) -> Locator {
        self.locator(Selector::css("footer"))
    }

    pub fn quick_links(&self) -> Locator {
        self.root().locator(&Selector::css("a"))
    }

    /// Smallest footer element whose text looks like a street address.
    pub fn contact_info(&self) -> Locator {
        self.root()
            .locator(&Selector::text_matching(STREET_PATTERN))
            .first()
    }

    pub fn legal_links(&self) -> Locator {
        self.root()
            .locator(&Selector::css("a").with_text_matching(LEGAL_PATTERN))
    }

    /// Labels of every footer link, in document order.
    pub async fn quick_link_labels(&self) -> Result<Vec<String>> {
        Ok(super::trimmed(self.quick_links().all_inner_texts().await?))
    }

    /// The contact block's text.
    pub async fn contact_text(&self) -> Result<String> {
        Ok(self.contact_info().inner_text().await?.trim().to_string())
    }

    pub async fn legal_link_labels(&self) -> Result<Vec<String>> {
        Ok(super::trimmed(self.legal_links().all_inner_texts().await?))
    }

    /// Street address extracted from the contact block, if one is present.
    pub async fn street_address(&self) -> Result<Option<String>> {
        let text = self.contact_text().await?;
        Ok(extract_street(&text))
    }
}

fn extract_street(text: &str) -> Option<String> {
    STREET.find(text).map(|m| m.as_str().to_string())
}
