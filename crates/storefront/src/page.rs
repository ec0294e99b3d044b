// PageObject - Common shape of every component descriptor

use crate::locator::Locator;
use crate::selector::Selector;
use crate::session::SessionHandle;

/// A storefront component bound to one browser session.
///
/// Descriptors hold nothing but the session. Element accessors build fresh
/// locators on every call, so they are cheap and never stale; operations
/// query the live document.
pub trait PageObject: Sized {
    /// Human-readable component name, used in logs and reports.
    const NAME: &'static str;

    fn from_session(session: SessionHandle) -> Self;

    fn session(&self) -> &SessionHandle;

    /// Lazy locator for `selector` on this component's page.
    fn locator(&self, selector: Selector) -> Locator {
        self.session().locator(selector)
    }
}
