//! storefront-pom: Page objects and UI scenarios for the FashionHub storefront
//!
//! Each storefront region (navigation bar, product grid, cart, filters,
//! search, banner, modal, footer) is a descriptor that builds lazy
//! [`Locator`]s and composes them into user-level operations. Descriptors
//! hold a [`SessionHandle`]; the browser behind it is any [`Session`]
//! implementation, with the Playwright one available under the
//! `playwright` feature.
//!
//! # Examples
//!
//! ```ignore
//! use storefront_pom::{BrowserSession, NavigationBar, Pattern, SuiteConfig, expect, expect_page};
//!
//! #[tokio::main]
//! async fn main() -> storefront_pom::Result<()> {
//!     let config = SuiteConfig::from_env()?;
//!     let browser = BrowserSession::launch(&config).await?;
//!     let session = browser.session();
//!
//!     session.open("/").await?;
//!     let nav: NavigationBar = session.page();
//!     expect(nav.link("Products")).to_be_visible().await?;
//!
//!     nav.goto("Products").await?;
//!     expect_page(session).to_have_url(&Pattern::glob("*products*")?).await?;
//!
//!     browser.close().await
//! }
//! ```
//!
//! Scenarios in [`scenarios`] bundle these steps into named, independently
//! runnable checks; `cargo xtask smoke` runs them against a live storefront.

pub mod assertions;
pub mod components;
pub mod config;
mod error;
pub mod fixtures;
pub mod locator;
pub mod page;
pub mod scenarios;
pub mod selector;
pub mod session;

#[cfg(feature = "playwright")]
pub mod playwright;

#[cfg(test)]
mod fake;

// Re-export error types
pub use error::{Error, Result};

// Re-export the selector and locator model
pub use locator::{Locator, WaitState};
pub use selector::{Selector, TextMatch};

// Re-export the session capability
pub use page::PageObject;
pub use session::{LoadState, SelectBy, Session, SessionHandle};

// Re-export assertions API
pub use assertions::{Pattern, expect, expect_page};

// Re-export configuration and test data
pub use config::{BrowserKind, SuiteConfig, Timeouts};
pub use fixtures::Fixtures;

// Re-export page objects
pub use components::{
    Cart, Category, FilterSortPanel, Footer, HeaderBanner, Modal, NavigationBar, ProductDetail,
    ProductGrid, ProductInfo, SearchBar,
};
pub use scenarios::Scenario;

#[cfg(feature = "playwright")]
pub use playwright::{BrowserSession, PlaywrightSession};
