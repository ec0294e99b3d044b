// Components - One descriptor per storefront UI surface
//
// Every descriptor implements `PageObject`: it stores the session handle and
// nothing else. Accessor methods (`link`, `card`, `item`, ...) are pure and
// return lazy locators; the async operations built on them each perform a
// single read or interaction against the live document.

mod cart;
mod filter_sort;
mod footer;
mod header_banner;
mod modal;
mod navigation;
mod product_detail;
mod product_grid;
mod search_bar;

pub use cart::Cart;
pub use filter_sort::{Category, FilterSortPanel};
pub use footer::Footer;
pub use header_banner::HeaderBanner;
pub use modal::Modal;
pub use navigation::NavigationBar;
pub use product_detail::ProductDetail;
pub use product_grid::{ProductGrid, ProductInfo};
pub use search_bar::SearchBar;

/// Inner texts with surrounding whitespace removed.
pub(crate) fn trimmed(texts: Vec<String>) -> Vec<String> {
    texts.into_iter().map(|t| t.trim().to_string()).collect()
}
