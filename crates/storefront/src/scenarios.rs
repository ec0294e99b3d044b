// Scenarios - End-to-end checks composed from the component descriptors
//
// Each scenario gets its own session and the shared, read-only fixtures. It
// opens the storefront root, drives descriptors and asserts on what the
// page shows. A scenario never shares its session with another.

use crate::assertions::{Pattern, expect, expect_page};
use crate::components::{
    Cart, Category, FilterSortPanel, Footer, HeaderBanner, Modal, NavigationBar, ProductDetail,
    ProductGrid, SearchBar,
};
use crate::error::{Error, Result};
use crate::fixtures::Fixtures;
use crate::session::SessionHandle;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type ScenarioFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

/// A named, independently runnable scenario.
#[derive(Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    run: fn(SessionHandle, Arc<Fixtures>) -> ScenarioFuture,
}

impl Scenario {
    pub fn run(&self, session: SessionHandle, fixtures: Arc<Fixtures>) -> ScenarioFuture {
        (self.run)(session, fixtures)
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario").field("name", &self.name).finish()
    }
}

static SCENARIOS: [Scenario; 9] = [
    Scenario {
        name: "navigation",
        description: "Navigation bar shows every main link and Products navigates",
        run: |s, f| Box::pin(navigation(s, f)),
    },
    Scenario {
        name: "product_grid",
        description: "Product cards show a name, a price and an Add to Cart button",
        run: |s, f| Box::pin(product_grid(s, f)),
    },
    Scenario {
        name: "product_detail",
        description: "Opening a card shows title, price and Add to Cart",
        run: |s, f| Box::pin(product_detail(s, f)),
    },
    Scenario {
        name: "cart",
        description: "An added product appears in the cart with a total",
        run: |s, f| Box::pin(cart(s, f)),
    },
    Scenario {
        name: "filter",
        description: "Filtering by each category leaves only matching cards",
        run: |s, f| Box::pin(filter(s, f)),
    },
    Scenario {
        name: "search",
        description: "Searching shows a matching product card",
        run: |s, f| Box::pin(search(s, f)),
    },
    Scenario {
        name: "banner",
        description: "Banner headline and call to action",
        run: |s, f| Box::pin(banner(s, f)),
    },
    Scenario {
        name: "modal",
        description: "Add-to-cart modal appears and Continue Shopping closes it",
        run: |s, f| Box::pin(modal(s, f)),
    },
    Scenario {
        name: "footer",
        description: "Footer quick links, contact block and legal links",
        run: |s, f| Box::pin(footer(s, f)),
    },
];

/// Every scenario, in execution order.
pub fn all() -> &'static [Scenario] {
    &SCENARIOS
}

pub fn find(name: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.name == name)
}

fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::AssertionFailed(message()))
    }
}

pub async fn navigation(session: SessionHandle, fixtures: Arc<Fixtures>) -> Result<()> {
    session.open(&fixtures.urls.home).await?;
    let nav: NavigationBar = session.page();

    for name in &fixtures.expectations.nav_links {
        expect(nav.link(name)).to_be_visible().await?;
    }

    nav.goto("Products").await?;
    expect_page(&session)
        .to_have_url(&Pattern::glob(&fixtures.expectations.products_url)?)
        .await
}

pub async fn product_grid(session: SessionHandle, fixtures: Arc<Fixtures>) -> Result<()> {
    session.open(&fixtures.urls.home).await?;
    let grid: ProductGrid = session.page();

    expect(grid.cards().first()).to_be_visible().await?;
    let count = grid.card_count().await?;
    for index in 0..count {
        let info = grid.product_info(index).await?;
        ensure(!info.name.is_empty() && !info.price.is_empty(), || {
            format!("card {index} is missing a name or price: {info:?}")
        })?;
    }
    expect(grid.add_to_cart_button(0)).to_be_visible().await
}

pub async fn product_detail(session: SessionHandle, fixtures: Arc<Fixtures>) -> Result<()> {
    session.open(&fixtures.urls.home).await?;
    session.page::<ProductGrid>().open_product(0).await?;

    let detail: ProductDetail = session.page();
    expect(detail.title()).to_be_visible().await?;
    expect(detail.price()).to_be_visible().await?;
    expect(detail.add_to_cart_button()).to_be_visible().await
}

pub async fn cart(session: SessionHandle, fixtures: Arc<Fixtures>) -> Result<()> {
    session.open(&fixtures.urls.home).await?;
    session.page::<ProductGrid>().add_to_cart(0).await?;
    session.page::<NavigationBar>().goto("Cart").await?;

    let cart: Cart = session.page();
    expect(cart.items().first()).to_be_visible().await?;
    expect(cart.total()).to_be_visible().await?;
    let total = cart.total_text().await?;
    ensure(!total.is_empty(), || "cart total is empty".to_string())
}

pub async fn filter(session: SessionHandle, fixtures: Arc<Fixtures>) -> Result<()> {
    session.open(&fixtures.urls.home).await?;
    let panel: FilterSortPanel = session.page();
    let grid: ProductGrid = session.page();

    let categories = panel.available_categories().await?;
    ensure(!categories.is_empty(), || {
        "no category filter controls on the page".to_string()
    })?;

    for category in categories {
        check_category_filter(&panel, &grid, category).await?;
    }
    Ok(())
}

/// Applies one category filter and waits until only its cards are shown.
async fn check_category_filter(
    panel: &FilterSortPanel,
    grid: &ProductGrid,
    category: Category,
) -> Result<()> {
    panel.filter_by_category(category).await?;
    expect(grid.cards())
        .to_all_contain_text(category.label())
        .await
        .map_err(|e| e.context(format!("{category} filter")))?;
    expect(grid.cards_with_text(category.label()).first())
        .to_be_visible()
        .await
}

pub async fn search(session: SessionHandle, fixtures: Arc<Fixtures>) -> Result<()> {
    session.open(&fixtures.urls.home).await?;
    let search: SearchBar = session.page();
    let term = &fixtures.expectations.search_term;

    search.search(term).await?;
    expect(search.results_with_text(term).first())
        .to_be_visible()
        .await
}

pub async fn banner(session: SessionHandle, fixtures: Arc<Fixtures>) -> Result<()> {
    session.open(&fixtures.urls.home).await?;
    let banner: HeaderBanner = session.page();

    let text = banner.banner_text().await?;
    let headline = &fixtures.expectations.banner_headline;
    ensure(text.contains(headline.as_str()), || {
        format!("banner '{text}' does not contain '{headline}'")
    })?;

    banner.click_cta().await?;
    expect_page(&session)
        .to_have_url(&Pattern::glob(&fixtures.expectations.products_url)?)
        .await
}

pub async fn modal(session: SessionHandle, fixtures: Arc<Fixtures>) -> Result<()> {
    session.open(&fixtures.urls.home).await?;
    let modal: Modal = session.page();

    ensure(!modal.is_visible().await?, || {
        "modal visible before any add-to-cart".to_string()
    })?;

    session.page::<ProductGrid>().add_to_cart(0).await?;
    expect(modal.root()).to_be_visible().await?;
    let content = modal.content().await?;
    ensure(!content.is_empty(), || "modal has no content".to_string())?;

    modal.continue_shopping().await?;
    ensure(!modal.is_visible().await?, || {
        "modal still visible after Continue Shopping".to_string()
    })
}

pub async fn footer(session: SessionHandle, fixtures: Arc<Fixtures>) -> Result<()> {
    session.open(&fixtures.urls.home).await?;
    let footer: Footer = session.page();
    let expected = &fixtures.expectations;

    let quick = footer.quick_link_labels().await?;
    for link in &expected.quick_links {
        ensure(quick.contains(link), || {
            format!("footer quick links {quick:?} are missing '{link}'")
        })?;
    }

    let contact = footer.contact_text().await?;
    ensure(contact.contains(expected.contact_street.as_str()), || {
        format!("contact block '{contact}' does not mention '{}'", expected.contact_street)
    })?;

    let legal = footer.legal_link_labels().await?.join(" ");
    ensure(
        expected.legal_links.iter().any(|l| legal.contains(l.as_str())),
        || format!("legal links '{legal}' match none of {:?}", expected.legal_links),
    )
}
