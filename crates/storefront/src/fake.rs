// FakeSession - Scripted in-memory document for unit tests
//
// Elements are registered under the exact selector string a locator renders
// (`css=nav >> text=/Home/`). A trailing ` >> nth=N` is resolved against the
// base entry, so `first()`, `nth()` and `last()` work without extra entries.
// Actions are logged and may trigger effects registered with `FakeDom::on`,
// which is how add-to-cart opens the modal, a nav click changes the URL, etc.

use crate::components::{
    Cart, Category, FilterSortPanel, Footer, HeaderBanner, Modal, NavigationBar, ProductDetail,
    ProductGrid, SearchBar,
};
use crate::config::{DEFAULT_BASE_URL, SuiteConfig, Timeouts};
use crate::error::{Error, Result};
use crate::page::PageObject;
use crate::session::{LoadState, SelectBy, Session, SessionHandle};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub(crate) type Effect = Arc<dyn Fn(&mut FakeDom, &str) + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FakeElement {
    pub text: String,
    pub visible: bool,
    pub value: String,
    pub checked: bool,
    pub attributes: HashMap<String, String>,
}

impl FakeElement {
    pub fn text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            visible: true,
            value: String::new(),
            checked: false,
            attributes: HashMap::new(),
        }
    }

    pub fn input(value: &str) -> Self {
        let mut element = Self::text("");
        element.value = value.to_string();
        element
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }
}

#[derive(Default)]
pub(crate) struct FakeDom {
    pub url: String,
    pub title: String,
    pub elements: HashMap<String, Vec<FakeElement>>,
    pub effects: HashMap<String, Effect>,
    pub log: Vec<String>,
    pub waits: Vec<LoadState>,
    /// Products in the scripted storefront's cart
    pub cart: Vec<FakeProduct>,
    pub network_idle_times_out: bool,
    pub dom_ready_times_out: bool,
}

impl FakeDom {
    pub fn insert(&mut self, selector: &str, elements: Vec<FakeElement>) {
        self.elements.insert(selector.to_string(), elements);
    }

    pub fn remove(&mut self, selector: &str) {
        self.elements.remove(selector);
    }

    /// Registers an effect for `action` ("click", "press:Enter", "select",
    /// "fill") on `selector`. The effect receives the action's argument.
    pub fn on(
        &mut self,
        action: &str,
        selector: &str,
        effect: impl Fn(&mut FakeDom, &str) + Send + Sync + 'static,
    ) {
        self.effects
            .insert(format!("{action}|{selector}"), Arc::new(effect));
    }

    /// Entry key and matched indices for a rendered selector.
    fn resolve(&self, selector: &str) -> Option<(String, Vec<usize>)> {
        if let Some(elements) = self.elements.get(selector) {
            return Some((selector.to_string(), (0..elements.len()).collect()));
        }
        let (base, index) = split_nth(selector)?;
        let (key, matched) = self.resolve(base)?;
        let picked = if index < 0 {
            matched.len().checked_sub(index.unsigned_abs() as usize)
        } else {
            Some(index as usize)
        };
        let picked = picked.and_then(|i| matched.get(i).copied());
        Some((key, picked.into_iter().collect()))
    }

    fn matches(&self, selector: &str) -> Vec<&FakeElement> {
        match self.resolve(selector) {
            Some((key, indices)) => indices
                .into_iter()
                .filter_map(|i| self.elements.get(&key).and_then(|all| all.get(i)))
                .collect(),
            None => Vec::new(),
        }
    }

    fn one(&self, selector: &str) -> Result<&FakeElement> {
        match self.matches(selector).as_slice() {
            [element] => Ok(*element),
            [] => Err(Error::ElementNotFound {
                selector: selector.to_string(),
            }),
            many => Err(Error::Session(format!(
                "strict mode violation: {selector} resolved to {} elements",
                many.len()
            ))),
        }
    }

    fn one_mut(&mut self, selector: &str) -> Result<&mut FakeElement> {
        let (key, indices) = self.resolve(selector).unwrap_or_default();
        match indices.as_slice() {
            [index] => self
                .elements
                .get_mut(&key)
                .and_then(|all| all.get_mut(*index))
                .ok_or_else(|| Error::ElementNotFound {
                    selector: selector.to_string(),
                }),
            _ => Err(Error::ElementNotFound {
                selector: selector.to_string(),
            }),
        }
    }

    fn fire(&mut self, action: &str, selector: &str, argument: &str) {
        let effect = self.effects.get(&format!("{action}|{selector}")).cloned();
        if let Some(effect) = effect {
            effect(self, argument);
        }
    }
}

fn split_nth(selector: &str) -> Option<(&str, i32)> {
    let (base, index) = selector.rsplit_once(" >> nth=")?;
    Some((base, index.parse().ok()?))
}

pub(crate) struct FakeSession {
    dom: Mutex<FakeDom>,
}

impl FakeSession {
    pub fn new() -> Self {
        let dom = FakeDom {
            url: "about:blank".to_string(),
            ..FakeDom::default()
        };
        Self {
            dom: Mutex::new(dom),
        }
    }

    /// Runs `f` with the document locked.
    pub fn dom<R>(&self, f: impl FnOnce(&mut FakeDom) -> R) -> R {
        f(&mut self.dom.lock())
    }

    pub fn log(&self) -> Vec<String> {
        self.dom.lock().log.clone()
    }

    pub fn waits(&self) -> Vec<LoadState> {
        self.dom.lock().waits.clone()
    }

    fn act(&self, action: &str, selector: &str, argument: &str, entry: String) -> Result<()> {
        let mut dom = self.dom.lock();
        dom.one(selector)?;
        dom.log.push(entry);
        dom.fire(action, selector, argument);
        Ok(())
    }
}

#[async_trait]
impl Session for FakeSession {
    async fn goto(&self, url: &str, _timeout: Duration) -> Result<()> {
        let mut dom = self.dom.lock();
        dom.url = url.to_string();
        dom.log.push(format!("goto {url}"));
        dom.fire("goto", url, url);
        Ok(())
    }

    async fn url(&self) -> Result<String> {
        Ok(self.dom.lock().url.clone())
    }

    async fn title(&self) -> Result<String> {
        Ok(self.dom.lock().title.clone())
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.dom.lock().matches(selector).len())
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        let dom = self.dom.lock();
        Ok(dom.matches(selector).first().is_some_and(|e| e.visible))
    }

    async fn inner_text(&self, selector: &str) -> Result<String> {
        let dom = self.dom.lock();
        Ok(dom.one(selector)?.text.clone())
    }

    async fn text_content(&self, selector: &str) -> Result<Option<String>> {
        let dom = self.dom.lock();
        Ok(Some(dom.one(selector)?.text.clone()))
    }

    async fn get_attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let dom = self.dom.lock();
        Ok(dom.one(selector)?.attributes.get(name).cloned())
    }

    async fn input_value(&self, selector: &str) -> Result<String> {
        let dom = self.dom.lock();
        Ok(dom.one(selector)?.value.clone())
    }

    async fn is_checked(&self, selector: &str) -> Result<bool> {
        let dom = self.dom.lock();
        Ok(dom.one(selector)?.checked)
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.act("click", selector, "", format!("click {selector}"))
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        let mut dom = self.dom.lock();
        dom.one_mut(selector)?.value = value.to_string();
        dom.log.push(format!("fill {selector} {value}"));
        dom.fire("fill", selector, value);
        Ok(())
    }

    async fn press(&self, selector: &str, key: &str) -> Result<()> {
        self.act(
            &format!("press:{key}"),
            selector,
            key,
            format!("press {selector} {key}"),
        )
    }

    async fn hover(&self, selector: &str) -> Result<()> {
        self.act("hover", selector, "", format!("hover {selector}"))
    }

    async fn set_checked(&self, selector: &str, checked: bool) -> Result<()> {
        let mut dom = self.dom.lock();
        dom.one_mut(selector)?.checked = checked;
        dom.log.push(format!("set_checked {selector} {checked}"));
        Ok(())
    }

    async fn select_option(&self, selector: &str, option: &SelectBy) -> Result<Vec<String>> {
        let value = match option {
            SelectBy::Value(value) | SelectBy::Label(value) => value.clone(),
            SelectBy::Index(index) => index.to_string(),
        };
        let mut dom = self.dom.lock();
        dom.one_mut(selector)?.value = value.clone();
        dom.log.push(format!("select {selector} {value}"));
        dom.fire("select", selector, &value);
        Ok(vec![value])
    }

    async fn keyboard_press(&self, key: &str) -> Result<()> {
        let mut dom = self.dom.lock();
        dom.log.push(format!("keyboard {key}"));
        dom.fire("keyboard", key, key);
        Ok(())
    }

    async fn wait_for_load_state(&self, state: LoadState, timeout: Duration) -> Result<()> {
        let mut dom = self.dom.lock();
        dom.waits.push(state);
        let times_out = match state {
            LoadState::DomContentLoaded | LoadState::Load => dom.dom_ready_times_out,
            LoadState::NetworkIdle => dom.network_idle_times_out,
        };
        if times_out {
            return Err(Error::timeout(format!("waiting for {state}"), timeout));
        }
        Ok(())
    }

    async fn screenshot(&self, _full_page: bool) -> Result<Vec<u8>> {
        Ok(b"\x89PNG\r\n\x1a\n".to_vec())
    }
}

/// Handle over `fake` with timeouts short enough for unit tests.
pub(crate) fn fast_handle(fake: &Arc<FakeSession>) -> SessionHandle {
    let timeouts = Timeouts {
        short: Duration::from_millis(20),
        medium: Duration::from_millis(50),
        long: Duration::from_millis(100),
        very_long: Duration::from_millis(200),
        action: Duration::from_millis(50),
        assertion: Duration::from_millis(100),
        dom_ready: Duration::from_millis(50),
        network_idle: Duration::from_millis(50),
        poll_interval: Duration::from_millis(5),
    };
    let config = SuiteConfig::default().timeouts(timeouts);
    SessionHandle::from_arc(fake.clone(), Arc::new(config))
}

// ============================================================================
// Scripted FashionHub storefront
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FakeProduct {
    pub name: &'static str,
    pub price: &'static str,
    pub category: Category,
}

impl FakeProduct {
    fn cents(&self) -> u64 {
        let digits: String = self.price.chars().filter(char::is_ascii_digit).collect();
        digits.parse().unwrap_or(0)
    }

    fn card_text(&self) -> String {
        format!("{}\n{}\n{}\nAdd to Cart", self.name, self.price, self.category)
    }
}

const fn product(name: &'static str, price: &'static str, category: Category) -> FakeProduct {
    FakeProduct {
        name,
        price,
        category,
    }
}

/// Products shown on the home page grid.
const CATALOG: [FakeProduct; 5] = [
    product("Denim Jacket", "$59.99", Category::Men),
    product("Floral Summer Dress", "$39.99", Category::Women),
    product("Running Sneakers", "$79.99", Category::Footwear),
    product("Leather Belt", "$24.99", Category::Accessories),
    product("Kids Hoodie", "$29.99", Category::Kids),
];

/// Products only reachable through search.
const SEARCH_ONLY: [FakeProduct; 2] = [
    product("Classic T-Shirt", "$19.99", Category::Men),
    product("Graphic T-Shirt", "$24.99", Category::Kids),
];

const NAV_LINKS: [(&str, &str); 8] = [
    ("Home", ""),
    ("Products", "products"),
    ("Categories", "categories"),
    ("About", "about"),
    ("Contact", "contact"),
    ("Login", "login"),
    ("Sign Up", "register"),
    ("Cart", "cart"),
];

/// Grid slots wired with click effects.
const MAX_CARDS: usize = 8;

/// A descriptor bound to a throwaway session, used only to compute the
/// selector strings the real descriptors render.
fn detached<P: PageObject>() -> P {
    fast_handle(&Arc::new(FakeSession::new())).page()
}

fn key(locator: crate::locator::Locator) -> String {
    locator.selector().to_string()
}

fn visit(dom: &mut FakeDom, path: &str) {
    dom.url = format!("{DEFAULT_BASE_URL}{path}");
    dom.remove(&key(detached::<Modal>().root()));
}

fn render_grid(dom: &mut FakeDom, products: &[FakeProduct]) {
    let grid: ProductGrid = detached();
    dom.insert(
        &key(grid.cards()),
        products.iter().map(|p| FakeElement::text(&p.card_text())).collect(),
    );
    for index in 0..MAX_CARDS {
        let slots = [
            key(grid.card_title(index)),
            key(grid.card_price(index)),
            key(grid.add_to_cart_button(index)),
        ];
        match products.get(index) {
            Some(p) => {
                dom.insert(&slots[0], vec![FakeElement::text(p.name)]);
                dom.insert(&slots[1], vec![FakeElement::text(p.price)]);
                dom.insert(&slots[2], vec![FakeElement::text("Add to Cart")]);
            }
            None => slots.iter().for_each(|slot| dom.remove(slot)),
        }
    }
    // `:has-text` matches case-insensitive substrings.
    for category in Category::ALL {
        let label = category.label().to_lowercase();
        let matching: Vec<FakeElement> = products
            .iter()
            .map(|p| p.card_text())
            .filter(|text| text.to_lowercase().contains(&label))
            .map(|text| FakeElement::text(&text))
            .collect();
        let with_text = key(grid.cards_with_text(category.label()));
        if matching.is_empty() {
            dom.remove(&with_text);
        } else {
            dom.insert(&with_text, matching);
        }
    }
}

fn render_cart(dom: &mut FakeDom) {
    let cart: Cart = detached();
    let items = dom.cart.clone();
    dom.insert(
        &key(cart.items()),
        items
            .iter()
            .map(|p| FakeElement::text(&format!("{}\n{}\nRemove", p.name, p.price)))
            .collect(),
    );
    for index in 0..MAX_CARDS {
        let quantity = key(cart.quantity_input(index));
        let remove = cart.remove_controls(index).into_iter().next().map(key);
        if index < items.len() {
            dom.insert(&quantity, vec![FakeElement::input("1")]);
            if let Some(remove) = remove {
                dom.insert(&remove, vec![FakeElement::text("").attr("aria-label", "Remove")]);
            }
        } else {
            dom.remove(&quantity);
            if let Some(remove) = remove {
                dom.remove(&remove);
            }
        }
    }
    let cents: u64 = items.iter().map(FakeProduct::cents).sum();
    dom.insert(
        &key(cart.total()),
        vec![FakeElement::text(&format!(
            "Total: ${}.{:02}",
            cents / 100,
            cents % 100
        ))],
    );
}

fn show_modal(dom: &mut FakeDom, added: FakeProduct) {
    let modal: Modal = detached();
    dom.insert(
        &key(modal.root()),
        vec![FakeElement::text(&format!("Added to cart\n{}", added.name))],
    );
    dom.insert(&key(modal.continue_button()), vec![FakeElement::text("Continue Shopping")]);
    dom.insert(&key(modal.view_cart_control()), vec![FakeElement::text("View Cart")]);
    dom.cart.push(added);
    render_cart(dom);
}

/// Product currently rendered in grid slot `index`.
fn product_in_slot(dom: &FakeDom, index: usize) -> Option<FakeProduct> {
    let grid: ProductGrid = detached();
    let name = dom.matches(&key(grid.card_title(index))).first()?.text.clone();
    CATALOG
        .iter()
        .chain(SEARCH_ONLY.iter())
        .find(|p| p.name == name)
        .cloned()
}

fn build_storefront(dom: &mut FakeDom) {
    dom.url = DEFAULT_BASE_URL.to_string();
    dom.title = "FashionHub - Discover Your Style".to_string();

    // Navigation
    let nav: NavigationBar = detached();
    dom.insert(&key(nav.root()), vec![FakeElement::text("FashionHub")]);
    dom.insert(
        &key(nav.links()),
        NAV_LINKS.iter().map(|(label, _)| FakeElement::text(label)).collect(),
    );
    dom.insert(&key(nav.active_link()), vec![FakeElement::text("Home")]);
    for (label, path) in NAV_LINKS {
        dom.insert(&key(nav.link(label)), vec![FakeElement::text(label)]);
        dom.on("click", &key(nav.link(label)), move |dom, _| {
            visit(dom, path);
            let nav: NavigationBar = detached();
            dom.insert(&key(nav.active_link()), vec![FakeElement::text(label)]);
        });
    }

    // Banner
    let banner: HeaderBanner = detached();
    let containers: Vec<String> = banner.banner_candidates().into_iter().map(key).collect();
    dom.insert(&containers[0], vec![FakeElement::text("Discover Your Style\nShop Now")]);
    dom.insert(&containers[2], vec![FakeElement::text("FashionHub")]);
    let cta = key(banner.cta_in(&banner.banner_candidates()[0]));
    dom.insert(&cta, vec![FakeElement::text("Shop Now")]);
    dom.on("click", &cta, |dom, _| visit(dom, "products"));

    // Grid, detail view and modal
    render_grid(dom, &CATALOG);
    let grid: ProductGrid = detached();
    let detail: ProductDetail = detached();
    for index in 0..MAX_CARDS {
        dom.on("click", &key(grid.add_to_cart_button(index)), move |dom, _| {
            if let Some(p) = product_in_slot(dom, index) {
                show_modal(dom, p);
            }
        });
        dom.on("click", &key(grid.card(index)), move |dom, _| {
            let Some(p) = product_in_slot(dom, index) else {
                return;
            };
            visit(dom, &format!("products/{}", index + 1));
            let detail: ProductDetail = detached();
            dom.insert(&key(detail.title()), vec![FakeElement::text(p.name)]);
            dom.insert(&key(detail.price()), vec![FakeElement::text(p.price)]);
            dom.insert(&key(detail.add_to_cart_button()), vec![FakeElement::text("Add to Cart")]);
            dom.insert(&key(detail.reviews()), vec![FakeElement::text("Great fit!")]);
        });
    }
    dom.on("click", &key(detail.add_to_cart_button()), |dom, _| {
        let detail: ProductDetail = detached();
        let name = dom
            .matches(&key(detail.title()))
            .first()
            .map(|e| e.text.clone())
            .unwrap_or_default();
        if let Some(p) = CATALOG.iter().find(|p| p.name == name).cloned() {
            show_modal(dom, p);
        }
    });

    let modal: Modal = detached();
    dom.on("click", &key(modal.continue_button()), |dom, _| {
        let modal: Modal = detached();
        dom.remove(&key(modal.root()));
    });
    dom.on("click", &key(modal.view_cart_control()), |dom, _| visit(dom, "cart"));

    // Cart
    render_cart(dom);
    let cart: Cart = detached();
    for index in 0..MAX_CARDS {
        if let Some(remove) = cart.remove_controls(index).into_iter().next() {
            dom.on("click", &key(remove), move |dom, _| {
                if index < dom.cart.len() {
                    dom.cart.remove(index);
                }
                render_cart(dom);
            });
        }
    }
    dom.insert(&key(cart.checkout_button()), vec![FakeElement::text("Checkout")]);
    dom.on("click", &key(cart.checkout_button()), |dom, _| visit(dom, "checkout"));

    // Filters and sorting
    let panel: FilterSortPanel = detached();
    dom.insert(
        &key(panel.category_controls()),
        Category::ALL.iter().map(|c| FakeElement::text(c.label())).collect(),
    );
    for category in Category::ALL {
        let control = key(panel.category_control(category));
        if let Some((base, _)) = split_nth(&control) {
            dom.insert(base, vec![FakeElement::text(category.label())]);
        }
        dom.on("click", &control, move |dom, _| {
            let matching: Vec<FakeProduct> =
                CATALOG.iter().filter(|p| p.category == category).cloned().collect();
            render_grid(dom, &matching);
        });
    }
    dom.insert(&key(panel.clear_button()), vec![FakeElement::text("Clear Filters")]);
    dom.on("click", &key(panel.clear_button()), |dom, _| render_grid(dom, &CATALOG));
    dom.insert(&key(panel.sort_select()), vec![FakeElement::input("featured")]);
    dom.on("select", &key(panel.sort_select()), |dom, label| {
        let mut sorted = CATALOG.to_vec();
        if label.contains("Low to High") {
            sorted.sort_by_key(FakeProduct::cents);
        } else if label.contains("High to Low") {
            sorted.sort_by_key(|p| std::cmp::Reverse(p.cents()));
        }
        render_grid(dom, &sorted);
    });

    // Search
    let search: SearchBar = detached();
    let input = key(search.input());
    dom.insert(&input, vec![FakeElement::input("")]);
    dom.on("press:Enter", &input, |dom, _| {
        let search: SearchBar = detached();
        let term = dom
            .matches(&key(search.input()))
            .first()
            .map(|e| e.value.clone())
            .unwrap_or_default();
        let needle = term.to_lowercase();
        let found: Vec<FakeProduct> = CATALOG
            .iter()
            .chain(SEARCH_ONLY.iter())
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        render_grid(dom, &found);
        if !found.is_empty() {
            dom.insert(
                &key(search.results_with_text(&term)),
                found.iter().map(|p| FakeElement::text(&p.card_text())).collect(),
            );
        }
    });

    // Footer
    let footer: Footer = detached();
    dom.insert(&key(footer.root()), vec![FakeElement::text("FashionHub")]);
    dom.insert(
        &key(footer.quick_links()),
        ["Home", "Products", "Categories", "Cart", "Privacy Policy", "Terms of Service", "Shipping Info"]
            .iter()
            .map(|l| FakeElement::text(l))
            .collect(),
    );
    if let Some((base, _)) = split_nth(&key(footer.contact_info())) {
        dom.insert(
            base,
            vec![FakeElement::text("123 Shopping St, Style City, SC 12345")],
        );
    }
    dom.insert(
        &key(footer.legal_links()),
        ["Privacy Policy", "Terms of Service", "Shipping Info"]
            .iter()
            .map(|l| FakeElement::text(l))
            .collect(),
    );
}

/// A fake session preloaded with the FashionHub home page.
pub(crate) fn storefront() -> (Arc<FakeSession>, SessionHandle) {
    let fake = Arc::new(FakeSession::new());
    fake.dom(build_storefront);
    let session = fast_handle(&fake);
    (fake, session)
}
