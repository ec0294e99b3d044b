// Fixtures - Static sample data for storefront scenarios
//
// One immutable `Fixtures` value is built per run (defaults, or loaded from
// JSON) and handed to every scenario. Nothing here is process-global.

use crate::error::{Error, Result};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductData {
    pub search_term: String,
    pub category: String,
    pub brand: String,
    pub product_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub postcode: String,
    pub country: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub card_number: String,
    pub card_name: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
}

/// Product taxonomy offered by the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FashionData {
    pub categories: Vec<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub brands: Vec<String>,
}

/// Named paths, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Urls {
    pub home: String,
    pub login: String,
    pub register: String,
    pub cart: String,
    pub checkout: String,
    pub account: String,
    pub search: String,
    pub products: String,
    pub categories: String,
}

/// User-facing messages the storefront shows after actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Messages {
    pub login_success: String,
    pub login_error: String,
    pub register_success: String,
    pub add_to_cart: String,
    pub remove_from_cart: String,
    pub order_success: String,
}

/// What the scenarios expect to observe on the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expectations {
    /// Every link the navigation bar must show
    pub nav_links: Vec<String>,
    /// Glob the URL must match after following the "Products" link
    pub products_url: String,
    pub search_term: String,
    pub banner_headline: String,
    pub quick_links: Vec<String>,
    pub contact_street: String,
    pub legal_links: Vec<String>,
}

/// Sample data shared by all scenarios of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fixtures {
    pub valid_user: User,
    pub invalid_user: User,
    pub product: ProductData,
    pub address: Address,
    pub payment: Payment,
    pub fashion: FashionData,
    pub urls: Urls,
    pub messages: Messages,
    pub expectations: Expectations,
}

impl Default for Fixtures {
    fn default() -> Self {
        Self {
            valid_user: User {
                email: "test@example.com".into(),
                password: "test123".into(),
                first_name: "John".into(),
                last_name: "Doe".into(),
                phone: "1234567890".into(),
            },
            invalid_user: User {
                email: "invalid@example.com".into(),
                password: "wrongpassword".into(),
                first_name: String::new(),
                last_name: String::new(),
                phone: String::new(),
            },
            product: ProductData {
                search_term: "shirt".into(),
                category: "Men".into(),
                brand: "FashionHub".into(),
                product_name: "Blue Denim Shirt".into(),
            },
            address: Address {
                first_name: "John".into(),
                last_name: "Doe".into(),
                company: "Test Company".into(),
                address1: "123 Test Street".into(),
                address2: "Apt 4B".into(),
                city: "Test City".into(),
                postcode: "12345".into(),
                country: "United States".into(),
                state: "California".into(),
            },
            payment: Payment {
                card_number: "4111111111111111".into(),
                card_name: "John Doe".into(),
                expiry_month: "12".into(),
                expiry_year: "2025".into(),
                cvv: "123".into(),
            },
            fashion: FashionData {
                categories: strings(&["Men", "Women", "Kids", "Accessories"]),
                sizes: strings(&["XS", "S", "M", "L", "XL", "XXL"]),
                colors: strings(&["Red", "Blue", "Green", "Black", "White"]),
                brands: strings(&["FashionHub", "StyleCo", "TrendyWear", "UrbanStyle"]),
            },
            urls: Urls {
                home: "/".into(),
                login: "/login".into(),
                register: "/register".into(),
                cart: "/cart".into(),
                checkout: "/checkout".into(),
                account: "/account".into(),
                search: "/search".into(),
                products: "/products".into(),
                categories: "/categories".into(),
            },
            messages: Messages {
                login_success: "Welcome".into(),
                login_error: "Invalid credentials".into(),
                register_success: "Account created successfully".into(),
                add_to_cart: "Added to cart".into(),
                remove_from_cart: "Removed from cart".into(),
                order_success: "Order placed successfully".into(),
            },
            expectations: Expectations {
                nav_links: strings(&[
                    "Home",
                    "Products",
                    "Categories",
                    "About",
                    "Contact",
                    "Login",
                    "Sign Up",
                ]),
                products_url: "*products*".into(),
                search_term: "T-Shirt".into(),
                banner_headline: "Discover Your Style".into(),
                quick_links: strings(&["Home", "Products", "Categories", "Cart"]),
                contact_street: "Shopping St".into(),
                legal_links: strings(&["Privacy Policy", "Terms of Service", "Shipping Info"]),
            },
        }
    }
}

impl Fixtures {
    /// Parses fixtures from JSON. Top-level sections left out keep their
    /// default values.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::Json(e).context("parsing fixtures"))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Io(e).context(format!("reading {}", path.display())))?;
        Self::from_json(&raw)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Unique address like `test1718031234567@example.com`.
pub fn random_email() -> String {
    format!("test{}@example.com", chrono::Utc::now().timestamp_millis())
}

/// Random ASCII alphanumeric string.
pub fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Random four-digit number.
pub fn random_number() -> u32 {
    random_number_in(1000, 9999)
}

/// Random number in `min..=max`. The bounds may be given in either order.
pub fn random_number_in(min: u32, max: u32) -> u32 {
    let (low, high) = if min <= max { (min, max) } else { (max, min) };
    rand::thread_rng().gen_range(low..=high)
}
