// FilterSortPanel - Category filters and sort dropdown

use crate::error::{Error, Result};
use crate::locator::Locator;
use crate::page::PageObject;
use crate::selector::Selector;
use crate::session::{SelectBy, SessionHandle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Product categories the filter panel offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Men,
    Women,
    Footwear,
    Accessories,
    Kids,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Men,
        Category::Women,
        Category::Footwear,
        Category::Accessories,
        Category::Kids,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Men => "Men",
            Category::Women => "Women",
            Category::Footwear => "Footwear",
            Category::Accessories => "Accessories",
            Category::Kids => "Kids",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| Error::InvalidSelector(format!("unknown category '{s}'")))
    }
}

#[derive(Debug, Clone)]
pub struct FilterSortPanel {
    session: SessionHandle,
}

impl PageObject for FilterSortPanel {
    const NAME: &'static str = "filter/sort panel";

    fn from_session(session: SessionHandle) -> Self {
        Self { session }
    }

    fn session(&self) -> &SessionHandle {
        &self.session
    }
}

impl FilterSortPanel {
    /// Control labelled exactly `category`. When the label appears on more
    /// than one control the first in document order is used.
    pub fn category_control(&self, category: Category) -> Locator {
        self.locator(Selector::css("button, a").with_exact_text(category.label()))
            .first()
    }

    /// Every control labelled with a known category.
    pub fn category_controls(&self) -> Locator {
        let labels: Vec<&str> = Category::ALL.iter().map(Category::label).collect();
        self.locator(
            Selector::css("button, a").with_text_matching(&format!("^({})$", labels.join("|"))),
        )
    }

    pub fn sort_select(&self) -> Locator {
        self.locator(Selector::css("select#sort"))
    }

    pub fn clear_button(&self) -> Locator {
        self.locator(Selector::css("button").with_text("Clear"))
    }

    pub async fn filter_by_category(&self, category: Category) -> Result<()> {
        tracing::debug!(%category, "Filtering by category");
        self.category_control(category).click().await
    }

    /// Selects the sort option whose visible label is `label`.
    pub async fn sort_by(&self, label: &str) -> Result<()> {
        self.sort_select()
            .select_option(SelectBy::Label(label.to_string()))
            .await
            .map(|_| ())
    }

    pub async fn clear_filters(&self) -> Result<()> {
        self.clear_button().click().await
    }

    /// Categories that have a control on the current page, without repeats.
    pub async fn available_categories(&self) -> Result<Vec<Category>> {
        let mut found = Vec::new();
        for text in self.category_controls().all_inner_texts().await? {
            if let Ok(category) = text.parse::<Category>() {
                if !found.contains(&category) {
                    found.push(category);
                }
            }
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ProductGrid;
    use crate::fake::storefront;

    #[test]
    fn test_category_labels_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.label().parse::<Category>().unwrap(), category);
        }
        assert!("men".parse::<Category>().is_err());
        assert!("Shoes".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_selectors() {
        let (_fake, session) = storefront();
        let panel: FilterSortPanel = session.page();
        assert_eq!(
            panel.category_control(Category::Men).selector().to_string(),
            "css=:is(button, a):text-is(\"Men\") >> nth=0"
        );
        assert_eq!(
            panel.category_controls().selector().to_string(),
            "css=:is(button, a):text-matches(\"^(Men|Women|Footwear|Accessories|Kids)$\")"
        );
    }

    #[tokio::test]
    async fn test_every_category_filters_the_grid() {
        let (_fake, session) = storefront();
        let panel: FilterSortPanel = session.page();
        let grid: ProductGrid = session.page();

        let available = panel.available_categories().await.unwrap();
        assert_eq!(available, Category::ALL.to_vec());

        for category in available {
            panel.filter_by_category(category).await.unwrap();
            let texts = grid.card_texts().await.unwrap();
            assert!(!texts.is_empty(), "{category}");
            for text in texts {
                assert!(text.contains(category.label()), "{category}: {text}");
            }
        }

        panel.clear_filters().await.unwrap();
        assert_eq!(grid.card_count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_sort_by_label() {
        let (fake, session) = storefront();
        let panel: FilterSortPanel = session.page();

        panel.sort_by("Price: Low to High").await.unwrap();
        assert_eq!(
            panel.sort_select().input_value().await.unwrap(),
            "Price: Low to High"
        );
        assert!(
            fake.log()
                .iter()
                .any(|entry| entry.starts_with("select css=select#sort"))
        );
    }
}
