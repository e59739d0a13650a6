//! Catalog search.
//!
//! A product matches when its search text contains the query as a
//! lowercase substring. The search text is built from the hair attributes,
//! the category and the tags.

use vitrine_core::Product;

/// Category filter value meaning "no filter".
pub const ALL_CATEGORIES: &str = "All";

/// Maximum number of suggestions returned for one query.
pub const SUGGESTION_LIMIT: usize = 8;

/// Lowercased text a query is matched against.
#[must_use]
pub fn search_text(product: &Product) -> String {
    let tags = product.tags.join(" ");
    [
        product.length.as_deref().unwrap_or_default(),
        product.lace_type.as_deref().unwrap_or_default(),
        product.hair_type.as_deref().unwrap_or_default(),
        product.category.as_deref().unwrap_or_default(),
        tags.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

/// A normalized search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    category: Option<String>,
}

impl SearchQuery {
    /// `category` of `None`, empty or `All` searches every category.
    #[must_use]
    pub fn new(text: &str, category: Option<&str>) -> Self {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
            .map(String::from);

        Self {
            text: text.trim().to_lowercase(),
            category,
        }
    }

    /// The trimmed, lowercased query text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let in_category = self
            .category
            .as_deref()
            .is_none_or(|wanted| product.category.as_deref() == Some(wanted));
        in_category && search_text(product).contains(&self.text)
    }

    /// Matching products in catalog order, at most [`SUGGESTION_LIMIT`].
    ///
    /// A blank query suggests nothing.
    #[must_use]
    pub fn run<'p>(&self, products: &'p [Product]) -> Vec<&'p Product> {
        if self.text.is_empty() {
            return Vec::new();
        }
        products
            .iter()
            .filter(|product| self.matches(product))
            .take(SUGGESTION_LIMIT)
            .collect()
    }
}

/// Filter chips: `All`, then each category in order of first appearance.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut chips = vec![ALL_CATEGORIES.to_string()];
    for category in products.iter().filter_map(|p| p.category.as_deref()) {
        if !category.is_empty() && !chips.iter().any(|c| c == category) {
            chips.push(category.to_string());
        }
    }
    chips
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;
    use vitrine_core::ProductId;

    use super::*;

    fn wig(id: i32, category: &str, hair_type: &str, tags: &[&str]) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Wig {id}"),
            price: Decimal::new(100, 0),
            old_price: None,
            img: format!("{id}.png"),
            tags: tags.iter().map(ToString::to_string).collect(),
            category: Some(category.to_string()),
            length: Some("22\"".to_string()),
            lace_type: Some("HD Lace".to_string()),
            hair_type: Some(hair_type.to_string()),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            wig(1, "wigs", "Body Wave", &["human hair"]),
            wig(2, "bundles", "Straight", &["virgin"]),
            wig(3, "wigs", "Straight", &["glueless"]),
        ]
    }

    #[test]
    fn test_search_text_joins_fields_lowercased() {
        assert_eq!(
            search_text(&catalog()[0]),
            "22\" hd lace body wave wigs human hair"
        );
    }

    #[test]
    fn test_query_is_case_insensitive_substring() {
        let products = catalog();
        let hits = SearchQuery::new("  STRAIGHT ", None).run(&products);
        let ids: Vec<i32> = hits.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_category_filter_and_all() {
        let products = catalog();
        let hits = SearchQuery::new("straight", Some("wigs")).run(&products);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_i32(), 3);

        assert_eq!(SearchQuery::new("straight", Some("All")).run(&products).len(), 2);
    }

    #[test]
    fn test_blank_query_suggests_nothing() {
        assert!(SearchQuery::new("   ", None).run(&catalog()).is_empty());
    }

    #[test]
    fn test_suggestions_are_capped() {
        let products: Vec<Product> = (0..20).map(|id| wig(id, "wigs", "Curly", &[])).collect();
        assert_eq!(
            SearchQuery::new("curly", None).run(&products).len(),
            SUGGESTION_LIMIT
        );
    }

    #[test]
    fn test_categories_start_with_all() {
        assert_eq!(categories(&catalog()), vec!["All", "wigs", "bundles"]);
    }
}
