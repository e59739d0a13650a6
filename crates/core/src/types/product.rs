//! Catalog product records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::identity::ProductIdentity;

/// A product as listed by the catalog API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Current price in USD.
    pub price: Decimal,
    /// Previous price in USD, shown struck through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_price: Option<Decimal>,
    pub img: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Hair length, e.g. `22"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    #[serde(default, rename = "lace_type", skip_serializing_if = "Option::is_none")]
    pub lace_type: Option<String>,
    #[serde(default, rename = "hair_type", skip_serializing_if = "Option::is_none")]
    pub hair_type: Option<String>,
}

impl Product {
    /// The identity a cart line for this product carries.
    #[must_use]
    pub fn identity(&self) -> ProductIdentity {
        ProductIdentity::new(self.img.clone(), self.name.clone())
    }

    /// Length, lace and hair type joined, e.g. `22" HD Lace Body Wave`.
    ///
    /// Falls back to the product name when none of them is set.
    #[must_use]
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [&self.length, &self.lace_type, &self.hair_type]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            self.name.clone()
        } else {
            parts.join(" ")
        }
    }
}

/// A product record as found in seed files, before it has an ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub old_price: Option<Decimal>,
    pub img: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub length: Option<String>,
    #[serde(default, rename = "lace_type")]
    pub lace_type: Option<String>,
    #[serde(default, rename = "hair_type")]
    pub hair_type: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_record_accepts_numeric_prices() {
        let json = r#"{"name":"Body Wave","price":189.99,"oldPrice":229,"img":"a.png","tags":["HD lace"]}"#;
        let product: NewProduct = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Decimal::new(18999, 2));
        assert_eq!(product.old_price, Some(Decimal::new(229, 0)));
        assert_eq!(product.tags, vec!["HD lace".to_string()]);
        assert!(product.category.is_none());
    }

    #[test]
    fn test_seed_record_reads_hair_attributes() {
        let json = r#"{"name":"W1","price":"10","img":"w.png","length":"22\"","lace_type":"HD Lace","hair_type":"Body Wave"}"#;
        let product: NewProduct = serde_json::from_str(json).unwrap();
        assert_eq!(product.length.as_deref(), Some("22\""));
        assert_eq!(product.lace_type.as_deref(), Some("HD Lace"));
        assert_eq!(product.hair_type.as_deref(), Some("Body Wave"));
    }

    #[test]
    fn test_product_identity_uses_img_and_name() {
        let product = Product {
            id: ProductId::new(1),
            name: "RedWig".to_string(),
            price: Decimal::new(25, 0),
            old_price: None,
            img: "A.png".to_string(),
            tags: Vec::new(),
            category: Some("wigs".to_string()),
            length: None,
            lace_type: None,
            hair_type: None,
        };
        assert_eq!(product.identity().to_string(), "A.png|RedWig");
        assert_eq!(product.display_name(), "RedWig");

        let described = Product {
            length: Some("22\"".to_string()),
            hair_type: Some("Body Wave".to_string()),
            ..product
        };
        assert_eq!(described.display_name(), "22\" Body Wave");
    }
}
