//! Product listing handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vitrine_core::{CurrencyContext, PriceFormatter, Product, RateFormatter};

use super::currency::requested_currency;
use crate::error::Result;
use crate::state::AppState;

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub category: Option<String>,
    /// Display currency for rendered prices; USD when absent.
    pub currency: Option<String>,
}

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    /// Category chip; `All` or absent searches everything.
    pub category: Option<String>,
}

/// One search suggestion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    /// Length, lace and hair type, or the name when those are unset.
    pub display_name: String,
    #[serde(flatten)]
    pub product: Product,
}

impl From<Product> for SearchHit {
    fn from(product: Product) -> Self {
        Self {
            display_name: product.display_name(),
            product,
        }
    }
}

/// Product card display data for templates.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    /// `img|name`, matched against cart line identities.
    pub identity: String,
    pub name: String,
    pub img: String,
    pub tags: Vec<String>,
    /// Base price in USD, e.g. `25.00`.
    pub price_base: String,
    /// Converted price with symbol.
    pub price: String,
    /// Converted old price with symbol; empty when there is none.
    pub old_price: String,
    pub old_price_base: String,
}

impl ProductCardView {
    #[must_use]
    pub fn new(product: &Product, currency: &CurrencyContext) -> Self {
        let display = |amount: Decimal| {
            format!(
                "{}{}",
                currency.symbol,
                RateFormatter::new(currency.rate).format(amount)
            )
        };

        Self {
            identity: product.identity().to_string(),
            name: product.name.clone(),
            img: product.img.clone(),
            tags: product.tags.clone(),
            price_base: product.price.to_string(),
            price: display(product.price),
            old_price: product.old_price.map(display).unwrap_or_default(),
            old_price_base: product
                .old_price
                .map(|old| old.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Product grid fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub cards: Vec<ProductCardView>,
}

impl ProductGridTemplate {
    #[must_use]
    pub fn new(products: &[Product], currency: &CurrencyContext) -> Self {
        Self {
            cards: products
                .iter()
                .map(|product| ProductCardView::new(product, currency))
                .collect(),
        }
    }
}

/// List products as JSON, optionally filtered by category.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = state.catalog().products(query.category.as_deref()).await?;
    Ok(Json(products.as_ref().clone()))
}

/// Render the product grid fragment.
#[tracing::instrument(skip(state))]
pub async fn grid(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<ProductGridTemplate> {
    let currency = requested_currency(query.currency.as_deref())?;
    let products = state.catalog().products(query.category.as_deref()).await?;
    Ok(ProductGridTemplate::new(&products, &currency.context()))
}

/// Search suggestions as JSON.
#[tracing::instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchHit>>> {
    let hits = state
        .catalog()
        .search(&params.q, params.category.as_deref())
        .await?;
    Ok(Json(hits.into_iter().map(SearchHit::from).collect()))
}

/// Category filter chips as JSON, `All` first.
#[tracing::instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.catalog().categories().await?))
}
