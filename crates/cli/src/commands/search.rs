//! Catalog search from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Suggestions for a query, remembered as a recent search when anything matches
//! vt-cli search "body wave" --category wigs
//!
//! # Recent searches
//! vt-cli search
//! ```

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use vitrine_core::Product;
use vitrine_storefront::cart::{FileStorage, StorageArea};
use vitrine_storefront::catalog::SearchQuery;
use vitrine_storefront::config::get_database_url;
use vitrine_storefront::db::{self, ProductRepository};
use vitrine_storefront::search_history::RecentSearches;

/// Search the catalog, or list recent searches when `query` is `None`.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the recent-search
/// list cannot be saved.
pub async fn run(
    storage: &Path,
    query: Option<&str>,
    category: Option<&str>,
) -> Result<String, Box<dyn std::error::Error>> {
    let storage: Arc<dyn StorageArea> = Arc::new(FileStorage::new(storage));
    let recent = RecentSearches::new(storage);

    let Some(query) = query else {
        return Ok(render_recent(&recent.list()));
    };

    dotenvy::dotenv().ok();
    let database_url = get_database_url("STOREFRONT_DATABASE_URL")?;
    let pool = db::create_pool(&database_url).await?;
    let products = ProductRepository::new(&pool).list(None).await?;

    let hits = SearchQuery::new(query, category).run(&products);
    if !hits.is_empty() {
        recent.record(query)?;
    }
    Ok(render_hits(&hits))
}

fn render_hits(hits: &[&Product]) -> String {
    if hits.is_empty() {
        return "No results found.\n".to_string();
    }
    let mut out = String::new();
    for product in hits {
        let _ = writeln!(out, "  {}  [{}]", product.display_name(), product.identity());
    }
    out
}

fn render_recent(recent: &[String]) -> String {
    if recent.is_empty() {
        return "No recent searches.\n".to_string();
    }
    format!("Recent: {}\n", recent.join(", "))
}
