//! Seed the product catalog from JSON files.
//!
//! # Usage
//!
//! ```bash
//! vt-cli seed --dir assets/json
//! ```
//!
//! Each `<category>.json` file holds an array of products. The existing
//! catalog is replaced.

use std::path::Path;

use tracing::info;

use vitrine_storefront::catalog::seed_from_dir;
use vitrine_storefront::config::get_database_url;
use vitrine_storefront::db;

/// Replace the catalog with the products in `dir`.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the files cannot be read
/// or parsed, or the database write fails.
pub async fn products(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let database_url = get_database_url("STOREFRONT_DATABASE_URL")?;

    // Check the directory before connecting
    if !dir.is_dir() {
        return Err(format!("Directory not found: {}", dir.display()).into());
    }

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let result = seed_from_dir(&pool, dir).await?;

    info!("Seeding complete!");
    for (category, count) in &result.categories {
        info!("  {category}: {count} products");
    }
    info!("  Products inserted: {}", result.inserted);

    Ok(())
}
