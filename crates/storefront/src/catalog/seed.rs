//! Seed the catalog from a directory of JSON files.
//!
//! Every `*.json` file except `all_products.json` holds an array of products.
//! The file stem becomes the category of its products.
//!
//! ```text
//! assets/json/
//! ├── wigs.json          -> category "wigs"
//! ├── braids.json        -> category "braids"
//! └── all_products.json  (skipped)
//! ```

use std::path::{Path, PathBuf};

use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, instrument};
use vitrine_core::NewProduct;

use crate::db::{ProductRepository, RepositoryError};

/// File that aggregates the others and is never seeded.
const AGGREGATE_FILE: &str = "all_products.json";

/// Seeding errors.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid product file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result of a seeding run.
#[derive(Debug, Default)]
pub struct SeedResult {
    /// Category and product count of each seeded file, in file name order.
    pub categories: Vec<(String, usize)>,
    /// Number of products inserted.
    pub inserted: u64,
}

/// Read every seed file in `dir`, tagging products with their category.
///
/// Files are read in name order so repeated runs insert in the same order.
///
/// # Errors
///
/// Returns `SeedError::Io` if the directory or a file cannot be read and
/// `SeedError::Parse` if a file is not an array of products.
pub async fn load_seed_dir(dir: &Path) -> Result<Vec<(String, Vec<NewProduct>)>, SeedError> {
    let io_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source| SeedError::Io { path, source }
    };

    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_error(dir))?;
    while let Some(entry) = entries.next_entry().await.map_err(io_error(dir))? {
        let path = entry.path();
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let is_aggregate = path.file_name().is_some_and(|name| name == AGGREGATE_FILE);
        if is_json && !is_aggregate {
            files.push(path);
        }
    }
    files.sort();

    let mut seeded = Vec::with_capacity(files.len());
    for path in files {
        let Some(category) = path.file_stem().and_then(|s| s.to_str()).map(String::from) else {
            continue;
        };

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(io_error(&path))?;
        let mut products: Vec<NewProduct> =
            serde_json::from_str(&content).map_err(|source| SeedError::Parse {
                path: path.clone(),
                source,
            })?;

        for product in &mut products {
            product.category = Some(category.clone());
        }
        seeded.push((category, products));
    }

    Ok(seeded)
}

/// Replace the catalog with the contents of `dir`.
///
/// The existing catalog is only cleared once every file has been read.
///
/// # Errors
///
/// Returns `SeedError` if reading the files or writing the catalog fails.
#[instrument(skip(pool), fields(dir = %dir.display()))]
pub async fn seed_from_dir(pool: &PgPool, dir: &Path) -> Result<SeedResult, SeedError> {
    let seeded = load_seed_dir(dir).await?;

    let mut result = SeedResult::default();
    let mut products = Vec::new();
    for (category, batch) in seeded {
        info!(category = %category, count = batch.len(), "Loaded seed file");
        result.categories.push((category, batch.len()));
        products.extend(batch);
    }

    result.inserted = ProductRepository::new(pool).replace_all(&products).await?;
    info!(inserted = result.inserted, "Catalog seeded");
    Ok(result)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, name: &str, content: &str) {
        std::fs::write(dir.path().join(name), content).unwrap();
    }

    #[tokio::test]
    async fn test_category_comes_from_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir,
            "wigs.json",
            r#"[{"name":"RedWig","price":25,"oldPrice":30,"img":"A.png","tags":["new"]}]"#,
        );
        write(&dir, "braids.json", r#"[{"name":"Box","price":"12.5","img":"B.png"}]"#);
        write(&dir, "all_products.json", r#"[{"name":"Dup","price":1,"img":"C.png"}]"#);
        write(&dir, "notes.txt", "ignored");

        let seeded = load_seed_dir(dir.path()).await.unwrap();

        let categories: Vec<&str> = seeded.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(categories, ["braids", "wigs"]);

        let wig = &seeded[1].1[0];
        assert_eq!(wig.category.as_deref(), Some("wigs"));
        assert_eq!(wig.price, Decimal::new(25, 0));
        assert_eq!(wig.old_price, Some(Decimal::new(30, 0)));
        assert_eq!(wig.tags, ["new"]);
        assert_eq!(seeded[0].1[0].price, Decimal::new(125, 1));
    }

    #[tokio::test]
    async fn test_invalid_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "wigs.json", r#"{"name":"RedWig"}"#);

        let err = load_seed_dir(dir.path()).await.unwrap_err();
        assert!(matches!(err, SeedError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_missing_dir_is_reported() {
        let err = load_seed_dir(Path::new("/nonexistent/vitrine-seed"))
            .await
            .unwrap_err();
        assert!(matches!(err, SeedError::Io { .. }));
    }
}
