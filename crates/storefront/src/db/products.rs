//! Product repository.

use rust_decimal::Decimal;
use sqlx::PgPool;
use vitrine_core::{NewProduct, Product, ProductId};

use super::RepositoryError;

/// Internal row type for product queries.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    price: Decimal,
    old_price: Option<Decimal>,
    img: String,
    tags: Vec<String>,
    category: Option<String>,
    length: Option<String>,
    lace_type: Option<String>,
    hair_type: Option<String>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        if row.price.is_sign_negative() {
            return Err(RepositoryError::DataCorruption(format!(
                "negative price for product {}",
                row.id
            )));
        }

        Ok(Self {
            id: row.id,
            name: row.name,
            price: row.price,
            old_price: row.old_price,
            img: row.img,
            tags: row.tags,
            category: row.category,
            length: row.length,
            lace_type: row.lace_type,
            hair_type: row.hair_type,
        })
    }
}

/// Repository for catalog products.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, optionally restricted to one category, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, price, old_price, img, tags, category, length, lace_type, hair_type
            FROM products
            WHERE $1::TEXT IS NULL OR category = $1
            ORDER BY id
            ",
        )
        .bind(category)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Replace the whole catalog with `products` in one transaction.
    ///
    /// Returns the number of products inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing is
    /// changed in that case.
    pub async fn replace_all(&self, products: &[NewProduct]) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let cleared = sqlx::query("DELETE FROM products")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tracing::info!(cleared, "Cleared existing products");

        let mut inserted = 0;
        for product in products {
            inserted += sqlx::query(
                r"
                INSERT INTO products
                    (name, price, old_price, img, tags, category, length, lace_type, hair_type)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ",
            )
            .bind(&product.name)
            .bind(product.price)
            .bind(product.old_price)
            .bind(&product.img)
            .bind(&product.tags)
            .bind(&product.category)
            .bind(&product.length)
            .bind(&product.lace_type)
            .bind(&product.hair_type)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }
}
