//! Database queries for package records

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Package, PricingModule};

/// Fetch the pricing-relevant slice of a package
pub async fn get_package(pool: &PgPool, package_id: Uuid) -> Result<Package> {
    sqlx::query_as::<_, Package>(
        r#"
        SELECT id, title, currency, duration_nights,
               pricing_module, quote_source, upstream_product_code
        FROM packages
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(package_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

/// Record the selected pricing module for a package
pub async fn set_pricing_module(
    pool: &PgPool,
    package_id: Uuid,
    module: PricingModule,
) -> Result<()> {
    let result = sqlx::query(
        "UPDATE packages SET pricing_module = $2 WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(package_id)
    .bind(module.as_str())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
