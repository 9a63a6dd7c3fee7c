use chrono::Utc;
use sqlx::MySqlPool;

use crate::error::{Result, StorageError, generated_id};
use crate::models::{DEFAULT_SERVICE_CATEGORY, Service};

/// Repository for `services` rows
pub struct ServiceRepository<'a> {
    pool: &'a MySqlPool,
}

impl<'a> ServiceRepository<'a> {
    pub fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    /// Find a service by its upstream code
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Service>> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            SELECT id, smshubCode, name, category, active,
                   markupPercentage, markupFixed, createdAt
            FROM services
            WHERE smshubCode = ?
            LIMIT 1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool)
        .await?;

        Ok(service)
    }

    /// Insert an active, zero-markup service for `code` in its own transaction.
    ///
    /// The returned row carries the id MySQL generated for the insert.
    pub async fn create_default(&self, code: &str) -> Result<Service> {
        let name = Service::default_name(code);
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO services (smshubCode, name, category, active, markupPercentage, markupFixed, createdAt)
            VALUES (?, ?, ?, 1, 0, 0, NOW())
            "#,
        )
        .bind(code)
        .bind(&name)
        .bind(DEFAULT_SERVICE_CATEGORY)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_unique_violation() {
                StorageError::ConstraintViolation(format!("Service '{}' already exists", code))
            } else {
                err
            }
        })?;

        let id = generated_id(result.last_insert_id())?;
        tx.commit().await?;

        Ok(Service {
            id,
            smshub_code: code.to_string(),
            name,
            category: DEFAULT_SERVICE_CATEGORY.to_string(),
            active: true,
            markup_percentage: 0,
            markup_fixed: 0,
            created_at: Utc::now(),
        })
    }
}
