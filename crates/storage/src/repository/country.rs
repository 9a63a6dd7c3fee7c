use sqlx::MySqlPool;

use crate::error::Result;
use crate::models::Country;

/// Read-only access to `countries`.
pub struct CountryRepository<'a> {
    pool: &'a MySqlPool,
}

impl<'a> CountryRepository<'a> {
    pub fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    /// Find a country by the upstream provider's numeric code
    pub async fn find_by_smshub_id(&self, smshub_id: i32) -> Result<Option<Country>> {
        let country = sqlx::query_as::<_, Country>(
            r#"
            SELECT id, smshubId
            FROM countries
            WHERE smshubId = ?
            LIMIT 1
            "#,
        )
        .bind(smshub_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(country)
    }
}
