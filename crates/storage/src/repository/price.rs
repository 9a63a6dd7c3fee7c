use sqlx::{MySql, MySqlPool, Transaction};
use tracing::debug;

use crate::error::{Result, StorageError, generated_id};
use crate::models::{NewPrice, PriceKey, PriceWrite};

/// Repository for `prices` rows
pub struct PriceRepository<'a> {
    pool: &'a MySqlPool,
}

impl<'a> PriceRepository<'a> {
    pub fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    /// Insert or overwrite the price for `price.key` and commit.
    ///
    /// The existence check and the write share one transaction; dropping it on
    /// an error path rolls the row back.
    pub async fn upsert(&self, price: &NewPrice) -> Result<PriceWrite> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT id FROM prices
            WHERE countryId = ? AND serviceId = ? AND apiId = ?
            LIMIT 1
            "#,
        )
        .bind(price.key.country_id)
        .bind(price.key.service_id)
        .bind(price.key.api_id)
        .fetch_optional(&mut *tx)
        .await?;

        let write = match existing {
            Some(id) => {
                Self::update(id, price, &mut tx).await?;
                PriceWrite::Updated { id }
            }
            None => PriceWrite::Inserted {
                id: Self::insert(price, &mut tx).await?,
            },
        };

        tx.commit().await?;
        debug!(?write, key = ?price.key, "Price committed");

        Ok(write)
    }

    async fn insert(price: &NewPrice, tx: &mut Transaction<'_, MySql>) -> Result<i32> {
        let result = sqlx::query(
            r#"
            INSERT INTO prices (apiId, countryId, serviceId, smshubPrice, ourPrice, quantityAvailable, lastSync, createdAt)
            VALUES (?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(price.key.api_id)
        .bind(price.key.country_id)
        .bind(price.key.service_id)
        .bind(price.smshub_price)
        .bind(price.our_price)
        .bind(price.quantity_available)
        .execute(&mut **tx)
        .await?;

        generated_id(result.last_insert_id())
    }

    async fn update(id: i32, price: &NewPrice, tx: &mut Transaction<'_, MySql>) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE prices
            SET smshubPrice = ?, ourPrice = ?, quantityAvailable = ?, lastSync = NOW()
            WHERE id = ?
            "#,
        )
        .bind(price.smshub_price)
        .bind(price.our_price)
        .bind(price.quantity_available)
        .bind(id)
        .execute(&mut **tx)
        .await?;

        // sqlx connects with CLIENT_FOUND_ROWS, so matched-but-unchanged rows still count.
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use crate::models::Service;
    use crate::repository::{CountryRepository, ServiceRepository};
    use sqlx::mysql::MySqlConnectOptions;
    use std::str::FromStr;

    #[derive(Debug, sqlx::FromRow)]
    struct StoredPrice {
        #[sqlx(rename = "ourPrice")]
        our_price: i32,
        #[sqlx(rename = "quantityAvailable")]
        quantity_available: i32,
    }

    async fn stored_price(pool: &MySqlPool, key: PriceKey) -> StoredPrice {
        sqlx::query_as::<_, StoredPrice>(
            r#"
            SELECT ourPrice, quantityAvailable
            FROM prices
            WHERE countryId = ? AND serviceId = ? AND apiId = ?
            "#,
        )
        .bind(key.country_id)
        .bind(key.service_id)
        .bind(key.api_id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn connect() -> Database {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let options = MySqlConnectOptions::from_str(&url).unwrap();
        Database::connect(options).await.unwrap()
    }

    #[tokio::test]
    #[ignore] // Only run against a disposable MySQL database with the schema loaded
    async fn test_upsert_inserts_then_updates() {
        let db = connect().await;
        let country = CountryRepository::new(db.pool())
            .find_by_smshub_id(73)
            .await
            .unwrap()
            .expect("country 73 seeded");

        let services = ServiceRepository::new(db.pool());
        let code = format!("test-{}", chrono::Utc::now().timestamp_millis());
        let service = services.create_default(&code).await.unwrap();
        assert_eq!(service.name, Service::default_name(&code));
        let found = services.find_by_code(&code).await.unwrap().unwrap();
        assert_eq!(found.id, service.id);

        let repo = PriceRepository::new(db.pool());
        let key = PriceKey {
            country_id: country.id,
            service_id: service.id,
            api_id: 2,
        };
        let mut price = NewPrice {
            key,
            smshub_price: 150,
            our_price: 300,
            quantity_available: 20,
        };

        let first = repo.upsert(&price).await.unwrap();
        assert!(matches!(first, PriceWrite::Inserted { .. }));

        price.quantity_available = 5;
        let second = repo.upsert(&price).await.unwrap();
        assert_eq!(second, PriceWrite::Updated { id: first.id() });

        let stored = stored_price(db.pool(), key).await;
        assert_eq!(stored.quantity_available, 5);
        assert_eq!(stored.our_price, 300);
    }
}
