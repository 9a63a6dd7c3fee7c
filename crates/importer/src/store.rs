use crate::{Result, traits::PriceStore};
use sqlx::MySqlPool;
use storage::models::{Country, NewPrice, PriceWrite, Service};
use storage::repository::{CountryRepository, PriceRepository, ServiceRepository};

/// `PriceStore` backed by the MySQL repositories of the `storage` crate.
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PriceStore for MySqlStore {
    async fn find_country(&self, smshub_id: i32) -> Result<Option<Country>> {
        Ok(CountryRepository::new(&self.pool)
            .find_by_smshub_id(smshub_id)
            .await?)
    }

    async fn find_service(&self, code: &str) -> Result<Option<Service>> {
        Ok(ServiceRepository::new(&self.pool).find_by_code(code).await?)
    }

    async fn create_service(&self, code: &str) -> Result<Service> {
        Ok(ServiceRepository::new(&self.pool).create_default(code).await?)
    }

    async fn upsert_price(&self, price: &NewPrice) -> Result<PriceWrite> {
        Ok(PriceRepository::new(&self.pool).upsert(price).await?)
    }
}
