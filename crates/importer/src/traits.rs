use crate::Result;
use storage::models::{Country, NewPrice, PriceWrite, Service};

/// Persistence seen by the import run. Each write is durable on its own once
/// the returned future resolves.
#[async_trait::async_trait]
pub trait PriceStore: Send + Sync {
    async fn find_country(&self, smshub_id: i32) -> Result<Option<Country>>;

    async fn find_service(&self, code: &str) -> Result<Option<Service>>;

    /// Create a default service for `code` and return it with its generated id.
    async fn create_service(&self, code: &str) -> Result<Service>;

    /// Insert or overwrite the price row identified by `price.key`.
    async fn upsert_price(&self, price: &NewPrice) -> Result<PriceWrite>;
}
