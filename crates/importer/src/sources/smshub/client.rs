use super::models::PriceList;
use crate::error::Result;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.sms24h.org/stubs/handler_api";

pub struct SmsHubClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl SmsHubClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::builder()
                .user_agent(concat!("sms-price-importer/", env!("CARGO_PKG_VERSION")))
                .timeout(timeout)
                .build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base_url}?api_key=..&action=getPrices&country=..`
    pub async fn fetch_prices(&self, country: i32) -> Result<PriceList> {
        let country = country.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("action", "getPrices"),
                ("country", country.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        debug!("getPrices returned {} bytes", body.len());

        PriceList::from_body(&body)
    }
}
