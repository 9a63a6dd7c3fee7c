use crate::pricing::{Markup, Quote};
use crate::sources::smshub::{PriceEntry, PriceList, SkippedEntry};
use crate::traits::PriceStore;
use crate::{ImporterError, Result};
use std::fmt;
use storage::models::{NewPrice, PriceKey, PriceWrite, Service};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSettings {
    /// Row id of the upstream provider in `sms_apis`, stored as `prices.apiId`.
    pub api_id: i32,
    /// Upstream numeric code of the country every price is attached to.
    pub country: i32,
    pub markup: Markup,
}

/// Counters for one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub updated: usize,
    pub services_created: usize,
    pub skipped: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.imported + self.updated
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Import finished")?;
        writeln!(f, "   - Prices imported: {}", self.imported)?;
        writeln!(f, "   - Prices updated: {}", self.updated)?;
        writeln!(f, "   - Services created: {}", self.services_created)?;
        writeln!(f, "   - Entries skipped: {}", self.skipped)?;
        write!(f, "   - Total: {}", self.total())
    }
}

/// A price entry together with the prices that would be stored for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedEntry {
    pub entry: PriceEntry,
    pub quote: Quote,
}

/// Walks a price list and upserts one service/price pair per entry.
pub struct PriceImporter<'a, S: PriceStore> {
    store: &'a S,
    settings: ImportSettings,
}

impl<'a, S: PriceStore> PriceImporter<'a, S> {
    pub fn new(store: &'a S, settings: ImportSettings) -> Self {
        Self { store, settings }
    }

    /// Import every usable entry of `prices` against the configured country.
    ///
    /// Fails with [`ImporterError::CountryNotFound`] before any write when the
    /// country row does not exist. Any other error stops the run; rows
    /// committed before it stay committed.
    pub async fn run(&self, prices: &PriceList) -> Result<ImportSummary> {
        let country = self
            .store
            .find_country(self.settings.country)
            .await?
            .ok_or(ImporterError::CountryNotFound(self.settings.country))?;

        info!(
            "Processing {} entries for country {} (id {}) with {}% markup",
            prices.len(),
            self.settings.country,
            country.id,
            self.settings.markup.as_percent()
        );

        let mut summary = ImportSummary::default();

        for parsed in prices.entries() {
            let entry = match parsed {
                Ok(entry) => entry,
                Err(skipped) => {
                    log_skip(&skipped);
                    summary.skipped += 1;
                    continue;
                }
            };

            let quote = Quote::new(entry.cost, self.settings.markup)?;
            let service = self.resolve_service(&entry.service_code, &mut summary).await?;

            let price = NewPrice {
                key: PriceKey {
                    country_id: country.id,
                    service_id: service.id,
                    api_id: self.settings.api_id,
                },
                smshub_price: quote.smshub_price,
                our_price: quote.our_price,
                quantity_available: entry.count,
            };

            match self.store.upsert_price(&price).await? {
                PriceWrite::Inserted { id } => {
                    debug!("Inserted price {} for service {}", id, entry.service_code);
                    summary.imported += 1;
                }
                PriceWrite::Updated { id } => {
                    debug!("Updated price {} for service {}", id, entry.service_code);
                    summary.updated += 1;
                }
            }
        }

        Ok(summary)
    }

    async fn resolve_service(&self, code: &str, summary: &mut ImportSummary) -> Result<Service> {
        if let Some(service) = self.store.find_service(code).await? {
            return Ok(service);
        }

        let service = self.store.create_service(code).await?;
        info!("Created service '{}' (id {})", code, service.id);
        summary.services_created += 1;

        Ok(service)
    }
}

/// Price every usable entry without touching the database.
pub fn preview(prices: &PriceList, markup: Markup) -> Result<(Vec<PricedEntry>, ImportSummary)> {
    let mut priced = Vec::with_capacity(prices.len());
    let mut summary = ImportSummary::default();

    for parsed in prices.entries() {
        match parsed {
            Ok(entry) => {
                let quote = Quote::new(entry.cost, markup)?;
                priced.push(PricedEntry { entry, quote });
            }
            Err(skipped) => {
                log_skip(&skipped);
                summary.skipped += 1;
            }
        }
    }

    Ok((priced, summary))
}

fn log_skip(skipped: &SkippedEntry) {
    warn!(
        "Skipping {}/{}: {}",
        skipped.country_code, skipped.service_code, skipped.reason
    );
}
