pub mod config;
pub mod error;
pub mod pricing;
pub mod sources;
pub mod store;
pub mod sync;
pub mod traits;

pub use config::ConnectionSettings;
pub use error::{ImporterError, Result};
pub use pricing::{Markup, Quote};
pub use store::MySqlStore;
pub use sync::{ImportSettings, ImportSummary, PriceImporter};
pub use traits::PriceStore;

// Re-export upstream price list types
pub use sources::smshub::{PriceEntry, PriceList, SkipReason, SkippedEntry, SmsHubClient};
