//! Client and payload types for SMSHub-compatible `handler_api` endpoints.

mod client;
mod models;

pub use client::{DEFAULT_API_URL, SmsHubClient};
pub use models::{PriceEntry, PriceList, SkipReason, SkippedEntry};
