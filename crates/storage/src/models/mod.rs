mod country;
mod price;
mod service;

pub use country::Country;
pub use price::{NewPrice, PriceKey, PriceWrite};
pub use service::{DEFAULT_SERVICE_CATEGORY, Service};
