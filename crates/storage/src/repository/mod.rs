mod country;
mod price;
mod service;

pub use country::CountryRepository;
pub use price::PriceRepository;
pub use service::ServiceRepository;
