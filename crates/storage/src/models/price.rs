/// Identity of a price row. At most one row exists per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PriceKey {
    pub country_id: i32,
    pub service_id: i32,
    pub api_id: i32,
}

/// Values written by an upsert; `lastSync` is always set to the database's `NOW()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPrice {
    pub key: PriceKey,
    pub smshub_price: i32,
    pub our_price: i32,
    pub quantity_available: i32,
}

/// Outcome of a price upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceWrite {
    Inserted { id: i32 },
    Updated { id: i32 },
}

impl PriceWrite {
    pub fn id(&self) -> i32 {
        match self {
            Self::Inserted { id } | Self::Updated { id } => *id,
        }
    }
}
