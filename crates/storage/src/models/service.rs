use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_SERVICE_CATEGORY: &str = "Other";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Service {
    pub id: i32,
    #[sqlx(rename = "smshubCode")]
    pub smshub_code: String,
    pub name: String,
    pub category: String,
    pub active: bool,
    #[sqlx(rename = "markupPercentage")]
    pub markup_percentage: i32,
    #[sqlx(rename = "markupFixed")]
    pub markup_fixed: i32,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Service {
    /// Display name given to a service the first time its code is seen.
    pub fn default_name(code: &str) -> String {
        format!("Service {}", code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_name_embeds_code() {
        assert_eq!(Service::default_name("ya"), "Service ya");
        assert_eq!(Service::default_name("wa"), "Service wa");
    }
}
