use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of `countries`; only the columns the importer reads are mapped.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Country {
    pub id: i32,
    #[sqlx(rename = "smshubId")]
    pub smshub_id: i32,
}
