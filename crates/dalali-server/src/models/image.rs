use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const IMAGE_COLUMNS: &str = "id, property_id, image_url, caption, is_primary, created_at";

/// Image metadata; the binary lives in external storage behind `image_url`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PropertyImage {
    pub id: Uuid,
    pub property_id: Uuid,
    pub image_url: String,
    pub caption: String,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}
