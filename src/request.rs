use crate::serde::Deserialize;
use uuid::Uuid;

/// Raw filter selections; absent or `"none"` means any.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub county: Option<String>,
    pub city: Option<String>,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub field: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OwnerParams {
    pub owner_id: Option<Uuid>,
}
