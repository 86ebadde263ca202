use chrono::Utc;
use serde::Serialize;

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
    pub timestamp: i64,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            total_count: None,
            timestamp: Utc::now().timestamp(),
        }
    }
}
