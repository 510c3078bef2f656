use serde::{Deserialize, Serialize};
use crate::models::domain::{Cafe, CafePick, Preference};

/// Response for the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub preference: Preference,
    pub count: usize,
    pub preview: Vec<Cafe>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picks: Option<Vec<CafePick>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
