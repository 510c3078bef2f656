use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for `POST /recommendations`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendationRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    /// Parsed into a `Preference` by the handler so unknown tags get a
    /// descriptive 400 instead of a generic JSON error
    pub preference: String,
    /// Ask the language model to pick the top cafes as well
    #[serde(default)]
    pub picks: bool,
}
