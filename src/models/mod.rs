// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Cafe, CafePick, CafePicksResponse, Coordinate, CoordinateError, LatLng, LocalizedText,
    OpeningHours, Preference, PriceLevel, RawPlace, UnknownPreference,
};
pub use requests::RecommendationRequest;
pub use responses::{ErrorResponse, HealthResponse, RecommendationResponse};
