//! Cafe Picks - nearby cafe recommendations
//!
//! Fetches cafes around a coordinate from the Google Places API, normalizes
//! and ranks them by distance, and can ask a language model to pick the best
//! five for a stated preference.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{haversine_distance, haversine_distance_m, normalize_place, rank_places, rubric};
pub use models::{Cafe, CafePick, CafePicksResponse, Coordinate, Preference, RawPlace};
