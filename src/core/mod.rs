// Core algorithm exports
pub mod distance;
pub mod normalizer;
pub mod picks;
pub mod ranking;
pub mod rubric;

pub use distance::{haversine_distance, haversine_distance_m, EARTH_RADIUS_M};
pub use normalizer::normalize_place;
pub use picks::{
    build_selection_prompt, expected_pick_count, picks_response_schema, validate_picks,
    PickViolation, SelectionPrompt, MAX_PICKS, TAGS_PER_PICK,
};
pub use ranking::{rank_places, sort_by_distance};
pub use rubric::{rubric, rubric_for};
