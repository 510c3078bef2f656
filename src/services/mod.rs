// Service exports
pub mod openai;
pub mod places;
pub mod recommender;

pub use openai::{OpenAiClient, SelectionError};
pub use places::{PlacesClient, PlacesError};
pub use recommender::{RankedCafes, RecommendError, Recommendation, Recommender};
