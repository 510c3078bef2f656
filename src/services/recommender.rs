use crate::core::ranking::rank_places;
use crate::models::{Cafe, CafePick, Coordinate, Preference};
use crate::services::openai::{OpenAiClient, SelectionError};
use crate::services::places::{PlacesClient, PlacesError};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error(transparent)]
    Places(#[from] PlacesError),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Ranked cafes for one request
#[derive(Debug)]
pub struct RankedCafes {
    pub cafes: Vec<Cafe>,
    /// Records returned by the provider, before rejects were dropped
    pub fetched: usize,
}

/// Outcome of a full recommendation run
#[derive(Debug)]
pub struct Recommendation {
    pub ranked: RankedCafes,
    pub picks: Option<Vec<CafePick>>,
}

/// Request pipeline: fetch, normalize, rank, then optionally let the model pick
///
/// Each step awaits the previous one; nothing is shared between requests
/// besides the HTTP clients.
#[derive(Clone)]
pub struct Recommender {
    places: Arc<PlacesClient>,
    selector: Arc<OpenAiClient>,
}

impl Recommender {
    pub fn new(places: Arc<PlacesClient>, selector: Arc<OpenAiClient>) -> Self {
        Self { places, selector }
    }

    /// Nearby cafes ordered by distance from `at`
    pub async fn rank(&self, at: Coordinate) -> Result<RankedCafes, PlacesError> {
        let raw = self.places.search_nearby(at).await?;
        let fetched = raw.len();
        let cafes = rank_places(at, &raw);

        if cafes.len() < fetched {
            tracing::debug!("Dropped {} incomplete place records", fetched - cafes.len());
        }

        Ok(RankedCafes { cafes, fetched })
    }

    pub async fn recommend(
        &self,
        at: Coordinate,
        preference: Preference,
        with_picks: bool,
    ) -> Result<Recommendation, RecommendError> {
        let ranked = self.rank(at).await?;

        let picks = if with_picks {
            let response = self.selector.select_picks(&ranked.cafes, preference).await?;
            Some(response.picks)
        } else {
            None
        };

        Ok(Recommendation { ranked, picks })
    }
}
