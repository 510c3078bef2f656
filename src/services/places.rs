use crate::config::PlacesSettings;
use crate::models::{Coordinate, RawPlace};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Fields requested from the nearby search, one per [`RawPlace`] field
pub const FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,places.location,\
places.rating,places.userRatingCount,places.currentOpeningHours.openNow,places.priceLevel";

/// Errors that can occur when calling the Places API
#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("places request timed out after {0}s")]
    Timeout(u64),

    #[error("places API returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Google Places API (New) client
///
/// Issues a single nearby search per call, no retries.
pub struct PlacesClient {
    base_url: String,
    api_key: String,
    radius_m: f64,
    max_results: u8,
    timeout_secs: u64,
    client: Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchNearbyRequest {
    included_types: [&'static str; 1],
    max_result_count: u8,
    rank_preference: &'static str,
    location_restriction: LocationRestriction,
}

#[derive(Debug, Serialize)]
struct LocationRestriction {
    circle: Circle,
}

#[derive(Debug, Serialize)]
struct Circle {
    center: Center,
    radius: f64,
}

#[derive(Debug, Serialize)]
struct Center {
    latitude: f64,
    longitude: f64,
}

impl PlacesClient {
    /// Create a new Places client
    pub fn new(settings: &PlacesSettings) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            radius_m: settings.radius_m,
            max_results: settings.max_results,
            timeout_secs: settings.timeout_secs,
            client,
        })
    }

    fn search_body(&self, at: Coordinate) -> SearchNearbyRequest {
        SearchNearbyRequest {
            included_types: ["cafe"],
            max_result_count: self.max_results,
            rank_preference: "DISTANCE",
            location_restriction: LocationRestriction {
                circle: Circle {
                    center: Center {
                        latitude: at.lat(),
                        longitude: at.lng(),
                    },
                    radius: self.radius_m,
                },
            },
        }
    }

    /// Search for cafes around `at`, nearest first
    ///
    /// Returns an empty list when the provider finds nothing. Records whose
    /// required fields have the wrong shape are skipped; a malformed optional
    /// field only reads as absent.
    pub async fn search_nearby(&self, at: Coordinate) -> Result<Vec<RawPlace>, PlacesError> {
        let url = format!("{}/v1/places:searchNearby", self.base_url);

        tracing::debug!("Searching nearby cafes around ({}, {})", at.lat(), at.lng());

        let response = self
            .client
            .post(&url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&self.search_body(at))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Places search failed: {} - {}", status, body);
            return Err(PlacesError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = response.json().await.map_err(|e| self.classify(e))?;

        let places = match json.get("places") {
            None | Some(Value::Null) => return Ok(vec![]),
            Some(places) => places
                .as_array()
                .ok_or_else(|| PlacesError::InvalidResponse("places is not an array".into()))?,
        };

        let raw: Vec<RawPlace> = places
            .iter()
            .filter_map(|place| match serde_json::from_value(place.clone()) {
                Ok(raw) => Some(raw),
                Err(e) => {
                    tracing::debug!("Skipping undecodable place record: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!("Places search returned {} of {} records", raw.len(), places.len());

        Ok(raw)
    }

    fn classify(&self, err: reqwest::Error) -> PlacesError {
        if err.is_timeout() {
            tracing::warn!("Places search timed out after {}s", self.timeout_secs);
            PlacesError::Timeout(self.timeout_secs)
        } else {
            PlacesError::RequestError(err)
        }
    }
}
