use actix_web::{web, HttpResponse};
use std::sync::Arc;
use validator::Validate;

use crate::config::{AuthSettings, Settings};
use crate::models::{Coordinate, HealthResponse, Preference, RecommendationRequest, RecommendationResponse};
use crate::routes::auth::AuthenticatedUser;
use crate::routes::error::ApiError;
use crate::services::{OpenAiClient, PlacesClient, RecommendError, Recommender};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
    pub auth: AuthSettings,
}

impl AppState {
    /// Build provider clients from loaded settings
    pub fn from_settings(settings: &Settings) -> Result<Self, RecommendError> {
        let places = Arc::new(PlacesClient::new(&settings.places)?);
        let selector = Arc::new(OpenAiClient::new(&settings.openai)?);

        Ok(Self {
            recommender: Recommender::new(places, selector),
            auth: settings.auth.clone(),
        })
    }
}

/// Configure recommendation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/recommendations", web::post().to(recommendations));
}

/// Liveness probe, no auth
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Recommend nearby cafes
///
/// POST /recommendations
///
/// Request body:
/// ```json
/// {
///   "lat": 37.7749,
///   "lng": -122.4194,
///   "preference": "study|friendly|best|open|busy",
///   "picks": false
/// }
/// ```
async fn recommendations(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<RecommendationRequest>,
) -> Result<HttpResponse, ApiError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for recommendations request: {}", errors);
        return Err(ApiError::Validation(errors.to_string()));
    }

    let at = Coordinate::new(req.lat, req.lng).map_err(|e| ApiError::Validation(e.to_string()))?;
    let preference: Preference = req
        .preference
        .parse()
        .map_err(|e: crate::models::UnknownPreference| ApiError::Validation(e.to_string()))?;

    tracing::info!(
        "Recommending cafes for {} near ({}, {}), preference: {}, picks: {}",
        user.0,
        at.lat(),
        at.lng(),
        preference,
        req.picks
    );

    let recommendation = state
        .recommender
        .recommend(at, preference, req.picks)
        .await
        .map_err(|e| {
            tracing::error!("Recommendation failed: {}", e);
            ApiError::from(e)
        })?;

    let preview = recommendation.ranked.cafes;
    let response = RecommendationResponse {
        preference,
        count: preview.len(),
        preview,
        picks: recommendation.picks,
    };

    tracing::info!(
        "Returning {} cafes (from {} fetched){}",
        response.count,
        recommendation.ranked.fetched,
        response
            .picks
            .as_ref()
            .map(|p| format!(" with {} picks", p.len()))
            .unwrap_or_default()
    );

    Ok(HttpResponse::Ok().json(response))
}
