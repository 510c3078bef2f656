use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::future::{ready, Ready};
use subtle::ConstantTimeEq;

use crate::config::AuthSettings;
use crate::routes::error::ApiError;
use crate::routes::recommendations::AppState;

/// Caller that passed HTTP basic auth
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub String);

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState missing from app data, rejecting request");
        ApiError::Unauthorized
    })?;

    let (username, password) = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_basic_credentials)
        .ok_or(ApiError::Unauthorized)?;

    if credentials_match(&state.auth, &username, &password) {
        Ok(AuthenticatedUser(username))
    } else {
        tracing::info!("Rejected credentials on {}", req.path());
        Err(ApiError::Unauthorized)
    }
}

/// Decode an `Authorization: Basic ...` header into (username, password)
pub fn parse_basic_credentials(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some((username.to_string(), password.to_string()))
}

/// Compare both fields in constant time; both are always checked
pub fn credentials_match(expected: &AuthSettings, username: &str, password: &str) -> bool {
    let user_ok = username.as_bytes().ct_eq(expected.username.as_bytes());
    let pass_ok = password.as_bytes().ct_eq(expected.password.as_bytes());
    bool::from(user_ok & pass_ok)
}
