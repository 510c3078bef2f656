use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when building a [`Coordinate`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("latitude must be within [-90, 90], got {0}")]
    LatitudeOutOfRange(f64),

    #[error("longitude must be within [-180, 180], got {0}")]
    LongitudeOutOfRange(f64),
}

/// A validated WGS84 position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateError::LongitudeOutOfRange(lng));
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

/// Place record as returned by the Places API (New) nearby search.
///
/// Every field is optional; the normalizer decides what is usable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlace {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<LocalizedText>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub location: Option<LatLng>,
    #[serde(default, deserialize_with = "lenient")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub user_rating_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub current_opening_hours: Option<OpeningHours>,
    #[serde(default, deserialize_with = "lenient")]
    pub price_level: Option<PriceLevel>,
}

/// Decode an optional provider field, treating a value of the wrong shape
/// as absent so one odd field doesn't cost the whole record
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LatLng {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHours {
    #[serde(default)]
    pub open_now: Option<bool>,
}

/// Provider price tier, kept in the provider's own spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceLevel {
    #[serde(rename = "PRICE_LEVEL_FREE")]
    Free,
    #[serde(rename = "PRICE_LEVEL_INEXPENSIVE")]
    Inexpensive,
    #[serde(rename = "PRICE_LEVEL_MODERATE")]
    Moderate,
    #[serde(rename = "PRICE_LEVEL_EXPENSIVE")]
    Expensive,
    #[serde(rename = "PRICE_LEVEL_VERY_EXPENSIVE")]
    VeryExpensive,
    #[serde(rename = "PRICE_LEVEL_UNSPECIFIED", other)]
    Unspecified,
}

/// Canonical cafe record returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cafe {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub rating: Option<f64>,
    pub rating_count: Option<u32>,
    pub open_now: Option<bool>,
    pub price_level: Option<PriceLevel>,
    pub distance_m: f64,
}

/// What the user cares about most when choosing a cafe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    Study,
    Friendly,
    Best,
    Open,
    Busy,
}

impl Preference {
    pub const ALL: [Preference; 5] = [
        Preference::Study,
        Preference::Friendly,
        Preference::Best,
        Preference::Open,
        Preference::Busy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preference::Study => "study",
            Preference::Friendly => "friendly",
            Preference::Best => "best",
            Preference::Open => "open",
            Preference::Busy => "busy",
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown preference '{0}', expected one of: study, friendly, best, open, busy")]
pub struct UnknownPreference(pub String);

impl FromStr for Preference {
    type Err = UnknownPreference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "study" => Ok(Preference::Study),
            "friendly" => Ok(Preference::Friendly),
            "best" => Ok(Preference::Best),
            "open" => Ok(Preference::Open),
            "busy" => Ok(Preference::Busy),
            other => Err(UnknownPreference(other.to_string())),
        }
    }
}

/// One cafe chosen by the language model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CafePick {
    pub place_id: String,
    pub why: String,
    pub tags: Vec<String>,
}

/// Structured output expected from the language model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CafePicksResponse {
    pub picks: Vec<CafePick>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_bounds() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert_eq!(
            Coordinate::new(95.0, 0.0),
            Err(CoordinateError::LatitudeOutOfRange(95.0))
        );
        assert_eq!(
            Coordinate::new(0.0, -180.5),
            Err(CoordinateError::LongitudeOutOfRange(-180.5))
        );
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_preference_parsing() {
        for pref in Preference::ALL {
            assert_eq!(pref.as_str().parse::<Preference>(), Ok(pref));
        }
        assert!("Best".parse::<Preference>().is_err());
        assert!("cozy".parse::<Preference>().is_err());
    }

    #[test]
    fn test_raw_place_tolerates_odd_optional_fields() {
        let raw: RawPlace = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "displayName": { "text": "Ritual", "languageCode": 7 },
            "formattedAddress": "1026 Valencia St",
            "location": { "latitude": 37.756, "longitude": -122.421 },
            "rating": "great",
            "userRatingCount": 12.5,
            "currentOpeningHours": { "openNow": "yes" },
            "priceLevel": 2
        }))
        .unwrap();

        assert_eq!(raw.id.as_deref(), Some("abc"));
        assert_eq!(raw.display_name.unwrap().language_code, None);
        assert_eq!(raw.rating, None);
        assert_eq!(raw.user_rating_count, None);
        assert!(raw.current_opening_hours.is_none());
        assert_eq!(raw.price_level, None);
    }

    #[test]
    fn test_raw_place_decodes_partial_record() {
        let raw: RawPlace = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "displayName": { "text": "Blue Bottle", "languageCode": "en" },
            "location": { "latitude": 37.77, "longitude": -122.41 },
            "priceLevel": "PRICE_LEVEL_SOMETHING_NEW"
        }))
        .unwrap();

        assert_eq!(raw.id.as_deref(), Some("abc"));
        assert!(raw.formatted_address.is_none());
        assert_eq!(raw.price_level, Some(PriceLevel::Unspecified));
    }

    #[test]
    fn test_price_level_round_trips_provider_spelling() {
        let json = serde_json::to_string(&PriceLevel::Moderate).unwrap();
        assert_eq!(json, "\"PRICE_LEVEL_MODERATE\"");
    }
}
