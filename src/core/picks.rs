use crate::core::rubric::rubric;
use crate::models::{Cafe, CafePicksResponse, Preference, PriceLevel};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashSet;
use thiserror::Error;

/// Upper bound on picks returned by the model
pub const MAX_PICKS: usize = 5;

/// Every pick carries exactly this many tags
pub const TAGS_PER_PICK: usize = 4;

/// Name of the structured output schema sent to the model
pub const PICKS_SCHEMA_NAME: &str = "cafe_picks";

const SYSTEM_PROMPT: &str = "You are a local cafe guide. You choose cafes only from the candidate list you \
are given and answer with JSON that matches the provided schema exactly. Never invent places.";

/// Ways a model answer can break the selection contract
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickViolation {
    #[error("expected {expected} picks, got {actual}")]
    WrongCount { expected: usize, actual: usize },

    #[error("pick references unknown place_id '{0}'")]
    UnknownPlace(String),

    #[error("place_id '{0}' was picked more than once")]
    DuplicatePlace(String),

    #[error("pick for '{place_id}' has {actual} tags, expected {}", TAGS_PER_PICK)]
    WrongTagCount { place_id: String, actual: usize },

    #[error("pick for '{0}' has an empty explanation")]
    EmptyWhy(String),
}

/// Messages and constraints for one selection request
#[derive(Debug, Clone)]
pub struct SelectionPrompt {
    pub system: String,
    pub user: String,
    pub allowed_ids: Vec<String>,
    pub expected_picks: usize,
}

/// Compact candidate view shown to the model
#[derive(Debug, Clone, Serialize)]
pub struct CandidateView<'a> {
    pub place_id: &'a str,
    pub name: &'a str,
    pub address: &'a str,
    pub rating: Option<f64>,
    pub rating_count: Option<u32>,
    pub open_now: Option<bool>,
    pub price_level: Option<PriceLevel>,
    pub distance_m: f64,
}

impl<'a> From<&'a Cafe> for CandidateView<'a> {
    fn from(cafe: &'a Cafe) -> Self {
        Self {
            place_id: &cafe.place_id,
            name: &cafe.name,
            address: &cafe.address,
            rating: cafe.rating,
            rating_count: cafe.rating_count,
            open_now: cafe.open_now,
            price_level: cafe.price_level,
            distance_m: round_to_tenth(cafe.distance_m),
        }
    }
}

#[inline]
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Number of picks the model must return for `candidates` cafes
#[inline]
pub fn expected_pick_count(candidates: usize) -> usize {
    candidates.min(MAX_PICKS)
}

/// Build the prompt asking the model to choose among `cafes`
pub fn build_selection_prompt(cafes: &[Cafe], preference: Preference) -> SelectionPrompt {
    let allowed_ids: Vec<String> = cafes.iter().map(|c| c.place_id.clone()).collect();
    let expected_picks = expected_pick_count(cafes.len());

    let candidates: Vec<CandidateView<'_>> = cafes.iter().map(CandidateView::from).collect();
    // Serializing plain structs of strings and numbers can't fail
    let candidates_json = serde_json::to_string(&candidates).unwrap_or_else(|_| "[]".to_string());
    let allowed_json = serde_json::to_string(&allowed_ids).unwrap_or_else(|_| "[]".to_string());

    let user = format!(
        "Preference: {preference}\n\
         Ranking rubric: {rubric}\n\n\
         Rules:\n\
         - Return exactly {expected} picks ({max} unless fewer candidates exist).\n\
         - Each pick's place_id must be one of the allowed place_ids below.\n\
         - Do not pick the same place_id twice.\n\
         - \"why\" is 1-2 sentences explaining the choice for this preference.\n\
         - \"tags\" has exactly {tags} short tags.\n\n\
         Allowed place_ids: {allowed_json}\n\n\
         Candidates:\n{candidates_json}",
        preference = preference,
        rubric = rubric(preference),
        expected = expected_picks,
        max = MAX_PICKS,
        tags = TAGS_PER_PICK,
        allowed_json = allowed_json,
        candidates_json = candidates_json,
    );

    SelectionPrompt {
        system: SYSTEM_PROMPT.to_string(),
        user,
        allowed_ids,
        expected_picks,
    }
}

/// Strict JSON Schema for the model's answer
///
/// `place_id` is an enum of the allowed ids so the provider can reject
/// invented places. Uniqueness still has to be checked by [`validate_picks`].
pub fn picks_response_schema(allowed_ids: &[String], expected_picks: usize) -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["picks"],
        "properties": {
            "picks": {
                "type": "array",
                "minItems": expected_picks,
                "maxItems": expected_picks,
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["place_id", "why", "tags"],
                    "properties": {
                        "place_id": { "type": "string", "enum": allowed_ids },
                        "why": { "type": "string" },
                        "tags": {
                            "type": "array",
                            "minItems": TAGS_PER_PICK,
                            "maxItems": TAGS_PER_PICK,
                            "items": { "type": "string" }
                        }
                    }
                }
            }
        }
    })
}

/// Check a model answer against the selection contract
pub fn validate_picks(
    response: &CafePicksResponse,
    allowed_ids: &[String],
    expected_picks: usize,
) -> Result<(), PickViolation> {
    if response.picks.len() != expected_picks {
        return Err(PickViolation::WrongCount {
            expected: expected_picks,
            actual: response.picks.len(),
        });
    }

    let allowed: HashSet<&str> = allowed_ids.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(response.picks.len());

    for pick in &response.picks {
        let id = pick.place_id.as_str();
        if !allowed.contains(id) {
            return Err(PickViolation::UnknownPlace(pick.place_id.clone()));
        }
        if !seen.insert(id) {
            return Err(PickViolation::DuplicatePlace(pick.place_id.clone()));
        }
        if pick.tags.len() != TAGS_PER_PICK {
            return Err(PickViolation::WrongTagCount {
                place_id: pick.place_id.clone(),
                actual: pick.tags.len(),
            });
        }
        if pick.why.trim().is_empty() {
            return Err(PickViolation::EmptyWhy(pick.place_id.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CafePick;

    fn cafe(id: &str, distance_m: f64) -> Cafe {
        Cafe {
            place_id: id.to_string(),
            name: format!("Cafe {}", id),
            address: "1 Main St".to_string(),
            lat: 37.0,
            lng: -122.0,
            rating: Some(4.5),
            rating_count: Some(120),
            open_now: None,
            price_level: Some(PriceLevel::Inexpensive),
            distance_m,
        }
    }

    fn pick(id: &str) -> CafePick {
        CafePick {
            place_id: id.to_string(),
            why: "Close by and well reviewed.".to_string(),
            tags: vec!["quiet".into(), "wifi".into(), "cheap".into(), "close".into()],
        }
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_expected_pick_count() {
        assert_eq!(expected_pick_count(0), 0);
        assert_eq!(expected_pick_count(2), 2);
        assert_eq!(expected_pick_count(5), 5);
        assert_eq!(expected_pick_count(20), 5);
    }

    #[test]
    fn test_prompt_contents() {
        let cafes = vec![cafe("a", 123.456), cafe("b", 80.04)];
        let prompt = build_selection_prompt(&cafes, Preference::Busy);

        assert_eq!(prompt.allowed_ids, ids(&["a", "b"]));
        assert_eq!(prompt.expected_picks, 2);
        assert!(prompt.user.contains(rubric(Preference::Busy)));
        assert!(prompt.user.contains("Return exactly 2 picks"));
        assert!(prompt.user.contains(r#"Allowed place_ids: ["a","b"]"#));
        assert!(prompt.user.contains(r#""distance_m":123.5"#));
        assert!(prompt.user.contains(r#""distance_m":80.0"#));
        assert!(prompt.user.contains(r#""price_level":"PRICE_LEVEL_INEXPENSIVE""#));
        assert!(!prompt.user.contains(r#""lat""#));
    }

    #[test]
    fn test_schema_constrains_ids_and_counts() {
        let schema = picks_response_schema(&ids(&["a", "b"]), 2);
        let picks = &schema["properties"]["picks"];
        assert_eq!(picks["minItems"], 2);
        assert_eq!(picks["maxItems"], 2);
        assert_eq!(picks["items"]["properties"]["place_id"]["enum"], json!(["a", "b"]));
        assert_eq!(picks["items"]["properties"]["tags"]["minItems"], 4);
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        let response = CafePicksResponse { picks: vec![pick("b"), pick("a")] };
        assert_eq!(validate_picks(&response, &ids(&["a", "b"]), 2), Ok(()));
    }

    #[test]
    fn test_validate_rejects_contract_breaks() {
        let allowed = ids(&["a", "b", "c"]);

        let short = CafePicksResponse { picks: vec![pick("a")] };
        assert_eq!(
            validate_picks(&short, &allowed, 3),
            Err(PickViolation::WrongCount { expected: 3, actual: 1 })
        );

        let unknown = CafePicksResponse { picks: vec![pick("a"), pick("b"), pick("z")] };
        assert_eq!(
            validate_picks(&unknown, &allowed, 3),
            Err(PickViolation::UnknownPlace("z".to_string()))
        );

        let duplicate = CafePicksResponse { picks: vec![pick("a"), pick("b"), pick("a")] };
        assert_eq!(
            validate_picks(&duplicate, &allowed, 3),
            Err(PickViolation::DuplicatePlace("a".to_string()))
        );

        let mut three_tags = pick("c");
        three_tags.tags.pop();
        let tags = CafePicksResponse { picks: vec![pick("a"), pick("b"), three_tags] };
        assert_eq!(
            validate_picks(&tags, &allowed, 3),
            Err(PickViolation::WrongTagCount { place_id: "c".to_string(), actual: 3 })
        );

        let mut blank = pick("c");
        blank.why = "  ".to_string();
        let why = CafePicksResponse { picks: vec![pick("a"), pick("b"), blank] };
        assert_eq!(
            validate_picks(&why, &allowed, 3),
            Err(PickViolation::EmptyWhy("c".to_string()))
        );
    }
}
