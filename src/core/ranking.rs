use crate::core::normalizer::normalize_place;
use crate::models::{Cafe, Coordinate, RawPlace};
use std::collections::HashSet;

/// Normalize raw places and order them nearest first
///
/// Rejected records are dropped, as is any repeat of a place id already
/// seen (the first occurrence in provider order wins). The sort is stable,
/// so places at the same distance keep the provider's order.
pub fn rank_places(user: Coordinate, raw: &[RawPlace]) -> Vec<Cafe> {
    let mut seen = HashSet::new();
    let mut cafes: Vec<Cafe> = raw
        .iter()
        .filter_map(|place| normalize_place(place, user))
        .filter(|cafe| seen.insert(cafe.place_id.clone()))
        .collect();

    sort_by_distance(&mut cafes);
    cafes
}

/// Stable ascending sort on `distance_m`
pub fn sort_by_distance(cafes: &mut [Cafe]) {
    cafes.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LatLng, LocalizedText};

    fn raw(id: &str, lat: f64, lng: f64) -> RawPlace {
        RawPlace {
            id: Some(id.to_string()),
            display_name: Some(LocalizedText {
                text: Some(format!("Cafe {}", id)),
                language_code: None,
            }),
            formatted_address: Some("1 Main St".to_string()),
            location: Some(LatLng {
                latitude: Some(lat),
                longitude: Some(lng),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_sorted_nearest_first() {
        let user = Coordinate::new(0.0, 0.0).unwrap();
        let places = vec![raw("far", 0.01, 0.0), raw("near", 0.001, 0.0), raw("mid", 0.005, 0.0)];

        let ids: Vec<String> = rank_places(user, &places)
            .into_iter()
            .map(|c| c.place_id)
            .collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
    }

    #[test]
    fn test_ties_keep_provider_order() {
        let user = Coordinate::new(0.0, 0.0).unwrap();
        // Same distance north, south, east and west of the user
        let places = vec![
            raw("n", 0.002, 0.0),
            raw("s", -0.002, 0.0),
            raw("close", 0.001, 0.0),
            raw("e", 0.0, 0.002),
            raw("w", 0.0, -0.002),
        ];

        let ids: Vec<String> = rank_places(user, &places)
            .into_iter()
            .map(|c| c.place_id)
            .collect();
        assert_eq!(ids, vec!["close", "n", "s", "e", "w"]);
    }

    #[test]
    fn test_rejects_are_dropped() {
        let user = Coordinate::new(0.0, 0.0).unwrap();
        let mut broken = raw("broken", 0.001, 0.0);
        broken.formatted_address = None;

        let cafes = rank_places(user, &[broken, raw("ok", 0.002, 0.0)]);
        assert_eq!(cafes.len(), 1);
        assert_eq!(cafes[0].place_id, "ok");
    }

    #[test]
    fn test_repeated_place_id_keeps_first() {
        let user = Coordinate::new(0.0, 0.0).unwrap();
        let mut repeat = raw("a", 0.001, 0.0);
        repeat.formatted_address = Some("2 Side St".to_string());
        let places = vec![raw("a", 0.002, 0.0), raw("b", 0.003, 0.0), repeat];

        let cafes = rank_places(user, &places);
        let ids: Vec<&str> = cafes.iter().map(|c| c.place_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(cafes[0].address, "1 Main St");
    }

    #[test]
    fn test_empty_input() {
        let user = Coordinate::new(10.0, 10.0).unwrap();
        assert!(rank_places(user, &[]).is_empty());
    }
}
