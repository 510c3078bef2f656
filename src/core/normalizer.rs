use crate::core::distance::haversine_distance_m;
use crate::models::{Cafe, Coordinate, RawPlace};

/// Turn a provider record into a [`Cafe`], or `None` if it is unusable
///
/// Required: id, display name, formatted address and both coordinates.
/// Empty strings count as missing. Coordinates are only checked for
/// presence, so a place on the equator or prime meridian is kept.
pub fn normalize_place(raw: &RawPlace, user: Coordinate) -> Option<Cafe> {
    let place_id = non_empty(raw.id.as_deref())?;
    let name = non_empty(raw.display_name.as_ref().and_then(|n| n.text.as_deref()))?;
    let address = non_empty(raw.formatted_address.as_deref())?;

    let location = raw.location.as_ref()?;
    let lat = location.latitude?;
    let lng = location.longitude?;

    // Out-of-range provider coordinates can't yield a meaningful distance
    let place = Coordinate::new(lat, lng).ok()?;

    Some(Cafe {
        place_id: place_id.to_string(),
        name: name.to_string(),
        address: address.to_string(),
        lat,
        lng,
        rating: raw.rating,
        rating_count: raw.user_rating_count,
        open_now: raw.current_opening_hours.as_ref().and_then(|h| h.open_now),
        price_level: raw.price_level,
        distance_m: haversine_distance_m(user, place),
    })
}

#[inline]
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
