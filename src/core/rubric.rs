//! Ranking rubrics handed to the language model, one per [`Preference`].

use crate::models::{Preference, UnknownPreference};

pub const STUDY_RUBRIC: &str = "The user wants somewhere to study or work. Prefer cafes that are open now, \
have a strong rating (4.2 or higher) backed by a healthy number of reviews, and an inexpensive or moderate \
price level, since long stays add up. Break ties by distance, closer is better.";

pub const FRIENDLY_RUBRIC: &str = "The user wants a warm, welcoming place to meet people. Prefer cafes with a \
high rating from a large number of reviewers, which signals consistently friendly service. Favor places that \
are open now, then break ties by distance.";

pub const BEST_RUBRIC: &str = "The user wants the best cafe nearby. Rank primarily by rating, then by \
rating_count so that well-established ratings beat a handful of reviews, then by distance.";

pub const OPEN_RUBRIC: &str = "The user wants a cafe they can walk into right now. Only cafes with open_now \
true should be chosen when any exist; treat unknown opening status as closed. Among open cafes prefer the \
closest, then the highest rated.";

pub const BUSY_RUBRIC: &str = "The user wants a lively, popular cafe. Prioritize rating_count as the main \
signal of popularity, then rating, then distance.";

/// Rubric text for a preference
pub fn rubric(preference: Preference) -> &'static str {
    match preference {
        Preference::Study => STUDY_RUBRIC,
        Preference::Friendly => FRIENDLY_RUBRIC,
        Preference::Best => BEST_RUBRIC,
        Preference::Open => OPEN_RUBRIC,
        Preference::Busy => BUSY_RUBRIC,
    }
}

/// Rubric lookup for an untyped preference tag
///
/// There is no fallback: an unrecognized tag is an error.
pub fn rubric_for(tag: &str) -> Result<&'static str, UnknownPreference> {
    tag.parse::<Preference>().map(rubric)
}
