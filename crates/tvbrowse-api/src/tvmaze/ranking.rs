//! Client-side filter, sort and limit over a show list.

use std::cmp::Ordering;

use super::types::Show;

/// Status value TVmaze uses for shows still on air.
pub const STATUS_RUNNING: &str = "Running";

/// Predicate a show must satisfy to be ranked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowFilter {
    /// Show lists this genre.
    Genre(String),
    /// Show type equals this value exactly.
    Type(String),
    /// Show status equals this value exactly.
    Status(String),
}

impl ShowFilter {
    /// Returns `true` if `show` satisfies the filter.
    #[must_use]
    pub fn matches(&self, show: &Show) -> bool {
        match self {
            Self::Genre(genre) => show.has_genre(genre),
            Self::Type(show_type) => show.show_type.as_deref() == Some(show_type.as_str()),
            Self::Status(status) => show.status.as_deref() == Some(status.as_str()),
        }
    }
}

/// Keeps shows matching `filter` that carry a usable rating, orders them
/// by rating average (highest first) and truncates to `limit`.
///
/// The sort is stable: equally rated shows keep their input order.
#[must_use]
pub fn rank_shows<'a, I>(shows: I, filter: &ShowFilter, limit: usize) -> Vec<Show>
where
    I: IntoIterator<Item = &'a Show>,
{
    let mut ranked: Vec<(f64, &Show)> = shows
        .into_iter()
        .filter(|show| filter.matches(show))
        .filter_map(|show| show.rating_average().map(|avg| (avg, show)))
        .collect();

    ranked.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(Ordering::Equal));

    ranked
        .into_iter()
        .take(limit)
        .map(|(_, show)| show.clone())
        .collect()
}
