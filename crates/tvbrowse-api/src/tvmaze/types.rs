//! TVmaze API response types.

use serde::Deserialize;

// --- Show ---

/// A television show record.
///
/// Only `id` and `name` are guaranteed; everything else may be absent or
/// `null` depending on how complete the catalog entry is.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Show {
    /// TVmaze show ID.
    pub id: u64,
    /// Show name.
    pub name: String,
    /// Genre names (e.g. "Drama").
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    /// Show type (e.g. "Scripted", "Reality").
    #[serde(rename = "type", default)]
    pub show_type: Option<String>,
    /// Running status (e.g. "Running", "Ended").
    #[serde(default)]
    pub status: Option<String>,
    /// Aggregate user rating.
    #[serde(default)]
    pub rating: Option<Rating>,
    /// TVmaze web page for the show.
    #[serde(default)]
    pub url: Option<String>,
    /// Primary language.
    #[serde(default)]
    pub language: Option<String>,
    /// Premiere date (YYYY-MM-DD).
    #[serde(default)]
    pub premiered: Option<String>,
    /// End date (YYYY-MM-DD).
    #[serde(default)]
    pub ended: Option<String>,
    /// Episode runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Summary (HTML fragment).
    #[serde(default)]
    pub summary: Option<String>,
    /// Broadcasting network.
    #[serde(default)]
    pub network: Option<Network>,
    /// Poster images.
    #[serde(default)]
    pub image: Option<Image>,
}

impl Show {
    /// Returns `true` if the show lists `genre` among its genres.
    #[must_use]
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres
            .as_ref()
            .is_some_and(|genres| genres.iter().any(|g| g == genre))
    }

    /// Returns the rating average if it can be used for ranking.
    ///
    /// Missing, `null`, zero, and non-finite averages are all unusable.
    #[must_use]
    pub fn rating_average(&self) -> Option<f64> {
        self.rating.as_ref().and_then(Rating::usable_average)
    }
}

/// Rating object (`{"average": 8.5}`).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Rating {
    /// Average score (0-10), `null` when nobody has rated yet.
    #[serde(default)]
    pub average: Option<f64>,
}

impl Rating {
    /// Average if present, finite, and non-zero.
    #[must_use]
    pub fn usable_average(&self) -> Option<f64> {
        self.average.filter(|avg| avg.is_finite() && *avg != 0.0)
    }
}

/// Network a show airs on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Network {
    /// Network name.
    pub name: String,
}

/// Image URLs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Image {
    /// Medium-sized image URL.
    #[serde(default)]
    pub medium: Option<String>,
    /// Original-sized image URL.
    #[serde(default)]
    pub original: Option<String>,
}

// --- Search ---

/// A single entry from `search/shows`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    /// Relevance score.
    #[serde(default)]
    pub score: Option<f64>,
    /// Matched show.
    pub show: Show,
}

// --- Show with embeds ---

/// Response from `shows/{id}?embed[]=cast&embed[]=episodes`.
#[derive(Debug, Clone, Deserialize)]
pub struct ShowWithEmbeds {
    /// The show itself.
    #[serde(flatten)]
    pub show: Show,
    /// Embedded cast and episodes.
    #[serde(rename = "_embedded", default)]
    pub embedded: ShowEmbeds,
}

/// `_embedded` block of a show.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShowEmbeds {
    /// Cast credits.
    #[serde(default)]
    pub cast: Vec<CastCredit>,
    /// All episodes in airing order.
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

/// One cast credit: the actor and the character they play.
#[derive(Debug, Clone, Deserialize)]
pub struct CastCredit {
    /// Actor.
    pub person: Person,
    /// Character played.
    #[serde(default)]
    pub character: Option<Character>,
}

/// A person (actor).
#[derive(Debug, Clone, Deserialize)]
pub struct Person {
    /// TVmaze person ID.
    #[serde(default)]
    pub id: Option<u64>,
    /// Full name.
    pub name: String,
}

/// A character in a show.
#[derive(Debug, Clone, Deserialize)]
pub struct Character {
    /// TVmaze character ID.
    #[serde(default)]
    pub id: Option<u64>,
    /// Character name.
    pub name: String,
}

// --- Episodes ---

/// An episode, from `shows/{id}/episodes` or the `episodes` embed.
#[derive(Debug, Clone, Deserialize)]
pub struct Episode {
    /// TVmaze episode ID.
    pub id: u64,
    /// Episode title.
    pub name: String,
    /// Season number.
    #[serde(default)]
    pub season: Option<u32>,
    /// Episode number within the season (null for specials).
    #[serde(default)]
    pub number: Option<u32>,
    /// Air date (YYYY-MM-DD).
    #[serde(default)]
    pub airdate: Option<String>,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Episode rating.
    #[serde(default)]
    pub rating: Option<Rating>,
    /// Summary (HTML fragment).
    #[serde(default)]
    pub summary: Option<String>,
}
