//! TVmaze API client module.
//!
//! Handles HTTP requests to the public TVmaze REST API and ranks the
//! returned show lists locally.

mod api;
mod browse;
mod client;
mod error;
mod ranking;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTvmazeApi, TvmazeApi};
pub use browse::{
    DEFAULT_GENRE_LIMIT, DEFAULT_RUNNING_LIMIT, running_shows, shows_by_genre,
    shows_by_multiple_genres, shows_by_type,
};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_BASE_URL, TvmazeClient, TvmazeClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use error::TvmazeError;
pub use ranking::{STATUS_RUNNING, ShowFilter, rank_shows};
pub use types::{
    CastCredit, Character, Episode, Image, Network, Person, Rating, SearchResult, Show,
    ShowEmbeds, ShowWithEmbeds,
};
