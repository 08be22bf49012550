//! `TvmazeApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{Episode, Show, ShowWithEmbeds};

/// TVmaze API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TvmazeApi: Send)]
pub trait LocalTvmazeApi {
    /// Fetches one page of the show index (`shows?page={page}`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the server answers with a
    /// non-success status, or JSON parsing fails.
    async fn get_shows(&self, page: u32) -> Result<Vec<Show>>;

    /// Searches shows by free text and returns the matched shows in
    /// relevance order, without their scores.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the server answers with a
    /// non-success status, or JSON parsing fails.
    async fn search_shows(&self, query: &str) -> Result<Vec<Show>>;

    /// Fetches a show with its cast and episode list embedded.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the server answers with a
    /// non-success status, or JSON parsing fails.
    async fn get_show_with_cast(&self, id: u64) -> Result<ShowWithEmbeds>;

    /// Fetches all episodes of a show.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the server answers with a
    /// non-success status, or JSON parsing fails.
    async fn get_episodes_by_show_id(&self, id: u64) -> Result<Vec<Episode>>;
}
