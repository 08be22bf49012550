//! Derived show queries built on top of the first page of the show index.
//!
//! Every query fetches page 0 once and ranks it locally with
//! [`rank_shows`]; nothing is cached between calls.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use tracing::instrument;

use super::api::LocalTvmazeApi;
use super::ranking::{STATUS_RUNNING, ShowFilter, rank_shows};
use super::types::Show;

/// Default number of shows returned per genre or type.
pub const DEFAULT_GENRE_LIMIT: usize = 12;

/// Default number of running shows returned.
pub const DEFAULT_RUNNING_LIMIT: usize = 20;

/// Page of the show index the derived queries rank.
const SOURCE_PAGE: u32 = 0;

/// Fetches the source page for a derived query.
async fn fetch_source(api: &(impl LocalTvmazeApi + Sync)) -> Result<Vec<Show>> {
    api.get_shows(SOURCE_PAGE)
        .await
        .context("failed to fetch show index")
}

/// Top-rated shows listing `genre`, at most `limit` of them.
///
/// # Errors
///
/// Returns an error if fetching the show index fails.
#[instrument(skip(api))]
pub async fn shows_by_genre(
    api: &(impl LocalTvmazeApi + Sync),
    genre: &str,
    limit: usize,
) -> Result<Vec<Show>> {
    let shows = fetch_source(api).await?;
    Ok(rank_shows(
        &shows,
        &ShowFilter::Genre(String::from(genre)),
        limit,
    ))
}

/// Top-rated shows whose type is exactly `show_type`, at most `limit` of them.
///
/// # Errors
///
/// Returns an error if fetching the show index fails.
#[instrument(skip(api))]
pub async fn shows_by_type(
    api: &(impl LocalTvmazeApi + Sync),
    show_type: &str,
    limit: usize,
) -> Result<Vec<Show>> {
    let shows = fetch_source(api).await?;
    Ok(rank_shows(
        &shows,
        &ShowFilter::Type(String::from(show_type)),
        limit,
    ))
}

/// Top-rated shows that are still running, at most `limit` of them.
///
/// # Errors
///
/// Returns an error if fetching the show index fails.
#[instrument(skip(api))]
pub async fn running_shows(api: &(impl LocalTvmazeApi + Sync), limit: usize) -> Result<Vec<Show>> {
    let shows = fetch_source(api).await?;
    Ok(rank_shows(
        &shows,
        &ShowFilter::Status(String::from(STATUS_RUNNING)),
        limit,
    ))
}

/// Ranks the show index once per genre.
///
/// The result has exactly one entry per distinct requested genre; a genre
/// with no rated matches maps to an empty list.
///
/// # Errors
///
/// Returns an error if fetching the show index fails.
#[instrument(skip(api))]
pub async fn shows_by_multiple_genres(
    api: &(impl LocalTvmazeApi + Sync),
    genres: &[String],
    per_genre: usize,
) -> Result<BTreeMap<String, Vec<Show>>> {
    let shows = fetch_source(api).await?;

    let shelves: BTreeMap<String, Vec<Show>> = genres
        .iter()
        .map(|genre| {
            let ranked = rank_shows(&shows, &ShowFilter::Genre(genre.clone()), per_genre);
            (genre.clone(), ranked)
        })
        .collect();

    tracing::debug!(
        genres = shelves.len(),
        source = shows.len(),
        "Ranked shows per genre"
    );

    Ok(shelves)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::sync::atomic::{AtomicU32, Ordering};

    use anyhow::{Result, bail};

    use super::*;
    use crate::tvmaze::TvmazeError;
    use crate::tvmaze::types::{Episode, Rating, ShowWithEmbeds};

    /// Mock API that serves a fixed show index and counts index fetches.
    struct MockTvmazeApi {
        shows: Vec<Show>,
        fail_with: Option<u16>,
        call_count: AtomicU32,
        last_page: AtomicU32,
    }

    impl MockTvmazeApi {
        fn new(shows: Vec<Show>) -> Self {
            Self {
                shows,
                fail_with: None,
                call_count: AtomicU32::new(0),
                last_page: AtomicU32::new(u32::MAX),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                fail_with: Some(status),
                ..Self::new(vec![])
            }
        }
    }

    impl LocalTvmazeApi for MockTvmazeApi {
        async fn get_shows(&self, page: u32) -> Result<Vec<Show>> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.last_page.store(page, Ordering::SeqCst);
            if let Some(status) = self.fail_with {
                return Err(TvmazeError::Status { status }.into());
            }
            Ok(self.shows.clone())
        }

        async fn search_shows(&self, _query: &str) -> Result<Vec<Show>> {
            Ok(vec![])
        }

        async fn get_show_with_cast(&self, _id: u64) -> Result<ShowWithEmbeds> {
            bail!("not used")
        }

        async fn get_episodes_by_show_id(&self, _id: u64) -> Result<Vec<Episode>> {
            Ok(vec![])
        }
    }

    /// Helper to create a minimal `Show`.
    fn make_show(id: u64, name: &str, genres: &[&str], average: Option<f64>) -> Show {
        Show {
            id,
            name: String::from(name),
            genres: Some(genres.iter().map(|g| String::from(*g)).collect()),
            show_type: Some(String::from("Scripted")),
            status: Some(String::from("Ended")),
            rating: Some(Rating { average }),
            url: None,
            language: None,
            premiered: None,
            ended: None,
            runtime: None,
            summary: None,
            network: None,
            image: None,
        }
    }

    #[tokio::test]
    async fn test_shows_by_genre_fetches_first_page_once() {
        // Arrange
        let mock = MockTvmazeApi::new(vec![
            make_show(1, "Show A", &["Drama", "Crime"], Some(8.5)),
            make_show(2, "Show B", &["Comedy"], Some(7.2)),
            make_show(3, "Show C", &["Drama"], Some(9.1)),
            make_show(4, "Show D", &["Drama"], None),
        ]);

        // Act
        let result = shows_by_genre(&mock, "Drama", 10).await.unwrap();

        // Assert
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Show C");
        assert_eq!(result[1].name, "Show A");
        assert_eq!(mock.call_count.load(Ordering::SeqCst), 1);
        assert_eq!(mock.last_page.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_shows_by_genre_respects_limit() {
        // Arrange
        let mock = MockTvmazeApi::new(vec![
            make_show(1, "Show A", &["Drama"], Some(9.0)),
            make_show(2, "Show B", &["Drama"], Some(8.5)),
            make_show(3, "Show C", &["Drama"], Some(8.0)),
        ]);

        // Act
        let result = shows_by_genre(&mock, "Drama", 2).await.unwrap();

        // Assert
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Show A");
        assert_eq!(result[1].name, "Show B");
    }

    #[tokio::test]
    async fn test_shows_by_type() {
        // Arrange
        let mut reality = make_show(1, "Bake Off", &["Food"], Some(7.9));
        reality.show_type = Some(String::from("Reality"));
        let mock = MockTvmazeApi::new(vec![reality, make_show(2, "Drama", &["Drama"], Some(9.0))]);

        // Act
        let result = shows_by_type(&mock, "Reality", DEFAULT_GENRE_LIMIT)
            .await
            .unwrap();

        // Assert
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Bake Off");
    }

    #[tokio::test]
    async fn test_running_shows() {
        // Arrange
        let mut running_low = make_show(1, "Running Low", &["Drama"], Some(6.0));
        running_low.status = Some(String::from("Running"));
        let mut running_high = make_show(2, "Running High", &["Drama"], Some(8.0));
        running_high.status = Some(String::from("Running"));
        let mut running_unrated = make_show(3, "Running Unrated", &["Drama"], None);
        running_unrated.status = Some(String::from("Running"));
        let mock = MockTvmazeApi::new(vec![
            running_low,
            make_show(4, "Ended", &["Drama"], Some(9.9)),
            running_high,
            running_unrated,
        ]);

        // Act
        let result = running_shows(&mock, DEFAULT_RUNNING_LIMIT).await.unwrap();

        // Assert
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Running High");
        assert_eq!(result[1].name, "Running Low");
    }

    #[tokio::test]
    async fn test_multiple_genres() {
        // Arrange
        let mock = MockTvmazeApi::new(vec![
            make_show(1, "Drama Show", &["Drama"], Some(9.0)),
            make_show(2, "Comedy Show", &["Comedy"], Some(8.5)),
            make_show(3, "Action Show", &["Action"], Some(8.0)),
        ]);
        let genres = vec![String::from("Drama"), String::from("Comedy")];

        // Act
        let result = shows_by_multiple_genres(&mock, &genres, 10).await.unwrap();

        // Assert
        assert_eq!(result.len(), 2);
        assert_eq!(result["Drama"].len(), 1);
        assert_eq!(result["Comedy"].len(), 1);
        assert_eq!(result["Drama"][0].name, "Drama Show");
        assert_eq!(result["Comedy"][0].name, "Comedy Show");
        assert!(!result.contains_key("Action"));
        assert_eq!(mock.call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_multiple_genres_empty_for_no_matches() {
        // Arrange
        let mock = MockTvmazeApi::new(vec![make_show(1, "Drama Show", &["Drama"], Some(9.0))]);
        let genres = vec![String::from("Drama"), String::from("Horror")];

        // Act
        let result = shows_by_multiple_genres(&mock, &genres, 10).await.unwrap();

        // Assert
        assert_eq!(result["Drama"].len(), 1);
        assert!(result["Horror"].is_empty());
    }

    #[tokio::test]
    async fn test_multiple_genres_no_genres_requested() {
        // Arrange
        let mock = MockTvmazeApi::new(vec![make_show(1, "Drama Show", &["Drama"], Some(9.0))]);

        // Act
        let result = shows_by_multiple_genres(&mock, &[], 10).await.unwrap();

        // Assert
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_derived_query_propagates_status() {
        // Arrange
        let mock = MockTvmazeApi::failing(503);

        // Act
        let result = running_shows(&mock, 5).await;

        // Assert
        let err = result.unwrap_err();
        assert!(err.to_string().contains("failed to fetch show index"));
        assert_eq!(TvmazeError::status_of(&err), Some(503));
    }
}
