//! API client library for tvbrowse.
//!
//! Provides a client for the TVmaze API plus client-side ranking helpers.

/// TVmaze API client.
pub mod tvmaze;
