//! Client for the remote inventory endpoint.
//!
//! The endpoint is a single serverless function addressed by query string:
//! `GET ?venue=` lists a venue's entries, `POST`/`PUT` create and replace
//! an entry, `DELETE ?id=` removes one. A second function serves the full
//! backup document.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
