//! REST API client module for the library management service.
//!
//! This module provides the `ApiClient` for fetching and mutating the
//! books, members, and loan collections.
//!
//! The API uses bearer token authentication; the client attaches the
//! stored credential to every call and classifies each response into an
//! `Outcome` that drives logout-and-redirect on expiry.

pub mod client;
pub mod error;
pub mod outcome;

pub use client::ApiClient;
pub use error::ApiError;
pub use outcome::{Outcome, RequestDescriptor};
