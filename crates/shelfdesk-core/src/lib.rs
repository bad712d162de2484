//! Core library for shelfdesk.
//!
//! This crate contains everything the UI layers share:
//!
//! - `api`: the authenticated request client for the library service
//! - `auth`: bearer-token storage, session guard, and credential storage
//! - `models`: books, members, loans, and auth payloads
//! - `notify`: the ephemeral notification surface
//! - `config`: persisted application configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod notify;

pub use api::{ApiClient, ApiError, Outcome, RequestDescriptor};
pub use auth::{CredentialStore, Navigator, SessionGuard, TokenStore};
pub use config::Config;
pub use notify::{Notifier, Toast, ToastKind, TOAST_DURATION};
