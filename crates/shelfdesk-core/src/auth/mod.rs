//! Authentication module for managing the bearer credential and login state.
//!
//! This module provides:
//! - `TokenStore`: persistent storage of the single bearer credential
//! - `SessionGuard` / `Navigator`: the startup check that a credential
//!   exists before any UI work proceeds
//! - `CredentialStore`: OS-level username/password storage via keyring
//!
//! The credential is never validated locally; the server decides whether
//! it is still good, and a 401 is the only expiry signal.

pub mod credentials;
pub mod guard;
pub mod token;

pub use credentials::CredentialStore;
pub use guard::{Navigator, SessionGuard};
pub use token::TokenStore;
