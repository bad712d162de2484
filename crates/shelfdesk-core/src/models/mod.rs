//! Data models for the library management service.
//!
//! This module contains the data structures mirroring the shapes the
//! API returns:
//!
//! - `Book`: catalog entries with available-copy counts
//! - `Member`: registered library members
//! - `Loan`: issue/return transactions
//! - Auth payloads: `TokenResponse`, `UserProfile`

pub mod book;
pub mod loan;
pub mod member;
pub mod user;

pub use book::{Book, BookUpdate, NewBook};
pub use loan::{IssueRequest, Loan};
pub use member::{Member, NewMember};
pub use user::{TokenResponse, UserProfile};
