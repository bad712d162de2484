//! API client for communicating with the library management REST API.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests against the books, members, and transactions collections.
//!
//! Every authenticated call goes through [`ApiClient::request`], which
//! attaches the stored bearer credential and classifies the response
//! into an [`Outcome`]. A 401 clears the token store and requests the
//! login redirect before the caller ever sees the result, so no further
//! call can be attempted with a stale credential. Failures are surfaced
//! on the notification surface exactly once and propagated so callers
//! can skip dependent work. One attempt per call - no retries, no
//! backoff, and no client-enforced timeout.

use std::sync::Arc;

use anyhow::Result;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::{Navigator, TokenStore};
use crate::models::{
    Book, BookUpdate, IssueRequest, Loan, Member, NewBook, NewMember, TokenResponse, UserProfile,
};
use crate::notify::{Notifier, ToastKind};

use super::{ApiError, Outcome, RequestDescriptor};

/// Fallback message when the server supplies no detail field.
const GENERIC_ERROR: &str = "An error occurred";

/// API client for the library service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: TokenStore,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create a new API client against the given server root.
    pub fn new(
        base_url: impl Into<String>,
        tokens: TokenStore,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let client = Client::builder().build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            tokens,
            notifier,
            navigator,
        })
    }

    /// Perform one authenticated API call.
    ///
    /// The credential is read from the token store at call time; headers
    /// supplied by the caller are kept, a JSON content type is merged in
    /// only where missing, and the Authorization header is always
    /// attached when a credential exists.
    pub async fn request(&self, desc: RequestDescriptor) -> Outcome {
        let url = format!("{}{}", self.base_url, desc.path);

        let mut headers = desc.headers;
        headers
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/json"));
        if let Some(token) = self.tokens.get() {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(e) => warn!(error = %e, "Stored credential is not a valid header value"),
            }
        }

        let mut builder = self.client.request(desc.method.clone(), &url).headers(headers);
        if let Some(ref body) = desc.body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(r) => r,
            Err(e) => return self.fail(format!("Network error: {}", e)),
        };

        let status = response.status();
        debug!(method = %desc.method, path = %desc.path, status = %status, "API response");

        if status == StatusCode::UNAUTHORIZED {
            // Clear before redirecting so nothing can retry with the
            // stale credential. The body is never read.
            if let Err(e) = self.tokens.clear() {
                warn!(error = %e, "Failed to clear stored credential");
            }
            self.navigator.request_login();
            return Outcome::AuthExpired;
        }

        if status == StatusCode::NO_CONTENT {
            return Outcome::NoContent;
        }

        let text = match response.text().await {
            Ok(t) => t,
            Err(e) => return self.fail(format!("Network error: {}", e)),
        };

        let value: Value = match serde_json::from_str(&text) {
            Ok(v) => v,
            Err(_) => return self.fail(GENERIC_ERROR.to_string()),
        };

        if !status.is_success() {
            let message = value
                .get("detail")
                .and_then(Value::as_str)
                .unwrap_or(GENERIC_ERROR)
                .to_string();
            return self.fail(message);
        }

        Outcome::Success(value)
    }

    /// Surface a failure on the notification surface and wrap it.
    fn fail(&self, message: String) -> Outcome {
        warn!(message = %message, "API request failed");
        self.notifier.notify(&message, ToastKind::Error);
        Outcome::Failure(message)
    }

    /// Run a request and decode the success payload into a model.
    async fn send_json<T: DeserializeOwned>(&self, desc: RequestDescriptor) -> Result<T, ApiError> {
        match self.request(desc).await {
            Outcome::Success(value) => serde_json::from_value(value).map_err(|e| {
                let message = format!("Invalid response: {}", e);
                self.notifier.notify(&message, ToastKind::Error);
                ApiError::InvalidResponse(e.to_string())
            }),
            Outcome::NoContent => Err(ApiError::InvalidResponse(
                "response body was empty".to_string(),
            )),
            Outcome::AuthExpired => Err(ApiError::AuthExpired),
            Outcome::Failure(message) => Err(ApiError::Rejected(message)),
        }
    }

    /// Run a request whose success carries no body (DELETE).
    async fn send_no_content(&self, desc: RequestDescriptor) -> Result<(), ApiError> {
        match self.request(desc).await {
            Outcome::NoContent | Outcome::Success(_) => Ok(()),
            Outcome::AuthExpired => Err(ApiError::AuthExpired),
            Outcome::Failure(message) => Err(ApiError::Rejected(message)),
        }
    }

    fn body_of<B: Serialize>(payload: &B) -> Result<Value, ApiError> {
        serde_json::to_value(payload).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    // ===== Authentication =====

    /// Log in with username and password, returning the issued token.
    ///
    /// This call deliberately bypasses `request`: there is no credential
    /// to attach yet, and a 401 here means the password was wrong - it
    /// must not clear the store or trigger the redirect. The login form
    /// owns the error feedback, so nothing is toasted either.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let payload = serde_json::json!({
            "username": username,
            "password": password,
        });
        self.authenticate("/auth/login", &payload).await
    }

    /// Create an account; the server logs the new user straight in.
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<TokenResponse, ApiError> {
        let payload = serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        });
        self.authenticate("/auth/signup", &payload).await
    }

    async fn authenticate(&self, path: &str, payload: &Value) -> Result<TokenResponse, ApiError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.client.post(&url).json(payload).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            debug!(path = path, status = %status, "Authentication rejected");
            return Err(ApiError::Rejected(detail_message(&text)));
        }

        serde_json::from_str(&text).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Fetch the authenticated librarian's profile.
    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        self.send_json(RequestDescriptor::new(Method::GET, "/auth/me"))
            .await
    }

    // ===== Books =====

    /// Fetch the full book catalog.
    pub async fn list_books(&self) -> Result<Vec<Book>, ApiError> {
        self.send_json(RequestDescriptor::new(Method::GET, "/books/"))
            .await
    }

    /// Add a book to the catalog.
    pub async fn create_book(&self, book: &NewBook) -> Result<Book, ApiError> {
        let body = Self::body_of(book)?;
        self.send_json(RequestDescriptor::new(Method::POST, "/books/").with_body(body))
            .await
    }

    /// Update a book; only the provided fields change.
    pub async fn update_book(&self, book_id: i64, updates: &BookUpdate) -> Result<Book, ApiError> {
        let body = Self::body_of(updates)?;
        let path = format!("/books/{}", book_id);
        self.send_json(RequestDescriptor::new(Method::PUT, path).with_body(body))
            .await
    }

    /// Remove a book from the catalog.
    pub async fn delete_book(&self, book_id: i64) -> Result<(), ApiError> {
        let path = format!("/books/{}", book_id);
        self.send_no_content(RequestDescriptor::new(Method::DELETE, path))
            .await
    }

    // ===== Members =====

    /// Fetch all registered members.
    pub async fn list_members(&self) -> Result<Vec<Member>, ApiError> {
        self.send_json(RequestDescriptor::new(Method::GET, "/members/"))
            .await
    }

    /// Register a new member.
    pub async fn register_member(&self, member: &NewMember) -> Result<Member, ApiError> {
        let body = Self::body_of(member)?;
        self.send_json(RequestDescriptor::new(Method::POST, "/members/").with_body(body))
            .await
    }

    // ===== Loans =====

    /// Fetch all active (unreturned) loans.
    pub async fn active_loans(&self) -> Result<Vec<Loan>, ApiError> {
        self.send_json(RequestDescriptor::new(Method::GET, "/transactions/"))
            .await
    }

    /// Issue a book to a member.
    pub async fn issue_book(&self, request: &IssueRequest) -> Result<Loan, ApiError> {
        let body = Self::body_of(request)?;
        self.send_json(RequestDescriptor::new(Method::POST, "/transactions/issue").with_body(body))
            .await
    }

    /// Return a book by its loan id.
    pub async fn return_book(&self, loan_id: i64) -> Result<Loan, ApiError> {
        let path = format!("/transactions/return/{}", loan_id);
        self.send_json(RequestDescriptor::new(Method::PUT, path))
            .await
    }
}

/// Extract the server's detail field from an error body, falling back
/// to the generic message when the body is not JSON or has no detail.
fn detail_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(|v| v.get("detail"))
        .and_then(Value::as_str)
        .unwrap_or(GENERIC_ERROR)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_message_prefers_server_detail() {
        assert_eq!(
            detail_message(r#"{"detail": "Book not found"}"#),
            "Book not found"
        );
    }

    #[test]
    fn test_detail_message_falls_back_on_non_json() {
        assert_eq!(detail_message("<html>502 Bad Gateway</html>"), GENERIC_ERROR);
        assert_eq!(detail_message(""), GENERIC_ERROR);
    }

    #[test]
    fn test_detail_message_falls_back_on_missing_field() {
        assert_eq!(detail_message(r#"{"error": "nope"}"#), GENERIC_ERROR);
        // A non-string detail is ignored rather than stringified
        assert_eq!(detail_message(r#"{"detail": [1, 2]}"#), GENERIC_ERROR);
    }
}
