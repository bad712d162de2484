use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::Value;

/// Description of a single API call: method, path relative to the
/// server root, optional JSON body, and optional extra headers.
/// Transient - constructed per call, never persisted.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub headers: HeaderMap,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(
        mut self,
        name: reqwest::header::HeaderName,
        value: reqwest::header::HeaderValue,
    ) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// The discriminated result of one API call attempt.
///
/// `AuthExpired` means the credential was rejected; by the time the
/// caller sees it, the token store has been cleared and the login
/// redirect requested. `Failure` has already been surfaced on the
/// notification surface; callers only need to skip dependent work.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// 2xx with a JSON body, carried verbatim.
    Success(Value),
    /// 204 - success with no body; never parsed.
    NoContent,
    /// 401 - credential invalid or expired.
    AuthExpired,
    /// Any other failure, transport or application, with the surfaced
    /// message.
    Failure(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_builder() {
        let desc = RequestDescriptor::new(Method::POST, "/books/")
            .with_body(serde_json::json!({"title": "Dune"}))
            .with_header(
                reqwest::header::HeaderName::from_static("x-request-source"),
                reqwest::header::HeaderValue::from_static("tui"),
            );

        assert_eq!(desc.method, Method::POST);
        assert_eq!(desc.path, "/books/");
        assert_eq!(desc.body.unwrap()["title"], "Dune");
        assert_eq!(desc.headers.len(), 1);
    }
}
