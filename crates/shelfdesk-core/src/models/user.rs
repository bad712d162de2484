use serde::{Deserialize, Serialize};

/// Token issued by the auth endpoints on successful login or signup.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// The authenticated librarian's profile, from the identity endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_response() {
        let json = r#"{"access_token": "abc.def.ghi", "token_type": "bearer"}"#;
        let token: TokenResponse = serde_json::from_str(json).expect("Failed to parse token");
        assert_eq!(token.access_token, "abc.def.ghi");
        assert_eq!(token.token_type, "bearer");
    }
}
