use serde::{Deserialize, Serialize};

/// A registered library member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub name: String,
}

/// Payload for registering a member.
#[derive(Debug, Clone, Serialize)]
pub struct NewMember {
    pub name: String,
}
