use serde::{Deserialize, Serialize};

/// A book in the library catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub quantity: i64,
}

impl Book {
    /// Whether any copies are left to issue. Zero quantity gets the
    /// low-stock marker in the views and blocks issuing server-side.
    pub fn has_copies(&self) -> bool {
        self.quantity > 0
    }
}

/// Payload for adding a book to the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub quantity: i64,
}

/// Partial update payload; only the provided fields change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_book_list() {
        let json = r#"[{"id":1,"title":"X","author":"Y","quantity":0}]"#;
        let books: Vec<Book> = serde_json::from_str(json).expect("Failed to parse book list");

        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, 1);
        assert_eq!(books[0].title, "X");
        assert_eq!(books[0].author, "Y");
        assert_eq!(books[0].quantity, 0);
        assert!(!books[0].has_copies());
    }

    #[test]
    fn test_update_serializes_only_set_fields() {
        let update = BookUpdate {
            quantity: Some(3),
            ..Default::default()
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value, serde_json::json!({"quantity": 3}));
    }
}
