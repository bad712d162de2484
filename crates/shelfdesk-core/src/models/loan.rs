use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An issue/return transaction. The listing endpoint returns only
/// active loans (no return date yet); returned loans come back once
/// from the return call itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: i64,
    pub book_id: i64,
    pub member_id: i64,
    pub issue_date: NaiveDate,
    #[serde(default)]
    pub return_date: Option<NaiveDate>,
    #[serde(default)]
    pub book_title: Option<String>,
    #[serde(default)]
    pub member_name: Option<String>,
}

impl Loan {
    /// Book title for display, falling back to the raw id when the
    /// server did not enrich the row.
    pub fn book_label(&self) -> String {
        self.book_title
            .clone()
            .unwrap_or_else(|| self.book_id.to_string())
    }

    /// Member name for display, falling back to the raw id.
    pub fn member_label(&self) -> String {
        self.member_name
            .clone()
            .unwrap_or_else(|| self.member_id.to_string())
    }
}

/// Payload for issuing a book to a member.
#[derive(Debug, Clone, Serialize)]
pub struct IssueRequest {
    pub book_id: i64,
    pub member_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_active_loan() {
        let json = r#"{
            "id": 7,
            "book_id": 1,
            "member_id": 2,
            "issue_date": "2026-08-01",
            "return_date": null,
            "book_title": "Dune",
            "member_name": "Meg"
        }"#;
        let loan: Loan = serde_json::from_str(json).expect("Failed to parse loan");

        assert_eq!(loan.id, 7);
        assert_eq!(loan.issue_date, NaiveDate::from_ymd_opt(2026, 8, 1).unwrap());
        assert!(loan.return_date.is_none());
        assert_eq!(loan.book_label(), "Dune");
        assert_eq!(loan.member_label(), "Meg");
    }

    #[test]
    fn test_labels_fall_back_to_ids() {
        let json = r#"{"id":7,"book_id":1,"member_id":2,"issue_date":"2026-08-01"}"#;
        let loan: Loan = serde_json::from_str(json).expect("Failed to parse bare loan");

        assert_eq!(loan.book_label(), "1");
        assert_eq!(loan.member_label(), "2");
    }
}
