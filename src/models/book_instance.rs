//! Book instance (physical copy) model and loan status

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Loan status of a physical copy.
///
/// The set is closed: the store enforces it with a Postgres enum and the
/// JSON boundary rejects anything outside these four codes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default,
)]
#[sqlx(type_name = "loan_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    #[default]
    Maintenance,
    OnLoan,
    Available,
    Reserved,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "maintenance",
            LoanStatus::OnLoan => "on_loan",
            LoanStatus::Available => "available",
            LoanStatus::Reserved => "reserved",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full book instance model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: Option<i32>,
    pub imprint: String,
    /// Only meaningful while the copy is on loan or reserved
    pub due_back: Option<NaiveDate>,
    pub language_id: Option<i32>,
    pub borrower_id: Option<i32>,
    pub status: LoanStatus,
    // Populated when queried with a JOIN on books, None otherwise
    #[sqlx(default)]
    #[serde(default)]
    pub book_title: Option<String>,
}

impl BookInstance {
    /// Whether the copy is past its due date. A copy with no due date is
    /// never overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_back {
            Some(due_back) => today > due_back,
            None => false,
        }
    }
}

/// Book instance with the overdue flag computed at read time
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookInstanceDetails {
    pub id: Uuid,
    pub book_id: Option<i32>,
    pub book_title: Option<String>,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub language_id: Option<i32>,
    pub borrower_id: Option<i32>,
    pub status: LoanStatus,
    pub is_overdue: bool,
}

impl BookInstanceDetails {
    pub fn from_instance(instance: BookInstance, today: NaiveDate) -> Self {
        let is_overdue = instance.is_overdue(today);
        Self {
            id: instance.id,
            book_id: instance.book_id,
            book_title: instance.book_title,
            imprint: instance.imprint,
            due_back: instance.due_back,
            language_id: instance.language_id,
            borrower_id: instance.borrower_id,
            status: instance.status,
            is_overdue,
        }
    }
}

/// Create book instance request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookInstance {
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub language_id: Option<i32>,
    pub borrower_id: Option<i32>,
    /// Defaults to `maintenance` when omitted
    pub status: Option<LoanStatus>,
}

/// Update book instance request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBookInstance {
    pub imprint: Option<String>,
    pub due_back: Option<NaiveDate>,
    pub language_id: Option<i32>,
    pub borrower_id: Option<i32>,
    pub status: Option<LoanStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(due_back: Option<NaiveDate>) -> BookInstance {
        BookInstance {
            id: Uuid::new_v4(),
            book_id: Some(1),
            imprint: "Futura, 1984".to_string(),
            due_back,
            language_id: None,
            borrower_id: None,
            status: LoanStatus::Reserved,
            book_title: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_overdue_without_due_date() {
        let copy = instance(None);
        assert!(!copy.is_overdue(date(2024, 1, 2)));
        assert!(!copy.is_overdue(date(1970, 1, 1)));
    }

    #[test]
    fn test_overdue_past_due_date() {
        let copy = instance(Some(date(2024, 1, 1)));
        assert!(copy.is_overdue(date(2024, 1, 2)));
    }

    #[test]
    fn test_not_overdue_on_due_date() {
        let copy = instance(Some(date(2024, 1, 1)));
        assert!(!copy.is_overdue(date(2024, 1, 1)));
        assert!(!copy.is_overdue(date(2023, 12, 31)));
    }

    #[test]
    fn test_status_codes_round_trip() {
        for (status, code) in [
            (LoanStatus::Maintenance, "\"maintenance\""),
            (LoanStatus::OnLoan, "\"on_loan\""),
            (LoanStatus::Available, "\"available\""),
            (LoanStatus::Reserved, "\"reserved\""),
        ] {
            assert_eq!(serde_json::to_string(&status).unwrap(), code);
            assert_eq!(
                serde_json::from_str::<LoanStatus>(code).unwrap(),
                status
            );
        }
    }

    #[test]
    fn test_unknown_status_code_rejected() {
        assert!(serde_json::from_str::<LoanStatus>("\"lost\"").is_err());
        assert!(serde_json::from_str::<LoanStatus>("\"m\"").is_err());
    }

    #[test]
    fn test_default_status_is_maintenance() {
        assert_eq!(LoanStatus::default(), LoanStatus::Maintenance);
    }
}
