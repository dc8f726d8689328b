//! Loan management service: renewal workflow and reserved-copy listings

use chrono::{Duration, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book_instance::{BookInstance, LoanStatus},
    repository::Repository,
};

/// Weeks ahead proposed when the renewal form is first presented
const RENEWAL_PROPOSAL_WEEKS: i64 = 3;
/// Widest renewal window a librarian may grant
const RENEWAL_MAX_WEEKS: i64 = 4;

/// A proposed renewal date outside the allowed window
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenewalDateError {
    #[error("Invalid date - renewal in past")]
    InPast,
    #[error("Invalid date - renewal more than 4 weeks ahead")]
    TooFarAhead,
}

/// Default date suggested by the renewal form
pub fn default_renewal_date(today: NaiveDate) -> NaiveDate {
    today + Duration::weeks(RENEWAL_PROPOSAL_WEEKS)
}

/// Accepts any date from today through four weeks out, inclusive
pub fn validate_renewal_date(
    proposed: NaiveDate,
    today: NaiveDate,
) -> Result<(), RenewalDateError> {
    if proposed < today {
        return Err(RenewalDateError::InPast);
    }
    if proposed > today + Duration::weeks(RENEWAL_MAX_WEEKS) {
        return Err(RenewalDateError::TooFarAhead);
    }
    Ok(())
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Present the renewal form for a copy: the copy plus a pre-filled
    /// proposal of today + 3 weeks. Mutates nothing.
    pub async fn renewal_proposal(&self, id: Uuid) -> AppResult<(BookInstance, NaiveDate)> {
        let instance = self.repository.book_instances.get_by_id(id).await?;
        let proposed = default_renewal_date(Utc::now().date_naive());
        Ok((instance, proposed))
    }

    /// Apply a renewal: fetch the copy, validate the proposed date against
    /// the allowed window, then write the new due date. The due date is the
    /// only column written, and only on successful validation.
    pub async fn renew(&self, id: Uuid, proposed: NaiveDate) -> AppResult<BookInstance> {
        let instance = self.repository.book_instances.get_by_id(id).await?;

        let today = Utc::now().date_naive();
        validate_renewal_date(proposed, today)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.repository
            .book_instances
            .update_due_back(instance.id, proposed)
            .await?;

        tracing::info!(instance = %instance.id, due_back = %proposed, "loan renewed");

        self.repository.book_instances.get_by_id(id).await
    }

    /// Every copy the product lists as borrowed. The filter is the reserved
    /// status code, matching the shipped behavior.
    pub async fn list_borrowed(&self) -> AppResult<Vec<BookInstance>> {
        self.repository
            .book_instances
            .list_by_status(LoanStatus::Reserved)
            .await
    }

    /// Copies the product lists as borrowed by one user, same reserved filter
    pub async fn list_borrowed_by_user(&self, user_id: i32) -> AppResult<Vec<BookInstance>> {
        self.repository
            .book_instances
            .list_by_borrower_and_status(user_id, LoanStatus::Reserved)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_proposal_is_three_weeks_out() {
        let today = date(2024, 1, 1);
        assert_eq!(default_renewal_date(today), date(2024, 1, 22));
    }

    #[test]
    fn test_renewal_today_is_valid() {
        let today = date(2024, 1, 1);
        assert_eq!(validate_renewal_date(today, today), Ok(()));
    }

    #[test]
    fn test_renewal_in_past_rejected() {
        let today = date(2024, 1, 1);
        assert_eq!(
            validate_renewal_date(date(2023, 12, 31), today),
            Err(RenewalDateError::InPast)
        );
    }

    #[test]
    fn test_renewal_four_weeks_out_is_valid() {
        let today = date(2024, 1, 1);
        assert_eq!(validate_renewal_date(date(2024, 1, 29), today), Ok(()));
    }

    #[test]
    fn test_renewal_past_four_weeks_rejected() {
        let today = date(2024, 1, 1);
        assert_eq!(
            validate_renewal_date(date(2024, 1, 30), today),
            Err(RenewalDateError::TooFarAhead)
        );
        // ten weeks out, well past the window
        assert_eq!(
            validate_renewal_date(today + Duration::weeks(10), today),
            Err(RenewalDateError::TooFarAhead)
        );
    }

    #[test]
    fn test_two_weeks_out_is_valid() {
        let today = date(2024, 1, 1);
        assert_eq!(
            validate_renewal_date(today + Duration::weeks(2), today),
            Ok(())
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            RenewalDateError::InPast.to_string(),
            "Invalid date - renewal in past"
        );
        assert_eq!(
            RenewalDateError::TooFarAhead.to_string(),
            "Invalid date - renewal more than 4 weeks ahead"
        );
    }
}
