//! Home-page summary service: catalog counts and the visit counter

use crate::{
    error::AppResult,
    models::book_instance::LoanStatus,
    repository::Repository,
};

/// Aggregate counts for the home page
#[derive(Debug)]
pub struct CatalogCounts {
    pub num_books: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_authors: i64,
    pub num_books_matching: Option<i64>,
    pub num_genres_matching: Option<i64>,
}

/// The visit counter only knows how to advance: persistence of the previous
/// value belongs to the session cookie.
pub fn next_visit_count(previous: Option<u64>) -> u64 {
    previous.unwrap_or(0).saturating_add(1)
}

#[derive(Clone)]
pub struct SummaryService {
    repository: Repository,
}

impl SummaryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Gather the home-page counts. Each count is an independent query;
    /// the summary is a snapshot, not a transaction.
    pub async fn catalog_counts(
        &self,
        title_contains: Option<&str>,
        genre_contains: Option<&str>,
    ) -> AppResult<CatalogCounts> {
        let num_books = self.repository.books.count().await?;
        let num_instances = self.repository.book_instances.count().await?;
        let num_instances_available = self
            .repository
            .book_instances
            .count_by_status(LoanStatus::Available)
            .await?;
        let num_authors = self.repository.authors.count().await?;

        let num_books_matching = match title_contains {
            Some(needle) => Some(self.repository.books.count_title_contains(needle).await?),
            None => None,
        };
        let num_genres_matching = match genre_contains {
            Some(needle) => Some(self.repository.genres.count_name_contains(needle).await?),
            None => None,
        };

        Ok(CatalogCounts {
            num_books,
            num_instances,
            num_instances_available,
            num_authors,
            num_books_matching,
            num_genres_matching,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_visit() {
        assert_eq!(next_visit_count(None), 1);
    }

    #[test]
    fn test_subsequent_visits() {
        assert_eq!(next_visit_count(Some(1)), 2);
        assert_eq!(next_visit_count(Some(41)), 42);
    }

    #[test]
    fn test_counter_saturates() {
        assert_eq!(next_visit_count(Some(u64::MAX)), u64::MAX);
    }
}
