//! Book instances repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book_instance::{BookInstance, CreateBookInstance, LoanStatus, UpdateBookInstance},
};

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List copies with pagination, ordered by due date
    pub async fn list(&self, page: i64, per_page: i64) -> AppResult<(Vec<BookInstance>, i64)> {
        let offset = (page - 1) * per_page;

        let instances = sqlx::query_as::<_, BookInstance>(
            r#"
            SELECT bi.*, b.title AS book_title
            FROM book_instances bi
            LEFT JOIN books b ON bi.book_id = b.id
            ORDER BY bi.due_back
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;

        Ok((instances, total))
    }

    /// Get copy by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(
            r#"
            SELECT bi.*, b.title AS book_title
            FROM book_instances bi
            LEFT JOIN books b ON bi.book_id = b.id
            WHERE bi.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// List copies of one book, ordered by due date
    pub async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let instances = sqlx::query_as::<_, BookInstance>(
            r#"
            SELECT bi.*, b.title AS book_title
            FROM book_instances bi
            LEFT JOIN books b ON bi.book_id = b.id
            WHERE bi.book_id = $1
            ORDER BY bi.due_back
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(instances)
    }

    /// List all copies with the given status, ordered by due date
    pub async fn list_by_status(&self, status: LoanStatus) -> AppResult<Vec<BookInstance>> {
        let instances = sqlx::query_as::<_, BookInstance>(
            r#"
            SELECT bi.*, b.title AS book_title
            FROM book_instances bi
            LEFT JOIN books b ON bi.book_id = b.id
            WHERE bi.status = $1
            ORDER BY bi.due_back
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(instances)
    }

    /// List copies held by one borrower with the given status, ordered by due date
    pub async fn list_by_borrower_and_status(
        &self,
        borrower_id: i32,
        status: LoanStatus,
    ) -> AppResult<Vec<BookInstance>> {
        let instances = sqlx::query_as::<_, BookInstance>(
            r#"
            SELECT bi.*, b.title AS book_title
            FROM book_instances bi
            LEFT JOIN books b ON bi.book_id = b.id
            WHERE bi.borrower_id = $1 AND bi.status = $2
            ORDER BY bi.due_back
            "#,
        )
        .bind(borrower_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(instances)
    }

    /// Create a copy of a book
    pub async fn create(
        &self,
        book_id: i32,
        instance: &CreateBookInstance,
    ) -> AppResult<BookInstance> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, due_back, language_id, borrower_id, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(id)
        .bind(book_id)
        .bind(&instance.imprint)
        .bind(instance.due_back)
        .bind(instance.language_id)
        .bind(instance.borrower_id)
        .bind(instance.status.unwrap_or_default())
        .execute(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Update a copy
    pub async fn update(&self, id: Uuid, instance: &UpdateBookInstance) -> AppResult<BookInstance> {
        let existing = self.get_by_id(id).await?;

        sqlx::query(
            r#"
            UPDATE book_instances
            SET imprint = $1, due_back = $2, language_id = $3, borrower_id = $4, status = $5
            WHERE id = $6
            "#,
        )
        .bind(instance.imprint.as_ref().unwrap_or(&existing.imprint))
        .bind(instance.due_back.or(existing.due_back))
        .bind(instance.language_id.or(existing.language_id))
        .bind(instance.borrower_id.or(existing.borrower_id))
        .bind(instance.status.unwrap_or(existing.status))
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Set the due date on a copy. Renewal's only write: no other column moves.
    pub async fn update_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<()> {
        let result = sqlx::query("UPDATE book_instances SET due_back = $1 WHERE id = $2")
            .bind(due_back)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        Ok(())
    }

    /// Delete a copy
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        Ok(())
    }

    /// Count all copies
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count copies with the given status
    pub async fn count_by_status(&self, status: LoanStatus) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                .bind(status)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
