//! Catalog service: browse views and librarian CRUD

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, CreateAuthor, UpdateAuthor},
        book::{Book, BookDetails, CreateBook, UpdateBook},
        book_instance::{BookInstance, CreateBookInstance, UpdateBookInstance},
        genre::Genre,
        language::Language,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List books with pagination
    pub async fn list_books(&self, page: i64, per_page: i64) -> AppResult<(Vec<Book>, i64)> {
        self.repository.books.list(page, per_page).await
    }

    /// Get book details with genres
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        let book = self.repository.books.get_by_id(id).await?;
        let genres = self.repository.books.get_genres(id).await?;
        Ok(BookDetails::from_book(book, genres))
    }

    /// Create a new book
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if let Some(author_id) = book.author_id {
            self.repository.authors.get_by_id(author_id).await?;
        }
        self.repository.books.create(&book).await
    }

    /// Update an existing book
    pub async fn update_book(&self, id: i32, book: UpdateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if let Some(author_id) = book.author_id {
            self.repository.authors.get_by_id(author_id).await?;
        }
        self.repository.books.update(id, &book).await
    }

    /// Delete a book
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }

    /// List authors with pagination
    pub async fn list_authors(&self, page: i64, per_page: i64) -> AppResult<(Vec<Author>, i64)> {
        self.repository.authors.list(page, per_page).await
    }

    /// Get author by ID
    pub async fn get_author(&self, id: i32) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    /// Create a new author
    pub async fn create_author(&self, author: CreateAuthor) -> AppResult<Author> {
        self.repository.authors.create(&author).await
    }

    /// Update an author
    pub async fn update_author(&self, id: i32, author: UpdateAuthor) -> AppResult<Author> {
        self.repository.authors.update(id, &author).await
    }

    /// Delete an author. The store nulls the author on referencing books.
    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await
    }

    /// List all genres
    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    /// Get genre by ID
    pub async fn get_genre(&self, id: i32) -> AppResult<Genre> {
        self.repository.genres.get_by_id(id).await
    }

    /// List all languages
    pub async fn list_languages(&self) -> AppResult<Vec<Language>> {
        self.repository.languages.list().await
    }

    /// Get language by ID
    pub async fn get_language(&self, id: i32) -> AppResult<Language> {
        self.repository.languages.get_by_id(id).await
    }

    /// List copies with pagination
    pub async fn list_instances(
        &self,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<BookInstance>, i64)> {
        self.repository.book_instances.list(page, per_page).await
    }

    /// Get copy by ID
    pub async fn get_instance(&self, id: Uuid) -> AppResult<BookInstance> {
        self.repository.book_instances.get_by_id(id).await
    }

    /// List copies of one book
    pub async fn list_instances_for_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        // Verify book exists
        self.repository.books.get_by_id(book_id).await?;
        self.repository.book_instances.list_for_book(book_id).await
    }

    /// Create a copy of a book
    pub async fn create_instance(
        &self,
        book_id: i32,
        instance: CreateBookInstance,
    ) -> AppResult<BookInstance> {
        self.repository.books.get_by_id(book_id).await?;
        self.repository
            .book_instances
            .create(book_id, &instance)
            .await
    }

    /// Update a copy
    pub async fn update_instance(
        &self,
        id: Uuid,
        instance: UpdateBookInstance,
    ) -> AppResult<BookInstance> {
        self.repository.book_instances.update(id, &instance).await
    }

    /// Delete a copy
    pub async fn delete_instance(&self, id: Uuid) -> AppResult<()> {
        self.repository.book_instances.delete(id).await
    }
}
