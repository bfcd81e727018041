//! In-memory book catalog.
//!
//! Every operation takes the lock once and validates before mutating, so a
//! failed call never leaves partial state behind.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use shelf_kernel::validation::{FieldViolation, Validate};
use thiserror::Error;
use uuid::Uuid;

use super::models::{Book, CreateBook, CreateReview, Review};

/// Errors produced by catalog operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("book '{id}' not found")]
    NotFound { id: String },

    #[error("invalid payload: {}", render_violations(.0))]
    Validation(Vec<FieldViolation>),
}

fn render_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Default)]
struct Shelf {
    books: HashMap<String, Book>,
    /// Ids in creation order
    order: Vec<String>,
}

/// Process-local collection of books, safe to share across request handlers.
#[derive(Debug, Default)]
pub struct Catalog {
    shelf: RwLock<Shelf>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    // Writers validate before touching the shelf, so a panic can never
    // leave it half-updated and a poisoned lock is safe to reuse.
    fn read(&self) -> RwLockReadGuard<'_, Shelf> {
        self.shelf.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Shelf> {
        self.shelf.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every book in creation order
    pub fn list(&self) -> Vec<Book> {
        let shelf = self.read();
        shelf
            .order
            .iter()
            .filter_map(|id| shelf.books.get(id))
            .cloned()
            .collect()
    }

    /// Validate and store a new book with a freshly generated id
    pub fn create(&self, request: CreateBook) -> Result<Book, CatalogError> {
        request.validate().map_err(CatalogError::Validation)?;

        let book = Book {
            id: Uuid::new_v4().to_string(),
            title: request.title,
            author: request.author,
            genre: request.genre,
            reviews: Vec::new(),
        };

        let mut shelf = self.write();
        shelf.order.push(book.id.clone());
        shelf.books.insert(book.id.clone(), book.clone());

        tracing::info!(book_id = %book.id, title = %book.title, "book created");
        Ok(book)
    }

    /// Look up a book by id
    pub fn get(&self, id: &str) -> Result<Book, CatalogError> {
        self.read()
            .books
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound { id: id.to_string() })
    }

    /// Whether a book with this id exists
    pub fn contains(&self, id: &str) -> bool {
        self.read().books.contains_key(id)
    }

    /// Append a review to a book and return the updated book
    ///
    /// An unknown id is reported before the review itself is checked.
    pub fn add_review(&self, id: &str, request: CreateReview) -> Result<Book, CatalogError> {
        let mut shelf = self.write();
        let book = shelf
            .books
            .get_mut(id)
            .ok_or_else(|| CatalogError::NotFound { id: id.to_string() })?;

        request.validate().map_err(CatalogError::Validation)?;

        book.reviews.push(Review {
            // validated into RATING_MIN..=RATING_MAX above
            rating: request.rating as u8,
            comment: request.comment,
        });

        tracing::info!(
            book_id = %book.id,
            reviews = book.reviews.len(),
            "review added"
        );
        Ok(book.clone())
    }

    pub fn len(&self) -> usize {
        self.read().books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn book(title: &str) -> CreateBook {
        CreateBook {
            title: title.to_string(),
            author: "F. Scott Fitzgerald".to_string(),
            genre: "Fiction".to_string(),
        }
    }

    fn review(rating: i64, comment: &str) -> CreateReview {
        CreateReview {
            rating,
            comment: comment.to_string(),
        }
    }

    #[test]
    fn new_catalog_is_empty() {
        let catalog = Catalog::new();
        assert!(catalog.is_empty());
        assert!(catalog.list().is_empty());
    }

    #[test]
    fn create_assigns_unique_ids() {
        let catalog = Catalog::new();
        let mut ids = HashSet::new();
        for n in 0..50 {
            let created = catalog.create(book(&format!("Volume {n}"))).unwrap();
            assert!(!created.id.is_empty());
            assert!(created.reviews.is_empty());
            assert!(ids.insert(created.id));
        }
        assert_eq!(catalog.len(), 50);
    }

    #[test]
    fn list_preserves_creation_order() {
        let catalog = Catalog::new();
        let titles = ["The Great Gatsby", "To Kill a Mockingbird", "Beloved"];
        for title in titles {
            catalog.create(book(title)).unwrap();
        }

        let listed: Vec<_> = catalog.list().into_iter().map(|b| b.title).collect();
        assert_eq!(listed, titles);
    }

    #[test]
    fn get_after_create_returns_same_book() {
        let catalog = Catalog::new();
        let created = catalog.create(book("The Great Gatsby")).unwrap();
        let fetched = catalog.get(&created.id).unwrap();
        assert_eq!(fetched, created);
        assert!(fetched.reviews.is_empty());
        assert!(catalog.contains(&created.id));
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let catalog = Catalog::new();
        assert_eq!(
            catalog.get("nonexistent-id"),
            Err(CatalogError::NotFound {
                id: "nonexistent-id".to_string()
            })
        );
    }

    #[test]
    fn create_with_empty_title_leaves_catalog_unchanged() {
        let catalog = Catalog::new();
        catalog.create(book("Kept")).unwrap();

        let err = catalog.create(book("")).unwrap_err();
        match err {
            CatalogError::Validation(violations) => assert_eq!(violations[0].field, "title"),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn add_review_on_unknown_id_is_not_found_for_any_payload() {
        let catalog = Catalog::new();
        for payload in [review(5, "great"), review(0, ""), review(9, "x")] {
            let err = catalog.add_review("missing", payload).unwrap_err();
            assert!(matches!(err, CatalogError::NotFound { .. }));
        }
    }

    #[test]
    fn out_of_range_rating_leaves_reviews_unchanged() {
        let catalog = Catalog::new();
        let created = catalog.create(book("The Great Gatsby")).unwrap();
        catalog.add_review(&created.id, review(4, "solid")).unwrap();

        for rating in [0, 6] {
            let err = catalog
                .add_review(&created.id, review(rating, "bad rating"))
                .unwrap_err();
            assert!(matches!(err, CatalogError::Validation(_)));
        }

        let reviews = catalog.get(&created.id).unwrap().reviews;
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].rating, 4);
    }

    #[test]
    fn reviews_are_kept_in_call_order() {
        let catalog = Catalog::new();
        let created = catalog.create(book("The Great Gatsby")).unwrap();

        let after_first = catalog.add_review(&created.id, review(5, "great")).unwrap();
        assert_eq!(
            after_first.reviews,
            vec![Review {
                rating: 5,
                comment: "great".to_string()
            }]
        );

        catalog
            .add_review(&created.id, review(2, "overrated"))
            .unwrap();

        let fetched = catalog.get(&created.id).unwrap();
        let comments: Vec<_> = fetched.reviews.iter().map(|r| r.comment.as_str()).collect();
        assert_eq!(comments, vec!["great", "overrated"]);
    }

    #[test]
    fn validation_error_message_lists_fields() {
        let catalog = Catalog::new();
        let err = catalog
            .create(CreateBook {
                title: String::new(),
                author: String::new(),
                genre: "Fiction".to_string(),
            })
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid payload: title: must be at least 1 characters; author: must be at least 1 characters"
        );
    }

    #[tokio::test]
    async fn concurrent_writers_do_not_lose_updates() {
        let catalog = Arc::new(Catalog::new());
        let target = catalog.create(book("Shared")).unwrap();

        let mut handles = Vec::new();
        for n in 0..32 {
            let catalog = catalog.clone();
            let target = target.id.clone();
            handles.push(tokio::spawn(async move {
                catalog.create(book(&format!("Book {n}"))).unwrap();
                catalog
                    .add_review(&target, review(3, &format!("review {n}")))
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(catalog.len(), 33);
        assert_eq!(catalog.get(&target.id).unwrap().reviews.len(), 32);
    }
}
