//! Shelf Application Library
//!
//! The books catalog module plus the bootstrap that wires it into the HTTP runtime.

pub mod app;
pub mod modules;

pub use app::{build_registry, run};
pub use modules::books::{catalog::Catalog, BooksModule};
