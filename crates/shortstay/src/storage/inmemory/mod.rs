//! In-memory storage backend for testing.

mod repository;

pub use repository::InMemoryRepository;
