//! Knowledge search infrastructure

mod in_memory_repository;
mod search_service;

pub use in_memory_repository::InMemoryArticleRepository;
pub use search_service::{KnowledgeSearchService, SearchConfig};
