//! MediSearch Vector Engine
//!
//! Named in-memory vector indexes with exact (brute-force) cosine search.
//! Indexes lock their dimension on first upsert and rank queries with a
//! stable descending sort, so equal scores keep insertion order.

mod similarity;
mod store;
mod types;

pub use similarity::{cosine_similarity, rank_top_k};
pub use store::VectorStore;
pub use types::{IndexHandle, IndexStats, SearchMatch, VectorRecord};
