/*!
 * Bilingual linking: discovering which quotes in different languages
 * express the same aphorism.
 *
 * The linker runs as an idempotent batch job partitioned by author:
 * - `union_find`: the disjoint-set structure holding equivalence classes
 * - `similarity`: content-word overlap scoring across the language gap,
 *   bridged by the store's word dictionary
 * - `service`: candidate selection, deterministic tie-breaking and the
 *   transactional write path
 */

pub mod similarity;
pub mod union_find;
pub mod service;

// Re-export main types
pub use service::{BilingualLinker, LinkReport};
pub use similarity::{SimilarityScore, WordMap};
pub use union_find::UnionFind;
