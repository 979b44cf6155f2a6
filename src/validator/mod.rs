/*!
 * Quote validation for scraped text fragments.
 *
 * Scraped pages mix genuine quotes with citation lines, chapter headings,
 * publisher metadata and bare links. This module classifies a raw fragment
 * as quote or noise before it is allowed into the store:
 * - `rules`: language-keyed negative pattern tables, positive indicators
 *   and citation-suffix stripping
 * - `service`: the ordered classification pipeline
 *
 * Classification is pure and never fails; rejection is a decision, not an
 * error.
 */

pub mod rules;
pub mod service;

// Re-export main types
pub use service::{QuoteValidator, RejectReason, Verdict};
