/*!
 * The bilingual result pair.
 *
 * A pair holds zero or one quote per language judged to express the same
 * aphorism. Single-language hits leave the other side empty.
 */

use serde::Serialize;
use std::cmp::Ordering;

use crate::store::models::Quote;

/// One ranked search result
#[derive(Debug, Clone, Serialize)]
pub struct BilingualPair {
    /// English member, if any
    pub english: Option<Quote>,
    /// Russian member, if any
    pub russian: Option<Quote>,
    /// True when the counterpart is present only through its group link,
    /// not as a direct hit of its own language's query
    pub is_translated: bool,
    /// Combined relevance: the max of the member scores
    pub score: f64,
}

impl BilingualPair {
    /// Whether both languages are present
    pub fn is_bilingual(&self) -> bool {
        self.english.is_some() && self.russian.is_some()
    }

    /// Deterministic tie-break key: the smallest member quote id
    pub fn tie_break_id(&self) -> i64 {
        let en = self.english.as_ref().map(|q| q.id).unwrap_or(i64::MAX);
        let ru = self.russian.as_ref().map(|q| q.id).unwrap_or(i64::MAX);
        en.min(ru)
    }
}

/// Order pairs for output: bilingual tier first (when requested), then
/// combined score descending, ties by ascending quote id.
pub fn sort_pairs(pairs: &mut [BilingualPair], prefer_bilingual: bool) {
    pairs.sort_by(|a, b| {
        if prefer_bilingual {
            let tier = b.is_bilingual().cmp(&a.is_bilingual());
            if tier != Ordering::Equal {
                return tier;
            }
        }
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.tie_break_id().cmp(&b.tie_break_id()))
    });
}
