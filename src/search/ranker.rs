/*!
 * The search ranker.
 *
 * Builds the query set (original plus cross-language expansion), runs the
 * per-language full-text queries concurrently under individual timeouts,
 * and merges raw hits into ranked bilingual-or-single-language pairs. A
 * failure in one language never fails the other; translation failure
 * degrades to single-language search.
 */

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use log::{debug, warn};

use crate::app_config::SearchConfig;
use crate::language::{Lang, LanguageFilter};
use crate::search::pair::{self, BilingualPair};
use crate::store::models::Quote;
use crate::store::repository::Repository;
use crate::translation::QueryTranslationService;

/// Runs bilingual searches over the store
#[derive(Clone)]
pub struct SearchRanker {
    repo: Repository,
    translator: QueryTranslationService,
    config: SearchConfig,
}

impl SearchRanker {
    /// Create a ranker over the given store and translation service
    pub fn new(repo: Repository, translator: QueryTranslationService, config: SearchConfig) -> Self {
        Self {
            repo,
            translator,
            config,
        }
    }

    /// Search the corpus and return ranked result pairs.
    ///
    /// Never fails: unavailable languages or translation simply shrink the
    /// result set. `limit` falls back to the configured default and is
    /// clamped to the configured maximum.
    pub async fn search(
        &self,
        query: &str,
        filter: LanguageFilter,
        prefer_bilingual: bool,
        limit: Option<usize>,
    ) -> Vec<BilingualPair> {
        let limit = limit
            .unwrap_or(self.config.default_limit)
            .min(self.config.max_limit);
        if limit == 0 || query.trim().is_empty() {
            return Vec::new();
        }

        let query_lang = Lang::detect(query);
        // Merging can only shrink the pair count below the raw hit count,
        // so over-fetch per language before truncating
        let fetch_limit = limit * 2;

        let hit_sets = futures::future::join_all(filter.languages().iter().map(|&lang| {
            self.language_hits(query, query_lang, lang, filter.is_bilingual(), fetch_limit)
        }))
        .await;

        let pairs = self.merge_into_pairs(hit_sets).await;

        let mut pairs = pairs;
        pair::sort_pairs(&mut pairs, prefer_bilingual);
        pairs.truncate(limit);
        pairs
    }

    /// Run the applicable query against one language.
    ///
    /// The cross-language side first expands the query through the
    /// translation service (identity on provider failure), so this future
    /// as a whole runs concurrently with the direct-language search.
    async fn language_hits(
        &self,
        query: &str,
        query_lang: Lang,
        target_lang: Lang,
        expand: bool,
        fetch_limit: usize,
    ) -> (Lang, Vec<(Quote, f64)>) {
        let applicable = if target_lang == query_lang || !expand {
            query.to_string()
        } else {
            self.translator.translate(query, query_lang).await
        };

        let timeout = Duration::from_millis(self.config.query_timeout_ms.max(1));
        let hits = match tokio::time::timeout(
            timeout,
            self.repo.search_quotes(&applicable, target_lang, fetch_limit),
        )
        .await
        {
            Ok(Ok(hits)) => hits,
            Ok(Err(e)) => {
                warn!("Search in {} failed: {}; continuing without it", target_lang, e);
                Vec::new()
            }
            Err(_) => {
                warn!(
                    "Search in {} timed out after {:?}; continuing without it",
                    target_lang, timeout
                );
                Vec::new()
            }
        };

        debug!("{} direct hits in {}", hits.len(), target_lang);
        (target_lang, hits)
    }

    /// Merge per-language hit lists into pairs.
    ///
    /// Each quote and each bilingual group contributes to at most one pair.
    /// Hits are visited best-score-first (ties by ascending id) so the
    /// strongest member claims its group.
    async fn merge_into_pairs(&self, hit_sets: Vec<(Lang, Vec<(Quote, f64)>)>) -> Vec<BilingualPair> {
        // Direct-hit bookkeeping: per-language id sets decide is_translated,
        // the score map feeds combined scores
        let mut direct_ids: HashMap<Lang, HashSet<i64>> = HashMap::new();
        let mut scores: HashMap<i64, f64> = HashMap::new();
        let mut all_hits: Vec<(Quote, f64)> = Vec::new();

        for (lang, hits) in hit_sets {
            let ids = direct_ids.entry(lang).or_default();
            for (quote, score) in hits {
                ids.insert(quote.id);
                // Keep the max score when a quote matched several variants
                let entry = scores.entry(quote.id).or_insert(f64::MIN);
                if score > *entry {
                    *entry = score;
                }
                all_hits.push((quote, score));
            }
        }

        all_hits.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.id.cmp(&b.0.id))
        });

        let mut seen_quotes: HashSet<i64> = HashSet::new();
        let mut seen_groups: HashSet<i64> = HashSet::new();
        let mut pairs = Vec::new();

        for (quote, _) in all_hits {
            if seen_quotes.contains(&quote.id) {
                continue;
            }
            seen_quotes.insert(quote.id);

            let own_score = scores.get(&quote.id).copied().unwrap_or(0.0);

            let Some(group_id) = quote.bilingual_group_id else {
                pairs.push(single_pair(quote, own_score));
                continue;
            };

            if seen_groups.contains(&group_id) {
                continue;
            }
            seen_groups.insert(group_id);

            let members = match self.repo.quotes_by_group(group_id).await {
                Ok(members) => members,
                Err(e) => {
                    warn!(
                        "Failed to load group {} for quote {}: {}; returning it unpaired",
                        group_id, quote.id, e
                    );
                    pairs.push(single_pair(quote, own_score));
                    continue;
                }
            };

            let counterpart =
                best_counterpart(&members, quote.language.opposite(), &direct_ids, &scores);

            match counterpart {
                Some(other) => {
                    seen_quotes.insert(other.id);
                    let other_direct = direct_ids
                        .get(&other.language)
                        .is_some_and(|ids| ids.contains(&other.id));
                    let other_score = scores.get(&other.id).copied().unwrap_or(0.0);

                    let combined = if other_direct {
                        own_score.max(other_score)
                    } else {
                        own_score
                    };

                    let (english, russian) = match quote.language {
                        Lang::En => (Some(quote), Some(other)),
                        Lang::Ru => (Some(other), Some(quote)),
                    };

                    pairs.push(BilingualPair {
                        english,
                        russian,
                        is_translated: !other_direct,
                        score: combined,
                    });
                }
                None => pairs.push(single_pair(quote, own_score)),
            }
        }

        pairs
    }
}

/// Wrap a lone quote into a one-sided pair
fn single_pair(quote: Quote, score: f64) -> BilingualPair {
    let (english, russian) = match quote.language {
        Lang::En => (Some(quote), None),
        Lang::Ru => (None, Some(quote)),
    };
    BilingualPair {
        english,
        russian,
        is_translated: false,
        score,
    }
}

/// Choose the counterpart quote for a group: the highest-scoring direct hit
/// of the other language, or the lowest-id member when none matched.
fn best_counterpart(
    members: &[Quote],
    language: Lang,
    direct_ids: &HashMap<Lang, HashSet<i64>>,
    scores: &HashMap<i64, f64>,
) -> Option<Quote> {
    let candidates: Vec<&Quote> = members.iter().filter(|m| m.language == language).collect();
    if candidates.is_empty() {
        return None;
    }

    let direct = direct_ids.get(&language);
    let mut best: Option<&Quote> = None;
    let mut best_score = f64::MIN;

    for candidate in &candidates {
        if direct.is_some_and(|ids| ids.contains(&candidate.id)) {
            let score = scores.get(&candidate.id).copied().unwrap_or(0.0);
            // Members arrive in ascending id order, so strict improvement
            // keeps the lowest id on ties
            if score > best_score {
                best = Some(candidate);
                best_score = score;
            }
        }
    }

    // No direct hit among them: the lowest-id member stands in
    Some(best.unwrap_or(candidates[0]).clone())
}
