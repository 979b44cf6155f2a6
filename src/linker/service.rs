/*!
 * The bilingual linking batch.
 *
 * Work is partitioned by author: authors with quotes in both languages are
 * processed with bounded parallelism, and all writes for one author happen
 * in a single transaction. The batch is idempotent; running it again over
 * an unchanged corpus writes nothing.
 */

use std::collections::HashMap;
use std::sync::Arc;

use futures::StreamExt;
use log::{debug, info, warn};

use crate::app_config::LinkerConfig;
use crate::errors::StorageError;
use crate::language::Lang;
use crate::linker::similarity::{self, WordMap};
use crate::linker::union_find::UnionFind;
use crate::store::models::{Quote, TranslationLink};
use crate::store::repository::{GroupAssignment, LinkBatchResult, NewLink, Repository};

/// Aggregate outcome of one linking batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    /// Authors whose quotes were compared
    pub authors_processed: usize,
    /// Authors skipped because their batch failed
    pub authors_skipped: usize,
    /// Translation link rows inserted
    pub links_created: usize,
    /// Quotes that received a bilingual_group_id
    pub groups_assigned: usize,
}

/// Discovers and records cross-language equivalence groups
#[derive(Clone)]
pub struct BilingualLinker {
    repo: Repository,
    config: LinkerConfig,
}

impl BilingualLinker {
    /// Create a linker over the given store
    pub fn new(repo: Repository, config: LinkerConfig) -> Self {
        Self { repo, config }
    }

    /// Link quotes for every author present in both languages.
    ///
    /// Author units run concurrently up to the configured worker count;
    /// a failing author is logged and skipped, the batch continues.
    pub async fn link_all(&self) -> Result<LinkReport, StorageError> {
        let authors = self.repo.authors_in_both_languages().await?;
        if authors.is_empty() {
            info!("No bilingual authors found, nothing to link");
            return Ok(LinkReport::default());
        }

        let words = Arc::new(self.load_word_map().await?);
        info!(
            "Linking {} bilingual authors ({} dictionary entries, {} workers)",
            authors.len(),
            words.len(),
            self.config.worker_count
        );

        let results: Vec<(i64, Result<LinkBatchResult, StorageError>)> =
            futures::stream::iter(authors.into_iter().map(|author_id| {
                let linker = self.clone();
                let words = words.clone();
                async move {
                    let outcome = linker.link_author_with(author_id, &words).await;
                    (author_id, outcome)
                }
            }))
            .buffer_unordered(self.config.worker_count.max(1))
            .collect()
            .await;

        let mut report = LinkReport::default();
        for (author_id, outcome) in results {
            match outcome {
                Ok(batch) => {
                    report.authors_processed += 1;
                    report.links_created += batch.links_created;
                    report.groups_assigned += batch.groups_assigned;
                }
                Err(e) => {
                    warn!("Skipping author {}: {}", author_id, e);
                    report.authors_skipped += 1;
                }
            }
        }

        info!(
            "Linking finished: {} links created, {} group ids assigned, {} authors skipped",
            report.links_created, report.groups_assigned, report.authors_skipped
        );
        Ok(report)
    }

    /// Link quotes for a single author
    pub async fn link_author(&self, author_id: i64) -> Result<LinkBatchResult, StorageError> {
        let words = self.load_word_map().await?;
        self.link_author_with(author_id, &words).await
    }

    async fn load_word_map(&self) -> Result<WordMap, StorageError> {
        let pairs = self.repo.word_pairs().await?;
        Ok(WordMap::from_pairs(pairs))
    }

    /// Compare one author's quotes across languages, then persist the
    /// decided links and group assignments in one transaction.
    async fn link_author_with(
        &self,
        author_id: i64,
        words: &WordMap,
    ) -> Result<LinkBatchResult, StorageError> {
        let en_quotes = self.repo.quotes_for_author(author_id, Lang::En).await?;
        let ru_quotes = self.repo.quotes_for_author(author_id, Lang::Ru).await?;

        if en_quotes.is_empty() || ru_quotes.is_empty() {
            debug!("Author {} has quotes in only one language", author_id);
            return Ok(LinkBatchResult::default());
        }

        let existing_links = self.repo.links_for_author(author_id).await?;

        // Seed the equivalence structure from what is already persisted
        let mut classes = UnionFind::new();
        for quote in en_quotes.iter().chain(ru_quotes.iter()) {
            classes.insert(quote.id);
        }
        for link in &existing_links {
            classes.union(link.quote_id, link.translated_quote_id);
        }
        let mut by_existing_group: HashMap<i64, i64> = HashMap::new();
        for quote in en_quotes.iter().chain(ru_quotes.iter()) {
            if let Some(group_id) = quote.bilingual_group_id {
                // Quotes already sharing a persisted group belong together
                if let Some(&first) = by_existing_group.get(&group_id) {
                    classes.union(first, quote.id);
                } else {
                    by_existing_group.insert(group_id, quote.id);
                }
            }
        }

        let new_links = self.select_candidates(&en_quotes, &ru_quotes, words, &existing_links, &mut classes);
        let groups = build_group_assignments(&mut classes, &en_quotes, &ru_quotes);

        if new_links.is_empty() && groups.is_empty() {
            return Ok(LinkBatchResult::default());
        }

        self.repo.apply_link_batch(new_links, groups).await
    }

    /// Pick the best Russian candidate for each ungrouped English quote.
    ///
    /// Determinism: quotes are visited in ascending id order and an
    /// equal-confidence tie keeps the candidate with the lowest id. Ties
    /// are logged for audit; they never block the batch.
    fn select_candidates(
        &self,
        en_quotes: &[Quote],
        ru_quotes: &[Quote],
        words: &WordMap,
        existing_links: &[TranslationLink],
        classes: &mut UnionFind,
    ) -> Vec<NewLink> {
        let existing_pairs: std::collections::HashSet<(i64, i64)> = existing_links
            .iter()
            .map(|l| l.ordered_pair())
            .collect();

        let mut new_links = Vec::new();

        for en_quote in en_quotes.iter().filter(|q| q.bilingual_group_id.is_none()) {
            let mut best: Option<(&Quote, similarity::SimilarityScore)> = None;
            let mut tied_with: Vec<i64> = Vec::new();

            for ru_quote in ru_quotes.iter().filter(|q| q.bilingual_group_id.is_none()) {
                let score = similarity::score_pair(&en_quote.text, &ru_quote.text, words);

                let accepted = (score.overlap >= self.config.min_overlap
                    || score.ratio >= self.config.min_ratio)
                    && score.confidence >= self.config.min_confidence;
                if !accepted {
                    continue;
                }

                match best.map(|(_, s)| s.confidence) {
                    None => best = Some((ru_quote, score)),
                    Some(best_confidence) => {
                        if score.confidence > best_confidence {
                            best = Some((ru_quote, score));
                            tied_with.clear();
                        } else if score.confidence == best_confidence {
                            // Candidates are visited in ascending id order,
                            // so the incumbent already has the lowest id
                            tied_with.push(ru_quote.id);
                        }
                    }
                }
            }

            if let Some((ru_quote, score)) = best {
                if !tied_with.is_empty() {
                    debug!(
                        "Ambiguous match for quote {}: candidates {:?} tied at confidence {}, keeping {}",
                        en_quote.id, tied_with, score.confidence, ru_quote.id
                    );
                }

                classes.union(en_quote.id, ru_quote.id);

                let pair = if en_quote.id <= ru_quote.id {
                    (en_quote.id, ru_quote.id)
                } else {
                    (ru_quote.id, en_quote.id)
                };
                if !existing_pairs.contains(&pair) {
                    debug!(
                        "Matched quote {} <-> {} (overlap {}, confidence {})",
                        en_quote.id, ru_quote.id, score.overlap, score.confidence
                    );
                    new_links.push(NewLink {
                        quote_id: en_quote.id,
                        translated_quote_id: ru_quote.id,
                        confidence: score.confidence,
                    });
                }
            }
        }

        new_links
    }
}

/// Turn equivalence classes into group assignments.
///
/// A class reuses the group id of its lowest-id member that already has
/// one; a class with no persisted id gets a fresh allocation inside the
/// write transaction. Singleton classes without an id are left alone.
fn build_group_assignments(
    classes: &mut UnionFind,
    en_quotes: &[Quote],
    ru_quotes: &[Quote],
) -> Vec<GroupAssignment> {
    let group_by_id: HashMap<i64, Option<i64>> = en_quotes
        .iter()
        .chain(ru_quotes.iter())
        .map(|q| (q.id, q.bilingual_group_id))
        .collect();

    let mut assignments = Vec::new();

    for members in classes.classes() {
        if members.len() < 2 {
            continue;
        }

        // Members are sorted ascending, so the first persisted id found is
        // the lowest-member one
        let existing = members
            .iter()
            .find_map(|id| group_by_id.get(id).copied().flatten());

        let unassigned: Vec<i64> = members
            .iter()
            .copied()
            .filter(|id| group_by_id.get(id).copied().flatten().is_none())
            .collect();

        if unassigned.is_empty() {
            continue;
        }

        assignments.push(GroupAssignment {
            group_id: existing,
            members,
        });
    }

    assignments
}
