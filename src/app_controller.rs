use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::Path;

use crate::app_config::Config;
use crate::language::{Lang, LanguageFilter};
use crate::linker::{BilingualLinker, LinkReport};
use crate::search::{BilingualPair, SearchRanker};
use crate::store::connection::{DatabaseConnection, DatabaseStats};
use crate::store::models::ScrapedFragment;
use crate::store::repository::Repository;
use crate::translation::QueryTranslationService;
use crate::validator::{QuoteValidator, Verdict};

// @module: Application controller wiring the core services together

/// Outcome of one ingestion run
#[derive(Debug, Default, Clone)]
pub struct IngestReport {
    /// Fragments accepted and stored as new quotes
    pub accepted: usize,
    /// Fragments resolved to an already-stored quote
    pub duplicates: usize,
    /// Fragments rejected by the validator
    pub rejected: usize,
    /// Rejection counts keyed by reason
    pub rejected_reasons: HashMap<String, usize>,
}

/// Outcome of one cleanup pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    /// Quotes examined
    pub examined: usize,
    /// Quotes deleted (or that would be, in dry-run)
    pub deleted: usize,
    /// Quotes rewritten with a stripped citation suffix
    pub rewritten: usize,
    /// Whether this was a dry run
    pub dry_run: bool,
}

/// Main application controller for the bilingual quote index
pub struct Controller {
    // @field: App configuration
    config: Config,
    repo: Repository,
    validator: QuoteValidator,
    linker: BilingualLinker,
    ranker: SearchRanker,
}

impl Controller {
    // @method: Create a controller with the configured database location
    pub fn with_config(config: Config) -> Result<Self> {
        let db = match &config.database_path {
            Some(path) => DatabaseConnection::new(path)?,
            None => DatabaseConnection::new_default()?,
        };
        Ok(Self::assemble(config, Repository::new(db)))
    }

    /// Create a controller over an existing repository (tests use an
    /// in-memory one)
    pub fn with_repository(config: Config, repo: Repository) -> Self {
        Self::assemble(config, repo)
    }

    fn assemble(config: Config, repo: Repository) -> Self {
        let validator = QuoteValidator::new(config.validator.clone());
        let linker = BilingualLinker::new(repo.clone(), config.linker.clone());
        let translator = QueryTranslationService::from_config(&config.translation);
        let ranker = SearchRanker::new(repo.clone(), translator, config.search.clone());

        Self {
            config,
            repo,
            validator,
            linker,
            ranker,
        }
    }

    /// The repository this controller operates on
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Ingest scraped fragments from a JSON file
    pub async fn ingest_file<P: AsRef<Path>>(&self, path: P) -> Result<IngestReport> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fragment file: {}", path.display()))?;
        let fragments: Vec<ScrapedFragment> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse fragment file: {}", path.display()))?;

        info!("Ingesting {} fragments from {}", fragments.len(), path.display());
        self.ingest_fragments(fragments).await
    }

    /// Classify and store a batch of scraped fragments.
    ///
    /// Rejected fragments are counted per reason; duplicates resolve to
    /// their existing rows. Only infrastructure failures propagate.
    pub async fn ingest_fragments(&self, fragments: Vec<ScrapedFragment>) -> Result<IngestReport> {
        let mut report = IngestReport::default();

        for fragment in fragments {
            match self.validator.classify(&fragment.text, fragment.language) {
                Verdict::Reject { reason } => {
                    debug!("Rejected fragment ({}): {:.60}", reason, fragment.text);
                    report.rejected += 1;
                    *report
                        .rejected_reasons
                        .entry(reason.to_string())
                        .or_default() += 1;
                }
                Verdict::Accept { text } => {
                    let author_name = fragment.author.trim();
                    let author_id = if author_name.is_empty() {
                        None
                    } else {
                        // Key the author row by the language of the NAME, not
                        // of the quote: pages scraped in both languages under
                        // the same name must land on one row, or the linker
                        // can never pair their quotes
                        let name_language = Lang::detect(author_name);
                        Some(
                            self.repo
                                .get_or_create_author(author_name, name_language, None)
                                .await?
                                .id,
                        )
                    };

                    let source_id = match &fragment.source {
                        Some(title) if !title.trim().is_empty() => Some(
                            self.repo
                                .get_or_create_source(
                                    title,
                                    fragment.language,
                                    author_id,
                                    fragment.source_type,
                                )
                                .await?
                                .id,
                        ),
                        _ => None,
                    };

                    let (_, created) = self
                        .repo
                        .create_quote(&text, fragment.language, author_id, source_id)
                        .await?;
                    if created {
                        report.accepted += 1;
                    } else {
                        report.duplicates += 1;
                    }
                }
            }
        }

        info!(
            "Ingestion finished: {} accepted, {} duplicates, {} rejected",
            report.accepted, report.duplicates, report.rejected
        );
        Ok(report)
    }

    /// Run the linking batch over every bilingual author
    pub async fn link_all(&self) -> Result<LinkReport> {
        Ok(self.linker.link_all().await?)
    }

    /// Run the linking batch for the authors matching a name
    pub async fn link_author_by_name(&self, name: &str) -> Result<LinkReport> {
        let authors = self.repo.find_authors_by_name(name).await?;
        if authors.is_empty() {
            warn!("No author named '{}' found", name);
            return Ok(LinkReport::default());
        }

        let mut report = LinkReport::default();
        for author in authors {
            match self.linker.link_author(author.id).await {
                Ok(batch) => {
                    report.authors_processed += 1;
                    report.links_created += batch.links_created;
                    report.groups_assigned += batch.groups_assigned;
                }
                Err(e) => {
                    warn!("Skipping author {} ({}): {}", author.name, author.id, e);
                    report.authors_skipped += 1;
                }
            }
        }
        Ok(report)
    }

    /// Search the corpus for ranked bilingual pairs
    pub async fn search(
        &self,
        query: &str,
        filter: LanguageFilter,
        prefer_bilingual: bool,
        limit: Option<usize>,
    ) -> Vec<BilingualPair> {
        self.ranker
            .search(query, filter, prefer_bilingual, limit)
            .await
    }

    /// Re-classify every stored quote with the current rule tables.
    ///
    /// Rejects are deleted, quotes with a newly stripped citation suffix are
    /// rewritten. With `dry_run` the pass only reports what it would do.
    pub async fn cleanup(&self, dry_run: bool) -> Result<CleanupReport> {
        let quotes = self.repo.all_quotes().await?;
        let mut report = CleanupReport {
            dry_run,
            ..Default::default()
        };

        for quote in quotes {
            report.examined += 1;

            match self.validator.classify(&quote.text, quote.language) {
                Verdict::Reject { reason } => {
                    info!(
                        "Cleanup: {} quote {} ({}): {}",
                        if dry_run { "would delete" } else { "deleting" },
                        quote.id,
                        reason,
                        quote.preview()
                    );
                    if !dry_run {
                        self.repo.delete_quote(quote.id).await?;
                    }
                    report.deleted += 1;
                }
                Verdict::Accept { text } if text != quote.text => {
                    debug!(
                        "Cleanup: {} quote {}: '{}' -> '{}'",
                        if dry_run { "would rewrite" } else { "rewriting" },
                        quote.id,
                        quote.preview(),
                        text
                    );
                    if !dry_run {
                        // A stripped text can collide with an existing
                        // duplicate; keep the original in that case
                        if let Err(e) = self.repo.update_quote_text(quote.id, &text).await {
                            warn!("Cleanup: could not rewrite quote {}: {}", quote.id, e);
                            continue;
                        }
                    }
                    report.rewritten += 1;
                }
                Verdict::Accept { .. } => {}
            }
        }

        info!(
            "Cleanup {}: {} examined, {} deleted, {} rewritten",
            if dry_run { "(dry run)" } else { "finished" },
            report.examined,
            report.deleted,
            report.rewritten
        );
        Ok(report)
    }

    /// Store statistics
    pub fn stats(&self) -> Result<DatabaseStats> {
        Ok(self.repo.stats()?)
    }

    /// The configuration this controller was built with
    pub fn config(&self) -> &Config {
        &self.config
    }
}
