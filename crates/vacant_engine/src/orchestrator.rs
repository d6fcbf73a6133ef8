use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use futures_util::future::join_all;
use serde_json::Value;
use vacant_core::{
    filter_by_salary, normalize_listing, Platform, PlatformVacancies, SalaryRange, VacancyRecord,
};
use vacant_logging::{vacant_info, vacant_warn};

use crate::source::page_count;
use crate::{FailureKind, ListingSource, SourceError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub platforms: Vec<Platform>,
    pub keyword: String,
    /// Listings wanted per platform; rounded up to whole pages.
    pub count: usize,
    pub salary: SalaryRange,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    /// One entry per requested platform, empty when that platform failed.
    pub vacancies: PlatformVacancies,
    pub failures: BTreeMap<String, SourceError>,
    /// Listings dropped because they could not be turned into records.
    pub skipped: usize,
}

/// Fans a search out to the selected platforms and merges the filtered
/// results by platform name.
#[derive(Clone, Default)]
pub struct Orchestrator {
    sources: BTreeMap<Platform, Arc<dyn ListingSource>>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a source, replacing any earlier one for the same platform.
    pub fn with_source(mut self, source: Arc<dyn ListingSource>) -> Self {
        self.sources.insert(source.platform(), source);
        self
    }

    pub fn platforms(&self) -> Vec<Platform> {
        self.sources.keys().copied().collect()
    }

    /// Runs every selected platform concurrently and waits for all of them.
    ///
    /// The outcome does not depend on which platform finishes first.
    pub async fn search(&self, request: &SearchRequest) -> SearchOutcome {
        let selected: BTreeSet<Platform> = request.platforms.iter().copied().collect();
        let runs = selected.into_iter().map(|platform| async move {
            (platform, self.search_platform(platform, request).await)
        });
        let finished = join_all(runs).await;

        let mut outcome = SearchOutcome::default();
        for (platform, result) in finished {
            let name = platform.name().to_string();
            match result {
                Ok((records, skipped)) => {
                    outcome.skipped += skipped;
                    outcome.vacancies.insert(name, records);
                }
                Err(err) => {
                    vacant_warn!("{} search failed: {}", platform, err);
                    outcome.vacancies.insert(name.clone(), Vec::new());
                    outcome.failures.insert(name, err);
                }
            }
        }
        outcome
    }

    async fn search_platform(
        &self,
        platform: Platform,
        request: &SearchRequest,
    ) -> Result<(Vec<VacancyRecord>, usize), SourceError> {
        let source = self.sources.get(&platform).ok_or_else(|| {
            SourceError::new(FailureKind::NoSource, format!("{platform} is not configured"))
        })?;

        let raw = fetch_listings(source.as_ref(), &request.keyword, request.count).await?;
        let total = raw.len();

        let mut records = Vec::with_capacity(total);
        for item in &raw {
            match normalize_listing(platform, item) {
                Ok(record) => records.push(record),
                Err(err) => vacant_warn!("Skipping {} listing: {}", platform, err),
            }
        }
        let skipped = total - records.len();

        let filtered = filter_by_salary(&records, request.salary);
        vacant_info!(
            "{}: {} fetched, {} skipped, {} within salary range",
            platform,
            total,
            skipped,
            filtered.len()
        );
        Ok((filtered, skipped))
    }
}

/// Fetches `ceil(count / page_size)` pages in order and concatenates them.
///
/// The first failing page aborts the whole fetch.
pub async fn fetch_listings(
    source: &dyn ListingSource,
    keyword: &str,
    count: usize,
) -> Result<Vec<Value>, SourceError> {
    let platform = source.platform();
    let pages = page_count(count, source.page_size());
    let mut listings = Vec::new();
    for page in 0..pages {
        let items = source.fetch_page(keyword, page).await?;
        vacant_info!("{} page {}/{}: {} listings", platform, page + 1, pages, items.len());
        listings.extend(items);
    }
    Ok(listings)
}
