mod hh;
mod http;
mod superjob;

use std::time::Duration;

use serde_json::Value;
use vacant_core::Platform;

use crate::SourceError;

pub use hh::HhSource;
pub use superjob::SuperJobSource;

#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
    pub page_size: usize,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
            page_size: 20,
        }
    }
}

/// A job board that serves listings one page at a time.
///
/// Pages are numbered from 0. Items come back in the platform's own JSON
/// shape; mapping them to records is `vacant_core::normalize_listing`'s job.
#[async_trait::async_trait]
pub trait ListingSource: Send + Sync {
    fn platform(&self) -> Platform;

    fn page_size(&self) -> usize;

    async fn fetch_page(&self, keyword: &str, page: usize) -> Result<Vec<Value>, SourceError>;
}

/// Pages needed to cover `count` listings: `ceil(count / page_size)`.
pub fn page_count(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}
