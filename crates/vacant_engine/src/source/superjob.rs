use serde_json::Value;
use vacant_core::Platform;
use vacant_logging::vacant_debug;

use super::http::{build_url, take_items, JsonClient};
use super::{ListingSource, SourceSettings};
use crate::{FailureKind, SourceError};

const DEFAULT_BASE_URL: &str = "https://api.superjob.ru/2.0/vacancies/";

/// SuperJob API v2 vacancy search. Needs an app key sent as `X-Api-App-Id`.
#[derive(Debug, Clone)]
pub struct SuperJobSource {
    client: JsonClient,
    base_url: String,
    api_key: Option<String>,
    page_size: usize,
}

impl SuperJobSource {
    /// A missing key is only reported when a page is requested, so a
    /// search that never selects SuperJob does not need one.
    pub fn new(settings: SourceSettings, api_key: Option<String>) -> Result<Self, SourceError> {
        Ok(Self {
            client: JsonClient::new(&settings)?,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            page_size: settings.page_size,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait::async_trait]
impl ListingSource for SuperJobSource {
    fn platform(&self) -> Platform {
        Platform::SuperJob
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    async fn fetch_page(&self, keyword: &str, page: usize) -> Result<Vec<Value>, SourceError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            SourceError::new(FailureKind::MissingCredentials, "SUPERJOB_API_KEY is not set")
        })?;
        let url = build_url(
            &self.base_url,
            &[
                ("keywords[0][srws]", "1".to_string()),
                ("keywords[0][skwc]", "or".to_string()),
                ("keywords[0][keys]", keyword.to_string()),
                ("page", page.to_string()),
                ("count", self.page_size.to_string()),
            ],
        )?;
        vacant_debug!("SuperJob.ru request {}", url);
        let body = self
            .client
            .get_json(url, &[("X-Api-App-Id", api_key)])
            .await?;
        take_items(body, "objects")
    }
}
