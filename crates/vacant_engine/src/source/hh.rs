use serde_json::Value;
use vacant_core::Platform;
use vacant_logging::vacant_debug;

use super::http::{build_url, take_items, JsonClient};
use super::{ListingSource, SourceSettings};
use crate::SourceError;

const DEFAULT_BASE_URL: &str = "https://api.hh.ru/vacancies";

/// HH.ru public vacancy search. Searches titles only.
#[derive(Debug, Clone)]
pub struct HhSource {
    client: JsonClient,
    base_url: String,
    user_agent: String,
    page_size: usize,
}

impl HhSource {
    pub fn new(settings: SourceSettings, user_agent: impl Into<String>) -> Result<Self, SourceError> {
        Ok(Self {
            client: JsonClient::new(&settings)?,
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: user_agent.into(),
            page_size: settings.page_size,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait::async_trait]
impl ListingSource for HhSource {
    fn platform(&self) -> Platform {
        Platform::HeadHunter
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    async fn fetch_page(&self, keyword: &str, page: usize) -> Result<Vec<Value>, SourceError> {
        let url = build_url(
            &self.base_url,
            &[
                ("text", keyword.to_string()),
                ("page", page.to_string()),
                ("per_page", self.page_size.to_string()),
                ("search_field", "name".to_string()),
            ],
        )?;
        vacant_debug!("HH.ru request {}", url);
        let body = self
            .client
            .get_json(url, &[("HH-User-Agent", self.user_agent.as_str())])
            .await?;
        take_items(body, "items")
    }
}
