use tracing::error;

use crate::config::Settings;
use crate::error::FetchError;
use crate::fetch::PageFetcher;
use crate::parser::{self, ExtractReport};
use crate::record::ResultSet;

/// Fetch one listing page and turn its cards into records.
#[derive(Debug, Clone)]
pub struct Extractor {
    fetcher: PageFetcher,
}

impl Extractor {
    pub fn new(settings: &Settings) -> Result<Self, FetchError> {
        let fetcher = PageFetcher::new(&settings.user_agent, settings.timeout())?;
        Ok(Extractor { fetcher })
    }

    /// Fetch + parse, keeping the transport error and skip counts visible.
    pub async fn extract(&self, url: &str) -> Result<ExtractReport, FetchError> {
        let body = self.fetcher.fetch(url).await?;
        Ok(parser::parse_listing(&body))
    }

    /// Never fails. Transport errors are handed to `on_error` and yield an
    /// empty result set.
    pub async fn fetch_and_extract(
        &self,
        url: &str,
        on_error: impl FnOnce(&FetchError),
    ) -> ResultSet {
        match self.extract(url).await {
            Ok(report) => report.records,
            Err(e) => {
                error!("Error scraping data: {}", e);
                on_error(&e);
                ResultSet::new()
            }
        }
    }
}
