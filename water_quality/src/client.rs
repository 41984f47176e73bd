//! HTTP client for the remote water-quality feed

use crate::feed::parse_feed;
use crate::report::{evaluate_site, SiteReport};
use crate::Result;
use tracing::{debug, warn};

/// Rows requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Client for one water-quality feed endpoint
///
/// Every call fetches the first page only. There is no retry; a non-success
/// HTTP status becomes [`SiteReport::Unavailable`] and a failing feed result
/// code becomes [`SiteReport::Rejected`].
#[derive(Debug, Clone)]
pub struct WaterQualityClient {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
    page_size: u32,
}

impl WaterQualityClient {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            service_key: service_key.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the first feed page and grade the rows for `site_id`
    pub async fn site_report(&self, site_id: &str) -> Result<SiteReport> {
        let page_size = self.page_size.to_string();
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("serviceKey", self.service_key.as_str()),
                ("pageNo", "1"),
                ("numOfRows", page_size.as_str()),
                ("resultType", "xml"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), url = %self.base_url, "water quality feed returned an error status");
            return Ok(SiteReport::unavailable(status.as_u16()));
        }

        let body = response.text().await?;
        let feed = parse_feed(&body)?;
        if !feed.is_success() {
            warn!(
                code = %feed.result_code,
                message = %feed.result_message,
                "water quality feed reported a failure"
            );
            return Ok(SiteReport::rejected(feed.result_code, feed.result_message));
        }

        debug!(rows = feed.rows.len(), site_id, "fetched water quality page");
        Ok(evaluate_site(&feed, site_id))
    }
}
