// ABOUTME: Paginated Custom Search JSON API client exposed as a lazy stream of result links.
// ABOUTME: Each page is one request; the stream ends on an empty or failed page, erroring only when the first page fails.

use futures::stream::{self, StreamExt};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::LyricsError;
use crate::options::SearchOptions;
use crate::resource::{fetch, FetchOptions};
use crate::search::UrlStream;

/// First result offset; the API counts from 1.
pub const FIRST_OFFSET: u32 = 1;

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: String,
}

/// A configured search: the query plus everything needed to page through it.
#[derive(Debug, Clone)]
pub struct WebSearch {
    pub query: String,
    pub api_key: String,
    pub options: SearchOptions,
    pub fetch: FetchOptions,
}

impl WebSearch {
    /// URL of the page starting at `start`.
    pub fn page_url(&self, start: u32) -> Result<String, LyricsError> {
        let start = start.to_string();
        let num = self.options.page_size.to_string();
        url::Url::parse_with_params(
            &self.options.endpoint,
            &[
                ("key", self.api_key.as_str()),
                ("cx", self.options.engine_id.as_str()),
                ("q", self.query.as_str()),
                ("start", start.as_str()),
                ("num", num.as_str()),
            ],
        )
        .map(String::from)
        .map_err(|e| {
            LyricsError::search(
                &self.options.endpoint,
                "Search.page_url",
                Some(anyhow::anyhow!("invalid search endpoint: {}", e)),
            )
        })
    }

    /// Fetch the links of one page. An empty vector means the results are exhausted.
    pub async fn page(
        &self,
        client: &reqwest::Client,
        start: u32,
    ) -> Result<Vec<String>, LyricsError> {
        let url = self.page_url(start)?;
        debug!(query = %self.query, start, "fetching search page");

        let response = fetch(client, &url, &self.fetch).await.map_err(|e| {
            LyricsError::search(&self.query, "Search.page", Some(anyhow::Error::new(e)))
        })?;

        let page: SearchPage = serde_json::from_slice(&response.body).map_err(|e| {
            LyricsError::search(
                &self.query,
                "Search.page",
                Some(anyhow::anyhow!("invalid search response: {}", e)),
            )
        })?;
        Ok(page.items.into_iter().map(|item| item.link).collect())
    }

    /// Page through the results lazily, starting at offset 1.
    ///
    /// No request is made until the stream is polled. A failed first page
    /// yields one error and ends the stream. Later pages fail once paging
    /// runs past what the API serves, so a failure there ends the results.
    pub fn into_stream(self, client: reqwest::Client) -> UrlStream<'static> {
        let step = self.options.page_size.max(1);
        let pages = stream::unfold(Some(FIRST_OFFSET), move |start| {
            let search = self.clone();
            let client = client.clone();
            async move {
                let start = start?;
                match search.page(&client, start).await {
                    Ok(links) if links.is_empty() => {
                        debug!(query = %search.query, start, "search results exhausted");
                        None
                    }
                    Ok(links) => Some((Ok(links), Some(start + step))),
                    Err(err) if start == FIRST_OFFSET => {
                        warn!(query = %search.query, start, error = %err, "search page failed");
                        Some((Err(err), None))
                    }
                    Err(err) => {
                        warn!(query = %search.query, start, error = %err, "search paging stopped");
                        None
                    }
                }
            }
        });

        pages
            .flat_map(|page| match page {
                Ok(links) => stream::iter(links.into_iter().map(Ok).collect::<Vec<_>>()),
                Err(err) => stream::iter(vec![Err(err)]),
            })
            .boxed_local()
    }
}
