//! One-level destination crawler for travel-guide pages.
//!
//! Each destination gets its primary page at `<base>/en/<name>` scanned for
//! activity attributes, then every entry of the page's "Other destinations"
//! list is fetched once and merged in. Fetch failures never propagate: a
//! missing primary page yields an empty attribute set, a bad related link
//! is skipped on its own.

use std::time::Duration;

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, warn};
use url::Url;

use travelkb_shared::{CrawlConfig, Result, TravelKbError};

use crate::extract::extract_attributes;

/// User-Agent string for guide-page requests. Some wikis refuse the
/// default reqwest UA, so present a browser-ish one.
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.11 (KHTML, like Gecko) Chrome/23.0.1271.64 Safari/537.11";

/// Maximum number of redirects to follow when fetching a guide page.
const MAX_REDIRECTS: usize = 5;

// ---------------------------------------------------------------------------
// DestinationCrawler
// ---------------------------------------------------------------------------

/// Crawls one destination at a time; holds the HTTP client, guide base URL,
/// and the injected activity vocabulary.
pub struct DestinationCrawler {
    client: Client,
    base: Url,
    vocabulary: Vec<String>,
    rate_limit_ms: u64,
}

impl DestinationCrawler {
    /// Create a crawler against the given guide base URL.
    pub fn new(base: Url, vocabulary: Vec<String>, config: &CrawlConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TravelKbError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base,
            vocabulary,
            rate_limit_ms: config.rate_limit_ms,
        })
    }

    /// The primary guide page URL for a destination name.
    pub fn destination_url(&self, name: &str) -> Result<Url> {
        self.base
            .join(&format!("/en/{name}"))
            .map_err(|e| TravelKbError::validation(format!("bad destination URL for '{name}': {e}")))
    }

    /// Crawl one destination into its merged, deduplicated attribute set.
    ///
    /// Never fails: every fetch problem is absorbed locally and reflected
    /// only as missing attribute contributions. Related links are followed
    /// exactly one level deep, in document order; a link appearing twice
    /// (or pointing back at the destination itself) merges idempotently.
    #[instrument(skip(self), fields(destination = %name))]
    pub async fn crawl(&self, name: &str) -> Vec<String> {
        let url = match self.destination_url(name) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "skipping destination with unbuildable URL");
                return Vec::new();
            }
        };

        debug!(%url, "fetching primary page");
        let body = match fetch_page(&self.client, &url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(%url, error = %e, "primary page fetch failed, no attributes");
                return Vec::new();
            }
        };

        // Parse synchronously and drop the DOM before any await: scraper's
        // Html is not Send and must not be held across suspension points.
        let (mut attributes, links) = {
            let doc = Html::parse_document(&body);
            let attributes = extract_attributes(&page_text(&doc), &self.vocabulary);
            (attributes, related_links(&doc))
        };

        debug!(
            attributes = attributes.len(),
            related = links.len(),
            "primary page scanned"
        );

        for href in links {
            let Ok(link_url) = self.base.join(&href) else {
                warn!(%href, "skipping unparseable related link");
                continue;
            };

            if self.rate_limit_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.rate_limit_ms)).await;
            }

            debug!(%link_url, "fetching related destination");
            match fetch_page(&self.client, &link_url).await {
                Ok(body) => {
                    let page_attrs = {
                        let doc = Html::parse_document(&body);
                        extract_attributes(&page_text(&doc), &self.vocabulary)
                    };
                    for attr in page_attrs {
                        if !attributes.contains(&attr) {
                            attributes.push(attr);
                        }
                    }
                }
                Err(e) => {
                    warn!(%link_url, error = %e, "related link fetch failed, skipping");
                }
            }
        }

        attributes
    }
}

// ---------------------------------------------------------------------------
// Page fetching and structure queries
// ---------------------------------------------------------------------------

/// Fetch one page body, treating non-2xx statuses as failures.
async fn fetch_page(client: &Client, url: &Url) -> Result<String> {
    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| TravelKbError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(TravelKbError::Network(format!("{url}: HTTP {status}")));
    }

    response
        .text()
        .await
        .map_err(|e| TravelKbError::Network(format!("{url}: body read failed: {e}")))
}

/// Render a document to lowercased plain text for vocabulary matching.
fn page_text(doc: &Html) -> String {
    let mut text = String::new();
    for chunk in doc.root_element().text() {
        text.push_str(chunk);
        text.push(' ');
    }
    text.to_lowercase()
}

/// Collect the outbound links of the page's "Other destinations" section.
///
/// The guide markup puts a `span#Other_destinations` inside a heading; the
/// destination list is the heading's next `<ul>` sibling, one link per
/// `<li>`. Returns hrefs in document order; empty when the section or its
/// list is missing.
fn related_links(doc: &Html) -> Vec<String> {
    let span_sel = Selector::parse("span#Other_destinations").expect("valid selector");
    let anchor_sel = Selector::parse("a[href]").expect("valid selector");
    let li_sel = Selector::parse("li").expect("valid selector");

    let Some(span) = doc.select(&span_sel).next() else {
        return Vec::new();
    };
    let Some(heading) = span.parent().and_then(ElementRef::wrap) else {
        return Vec::new();
    };
    let Some(list) = heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "ul")
    else {
        return Vec::new();
    };

    let mut links = Vec::new();
    for item in list.select(&li_sel) {
        if let Some(anchor) = item.select(&anchor_sel).next() {
            if let Some(href) = anchor.value().attr("href") {
                links.push(href.to_string());
            }
        }
    }
    links
}
