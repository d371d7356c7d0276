//! End-to-end `build` pipeline: entity query → distance → crawl → fact file.
//!
//! Four explicit stages over an ordered record collection, each returning a
//! new collection: load (with first-seen dedup), enrich with distances,
//! enrich with crawled attributes, serialize. Only the final serialization
//! can fail the run; everything upstream degrades per record.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};
use url::Url;

use travelkb_crawler::DestinationCrawler;
use travelkb_dbpedia::{CountryRow, SparqlClient, SparqlOptions};
use travelkb_shared::{Coordinate, CrawlConfig, DestinationRecord, Result, TravelKbError};

/// Configuration for the `build_kb` pipeline.
#[derive(Debug, Clone)]
pub struct BuildKbConfig {
    /// City whose coordinates anchor all distance facts.
    pub origin_city: String,
    /// Where the fact file is written.
    pub output_path: PathBuf,
    /// SPARQL endpoint for the entity queries.
    pub sparql_endpoint: Url,
    /// Travel-guide base URL (`<base>/en/<name>` pages).
    pub travel_guide_base: Url,
    /// Crawl configuration.
    pub crawl: CrawlConfig,
    /// Activity vocabulary, in emission order.
    pub vocabulary: Vec<String>,
}

/// Result of the `build_kb` pipeline.
#[derive(Debug)]
pub struct BuildKbResult {
    /// Path of the written fact file.
    pub output_path: PathBuf,
    /// Number of countries in the knowledge base.
    pub country_count: usize,
    /// Resolved origin coordinates (zero sentinel if resolution failed).
    pub origin: Coordinate,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when a destination's crawl has completed.
    fn destination_crawled(&self, name: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &BuildKbResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn destination_crawled(&self, _name: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &BuildKbResult) {}
}

/// Run the full `build` pipeline.
///
/// 1. Query the country list and load records (first-seen dedup)
/// 2. Resolve the origin city (degrading to the zero sentinel)
/// 3. Enrich every record with its distance from the origin
/// 4. Crawl every destination's guide pages for activity attributes
/// 5. Write the fact file
#[instrument(skip_all, fields(origin = %config.origin_city, output = %config.output_path.display()))]
pub async fn build_kb(
    config: &BuildKbConfig,
    progress: &dyn ProgressReporter,
) -> Result<BuildKbResult> {
    let start = Instant::now();

    let sparql = SparqlClient::new(
        config.sparql_endpoint.clone(),
        &SparqlOptions::default(),
    )?;

    // --- Stage 1: entity list ---
    progress.phase("Fetching country list");
    let rows = sparql.query_countries().await?;
    let records = load_records(rows);
    if records.is_empty() {
        return Err(TravelKbError::validation(
            "entity query returned no countries",
        ));
    }
    info!(countries = records.len(), "country records loaded");

    // --- Stage 2: origin resolution ---
    progress.phase("Resolving origin");
    let origin = resolve_origin(&sparql, &config.origin_city).await;

    // --- Stage 3: distances ---
    progress.phase("Computing distances");
    let records = with_distances(records, origin);

    // --- Stage 4: attributes ---
    progress.phase("Crawling destination guides");
    let crawler = DestinationCrawler::new(
        config.travel_guide_base.clone(),
        config.vocabulary.clone(),
        &config.crawl,
    )?;
    let records = with_attributes(records, crawler, &config.crawl, progress).await;

    // --- Stage 5: fact file ---
    progress.phase("Writing knowledge base");
    travelkb_facts::write_knowledge_base(&records, &config.output_path)?;

    let result = BuildKbResult {
        output_path: config.output_path.clone(),
        country_count: records.len(),
        origin,
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        countries = result.country_count,
        elapsed_ms = result.elapsed.as_millis(),
        "build pipeline complete"
    );

    Ok(result)
}

// ---------------------------------------------------------------------------
// Pipeline stages
// ---------------------------------------------------------------------------

/// Turn raw entity rows into records, keyed by country name.
///
/// The upstream query yields one row per label combination, so duplicate
/// names are expected; the first row encountered wins. Rows without a
/// complete coordinate pair get the zero "unknown location" sentinel.
pub fn load_records(rows: Vec<CountryRow>) -> Vec<DestinationRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::with_capacity(rows.len());

    for row in rows {
        if !seen.insert(row.country_name.clone()) {
            debug!(country = %row.country_name, "duplicate country row, keeping first");
            continue;
        }

        let coordinate = match (row.lat, row.lng) {
            (Some(lat), Some(lng)) => Coordinate::new(lat, lng),
            _ => Coordinate::default(),
        };

        records.push(DestinationRecord::new(
            row.country_name,
            row.capital_name,
            coordinate,
        ));
    }

    records
}

/// Resolve the origin city's coordinates, degrading to the zero sentinel
/// on any failure — an unresolvable origin skews every distance but never
/// aborts the run.
async fn resolve_origin(sparql: &SparqlClient, city: &str) -> Coordinate {
    match sparql.query_city_coordinates(city).await {
        Ok(Some(origin)) => origin,
        Ok(None) => {
            warn!(%city, "origin city not found, using (0, 0)");
            Coordinate::default()
        }
        Err(e) => {
            warn!(%city, error = %e, "origin lookup failed, using (0, 0)");
            Coordinate::default()
        }
    }
}

/// Enrich every record with its great-circle distance from the origin.
pub fn with_distances(records: Vec<DestinationRecord>, origin: Coordinate) -> Vec<DestinationRecord> {
    records
        .into_iter()
        .map(|mut record| {
            record.distance_km = Some(travelkb_geo::distance_km(origin, record.coordinate));
            record
        })
        .collect()
}

/// Crawl every destination under bounded concurrency.
///
/// One task per destination; results are written back by input index so
/// the record order — and therefore the fact file — is independent of task
/// completion order. A panicked task only costs its own destination's
/// attributes.
async fn with_attributes(
    mut records: Vec<DestinationRecord>,
    crawler: DestinationCrawler,
    crawl_config: &CrawlConfig,
    progress: &dyn ProgressReporter,
) -> Vec<DestinationRecord> {
    let crawler = Arc::new(crawler);
    let semaphore = Arc::new(Semaphore::new(crawl_config.concurrency.max(1) as usize));
    let total = records.len();

    let mut handles = Vec::with_capacity(total);
    for (idx, record) in records.iter().enumerate() {
        let crawler = crawler.clone();
        let semaphore = semaphore.clone();
        let name = record.name.clone();

        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire().await.expect("semaphore closed");
            (idx, crawler.crawl(&name).await)
        }));
    }

    let mut completed = 0;
    for handle in handles {
        match handle.await {
            Ok((idx, attributes)) => {
                completed += 1;
                progress.destination_crawled(&records[idx].name, completed, total);
                records[idx].attributes = attributes;
            }
            Err(e) => {
                completed += 1;
                warn!(error = %e, "crawl task failed, destination left without attributes");
            }
        }
    }

    records
}
