//! DBpedia SPARQL entity source.
//!
//! Two queries feed the pipeline: the bulk list of UN-member countries with
//! capitals and capital coordinates, and a single place lookup resolving the
//! origin city. Both go through the public SPARQL endpoint with JSON results.

mod parser;

use reqwest::Client;
use tracing::{debug, info, instrument, warn};
use url::Url;

use travelkb_shared::{Coordinate, Result, TravelKbError};

pub use parser::{CountryRow, parse_coordinate_bindings, parse_country_bindings};

/// User-Agent string for SPARQL requests.
const USER_AGENT: &str = concat!("travelkb/", env!("CARGO_PKG_VERSION"));

/// Default timeout in seconds for SPARQL requests. The bulk country query
/// is slow on the public endpoint.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Bulk query: every UN member state with its English name, capital, and
/// the capital's coordinates where DBpedia has them.
const COUNTRY_LIST_QUERY: &str = r#"
SELECT DISTINCT ?country, ?country_name, ?capital, ?capital_name, ?lat, ?lng
WHERE {
        { ?country rdf:type yago:WikicatMemberStatesOfTheUnitedNations }
        { ?country rdfs:label ?country_name }
        { ?country dbo:capital ?capital }
        { ?capital rdfs:label ?capital_name }
        OPTIONAL { ?capital geo:lat ?lat }
        OPTIONAL { ?capital geo:long ?lng }
        FILTER (lang(?capital_name) = 'en')
        FILTER (lang(?country_name) = 'en')
       }
"#;

/// Configuration for the SPARQL client.
#[derive(Debug, Clone)]
pub struct SparqlOptions {
    /// Timeout for HTTP requests in seconds.
    pub timeout_secs: u64,
}

impl Default for SparqlOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Client for the DBpedia SPARQL endpoint.
pub struct SparqlClient {
    endpoint: Url,
    client: Client,
}

impl SparqlClient {
    /// Create a client against the given endpoint.
    pub fn new(endpoint: Url, opts: &SparqlOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(opts.timeout_secs))
            .build()
            .map_err(|e| TravelKbError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { endpoint, client })
    }

    /// Fetch the raw country/capital/coordinate rows.
    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    pub async fn query_countries(&self) -> Result<Vec<CountryRow>> {
        info!("fetching country list");
        let body = self.execute(COUNTRY_LIST_QUERY).await?;
        let rows = parse_country_bindings(&body)?;
        info!(rows = rows.len(), "country list fetched");
        Ok(rows)
    }

    /// Resolve a city's coordinates by English label.
    ///
    /// Returns `Ok(None)` when the place is unknown; callers degrade to the
    /// `(0, 0)` sentinel rather than aborting.
    #[instrument(skip_all, fields(city = %city))]
    pub async fn query_city_coordinates(&self, city: &str) -> Result<Option<Coordinate>> {
        // Label is interpolated into a quoted literal; strip quotes so a
        // hostile city name cannot break out of it.
        let label = city.replace('"', "");
        let query = format!(
            r#"
SELECT * WHERE {{
 {{?city rdfs:label "{label}"@en}}
 {{?city a dbo:Place }}
 {{?city geo:lat ?lat}}
 {{?city geo:long ?long}}
}}
"#
        );

        let body = self.execute(&query).await?;
        let coordinate = parse_coordinate_bindings(&body)?;

        match coordinate {
            Some(c) => debug!(lat = c.lat, lng = c.lng, "city resolved"),
            None => warn!("city not found in SPARQL results"),
        }

        Ok(coordinate)
    }

    /// Execute one SPARQL query, returning the raw JSON body.
    async fn execute(&self, query: &str) -> Result<String> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("query", query),
                ("format", "application/sparql-results+json"),
            ])
            .send()
            .await
            .map_err(|e| TravelKbError::Network(format!("{}: {e}", self.endpoint)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TravelKbError::Network(format!(
                "{}: HTTP {status}",
                self.endpoint
            )));
        }

        response
            .text()
            .await
            .map_err(|e| TravelKbError::Network(format!("{}: body read failed: {e}", self.endpoint)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, query_param_contains};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn country_body() -> &'static str {
        r#"{"results": {"bindings": [
            {
              "country_name": {"type": "literal", "value": "Wakanda"},
              "capital_name": {"type": "literal", "value": "Birnin Zana"},
              "lat": {"type": "typed-literal", "value": "10"},
              "lng": {"type": "typed-literal", "value": "10"}
            }
        ]}}"#
    }

    #[tokio::test]
    async fn query_countries_parses_rows() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param_contains("query", "WikicatMemberStatesOfTheUnitedNations"))
            .respond_with(ResponseTemplate::new(200).set_body_string(country_body()))
            .mount(&server)
            .await;

        let endpoint = Url::parse(&format!("{}/sparql", server.uri())).unwrap();
        let client = SparqlClient::new(endpoint, &SparqlOptions::default()).unwrap();
        let rows = client.query_countries().await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].country_name, "Wakanda");
        assert_eq!(rows[0].lat, Some(10.0));
    }

    #[tokio::test]
    async fn query_city_coordinates_resolves() {
        let server = MockServer::start().await;

        let body = r#"{"results": {"bindings": [
            {
              "lat": {"type": "typed-literal", "value": "41.8781"},
              "long": {"type": "typed-literal", "value": "-87.6298"}
            }
        ]}}"#;

        Mock::given(method("GET"))
            .and(query_param_contains("query", "Chicago"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let endpoint = Url::parse(&server.uri()).unwrap();
        let client = SparqlClient::new(endpoint, &SparqlOptions::default()).unwrap();
        let coord = client
            .query_city_coordinates("Chicago")
            .await
            .unwrap()
            .expect("resolved");

        assert_eq!(coord.lat, 41.8781);
    }

    #[tokio::test]
    async fn server_error_is_network_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let endpoint = Url::parse(&server.uri()).unwrap();
        let client = SparqlClient::new(endpoint, &SparqlOptions::default()).unwrap();
        let err = client.query_countries().await.unwrap_err();

        assert!(matches!(err, TravelKbError::Network(_)));
        assert!(err.to_string().contains("503"));
    }
}
