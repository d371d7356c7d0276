//! SPARQL JSON results parsing.
//!
//! DBpedia answers `application/sparql-results+json`: a `head` listing
//! variables and `results.bindings`, one map of variable name → typed
//! value per row. Only the `value` field matters here.

use std::collections::HashMap;

use serde::Deserialize;

use travelkb_shared::{Coordinate, Result, TravelKbError};

/// One row of the bulk country query, coordinates optional.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryRow {
    pub country_name: String,
    pub capital_name: String,
    /// Capital latitude; `None` when the OPTIONAL binding is absent.
    pub lat: Option<f64>,
    /// Capital longitude; `None` when the OPTIONAL binding is absent.
    pub lng: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    bindings: Vec<HashMap<String, SparqlValue>>,
}

#[derive(Debug, Deserialize)]
struct SparqlValue {
    value: String,
}

/// Parse the bulk country-list response into rows.
///
/// Rows missing either name binding are dropped with a warning rather than
/// failing the whole response; malformed coordinate literals degrade to
/// absent, matching the unknown-location sentinel contract.
pub fn parse_country_bindings(json: &str) -> Result<Vec<CountryRow>> {
    let response: SparqlResponse = serde_json::from_str(json)
        .map_err(|e| TravelKbError::parse(format!("country list response: {e}")))?;

    let mut rows = Vec::with_capacity(response.results.bindings.len());
    for binding in &response.results.bindings {
        let (Some(country_name), Some(capital_name)) = (
            binding.get("country_name").map(|v| v.value.clone()),
            binding.get("capital_name").map(|v| v.value.clone()),
        ) else {
            tracing::warn!("skipping country binding without name variables");
            continue;
        };

        rows.push(CountryRow {
            country_name,
            capital_name,
            lat: parse_float_binding(binding, "lat"),
            lng: parse_float_binding(binding, "lng"),
        });
    }

    Ok(rows)
}

/// Parse a city-coordinate lookup response: the first row's `lat`/`long`
/// pair, or `None` when the query matched nothing.
pub fn parse_coordinate_bindings(json: &str) -> Result<Option<Coordinate>> {
    let response: SparqlResponse = serde_json::from_str(json)
        .map_err(|e| TravelKbError::parse(format!("coordinate response: {e}")))?;

    for binding in &response.results.bindings {
        let lat = parse_float_binding(binding, "lat");
        let lng = parse_float_binding(binding, "long");
        if let (Some(lat), Some(lng)) = (lat, lng) {
            return Ok(Some(Coordinate::new(lat, lng)));
        }
    }

    Ok(None)
}

fn parse_float_binding(binding: &HashMap<String, SparqlValue>, var: &str) -> Option<f64> {
    binding.get(var).and_then(|v| v.value.parse::<f64>().ok())
}
