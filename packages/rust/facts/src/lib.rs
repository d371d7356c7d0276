//! Prolog fact serialization for the travel knowledge base.
//!
//! The output shape is consumed verbatim by the downstream rule engine:
//! a `%`-comment header, one `distance/2` fact per country, then a
//! `has/3` block per country (activity facts followed by travel-time
//! facts). Everything is rendered in memory first and written in a single
//! I/O operation so a failed write never leaves a truncated fact file
//! behind — serialization failure is the pipeline's only fatal error.

use std::path::Path;

use tracing::{info, instrument};

use travelkb_geo::bucket_labels;
use travelkb_shared::{DestinationRecord, Result, TravelKbError};

/// Fixed file header.
const HEADER: &str = "%\n% Knowledge base for travel suggester\n%\n\n";

/// Fixed header of the attributes section.
const ATTRIBUTES_HEADER: &str = "%\n% Attributes for places\n%\n";

/// Render the complete fact file for the given records, in record order.
///
/// Records with an unpopulated distance degrade to 0 km (which also earns
/// every travel-time label); records with no attributes still emit their
/// distance facts. The writer validates nothing — degenerate input becomes
/// degenerate facts.
pub fn render_facts(records: &[DestinationRecord]) -> String {
    let mut out = String::new();
    out.push_str(HEADER);

    for record in records {
        let km = record.distance_km.unwrap_or(0.0) as i64;
        out.push_str(&format!(
            "distance('{}', \"{} km\").\n",
            quote_atom(&record.name),
            km
        ));
    }
    out.push_str("\n\n");

    out.push_str(ATTRIBUTES_HEADER);
    for record in records {
        let name = quote_atom(&record.name);
        for attr in &record.attributes {
            out.push_str(&format!("has('{}',activity,'{}').\n", name, quote_atom(attr)));
        }
        for label in bucket_labels(record.distance_km.unwrap_or(0.0)) {
            out.push_str(&format!("has('{name}',distance,'{label}').\n"));
        }
        out.push('\n');
    }

    out
}

/// Serialize records to `path`. I/O failure here is fatal to the run.
#[instrument(skip(records), fields(path = %path.display(), records = records.len()))]
pub fn write_knowledge_base(records: &[DestinationRecord], path: &Path) -> Result<()> {
    let content = render_facts(records);
    std::fs::write(path, &content).map_err(|e| TravelKbError::io(path, e))?;

    info!(
        bytes = content.len(),
        countries = records.len(),
        "knowledge base written"
    );
    Ok(())
}

/// Escape a string for embedding in a single-quoted Prolog atom.
///
/// The upstream data occasionally carries names like "Côte d'Ivoire";
/// doubling the quote keeps the emitted atom well-formed instead of
/// silently corrupting the file.
fn quote_atom(raw: &str) -> String {
    raw.replace('\'', "''")
}
