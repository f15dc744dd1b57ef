//! Export the JSON Schema of a data dump.
//!
//! Usage: cargo run --bin export-schema [output_path]

use anyhow::{Context, Result};
use horizons_common::Snapshot;

fn main() -> Result<()> {
    let schema = schemars::schema_for!(Snapshot);
    let json = serde_json::to_string_pretty(&schema)?;

    let out_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "_dump/snapshot.schema.json".to_string());

    std::fs::write(&out_path, &json)
        .with_context(|| format!("Failed to write schema file: {out_path}"))?;
    eprintln!("Schema exported to {out_path} ({} bytes)", json.len());
    Ok(())
}
