use std::path::Path;

use anyhow::{Context, Result};
use kalends_core::{events_from_json, write_ics, ExportOptions, KalendsConfig};
use owo_colors::OwoColorize;

use super::open_output;

pub fn run(input: &Path, output: Option<&Path>) -> Result<()> {
    let json = std::fs::read_to_string(input)
        .with_context(|| format!("Could not read {}", input.display()))?;
    let events = events_from_json(&json)
        .with_context(|| format!("{} is not a JSON array of events", input.display()))?;

    let config = KalendsConfig::load()?;
    let options = ExportOptions::from(&config);

    let mut out = open_output(output)?;
    write_ics(&mut out, &events, &options).context("Could not write calendar")?;

    if let Some(path) = output {
        eprintln!(
            "{}",
            format!("Exported {} event(s) to {}", events.len(), path.display()).green()
        );
    }

    Ok(())
}
