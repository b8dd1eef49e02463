use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};
use kalends_core::{events_to_json, read_ics};
use owo_colors::OwoColorize;

use super::open_output;

pub fn run(input: &Path, output: Option<&Path>) -> Result<()> {
    let file = File::open(input).with_context(|| format!("Could not open {}", input.display()))?;
    let events = read_ics(&mut BufReader::new(file))
        .with_context(|| format!("Could not read {}", input.display()))?;

    if events.is_empty() {
        eprintln!("{}", "No complete events found".yellow());
    }

    let json = events_to_json(&events)?;
    let mut out = open_output(output)?;
    writeln!(out, "{json}")?;
    out.flush()?;

    if let Some(path) = output {
        eprintln!(
            "{}",
            format!("Imported {} event(s) into {}", events.len(), path.display()).green()
        );
    }

    Ok(())
}
