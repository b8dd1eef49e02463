use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use kalends_core::read_ics;
use owo_colors::OwoColorize;

use crate::render::Render;
use crate::utils::tz::resolve_tz;

pub fn run(input: &Path, tz: Option<&str>) -> Result<()> {
    let tz = resolve_tz(tz)?;

    let file = File::open(input).with_context(|| format!("Could not open {}", input.display()))?;
    let mut events = read_ics(&mut BufReader::new(file))
        .with_context(|| format!("Could not read {}", input.display()))?;
    events.sort_by_key(|e| e.start);

    if events.is_empty() {
        println!("{}", "No events".dimmed());
        return Ok(());
    }

    for (i, event) in events.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", event.render(tz));
    }

    Ok(())
}
