use anyhow::Result;
use matchfeed_types::StatusTag;
use serde::Serialize;

use crate::types::OutputFormat;

#[derive(Serialize)]
struct StatusEntry {
    slug: &'static str,
    name: &'static str,
    emoji: &'static str,
}

pub fn list(format: OutputFormat) -> Result<()> {
    let tags = StatusTag::all()
        .iter()
        .filter(|tag| **tag != StatusTag::None);

    match format {
        OutputFormat::Json => {
            let entries: Vec<StatusEntry> = tags
                .map(|tag| StatusEntry {
                    slug: tag.slug(),
                    name: tag.name(),
                    emoji: tag.emoji(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Plain => {
            for tag in tags {
                println!("{:<8} {}", tag.slug(), tag.label());
            }
        }
    }
    Ok(())
}
