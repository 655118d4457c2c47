use std::path::Path;

use anyhow::Result;
use matchfeed_runtime::LocationStore;
use matchfeed_types::Location;

use crate::types::OutputFormat;

pub fn show(data_dir: &Path, format: OutputFormat) -> Result<()> {
    let location = LocationStore::in_dir(data_dir).load();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&location)?),
        OutputFormat::Plain => match location.as_ref().and_then(Location::formatted) {
            Some(text) => println!("{}", text),
            None => println!("No location set"),
        },
    }
    Ok(())
}

pub fn set(
    data_dir: &Path,
    country: String,
    country_name: String,
    city: String,
    district: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let location = Location::new(country, country_name, city, district);
    LocationStore::in_dir(data_dir).save(&location)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&location)?),
        OutputFormat::Plain => println!(
            "Saved location: {}",
            location.formatted().unwrap_or_default()
        ),
    }
    Ok(())
}

pub fn clear(data_dir: &Path, format: OutputFormat) -> Result<()> {
    let removed = LocationStore::in_dir(data_dir).clear()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "removed": removed })),
        OutputFormat::Plain if removed => println!("Location cleared"),
        OutputFormat::Plain => println!("No location set"),
    }
    Ok(())
}
