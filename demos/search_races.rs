//! Search the configured race catalog from the command line.
//!
//! Run with: `cargo run --example search_races -- "maratón" 5`
//! Set `RACE_CATALOG_PATH` to search a JSON file instead of the builtin list.

use race_finder::{CatalogSource, RaceService, Result};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let query = args.next().unwrap_or_default();
    let limit = args.next().and_then(|arg| arg.parse::<i64>().ok());

    let service = RaceService::new(CatalogSource::from_env());
    service.init()?;

    let results = service.search(&query, limit)?;
    match serde_json::to_string_pretty(&results) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize results: {}", e),
    }

    let stats = service.stats()?;
    println!(
        "{} of {} races matched '{}'",
        results.len(),
        stats.event_count,
        query
    );
    Ok(())
}
