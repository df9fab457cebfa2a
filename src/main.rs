//! Headless Shell
//!
//! Connects to the configured remote store, runs the initial load, and
//! logs a snapshot summary. Useful as a connectivity smoke check; the
//! presentation layer consumes the library directly.

use std::path::Path;
use std::sync::Arc;

use study_tracker::{Config, DomainResult, HttpStore, Tracker};

const CONFIG_ENV: &str = "STUDY_TRACKER_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "study-tracker.json";

#[tokio::main]
async fn main() {
    study_tracker::logging::init();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    if let Err(e) = run(Path::new(&config_path)).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(config_path: &Path) -> DomainResult<()> {
    let config = Config::load(config_path)?;
    let store = Arc::new(HttpStore::new(&config)?);
    let tracker = Tracker::new(store).with_undo_window(config.undo_window());

    tracker.load_all().await;

    let state = tracker.snapshot().await;
    tracing::info!(
        "loaded {} categories, {} subcategories, {} questions",
        state.categories.len(),
        state.subcategories.len(),
        state.questions.len(),
    );
    match state.parent_name() {
        Some(name) => {
            let (completed, total) = state.progress();
            tracing::info!("active parent: {} ({}/{} completed)", name, completed, total);
        }
        None => tracing::info!("no categories yet"),
    }
    Ok(())
}
