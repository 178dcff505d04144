//! Seeds the sample product catalogue into Firestore.
//!
//! Run with:
//! ```
//! cargo run -p seed-data --bin seed
//! ```
//!
//! Exits 0 when every product was added and 1 otherwise. Products added
//! before a failure are not removed.

use std::process::ExitCode;

use seed_data::prelude::*;
use storefront::config::StoreTarget;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let result = run(SeedConfig::from_env()).await;

    // insert failures were already logged by the seeder
    if let Err(e) = &result
        && e.downcast_ref::<SeedError>().is_none()
    {
        tracing::error!("Error adding products: {e:#}");
    }

    ExitCode::from(exit_status(&result))
}

async fn run(config: SeedConfig) -> anyhow::Result<SeedReport> {
    let dataset = match &config.dataset_path {
        Some(path) => Dataset::load_file(path)?,
        None => Dataset::bundled()?,
    };

    let store = FirestoreStore::connect(config.store).await?;
    let target = StoreTarget::from(store.config());

    tracing::info!(
        "Connected to Firestore project {} (database {}) at {}",
        target.project_id,
        target.database_id,
        target.endpoint
    );
    tracing::info!(
        "Seeding {} products into {}",
        dataset.len(),
        config.collection
    );

    let seeder = Seeder::new(store).with_collection(config.collection);
    Ok(seeder.run(&dataset.products).await?)
}
