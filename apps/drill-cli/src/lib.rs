pub mod config;
pub mod play;
pub mod vocabulary;

use clap::Parser;
use drill_core::{EngineConfig, SessionEngine};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::parse();
    let direction = config.direction()?;
    let entries = vocabulary::load(&config.vocabulary)?;

    let mut engine = SessionEngine::new(EngineConfig {
        entries,
        direction,
        session_size: config.session_size,
    })
    .with_settings(config.settings())
    .with_wrong_history(config.wrong_history.iter().cloned());

    if let Some(seed) = config.seed {
        tracing::info!(seed, "using seeded word selection");
        engine = engine.with_rng(StdRng::seed_from_u64(seed));
    }

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let summary = play::play(&mut engine, config.review_ids(), stdin.lock(), &mut stdout)?;

    if let Some(summary) = summary {
        tracing::info!(summary = %serde_json::to_string(&summary)?, "session summary");
    }
    Ok(())
}
