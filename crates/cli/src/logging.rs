use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize stderr logging for the CLI. `RUST_LOG` overrides `log_level`.
pub fn init_logging(log_level: Level) -> Result<()> {
    let level_str = level_filter(log_level);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("porter={level_str},porter_http={level_str}").into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}

fn level_filter(level: Level) -> String {
    level.as_str().to_lowercase()
}
