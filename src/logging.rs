use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Log directives for `--verbose`: debug output from calstat's own crates only.
const VERBOSE_FILTER: &str = "warn,calstat=debug,calstat_core=debug,calstat_provider_google=debug";

/// Logs go to stderr so reports on stdout stay pipeable.
///
/// `RUST_LOG` takes precedence unless `--verbose` is given.
pub fn init(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to set up logging")?;

    Ok(())
}
