use clap::Parser;
use wikistats_server::ServerBuilder;
use wikistats_server::config::loader::{DEFAULT_CONFIG_FILE, load_config};

/// Read-only JSON API over a precomputed Wikipedia corpus.
#[derive(Debug, Parser)]
#[command(name = "wikistats-server", version, about)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, env = "WIKISTATS_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: String,
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before anything else)
    if let Err(e) = dotenvy::dotenv()
        && !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
    {
        eprintln!("Warning: Failed to load .env file: {e}");
    }

    // Initialize tracing early with the default level
    wikistats_server::observability::init_tracing();

    let cli = Cli::parse();

    let cfg = match load_config(Some(&cli.config)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(path = %cli.config, "Configuration loaded");
    wikistats_server::observability::apply_logging_level(&cfg.logging.level);

    let server = match ServerBuilder::new().with_config(cfg).build().await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Server initialization failed: {e:#}");
            std::process::exit(2);
        }
    };

    if let Err(err) = server.run().await {
        eprintln!("Server error: {err:#}");
        std::process::exit(1);
    }
}
