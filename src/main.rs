use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tenant_analytics::{config, db, observability, services::StatsCalculator};

/// CLI arguments for the analytics reporter
#[derive(Parser, Debug)]
#[command(version, about = "Platform usage and revenue reports", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to config file (defaults to ./analytics.toml if it exists)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Print reports as single-line JSON instead of pretty-printed
    #[arg(long, global = true)]
    compact: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Platform-wide totals and average revenue per user
    System,
    /// Statistics for a single business
    Business {
        /// Business identifier
        id: i64,
    },
    /// Statistics for a single user
    User {
        /// User identifier
        id: i64,
    },
    /// New users, new businesses and revenue over the last 30 days
    Trends,
    /// Side-by-side statistics for several businesses, in the order given
    Compare {
        /// Business identifiers
        ids: Vec<i64>,
    },
    /// Apply the bundled reporting schema and exit
    ///
    /// Intended for local development databases and CI.
    Migrate,
    /// Show enabled compile-time features
    Features,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let compact = args.compact;

    if let Command::Features = args.command {
        run_features();
        return;
    }

    let config = load_config(args.config.as_deref());

    if let Err(e) = observability::init_tracing(&config.observability) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    // Failed reads are part of a report, so every report is printed
    match args.command {
        Command::System => {
            let calculator = calculator(&config).await;
            print_json(&calculator.system_stats().await, compact);
        }
        Command::Business { id } => {
            let calculator = calculator(&config).await;
            print_json(&calculator.business_stats(id).await, compact);
        }
        Command::User { id } => {
            let calculator = calculator(&config).await;
            print_json(&calculator.user_stats(id).await, compact);
        }
        Command::Trends => {
            let calculator = calculator(&config).await;
            print_json(&calculator.trend_stats().await, compact);
        }
        Command::Compare { ids } => {
            let calculator = calculator(&config).await;
            print_json(&calculator.compare_businesses(&ids).await, compact);
        }
        Command::Migrate => run_migrate(&config).await,
        Command::Features => run_features(),
    }
}

/// Resolve the config path. An explicit path must exist; otherwise
/// `analytics.toml` in the current directory is used when present.
fn resolve_config_path(explicit_path: Option<&str>) -> Result<Option<PathBuf>, String> {
    if let Some(path) = explicit_path {
        let path = PathBuf::from(path);
        if !path.exists() {
            return Err(format!("Config file not found: {}", path.display()));
        }
        return Ok(Some(path));
    }

    let cwd_config = PathBuf::from("analytics.toml");
    if cwd_config.exists() {
        return Ok(Some(cwd_config));
    }

    Ok(None)
}

fn load_config(explicit_path: Option<&str>) -> config::AnalyticsConfig {
    let config_path = match resolve_config_path(explicit_path) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let Some(config_path) = config_path else {
        return config::AnalyticsConfig::default();
    };

    match config::AnalyticsConfig::from_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!(
                "Failed to load config from {}: {}",
                config_path.display(),
                e
            );
            std::process::exit(1);
        }
    }
}

async fn connect(config: &config::AnalyticsConfig) -> db::DbPool {
    if config.database.is_none() {
        eprintln!("Error: Database is not configured. Add a [database] section to the config.");
        std::process::exit(1);
    }

    match db::DbPool::from_config(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            eprintln!("Error: Failed to connect to database: {e}");
            std::process::exit(1);
        }
    }
}

async fn run_migrate(config: &config::AnalyticsConfig) {
    let pool = connect(config).await;

    match pool.run_migrations().await {
        Ok(()) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!(error = %e, "Database migrations failed");
            eprintln!("Error: Database migrations failed: {e}");
            std::process::exit(1);
        }
    }
}

async fn calculator(config: &config::AnalyticsConfig) -> StatsCalculator {
    let pool = connect(config).await;

    if config.database.run_migrations()
        && let Err(e) = pool.run_migrations().await
    {
        eprintln!("Error: Database migrations failed: {e}");
        std::process::exit(1);
    }

    StatsCalculator::new(&pool).with_upstream(config.upstream.clone())
}

fn print_json<T: Serialize>(value: &T, compact: bool) {
    let rendered = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };

    match rendered {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: Failed to serialize report: {e}");
            std::process::exit(1);
        }
    }
}

fn run_features() {
    let version = env!("CARGO_PKG_VERSION");

    let features: &[(&str, bool)] = &[
        ("database-sqlite", cfg!(feature = "database-sqlite")),
        ("database-postgres", cfg!(feature = "database-postgres")),
    ];

    println!("tenant-analytics v{version}\n");
    println!("Databases:");
    for (name, enabled) in features {
        let mark = if *enabled { "x" } else { " " };
        println!("  [{mark}] {name}");
    }
}
