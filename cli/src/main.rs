use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use directory_cli::config::DirectoryConfig;
use directory_cli::console::TextConsole;
use directory_cli::menu::MenuController;
use directory_cli::startup::{connect, ensure_schema};
use directory_sqlite::{ContactStore, Migration};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Parser)]
#[command(name = "customers", version)]
#[command(about = "Interactive customer directory backed by SQLite")]
struct Cli {
    #[command(flatten)]
    settings: SettingsArgs,
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Run a table maintenance command instead of the menus.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Args)]
struct SettingsArgs {
    /// YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Database file path (overrides the configuration file).
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Table prefix (overrides the configuration file).
    #[arg(long, global = true)]
    prefix: Option<String>,
    /// Items per page in lists (overrides the configuration file).
    #[arg(long, global = true)]
    page_size: Option<usize>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Directory table maintenance.
    Migrate {
        #[command(subcommand)]
        operation: MigrateOperation,
    },
}

#[derive(Debug, Subcommand)]
enum MigrateOperation {
    /// Create the directory tables.
    Up,
    /// Drop the directory tables.
    Down,
    /// Show table presence and row counts.
    Status,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = load_config(cli.settings).and_then(|config| match cli.command {
        None => run_menus(&config),
        Some(Command::Migrate { operation }) => run_migrate(&config, operation),
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Installs the stderr subscriber; stdout belongs to the menus.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    if let Err(e) = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

fn load_config(args: SettingsArgs) -> Result<DirectoryConfig, String> {
    let base = match &args.config {
        Some(path) => DirectoryConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?,
        None => DirectoryConfig::default(),
    };
    let config = base.with_overrides(args.db, args.prefix, args.page_size);
    config
        .validate()
        .map_err(|e| format!("Invalid configuration: {e}"))?;
    Ok(config)
}

fn run_menus(config: &DirectoryConfig) -> Result<(), String> {
    let mut console = TextConsole::stdio();

    let Some(store) = connect(config, &mut console).map_err(|e| e.to_string())? else {
        return Ok(());
    };
    if !ensure_schema(&store, &mut console).map_err(|e| e.to_string())? {
        return Ok(());
    }

    MenuController::new(&store, console, config.page_size)
        .run()
        .map_err(|e| e.to_string())?;
    store
        .close()
        .map_err(|e| format!("Failed to close database: {e}"))
}

fn run_migrate(config: &DirectoryConfig, operation: MigrateOperation) -> Result<(), String> {
    let store = ContactStore::open(&config.database, config.table_prefix.as_str())
        .map_err(|e| e.to_string())?;
    let migration = Migration::new(store.connection(), store.prefix())
        .map_err(|e| format!("Failed to initialize migration: {e}"))?;

    match operation {
        MigrateOperation::Up => {
            migration
                .up()
                .map_err(|e| format!("Migration up failed: {e}"))?;
            println!(
                "Migration up complete. Tables created with prefix '{}' in '{}'.",
                config.table_prefix,
                config.database.display()
            );
        }
        MigrateOperation::Down => {
            migration
                .down()
                .map_err(|e| format!("Migration down failed: {e}"))?;
            println!(
                "Migration down complete. Tables with prefix '{}' dropped from '{}'.",
                config.table_prefix,
                config.database.display()
            );
        }
        MigrateOperation::Status => {
            let status = migration
                .status()
                .map_err(|e| format!("Failed to get migration status: {e}"))?;
            println!("Migration Status:");
            println!(
                "  Tables exist: {}",
                if status.tables_exist { "yes" } else { "no" }
            );
            println!("  Contact count: {}", status.contact_count);
            println!("  Phone count: {}", status.phone_count);
        }
    }
    Ok(())
}
