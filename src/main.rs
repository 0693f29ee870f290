use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, error};

use gfs_orders::catalog::{ItemCatalog, RecordOutcome};
use gfs_orders::client::OrderClient;
use gfs_orders::config::Config;
use gfs_orders::pipeline::{self, FailurePolicy};
use gfs_orders::session::{
    BrowserLogin, CookieStore, HttpSessionProbe, Session, SessionManager,
};

/// Pull order history and ordered materials from the GFS ordering portal
#[derive(Parser)]
#[command(name = "gfs-orders")]
#[command(about = "Pull order history and ordered materials from the GFS ordering portal", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect every material number ever ordered (default command)
    Materials {
        /// What to do when a single order-detail fetch fails
        #[arg(long, value_enum)]
        on_error: Option<FailurePolicy>,
    },
    /// List historical order numbers
    Orders,
    /// Force a fresh browser login and persist the new session
    Login,
    /// Look up one material's nutrition document and record it in the item catalog
    Item {
        /// Material number to look up
        material: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2)
        .with_writer(std::io::stderr)
        .init();

    let result = run(cli).await;
    if let Err(e) = result {
        error!("Fatal error: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    debug!("Using portal {}", config.portal.base_url);

    let store = CookieStore::new(config.cookie_file.clone());
    let probe = HttpSessionProbe::new(
        &config.portal.base_url,
        &config.portal.probe_path,
        config.portal.timeout_secs,
    )?;
    let login = BrowserLogin::new(config.login.command.clone());
    let manager = SessionManager::new(&store, &probe, &login);

    match cli.command.unwrap_or(Commands::Materials { on_error: None }) {
        Commands::Materials { on_error } => {
            let session = manager.ensure_valid_session().await?;
            let client = OrderClient::new(&config.portal)?;
            let policy = on_error.unwrap_or(config.on_error);
            let materials = pipeline::collect_all_materials(&client, &session, policy).await?;
            for material in &materials {
                println!("{material}");
            }
        }
        Commands::Orders => {
            let session = manager.ensure_valid_session().await?;
            let client = OrderClient::new(&config.portal)?;
            for order in client.list_orders(&session).await? {
                println!("{}", order.order_number);
            }
        }
        Commands::Login => {
            let session: Session = manager.force_login().await?;
            println!(
                "Logged in: {} cookies saved to {}",
                session.len(),
                config.cookie_file.display()
            );
        }
        Commands::Item { material } => {
            let session = manager.ensure_valid_session().await?;
            let client = OrderClient::new(&config.portal)?;
            let payload = client.get_nutrition(&material, &session).await?;
            let catalog = ItemCatalog::new(config.items_file.clone());
            match catalog.record_item(&payload)? {
                RecordOutcome::Added(code) => println!("Item {code} added to catalog"),
                RecordOutcome::AlreadyPresent(code) => {
                    println!("Item {code} already in catalog")
                }
                RecordOutcome::MissingCode => {
                    println!("No item code in response for material {material}")
                }
            }
        }
    }

    Ok(())
}
