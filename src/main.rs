//! Raffle ticket sales server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tombola_server::api::{create_router, AppState};
use tombola_server::checkout::provider_from_config;
use tombola_server::config::Config;
use tombola_server::metrics;
use tombola_server::stats::compute_stats;
use tombola_server::store::TicketStore;
use tombola_server::utils::shutdown_signal;

/// Raffle ticket sales server.
#[derive(Parser, Debug)]
#[command(name = "tombola-server")]
#[command(about = "Raffle ticket sales server with Stripe Checkout integration")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides configuration).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the ticket sales server (default).
    Run {
        /// HTTP server port (overrides configuration).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Print ticket store statistics.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("tombola_server=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Initialize metrics
    metrics::init_metrics();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::Stats) => cmd_stats().await,
        Some(Command::Run { port }) => cmd_run(port.or(args.port)).await,
        None => cmd_run(args.port).await,
    }
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("TOMBOLA SERVER - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!(
        "  Checkout Mode: {}",
        if config.is_simulation() {
            "SIMULATION (no provider key)"
        } else {
            "STRIPE CHECKOUT"
        }
    );
    println!("  Currency: {}", config.currency);
    println!("  Default Ticket Price: {}", config.ticket_price);
    println!("  Database: {}", config.database_path);
    println!("  Static Files: {}", config.static_dir);
    println!(
        "  Admin Import: {}",
        if config.admin_password.is_some() {
            "Enabled"
        } else {
            "Disabled (no ADMIN_PASSWORD)"
        }
    );
    println!("  Port: {}", config.port);
    println!(
        "  Metrics: {}",
        if config.metrics_enabled {
            "Enabled"
        } else {
            "Disabled"
        }
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Print ticket store statistics without starting the server.
async fn cmd_stats() -> anyhow::Result<()> {
    let config = Config::load()?;
    let store = TicketStore::new(&config.database_path);
    let tickets = store.list().await?;
    let stats = compute_stats(&tickets);

    println!("======================================================================");
    println!("TOMBOLA SERVER - STORE STATISTICS");
    println!("======================================================================");
    println!("  Database: {}", store.path().display());
    println!("  Total Tickets: {}", stats.total_tickets);
    println!("  Total Revenue: {}", stats.total_revenue);
    println!("----------------------------------------------------------------------");
    for vendeur in &stats.vendeurs {
        println!(
            "  {} - {} ticket(s), {} revenue",
            vendeur.nom, vendeur.tickets, vendeur.montant
        );
    }
    println!("======================================================================");

    Ok(())
}

/// Run the ticket sales server.
async fn cmd_run(port_override: Option<u16>) -> anyhow::Result<()> {
    // Load configuration
    info!("Loading configuration...");
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Override with CLI args if provided
    if let Some(port) = port_override {
        config.port = port;
    }

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    info!("Configuration loaded successfully");
    info!(
        "Mode: {}",
        if config.is_simulation() {
            "SIMULATION"
        } else {
            "STRIPE CHECKOUT"
        }
    );
    info!("Database: {}", config.database_path);
    info!("Static files: {}", config.static_dir);

    // Start Prometheus exporter
    if config.metrics_enabled {
        let metrics_addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(metrics_addr)
            .install()?;
        info!("Prometheus exporter listening on {}", metrics_addr);
    }

    // Assemble collaborators
    let store = Arc::new(TicketStore::new(&config.database_path));
    let provider = provider_from_config(&config);
    let state = AppState::new(&config, store, provider);

    let router = create_router(state, &config.static_dir);

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    info!("Admin dashboard: http://localhost:{}/admin.html", config.port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
