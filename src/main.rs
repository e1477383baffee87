//! ADA Accumulation Bot Dashboard CLI
//!
//! Terminal front end for the bot backend.

use ada_bot_dashboard::render;
use ada_bot_dashboard::services::{placeholder_series, PanelUpdate, RestoreOutcome, SelectedFile};
use ada_bot_dashboard::{ChartView, Config, ConsoleNotifier, Dashboard};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ada-dashboard")]
#[command(about = "Control and monitor the ADA accumulation bot")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Config, wallets and chart in one view (default)
    Overview,

    /// Show bot status and current config
    Status,

    /// Show wallet progress
    Wallets {
        /// Keep refreshing until Ctrl+C
        #[arg(short, long)]
        watch: bool,

        /// Refresh interval in seconds (defaults to WALLET_REFRESH_SECONDS)
        #[arg(short, long)]
        interval: Option<u64>,

        /// Print the panel as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update strategy levels (lookbacks are fixed)
    Strategy {
        level1: i64,
        level2: i64,
        level3: i64,
    },

    /// Update risk limits
    Risk {
        #[arg(long)]
        stop_loss: f64,
        #[arg(long)]
        take_profit: f64,
    },

    /// Update profit withdrawal settings
    Profit {
        /// Profit target in ADA
        #[arg(long)]
        target: f64,
        /// Address profits are withdrawn to
        #[arg(long)]
        address: String,
    },

    /// Start the bot
    Start,

    /// Stop the bot
    Stop,

    /// Restore a wallet from a backup file
    Restore {
        /// Name for the restored wallet
        #[arg(short, long, default_value = "")]
        name: String,
        /// Backup file; nothing is sent without one
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Download a wallet backup
    Backup {
        name: String,
        /// Output path (default: backup_<name>.key)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show the tail of the trade log
    Trades,

    /// Show the bot's virtual USDC/ADA balances
    Balances,

    /// Run the strategy optimizer on the backend
    Optimize,

    /// Backtest the current config
    Backtest,

    /// Show the price chart
    Chart,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Default to warn, info for this crate; RUST_LOG overrides
    let default_filter = if cli.verbose {
        "warn,ada_bot_dashboard=debug"
    } else {
        "warn,ada_bot_dashboard=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let dashboard = Dashboard::new(config, Arc::new(ConsoleNotifier))?;

    let ok = match cli.command.unwrap_or(Commands::Overview) {
        Commands::Overview => overview(&dashboard).await,
        Commands::Status => status(&dashboard).await?,
        Commands::Wallets { watch, interval, json } => wallets(&dashboard, watch, interval, json).await?,
        Commands::Strategy { level1, level2, level3 } => {
            dashboard.config_client.submit_strategy(level1, level2, level3).await.is_ok()
        }
        Commands::Risk { stop_loss, take_profit } => {
            dashboard.config_client.submit_risk(stop_loss, take_profit).await.is_ok()
        }
        Commands::Profit { target, address } => {
            dashboard.config_client.submit_profit(target, &address).await.is_ok()
        }
        Commands::Start => bot_command(&dashboard, true).await,
        Commands::Stop => bot_command(&dashboard, false).await,
        Commands::Restore { name, file } => restore(&dashboard, name, file).await?,
        Commands::Backup { name, out } => {
            let path = dashboard.backup.backup_to(&name, out.as_deref()).await?;
            println!("Saved to {}", path.display());
            true
        }
        Commands::Trades => trades(&dashboard).await?,
        Commands::Balances => {
            let balances = dashboard.reports.profit_balances().await?;
            print!("{}", render::balances(&balances));
            true
        }
        Commands::Optimize => optimize(&dashboard).await,
        Commands::Backtest => backtest(&dashboard).await?,
        Commands::Chart => {
            print!("{}", render::chart(&placeholder_chart()?));
            true
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn header(title: &str) {
    println!("\n{}", "=".repeat(70));
    println!("  {}", title);
    println!("{}\n", "=".repeat(70));
}

fn placeholder_chart() -> Result<ChartView> {
    let mut chart = ChartView::new();
    chart
        .set_data(placeholder_series(chrono::Utc::now(), &mut rand::thread_rng()))
        .context("Placeholder series is malformed")?;
    Ok(chart)
}

async fn overview(dashboard: &Dashboard) -> bool {
    header(&format!("ADA BOT DASHBOARD - {}", dashboard.client.base_url()));

    let (config, wallets) = dashboard.load().await;

    match (config, dashboard.config_client.view().await) {
        (Ok(_), Some(view)) => print!("{}", render::config_view(&view)),
        (Ok(_), None) => println!("Config not available."),
        (Err(e), _) => error!("Failed to load config: {}", e),
    }

    println!("\nWallets");
    println!("{}", "-".repeat(70));
    match wallets {
        Ok(_) => print!("{}", render::wallet_panel(&dashboard.wallets.panel().await)),
        Err(e) => error!("Failed to load wallets: {}", e),
    }

    println!("\nADA/USDT (15m)");
    println!("{}", "-".repeat(70));
    match placeholder_chart() {
        Ok(chart) => print!("{}", render::chart(&chart)),
        Err(e) => warn!("{:#}", e),
    }

    true
}

async fn status(dashboard: &Dashboard) -> Result<bool> {
    dashboard.config_client.load_config().await?;
    match dashboard.config_client.view().await {
        Some(view) => print!("{}", render::config_view(&view)),
        None => println!("Config not available."),
    }
    Ok(true)
}

async fn wallets(dashboard: &Dashboard, watch: bool, interval: Option<u64>, json: bool) -> Result<bool> {
    if !watch {
        dashboard.wallets.load_wallets().await?;
        let panel = dashboard.wallets.panel().await;
        if json {
            println!("{}", serde_json::to_string_pretty(&panel)?);
        } else {
            print!("{}", render::wallet_panel(&panel));
        }
        return Ok(true);
    }

    let period = interval
        .map(std::time::Duration::from_secs)
        .unwrap_or_else(|| dashboard.config.wallet_refresh_interval());
    let mut ticker = tokio::time::interval(period);

    println!("Watching wallets every {}s (Ctrl+C to stop)...\n", period.as_secs());

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match dashboard.wallets.load_wallets().await {
                    Ok(PanelUpdate::Applied(changes)) => {
                        println!("--- {} | {} ---", chrono::Local::now().format("%H:%M:%S"), render::panel_changes(&changes));
                        if !changes.is_empty() {
                            print!("{}", render::wallet_panel(&dashboard.wallets.panel().await));
                        }
                    }
                    Ok(PanelUpdate::Stale) => debug!("Skipped stale wallet snapshot"),
                    Err(e) => error!("Wallet refresh failed: {}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\nStopped.");
                return Ok(true);
            }
        }
    }
}

async fn bot_command(dashboard: &Dashboard, start: bool) -> bool {
    let result = if start {
        dashboard.bot.start().await
    } else {
        dashboard.bot.stop().await
    };

    if let Some(view) = dashboard.config_client.view().await {
        println!("Bot status: {}", render::status_badge(&view));
    }
    result.is_ok()
}

async fn restore(dashboard: &Dashboard, name: String, file: Option<PathBuf>) -> Result<bool> {
    let selected = match file {
        Some(path) => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "backup.key".to_string());
            Some(SelectedFile { file_name, bytes })
        }
        None => None,
    };

    let mut flow = dashboard.restore_flow();
    match flow.restore(&name, selected).await {
        RestoreOutcome::Skipped => {
            debug!("No backup file selected, nothing to restore");
            Ok(true)
        }
        RestoreOutcome::Restored => {
            print!("{}", render::wallet_panel(&dashboard.wallets.panel().await));
            Ok(true)
        }
        RestoreOutcome::Failed(_) => Ok(false),
    }
}

async fn trades(dashboard: &Dashboard) -> Result<bool> {
    let trades = dashboard.reports.recent_trades().await?;
    header("RECENT TRADES");
    if trades.is_empty() {
        println!("No trades yet.");
    }
    for line in trades {
        println!("  {}", line.trim_end());
    }
    Ok(true)
}

async fn optimize(dashboard: &Dashboard) -> bool {
    println!("Running optimizer, this can take a while...");
    match dashboard.reports.optimize().await {
        Ok(params) => {
            println!("{}", serde_json::to_string_pretty(&params).unwrap_or_default());
            true
        }
        Err(_) => false,
    }
}

async fn backtest(dashboard: &Dashboard) -> Result<bool> {
    println!("Running backtest on the current config...");
    let report = dashboard.reports.backtest().await?;
    header("BACKTEST");
    print!("{}", render::backtest(&report));
    Ok(true)
}
