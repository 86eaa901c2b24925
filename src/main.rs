use allocation::{AllocationEngine, Breakdown, PoolStats};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use configuration::Config;
use core_types::{Snapshot, StockKind};
use rust_decimal::Decimal;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// The main entry point for the poolshare application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();
    let config = configuration::load_config(&cli.config)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Report(args) => handle_report(&config, args),
        Commands::Operator => handle_operator(&config),
        Commands::Investor(args) => handle_investor(&config, args),
        Commands::Serve => handle_serve(&config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Profit-sharing reports for the subscription investment pool.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print pool statistics and the per-investor distribution.
    Report(ReportArgs),
    /// Print the operator's per-instrument breakdown.
    Operator,
    /// Print one investor's per-instrument breakdown.
    Investor(InvestorArgs),
    /// Serve the JSON API for the dashboard.
    Serve,
}

#[derive(Parser)]
struct ReportArgs {
    /// Emit the stats as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct InvestorArgs {
    /// The investor's name, exactly as it appears in the snapshot.
    #[arg(long)]
    name: String,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn load(config: &Config) -> anyhow::Result<Snapshot> {
    Ok(snapshot_store::load_snapshot(&config.snapshot.path)?)
}

/// Handles the `report` command: the overview the dashboard's stats cards
/// and distribution list are built from.
fn handle_report(config: &Config, args: ReportArgs) -> anyhow::Result<()> {
    let snapshot = load(config)?;
    let stats = AllocationEngine::new().compute_stats(&snapshot)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Snapshot generated at: {}", snapshot.generated_at);
    println!();
    print_stats_table(&stats);
    println!();
    print_distribution_table(&stats);

    Ok(())
}

/// Handles the `operator` command.
fn handle_operator(config: &Config) -> anyhow::Result<()> {
    let snapshot = load(config)?;
    let breakdown = AllocationEngine::new().operator_breakdown(&snapshot)?;

    println!(
        "Operator breakdown ({}% of every instrument)",
        format_amount(snapshot.operator_share * Decimal::ONE_HUNDRED)
    );
    print_breakdown_table(&breakdown, "Operator share");

    Ok(())
}

/// Handles the `investor` command.
fn handle_investor(config: &Config, args: InvestorArgs) -> anyhow::Result<()> {
    let snapshot = load(config)?;
    let breakdown = AllocationEngine::new().investor_breakdown(&snapshot, &args.name)?;

    println!("Breakdown for {}", args.name);
    print_breakdown_table(&breakdown, "Personal share");
    if breakdown.lines.iter().any(|l| l.special_basis) {
        println!("* apportioned on the post-cutoff (special) investment ratios");
    }

    Ok(())
}

/// Handles the `serve` command.
async fn handle_serve(config: &Config) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    web_server::run_server(addr, &config.snapshot.path).await
}

// ==============================================================================
// Table Rendering
// ==============================================================================

fn print_stats_table(stats: &PoolStats) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Metric", "Amount"]);
    table.add_row(vec![
        Cell::new(format!("Total profit ({} stocks)", stats.profit_stock_count)),
        Cell::new(format_amount(stats.total_profit)),
    ]);
    table.add_row(vec![
        Cell::new(format!("Total loss ({} stocks)", stats.loss_stock_count)),
        Cell::new(format_amount(stats.total_loss)),
    ]);
    table.add_row(vec![
        Cell::new(format!(
            "Not-won cost ({} stocks)",
            stats.not_won_stock_count
        )),
        Cell::new(format_amount(stats.total_not_won_cost)),
    ]);
    table.add_row(vec![
        Cell::new("Net profit"),
        Cell::new(format_amount(stats.net_profit)),
    ]);
    table.add_row(vec![
        Cell::new("Operator profit"),
        Cell::new(format_amount(stats.operator_profit)),
    ]);
    table.add_row(vec![
        Cell::new("Investor profit"),
        Cell::new(format_amount(stats.investor_total_profit)),
    ]);
    println!("{table}");
}

fn print_distribution_table(stats: &PoolStats) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Investor", "Investment", "Profit"]);
    for share in &stats.investor_shares {
        table.add_row(vec![
            Cell::new(&share.name),
            Cell::new(format_amount(share.investment)),
            Cell::new(format_amount(share.profit)),
        ]);
    }
    println!("{table}");
}

fn print_breakdown_table(breakdown: &Breakdown, share_header: &str) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Stock", "Outcome", share_header]);
    for line in &breakdown.lines {
        let mut label = line.stock.clone();
        if line.kind == StockKind::NotWon {
            label.push_str(" (not won)");
        }
        if line.special_basis {
            label.push_str(" *");
        }
        table.add_row(vec![
            Cell::new(label),
            Cell::new(format_amount(line.outcome)),
            Cell::new(format_amount(line.share)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total"),
        Cell::new(""),
        Cell::new(format_amount(breakdown.total)),
    ]);
    println!("{table}");
}

/// Formats an amount for display: two decimal places, thousands separators.
/// Formatting lives here in the presentation layer; the engine only ever
/// returns raw numeric amounts.
fn format_amount(value: Decimal) -> String {
    let raw = format!("{:.2}", value.round_dp(2));
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}.{frac_part}")
}
