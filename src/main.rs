use analytics::{RealizedSummary, TraderProfile};
use analyzer::TraderAnalyzer;
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use configuration::{init_tracing, load_config};
use core_types::{QuoteProvider, StatisticWindow};
use gateway::PositionStatistics;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// The main entry point for the trader risk profiler.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; configuration has defaults.
    dotenvy::dotenv().ok();

    let config = load_config()?;
    // Dropping the guard flushes the file log, so it lives until main returns.
    let _log_guard = init_tracing(&config.logging)?;
    tracing::debug!(?config, "Configuration loaded.");

    let cli = Cli::parse();
    let analyzer = TraderAnalyzer::from_config(&config)?;

    match cli.command {
        Commands::Profile(args) => handle_profile(&analyzer, args).await,
        Commands::Summary(args) => handle_summary(&analyzer, args).await,
        Commands::Stats(args) => handle_stats(&analyzer, args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Derives take-profit, stop-loss and reverse-copy guidance from a trader's closed positions.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the trader's recent positions against historical candles.
    Profile(ProfileArgs),
    /// Summarize exchange-reported outcomes without replaying candles.
    Summary(AccountArgs),
    /// Show the index's per-protocol statistics for a look-back window.
    Stats(StatsArgs),
}

#[derive(Parser)]
struct ProfileArgs {
    /// The trader's account address.
    #[arg(long)]
    account: String,

    /// The candle provider to replay against ("bingx" or "bitget").
    #[arg(long, default_value = "bingx")]
    provider: QuoteProvider,

    /// Print the profile as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct AccountArgs {
    /// The trader's account address.
    #[arg(long)]
    account: String,

    /// Print the summary as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct StatsArgs {
    /// The trader's account address.
    #[arg(long)]
    account: String,

    /// The look-back window (D7, D15, D30, D60 or FULL).
    #[arg(long, default_value = "D30")]
    window: StatisticWindow,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_profile(analyzer: &TraderAnalyzer, args: ProfileArgs) -> anyhow::Result<()> {
    let spinner = spinner(format!("Replaying positions of {} on {}...", args.account, args.provider))?;
    let result = analyzer.get_trader_profile(&args.account, args.provider).await;
    spinner.finish_and_clear();
    let profile = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        println!("{}", profile_table(&profile));
        println!("{}", recommendation_table(&profile));
    }
    Ok(())
}

async fn handle_summary(analyzer: &TraderAnalyzer, args: AccountArgs) -> anyhow::Result<()> {
    let summary = analyzer.get_realized_summary(&args.account).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary_table(&summary));
    }
    Ok(())
}

async fn handle_stats(analyzer: &TraderAnalyzer, args: StatsArgs) -> anyhow::Result<()> {
    let rows = analyzer.get_position_statistics(&args.account, args.window).await?;
    if rows.is_empty() {
        println!("No {} statistics for {}.", args.window, args.account);
        return Ok(());
    }
    println!("{}", statistics_table(&rows));
    Ok(())
}

fn spinner(message: String) -> anyhow::Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed}] {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

// ==============================================================================
// Rendering
// ==============================================================================

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn pct(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}%"))
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

fn profile_table(profile: &TraderProfile) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Account".to_string(), profile.account.clone()]);
    table.add_row(vec![
        "Positions analyzed".to_string(),
        format!("{} / {}", profile.positions_analyzed, profile.total_positions),
    ]);
    table.add_row(vec!["Avg final ROI".to_string(), pct(profile.avg_roi_final)]);
    table.add_row(vec!["Avg loss ROI".to_string(), pct(profile.avg_loss_roi)]);
    table.add_row(vec!["Avg TP efficiency".to_string(), pct(profile.avg_tp_efficiency)]);
    table.add_row(vec!["Avg loss handling".to_string(), pct(profile.avg_loss_handling)]);
    table.add_row(vec!["Win rate".to_string(), format!("{:.2}%", profile.win_rate * 100.0)]);
    table.add_row(vec!["Profit factor".to_string(), profile.profit_factor.round_dp(2).to_string()]);
    table.add_row(vec!["Win streak".to_string(), profile.win_streak.to_string()]);
    table.add_row(vec!["Lose streak".to_string(), profile.lose_streak.to_string()]);
    table.add_row(vec!["Baseline take profit".to_string(), pct(profile.baseline_take_profit)]);
    table.add_row(vec!["Baseline stop loss".to_string(), pct(profile.baseline_stop_loss)]);
    table
}

fn recommendation_table(profile: &TraderProfile) -> Table {
    let rec = profile.recommendation();
    let mut table = new_table();
    table.set_header(vec!["Reverse copy", "Leverage", "Take profit", "Stop loss"]);
    table.add_row(vec![
        rec.reverse_copy.to_string(),
        format!("{:.1}x", rec.leverage),
        pct(rec.take_profit),
        pct(rec.stop_loss),
    ]);
    table
}

fn summary_table(summary: &RealizedSummary) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Account".to_string(), summary.account.clone()]);
    table.add_row(vec!["Positions".to_string(), summary.total_positions.to_string()]);
    table.add_row(vec!["PnL".to_string(), summary.pnl.round_dp(2).to_string()]);
    table.add_row(vec!["Win rate".to_string(), format!("{:.2}%", summary.win_rate * 100.0)]);
    table.add_row(vec!["Profit factor".to_string(), summary.profit_factor.round_dp(2).to_string()]);
    table.add_row(vec![
        "Max drawdown".to_string(),
        opt(summary.max_drawdown.map(|d| d.round_dp(2))),
    ]);
    table.add_row(vec!["Avg ROI".to_string(), format!("{:.2}%", summary.avg_roi)]);
    table.add_row(vec![
        "Avg duration".to_string(),
        format!("{:.1}h", summary.avg_duration_secs / 3_600.0),
    ]);
    table.add_row(vec!["Avg loss ROI".to_string(), pct(summary.avg_loss_roi)]);
    table
}

fn statistics_table(rows: &[PositionStatistics]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Protocol", "Trades", "Win rate", "Avg leverage", "PnL", "Avg ROI", "Max drawdown",
    ]);
    for row in rows {
        table.add_row(vec![
            row.protocol.clone(),
            opt(row.total_trade),
            pct(row.win_rate),
            opt(row.avg_leverage.map(|l| format!("{l:.1}x"))),
            opt(row.realised_pnl.map(|p| p.round_dp(2))),
            pct(row.realised_avg_roi),
            pct(row.realised_max_drawdown),
        ]);
    }
    table
}
