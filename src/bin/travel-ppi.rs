//! travel-ppi CLI - rank travel destinations by purchasing power
//!
//! ## Example Usage
//!
//! ```bash
//! # Rank destinations for a 5 day trip on 2,000,000 KRW
//! travel-ppi --budget 2000000 --days 5 --costs result.json
//!
//! # Use cached rates only
//! travel-ppi --budget 2000000 --days 5 --indices ./data --offline
//!
//! # Look up one day's quote
//! travel-ppi rates JPY --date 20251209
//!
//! # Merge the raw price indices into a cost file
//! travel-ppi costs --indices ./data --output result.json
//!
//! # Show the effective configuration
//! travel-ppi info
//! ```

use anyhow::{bail, Context};
use chrono::{Duration as ChronoDuration, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use colored::{Color, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process;
use travel_ppi::config::{default_config_path, Config};
use travel_ppi::currency::CurrencyUnit;
use travel_ppi::data::{
    load_cost_file, merge_price_indices, write_cost_file, EximRateProvider, PriceIndexPaths,
    RateProvider,
};
use travel_ppi::error::PpiError;
use travel_ppi::pipeline::{validate_trip, Ranking, RankingPipeline};
use travel_ppi::report;
use travel_ppi::types::{format_date, parse_date, Band, CostBasket};

/// travel-ppi: Purchasing power ranking of travel destinations
#[derive(Parser)]
#[command(name = "travel-ppi")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Robert Fall")]
#[command(about = "Rank travel destinations by trend-adjusted purchasing power", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    rank: RankArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug, Default)]
struct RankArgs {
    /// Total trip budget in home currency (KRW)
    #[arg(short, long, allow_negative_numbers = true)]
    budget: Option<f64>,

    /// Trip length in days
    #[arg(short, long, allow_negative_numbers = true)]
    days: Option<i64>,

    /// Merged cost file (JSON)
    #[arg(long, conflicts_with = "indices")]
    costs: Option<PathBuf>,

    /// Directory holding the raw price index CSVs
    #[arg(long)]
    indices: Option<PathBuf>,

    /// Use cached rates only; never call the rate provider
    #[arg(long)]
    offline: bool,

    /// Output file for the ranking (CSV/JSON)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one day's quote for a currency
    Rates {
        /// Currency code (e.g. USD, JPY, JPY(100))
        #[arg(value_name = "CURRENCY")]
        currency: String,

        /// Date to query (YYYYMMDD, default: yesterday)
        #[arg(long)]
        date: Option<String>,
    },

    /// Merge the price index CSVs into a cost file
    Costs {
        /// Directory holding the price index CSVs
        #[arg(long)]
        indices: PathBuf,

        /// Output cost file (JSON)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show the effective configuration
    Info,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => fail(&e.to_string()),
    };

    if cli.verbose {
        println!(
            "{} v{}",
            "travel-ppi".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );
        println!(
            "Cache dir: {}",
            config.cache_dir.display().to_string().dimmed()
        );
    }

    let result = match cli.command {
        Some(Commands::Rates { currency, date }) => show_rates(&config, &currency, date.as_deref()),
        Some(Commands::Costs { indices, output }) => build_costs(&config, &indices, &output),
        Some(Commands::Info) => show_info(&config, cli.config.as_deref(), cli.verbose),
        None => run_ranking(config, cli.rank, cli.verbose),
    };

    if let Err(e) = result {
        fail(&format!("{:#}", e));
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), message);
    process::exit(1);
}

fn yesterday() -> NaiveDate {
    Local::now().date_naive() - ChronoDuration::days(1)
}

fn band_color(band: Band) -> Color {
    match band {
        Band::Plenty => Color::Green,
        Band::Safe => Color::Cyan,
        Band::Tight => Color::Yellow,
        Band::Short => Color::Red,
    }
}

/// Budget and duration as validated numbers
fn trip_params(args: &RankArgs) -> anyhow::Result<(f64, u32)> {
    let budget = args
        .budget
        .ok_or_else(|| PpiError::ValidationError("--budget is required".to_string()))?;
    let days = args
        .days
        .ok_or_else(|| PpiError::ValidationError("--days is required".to_string()))?;
    let days = if days < 1 {
        return Err(PpiError::ValidationError(format!(
            "Trip duration must be at least 1 day, got {}",
            days
        ))
        .into());
    } else {
        u32::try_from(days).map_err(|_| {
            PpiError::ValidationError(format!(
                "Trip duration must be at most {} days, got {}",
                u32::MAX,
                days
            ))
        })?
    };

    validate_trip(budget, days)?;
    Ok((budget, days))
}

fn load_baskets(config: &Config, args: &RankArgs) -> anyhow::Result<Vec<CostBasket>> {
    if let Some(path) = args.costs.as_ref().or(config.cost_file.as_ref()) {
        return Ok(load_cost_file(path, config)?);
    }
    if let Some(dir) = args.indices.as_ref().or(config.indices_dir.as_ref()) {
        let entries = merge_price_indices(&PriceIndexPaths::in_dir(dir), config)
            .with_context(|| format!("Failed to merge price indices in {}", dir.display()))?;
        return Ok(travel_ppi::data::baskets_from_entries(&entries, config)?);
    }
    bail!(PpiError::ConfigError(
        "No cost data. Pass --costs or --indices, or set cost_file in the config.".to_string()
    ))
}

fn run_ranking(config: Config, args: RankArgs, verbose: bool) -> anyhow::Result<()> {
    let (budget, days) = trip_params(&args)?;
    let baskets = load_baskets(&config, &args)?;

    config
        .ensure_dirs()
        .with_context(|| format!("Failed to create {}", config.cache_dir.display()))?;

    let provider = if args.offline {
        None
    } else {
        Some(EximRateProvider::new(config.provider_config()?)?)
    };

    println!("{}", "Ranking destinations...".cyan().bold());
    println!();
    if verbose {
        println!("  {} {:.0}", "Budget:".bold(), budget);
        println!("  {} {}", "Days:".bold(), days);
        println!("  {} {}", "Destinations:".bold(), baskets.len());
        println!(
            "  {} {}",
            "Rates:".bold(),
            if args.offline { "cache only" } else { "cache + provider" }
        );
        println!();
    }

    let pipeline = RankingPipeline::new(config);
    let units = pipeline.config().currency_units();
    let today = Local::now().date_naive();

    let pb = ProgressBar::new(units.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let ranking = pipeline.run_with(
        budget,
        days,
        &baskets,
        provider.as_ref().map(|p| p as &dyn RateProvider),
        today,
        |currency| {
            pb.set_message(currency.currency_code.clone());
            pb.inc(1);
        },
    )?;
    pb.finish_with_message("Rates ready");
    println!();

    print_ranking(&ranking);

    if let Some(output_path) = args.output {
        let format = report::save_ranking(&output_path, &ranking)?;
        println!(
            "{} Ranking saved to: {} ({:?})",
            "✓".green().bold(),
            output_path.display(),
            format
        );
    }

    Ok(())
}

fn print_ranking(ranking: &Ranking) {
    println!("{}", "Purchasing Power Ranking".green().bold());
    println!("{}", "========================".green());

    let header = report::table_header();
    println!("{}", header.bold());
    println!("{}", "-".repeat(header.len()).dimmed());
    for (idx, result) in ranking.results.iter().enumerate() {
        println!(
            "{}",
            report::format_row(idx + 1, result).color(band_color(result.band))
        );
    }
    println!();

    let notes = report::render_notes(ranking);
    if !notes.is_empty() {
        println!("{}", "Skipped / warnings:".yellow().bold());
        for note in notes {
            println!("  - {}", note.dimmed());
        }
        println!();
    }
}

fn show_rates(config: &Config, currency: &str, date: Option<&str>) -> anyhow::Result<()> {
    let unit = if currency.contains('(') {
        CurrencyUnit::parse(currency)?
    } else {
        config.unit_for(currency)
    };
    let date = match date {
        Some(raw) => parse_date(raw)?,
        None => yesterday(),
    };

    let provider = EximRateProvider::new(config.provider_config()?)?;
    let day = provider.daily_rates(date)?;

    match day.rate_for(&unit.provider_code(), date)? {
        Some(rate) => {
            println!(
                "{} {} on {}",
                "Rate:".bold(),
                unit.provider_code().cyan(),
                format_date(date)
            );
            println!("  Quoted:     {:.2}", rate);
            if unit.is_scaled() {
                println!("  Per unit:   {:.4}", unit.normalize(rate));
            }
        }
        None => {
            println!(
                "{} No quote for {} on {}",
                "Warning:".yellow(),
                unit.provider_code(),
                format_date(date)
            );
        }
    }
    Ok(())
}

fn build_costs(config: &Config, indices: &Path, output: &Path) -> anyhow::Result<()> {
    let entries = merge_price_indices(&PriceIndexPaths::in_dir(indices), config)
        .with_context(|| format!("Failed to merge price indices in {}", indices.display()))?;
    if entries.is_empty() {
        bail!(PpiError::DataError(
            "No destination appears in all three price indices".to_string()
        ));
    }

    write_cost_file(output, &entries)?;
    println!(
        "{} Wrote {} destinations to {}",
        "✓".green().bold(),
        entries.len(),
        output.display()
    );
    Ok(())
}

fn show_info(config: &Config, config_path: Option<&Path>, verbose: bool) -> anyhow::Result<()> {
    println!("{}", "travel-ppi Information".cyan().bold());
    println!("{}", "======================".cyan());
    println!();

    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);
    println!("  {} {}", "Config:".bold(), path.display());
    println!("  {} {}", "Cache dir:".bold(), config.cache_dir.display());
    println!(
        "  {} {} (min {})",
        "MA window:".bold(),
        config.window_size,
        config.min_periods
    );
    println!(
        "  {} {}",
        "API key:".bold(),
        if config.provider_config().is_ok() {
            "configured".green()
        } else {
            "missing".red()
        }
    );
    println!();

    println!("{}", "Destinations:".bold());
    let pipeline = RankingPipeline::new(config.clone());
    for dest in &config.destinations {
        let unit = dest.unit();
        let cached = pipeline.cache().load(&unit.code).history.len();
        println!(
            "  - {:<24} {:<10} {} cached days",
            dest.country,
            unit.provider_code(),
            cached
        );
    }
    println!();

    if verbose {
        println!("{}", "Effective configuration:".bold());
        println!("{}", config.to_toml_string()?.dimmed());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = vec!["travel-ppi", "info"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Some(Commands::Info)));
    }

    #[test]
    fn test_rank_arguments() {
        let args = vec![
            "travel-ppi",
            "--budget",
            "2000000",
            "--days",
            "5",
            "--costs",
            "result.json",
            "--offline",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.rank.budget, Some(2_000_000.0));
        assert_eq!(cli.rank.days, Some(5));
        assert!(cli.rank.offline);
    }

    #[test]
    fn test_costs_and_indices_conflict() {
        let args = vec![
            "travel-ppi", "--budget", "1", "--days", "1", "--costs", "a.json", "--indices", "dir",
        ];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_rates_command() {
        let args = vec!["travel-ppi", "rates", "JPY", "--date", "20251209"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Some(Commands::Rates { currency, date }) => {
                assert_eq!(currency, "JPY");
                assert_eq!(date.as_deref(), Some("20251209"));
            }
            _ => panic!("expected rates command"),
        }
    }

    #[test]
    fn test_trip_validation() {
        let args = RankArgs {
            budget: Some(-1.0),
            days: Some(5),
            ..Default::default()
        };
        assert!(trip_params(&args).is_err());

        let args = RankArgs {
            budget: Some(1_000_000.0),
            days: Some(-3),
            ..Default::default()
        };
        assert!(trip_params(&args).is_err());

        let args = RankArgs {
            budget: Some(1_000_000.0),
            days: Some(i64::from(u32::MAX) + 1),
            ..Default::default()
        };
        let err = trip_params(&args).unwrap_err().to_string();
        assert!(err.contains("at most"));

        let args = RankArgs {
            budget: Some(1_000_000.0),
            days: None,
            ..Default::default()
        };
        assert!(trip_params(&args).is_err());

        let args = RankArgs {
            budget: Some(1_000_000.0),
            days: Some(5),
            ..Default::default()
        };
        assert_eq!(trip_params(&args).unwrap(), (1_000_000.0, 5));
    }
}
