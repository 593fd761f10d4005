//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{BarDecision, SignalAdapter, walk_forward};
use crate::domain::config_validation::{registry_config, validate_config};
use crate::domain::error::StockdashError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::registry::StrategyRegistry;
use crate::domain::screen::{ScreenRow, screen_strategy};
use crate::domain::signal::Signal;
use crate::domain::strategy::{Family, Strategy};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "stockdash", about = "Daily stock screener with indicator signals")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct Selection {
    /// INI configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Directory of <CODE>.csv files (overrides [data] path)
    #[arg(long)]
    pub data: Option<PathBuf>,
    /// Stock code (overrides [screen] code)
    #[arg(long)]
    pub code: Option<String>,
    /// Buy strategy name (overrides [screen] buy)
    #[arg(long)]
    pub buy: Option<String>,
    /// Sell strategy name (overrides [screen] sell)
    #[arg(long)]
    pub sell: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Screen one code with a buy/sell strategy pair
    Screen {
        #[command(flatten)]
        selection: Selection,
        /// Rows to print, newest first; 0 prints all (overrides [screen] rows)
        #[arg(long)]
        rows: Option<usize>,
        /// Write the full table as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replay a strategy pair bar by bar and print its decisions
    Walk {
        #[command(flatten)]
        selection: Selection,
    },
    /// List registered strategy names
    Strategies {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Everything a screen or walk run needs, after flags override config.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub data_dir: PathBuf,
    pub code: String,
    pub buy: String,
    pub sell: String,
    pub rows: usize,
}

const DEFAULT_ROWS: usize = 20;

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Screen {
            selection,
            rows,
            output,
        } => run_screen(&selection, rows, output.as_deref()),
        Command::Walk { selection } => run_walk(&selection),
        Command::Strategies { config } => run_strategies(config.as_deref()),
        Command::Validate { config } => run_validate(&config),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Load `path`, or an empty configuration when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, StockdashError> {
    match path {
        Some(p) => FileConfigAdapter::from_file(p),
        None => Ok(FileConfigAdapter::empty()),
    }
}

/// Validate the configuration and build the registry from it.
pub fn build_registry(config: &dyn ConfigPort) -> Result<StrategyRegistry, StockdashError> {
    validate_config(config)?;
    StrategyRegistry::new(&registry_config(config)?)
}

pub fn resolve_options(
    selection: &Selection,
    rows: Option<usize>,
    config: &dyn ConfigPort,
) -> Result<RunOptions, StockdashError> {
    let data_dir = match &selection.data {
        Some(p) => p.clone(),
        None => config
            .get_string("data", "path")
            .map(PathBuf::from)
            .ok_or_else(|| StockdashError::ConfigMissing {
                section: "data".to_string(),
                key: "path".to_string(),
            })?,
    };

    let code = selection
        .code
        .clone()
        .or_else(|| config.get_string("screen", "code"))
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| StockdashError::ConfigMissing {
            section: "screen".to_string(),
            key: "code".to_string(),
        })?;

    let name = |flag: &Option<String>, key: &str| {
        flag.clone()
            .or_else(|| config.get_string("screen", key))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    let rows = match rows {
        Some(r) => r,
        None => config.get_int("screen", "rows", DEFAULT_ROWS as i64).max(0) as usize,
    };

    Ok(RunOptions {
        data_dir,
        code,
        buy: name(&selection.buy, "buy"),
        sell: name(&selection.sell, "sell"),
        rows,
    })
}

/// Resolve a typed (buy, sell) pair. Names must be registered, empty or a
/// well-formed crossover.
pub fn select_strategy(
    registry: &StrategyRegistry,
    buy: &str,
    sell: &str,
) -> Result<Strategy, StockdashError> {
    Ok(Strategy {
        buy_name: buy.to_string(),
        sell_name: sell.to_string(),
        entry: registry.resolve(Family::Buy, buy)?,
        exit: registry.resolve(Family::Sell, sell)?,
    })
}

fn fetch(data_port: &dyn DataPort, code: &str) -> Result<Vec<OhlcvBar>, StockdashError> {
    let bars = data_port.fetch_ohlcv(code)?;
    if bars.is_empty() {
        return Err(StockdashError::NoData {
            code: code.to_string(),
        });
    }
    Ok(bars)
}

pub fn screen_code(
    data_port: &dyn DataPort,
    registry: &StrategyRegistry,
    code: &str,
    strategy: &Strategy,
) -> Result<Vec<ScreenRow>, StockdashError> {
    let bars = fetch(data_port, code)?;
    screen_strategy(bars, registry.settings(), strategy)
}

pub fn walk_code(
    data_port: &dyn DataPort,
    code: &str,
    strategy: &Strategy,
) -> Result<Vec<BarDecision>, StockdashError> {
    let bars = fetch(data_port, code)?;
    walk_forward(bars, &SignalAdapter::new(strategy.clone()))
}

fn run_screen(selection: &Selection, rows: Option<usize>, output: Option<&Path>) -> Result<(), StockdashError> {
    let config = load_config(selection.config.as_deref())?;
    let registry = build_registry(&config)?;
    let opts = resolve_options(selection, rows, &config)?;
    let strategy = select_strategy(&registry, &opts.buy, &opts.sell)?;
    let data_port = CsvAdapter::new(opts.data_dir.clone());

    let table = screen_code(&data_port, &registry, &opts.code, &strategy)?;

    if let Some(path) = output {
        CsvReportAdapter.write(&opts.code, &table, path)?;
        eprintln!("Report written to {}", path.display());
    }

    print!("{}", format_table(&table, opts.rows));

    let buys = table.iter().filter(|r| r.signal == Signal::Buy).count();
    let sells = table.iter().filter(|r| r.signal == Signal::Sell).count();
    eprintln!(
        "Screened {} ({}): {} bars, {} buy, {} sell",
        opts.code,
        strategy,
        table.len(),
        buys,
        sells
    );
    Ok(())
}

fn run_walk(selection: &Selection) -> Result<(), StockdashError> {
    let config = load_config(selection.config.as_deref())?;
    let registry = build_registry(&config)?;
    let opts = resolve_options(selection, None, &config)?;
    let strategy = select_strategy(&registry, &opts.buy, &opts.sell)?;
    let data_port = CsvAdapter::new(opts.data_dir.clone());

    eprintln!("Walking {} ({})", opts.code, strategy);
    let decisions = walk_code(&data_port, &opts.code, &strategy)?;

    for d in decisions.iter().filter(|d| d.enter || d.exit) {
        let action = match (d.enter, d.exit) {
            (true, true) => "ENTER EXIT",
            (true, false) => "ENTER",
            _ => "EXIT",
        };
        println!("{}  {}", d.date, action);
    }

    eprintln!(
        "{} bars, {} entries, {} exits",
        decisions.len(),
        decisions.iter().filter(|d| d.enter).count(),
        decisions.iter().filter(|d| d.exit).count()
    );
    Ok(())
}

fn run_strategies(config_path: Option<&Path>) -> Result<(), StockdashError> {
    let config = load_config(config_path)?;
    let registry = build_registry(&config)?;
    for family in [Family::Buy, Family::Sell] {
        for name in registry.names(family) {
            println!("{:<5} {:<12} {}", family, name, registry.get(family, name));
        }
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), StockdashError> {
    eprintln!("Validating config: {}", config_path.display());
    let config = load_config(Some(config_path))?;
    let registry = build_registry(&config)?;

    let settings = registry.settings();
    eprintln!("\nIndicators:");
    for indicator in settings.standard_indicators() {
        eprintln!("  {}", indicator);
    }
    eprintln!("  high window: {}", settings.high_window);

    eprintln!("\nStrategies:");
    eprintln!("  buy:  {}", registry.names(Family::Buy).collect::<Vec<_>>().join(", "));
    eprintln!("  sell: {}", registry.names(Family::Sell).collect::<Vec<_>>().join(", "));

    for (family, key) in [(Family::Buy, "buy"), (Family::Sell, "sell")] {
        if let Some(name) = config.get_string("screen", key) {
            let rule = registry.resolve(family, name.trim())?;
            eprintln!("\nSelected {}: {}", key, rule);
        }
    }

    eprintln!("\nConfig validated successfully");
    Ok(())
}

/// Fixed-width console table of the newest `limit` rows; 0 shows all.
pub fn format_table(rows: &[ScreenRow], limit: usize) -> String {
    let shown = if limit == 0 { rows.len() } else { limit.min(rows.len()) };
    let cell = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v));

    let mut out = format!(
        "{:<10} {:>10} {:>14} {:>8} {:>8} {:>8} {:>10} {:>10} {:<4} {}\n",
        "date", "close", "volume", "k", "d", "rsi", "upper", "lower", "sig", "flags"
    );
    for row in &rows[..shown] {
        let mut flags = Vec::new();
        if row.high_close {
            flags.push("high-close");
        }
        if row.high_volume {
            flags.push("high-volume");
        }
        out.push_str(&format!(
            "{:<10} {:>10} {:>14} {:>8} {:>8} {:>8} {:>10} {:>10} {:<4} {}\n",
            row.date,
            cell(row.close),
            row.volume.map_or_else(|| "-".to_string(), |v| format!("{:.0}", v)),
            cell(row.k),
            cell(row.d),
            cell(row.rsi),
            cell(row.upper),
            cell(row.lower),
            row.signal,
            flags.join(",")
        ));
    }
    out
}
