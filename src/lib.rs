pub mod cli;
pub mod config;
pub mod fields;
pub mod filter;

use anyhow::Context;
use log::LevelFilter;
use std::io::{self, Write};

pub use cli::{Cli, ColorMode, Commands, cli_parse};
pub use filter::{
    AggregationMode, Condition, ConditionParser, FilterError, FilterSummary, OperatorKind,
    RecordFilter, TypedValue, coerce_json, coerce_text, evaluate, filter_stream,
};

fn init_logger(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    // RUST_LOG still wins over the flags; a second init (tests) is a no-op
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init()
        .ok();
}

/// Build the record filter from presets and command line conditions
pub fn build_filter(
    config: &config::ToolConfig,
    presets: &[String],
    conditions: &[String],
    or_aggregation: bool,
    reverse: bool,
) -> Result<RecordFilter, FilterError> {
    let mut raw = config.preset_conditions(presets)?;
    raw.extend(conditions.iter().cloned());

    let parser = ConditionParser::new();
    let parsed = parser.parse_all(raw.as_slice())?;
    for warning in filter::condition_warnings(&parsed) {
        log::warn!("{warning}");
    }

    let mode = AggregationMode::from_or_flag(or_aggregation || config.filter.or);
    let reverse = reverse || config.filter.reverse;
    log::info!(
        "Filtering with {} condition(s), mode {:?}, reverse {}",
        parsed.len(),
        mode,
        reverse
    );
    for condition in &parsed {
        log::debug!("Condition: {condition}");
    }

    RecordFilter::new(parsed, mode, reverse)
}

pub fn run() -> anyhow::Result<()> {
    let cli = cli_parse();
    cli.color.apply();
    init_logger(cli.verbose, cli.quiet);

    let config =
        config::load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(path) = &cli.config {
        log::info!(
            "Config profile '{}' from {}",
            config.profile_name,
            path.display()
        );
    }

    match &cli.command {
        Commands::Filter {
            reverse,
            or_aggregation,
            presets,
            conditions,
        } => {
            let filter = build_filter(&config, presets, conditions, *or_aggregation, *reverse)?;
            let stdin = io::stdin();
            let stdout = io::stdout();
            filter_stream(stdin.lock(), stdout.lock(), &filter)
                .context("Failed to filter records from stdin")?;
        }
        Commands::Fields { sep } => {
            let separator = sep.as_deref().unwrap_or(&config.fields.separator);
            let keys = fields::collect_fields(io::stdin().lock())
                .context("Failed to collect fields from stdin")?;
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", fields::format_fields(&keys, separator))
                .context("Failed to write fields to stdout")?;
        }
    }

    Ok(())
}
