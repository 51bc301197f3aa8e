mod color;

use clap::{ArgAction, Parser, Subcommand};
pub use color::ColorMode;
use std::path::PathBuf;

/// Tools for shallow JSON objects read one per line from standard input
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML config file with defaults and condition presets
    #[arg(short, long, global = true, env = "JSONL_TOOLS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Colorize diagnostics
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the lines (not) matching the given conditions
    ///
    /// Every condition has the form `<field> <operator> <literal>`.
    /// Operators: ==, >=, >, <=, <, !=, =~.
    /// Literals: strings like "abc", numbers like 2, 3.14, 15K (15*1000) or
    /// 23Ki (23*1024), booleans True or False, regular expressions like "a\d+$".
    Filter {
        /// Entries matching the conditions are dropped, the others are printed
        #[arg(short, long)]
        reverse: bool,

        /// Combine conditions with logical OR instead of AND
        #[arg(long = "or")]
        or_aggregation: bool,

        /// Named condition list from the config file, checked before CONDITIONS
        #[arg(short, long = "preset", value_name = "NAME")]
        presets: Vec<String>,

        /// Conditions to verify
        conditions: Vec<String>,
    },
    /// Print the sorted list of unique keys across all entries
    Fields {
        /// Separator between keys
        #[arg(long)]
        sep: Option<String>,
    },
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
