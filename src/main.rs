use colored::Colorize;
use std::process::ExitCode;

fn main() -> ExitCode {
    match jsonl_tools::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
