mod calc_engine;
mod cli;
#[cfg(feature = "line")]
mod line_mode;
mod logging;
#[cfg(feature = "tui")]
mod render_help;
mod session;
#[cfg(feature = "tui")]
mod tui_mode;

use anyhow::Result;
use calc_engine::AngleMode;
use clap::Parser;
use cli::Cli;
use logging::Fallback;
use session::HistoryEntry;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let angle_mode = cli.initial_angle_mode();

    if let Some(expression) = cli.eval.as_deref() {
        let _guard = logging::init(cli.log_file.as_deref(), cli.debug, Fallback::Stderr)?;
        let entry = HistoryEntry::evaluate(expression, false, angle_mode);
        println!("{}", entry.outcome());
        return Ok(if entry.result.is_ok() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    run_interactive(&cli, angle_mode)
}

#[cfg(feature = "tui")]
fn run_interactive(cli: &Cli, angle_mode: AngleMode) -> Result<ExitCode> {
    #[cfg(feature = "line")]
    if cli.line {
        return run_line_mode(cli, angle_mode);
    }

    let _guard = logging::init(cli.log_file.as_deref(), cli.debug, Fallback::Silent)?;
    tui_mode::run_tui(angle_mode)?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(all(feature = "line", not(feature = "tui")))]
fn run_interactive(cli: &Cli, angle_mode: AngleMode) -> Result<ExitCode> {
    run_line_mode(cli, angle_mode)
}

#[cfg(not(any(feature = "tui", feature = "line")))]
fn run_interactive(_cli: &Cli, _angle_mode: AngleMode) -> Result<ExitCode> {
    eprintln!("Built without an interactive mode; use --eval <EXPR>.");
    Ok(ExitCode::FAILURE)
}

#[cfg(feature = "line")]
fn run_line_mode(cli: &Cli, angle_mode: AngleMode) -> Result<ExitCode> {
    let _guard = logging::init(cli.log_file.as_deref(), cli.debug, Fallback::Silent)?;
    line_mode::run_line(angle_mode)?;
    Ok(ExitCode::SUCCESS)
}
