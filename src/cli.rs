use crate::calc_engine::AngleMode;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Keypad-style calculator with trig, log and root functions")]
pub struct Cli {
    /// Evaluate a single expression, print the result and exit.
    #[arg(long, short = 'e', value_name = "EXPR")]
    pub eval: Option<String>,

    /// Angle mode used by sin, cos and tan at startup (`rad` or `deg`).
    #[arg(
        long = "angle-mode",
        short = 'a',
        env = "PADCALC_ANGLE_MODE",
        default_value = "rad",
        value_name = "MODE"
    )]
    pub angle_mode: AngleMode,

    /// Shorthand for `--angle-mode deg`.
    #[arg(long, default_value_t = false)]
    pub degrees: bool,

    /// Use the plain line editor instead of the full-screen interface.
    #[cfg(feature = "line")]
    #[arg(long, default_value_t = false)]
    pub line: bool,

    /// Append log output to this file.
    #[arg(long, env = "PADCALC_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log every evaluation, not just warnings.
    #[arg(long, short = 'd', default_value_t = false)]
    pub debug: bool,
}

impl Cli {
    pub fn initial_angle_mode(&self) -> AngleMode {
        if self.degrees {
            AngleMode::Degrees
        } else {
            self.angle_mode
        }
    }
}
