use clap::Parser;

use crate::report::OutputFormat;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct AppArgs {
    /// Input file of "<timestamp>\t<cost>" lines, or "-" for stdin
    #[arg(help = "Tab separated input file, use - for stdin")]
    pub file: String,

    /// Time window for the rolling aggregates (same unit as the timestamps)
    #[arg(short, long, default_value_t = 60.0, help = "Window duration, in the unit of the timestamps")]
    pub window: f64,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, help = "Output format")]
    pub format: OutputFormat,

    /// Fail the run if any line was rejected
    #[arg(long, help = "Exit non-zero if any input line was rejected")]
    pub strict: bool,
}

impl AppArgs {
    pub fn reads_stdin(&self) -> bool {
        self.file == "-"
    }
}
