use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use steplog::{LogConfig, LogDirectory, TabularLog};

#[derive(Parser)]
#[command(name = "steplog-cli", version, about = "Inspect simulation history and profile logs")]
struct Cli {
    #[command(flatten)]
    naming: NamingArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct NamingArgs {
    /// Log directory
    #[arg(long = "log-path")]
    log_path: Option<PathBuf>,

    /// JSON file with a base configuration; flags override its fields
    #[arg(long = "config")]
    config: Option<PathBuf>,

    #[arg(long = "snapshot-prefix")]
    snapshot_prefix: Option<String>,

    #[arg(long = "snapshot-suffix")]
    snapshot_suffix: Option<String>,

    #[arg(long = "history-file")]
    history_file: Option<String>,

    #[arg(long = "index-file")]
    index_file: Option<String>,

    #[arg(long = "key-column")]
    key_column: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one history header value
    Header { name: String },
    /// Print one history column, one value per line
    Column { name: String },
    /// Print the sequence id / snapshot id pairs of the index
    Index,
    /// Load a snapshot and print a summary or one of its columns
    Snapshot {
        #[arg(long = "sequence")]
        sequence: Option<u64>,
        #[arg(long = "snapshot")]
        snapshot: Option<u64>,
        #[arg(long = "column")]
        column: Option<String>,
    },
    /// Print sequence ids with a snapshot whose history value is in range
    Select {
        #[arg(long = "column")]
        column: String,
        #[arg(long = "min")]
        min: Option<f64>,
        #[arg(long = "max")]
        max: Option<f64>,
    },
}

impl NamingArgs {
    fn into_config(self) -> Result<LogConfig> {
        let base = LogConfig::new("LOGS");
        let mut config = match &self.config {
            Some(path) => LogConfig::from_json_file_over(path, &base)
                .with_context(|| format!("load config {}", path.display()))?,
            None => base,
        };
        if let Some(path) = self.log_path {
            config.log_path = path;
        }
        if let Some(prefix) = self.snapshot_prefix {
            config = config.with_snapshot_prefix(prefix);
        }
        if let Some(suffix) = self.snapshot_suffix {
            config = config.with_snapshot_suffix(suffix);
        }
        if let Some(name) = self.history_file {
            config = config.with_history_file(name);
        }
        if let Some(name) = self.index_file {
            config = config.with_index_file(name);
        }
        if let Some(name) = self.key_column {
            config = config.with_key_column(name);
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = cli.naming.into_config()?;

    info!("Log directory: {}", config.log_path.display());
    let logs = LogDirectory::open(config).context("Failed to open log directory")?;
    let mut out = io::BufWriter::new(io::stdout());

    match cli.command {
        Commands::Header { name } => match logs.history().header_value(&name) {
            Some(value) => writeln!(out, "{value}")?,
            None => bail!("{name} is not a history header field"),
        },
        Commands::Column { name } => match logs.history().column(&name) {
            Some(values) => write_column(&mut out, values)?,
            None => bail!("{name} is not a history column"),
        },
        Commands::Index => {
            for (sequence, snapshot) in logs.index().iter() {
                writeln!(out, "{sequence} {snapshot}")?;
            }
        }
        Commands::Snapshot {
            sequence,
            snapshot,
            column,
        } => {
            let profile = logs.resolve_snapshot(sequence, snapshot)?;
            match column {
                Some(name) => match profile.column(&name) {
                    Some(values) => write_column(&mut out, values)?,
                    None => bail!("{name} is not a snapshot column"),
                },
                None => write_summary(&mut out, &profile)?,
            }
        }
        Commands::Select { column, min, max } => {
            let lo = min.unwrap_or(f64::NEG_INFINITY);
            let hi = max.unwrap_or(f64::INFINITY);
            let in_range = move |v: &[f64]| v[0] >= lo && v[0] <= hi;
            for id in logs.select_sequence_ids(&[column.as_str()], Some(&in_range))? {
                writeln!(out, "{id}")?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn write_column(out: &mut dyn Write, values: &[f64]) -> io::Result<()> {
    for value in values {
        writeln!(out, "{value}")?;
    }
    Ok(())
}

fn write_summary(out: &mut dyn Write, log: &TabularLog) -> io::Result<()> {
    writeln!(out, "rows: {}", log.row_count())?;
    for name in log.header_names() {
        if let Some(value) = log.header_value(name) {
            writeln!(out, "{name} = {value}")?;
        }
    }
    writeln!(out, "columns: {}", log.column_names().join(" "))?;
    Ok(())
}
