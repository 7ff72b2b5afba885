//! rowpipe CLI: run common stream pipelines over CSV files.

use clap::{Parser, Subcommand};
use rowpipe_core::{Datum, PipelineConfig, Record, Scalar};
use rowpipe_io::{read_csv, record_to_json, scalar_to_json, JsonlWriter};
use rowpipe_operators::{JoinKind, Stream};
use serde_json::{json, Value};
use std::fs;
use std::io::stdout;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rowpipe")]
#[command(about = "Lazy stream pipelines over CSV data, written as JSON lines", long_about = None)]
struct Cli {
    /// JSON file with pipeline settings (overrides environment)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// CSV field delimiter (overrides config)
    #[arg(long, global = true)]
    delimiter: Option<char>,

    /// Keep CSV cells as strings instead of inferring types
    #[arg(long, global = true)]
    no_infer: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the first records of a CSV file
    Head {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, default_value_t = 10)]
        n: usize,

        /// Print a head/tail preview instead of JSON lines
        #[arg(long)]
        preview: bool,
    },

    /// Count the distinct values of one column, most frequent first
    Freq {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        column: String,

        /// Only print the N most frequent values
        #[arg(long)]
        top: Option<usize>,
    },

    /// Join two CSV files on a shared column
    Join {
        #[arg(long)]
        left: PathBuf,

        #[arg(long)]
        right: PathBuf,

        #[arg(short, long)]
        key: String,

        /// One of inner, left, right, outer
        #[arg(long, default_value = "inner")]
        how: String,
    },

    /// Split a CSV file into fixed-size batches, one JSON array per line
    Batch {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        size: usize,
    },

    /// Keep each record with a probability, deterministically for a given seed
    Sample {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        probability: f64,

        #[arg(short, default_value_t = usize::MAX)]
        n: usize,

        /// Seed for the sampling coin (overrides config)
        #[arg(long)]
        seed: Option<u64>,
    },
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref(), cli.delimiter, cli.no_infer) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = match cli.command {
        Commands::Head { input, n, preview } => head(&input, n, preview, &config),
        Commands::Freq { input, column, top } => freq(&input, &column, top, &config),
        Commands::Join {
            left,
            right,
            key,
            how,
        } => join(&left, &right, &key, &how, &config),
        Commands::Batch { input, size } => batch(&input, size, &config),
        Commands::Sample {
            input,
            probability,
            n,
            seed,
        } => sample(&input, probability, n, seed, &config),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(
    path: Option<&Path>,
    delimiter: Option<char>,
    no_infer: bool,
) -> CliResult<PipelineConfig> {
    let mut config = match path {
        Some(path) => PipelineConfig::from_json(&fs::read_to_string(path)?)?,
        None => PipelineConfig::from_env(),
    };
    apply_overrides(&mut config, delimiter, no_infer);
    config.validate()?;
    Ok(config)
}

fn apply_overrides(config: &mut PipelineConfig, delimiter: Option<char>, no_infer: bool) {
    if let Some(d) = delimiter {
        config.csv_delimiter = d;
    }
    if no_infer {
        config.infer_types = false;
    }
}

fn head(input: &Path, n: usize, preview: bool, config: &PipelineConfig) -> CliResult<()> {
    let rows = read_csv(input, None, config)?.take(n);
    if preview {
        let set = rows.collect()?;
        println!("{}", set.preview(config.preview_rows));
        return Ok(());
    }
    JsonlWriter::to_writer(stdout().lock()).write_stream(rows)?;
    Ok(())
}

fn freq(input: &Path, column: &str, top: Option<usize>, config: &PipelineConfig) -> CliResult<()> {
    let counts = read_csv(input, None, config)?
        .get(column)
        .count_frequency()?
        .sort_by(|(_, count)| *count);

    let mut out = JsonlWriter::to_writer(stdout().lock());
    for (value, count) in counts.into_iter().take(top.unwrap_or(usize::MAX)) {
        out.write_value(&frequency_line(&value, count))?;
    }
    out.flush()?;
    Ok(())
}

fn frequency_line(value: &Scalar, count: usize) -> Value {
    json!({ "value": scalar_to_json(value), "count": count })
}

fn join(left: &Path, right: &Path, key: &str, how: &str, config: &PipelineConfig) -> CliResult<()> {
    let how: JoinKind = how.parse()?;
    let lhs = read_csv(left, None, config)?;
    let rhs = read_csv(right, None, config)?;
    let joined = lhs.join(how, key, rhs)?;
    JsonlWriter::to_writer(stdout().lock()).write_stream(joined.into_stream())?;
    Ok(())
}

fn batch(input: &Path, size: usize, config: &PipelineConfig) -> CliResult<()> {
    let batches = read_csv(input, None, config)?.batch(size)?;
    let mut out = JsonlWriter::to_writer(stdout().lock());
    for chunk in batches {
        out.write_value(&batch_line(chunk?.iter()))?;
    }
    out.flush()?;
    Ok(())
}

fn batch_line<'r, R: Record + 'r>(rows: impl Iterator<Item = &'r R>) -> Value {
    Value::Array(rows.map(record_to_json).collect())
}

fn sample(
    input: &Path,
    probability: f64,
    n: usize,
    seed: Option<u64>,
    config: &PipelineConfig,
) -> CliResult<()> {
    let seed = seed.or(config.seed).unwrap_or_default();
    let rows: Stream<'_, Datum> = read_csv(input, None, config)?.sample(probability, n, seed)?;
    JsonlWriter::to_writer(stdout().lock()).write_stream(rows)?;
    Ok(())
}
