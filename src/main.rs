//! Command-line driver for the cleaning and mining pipelines.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};

use shuddhi::error::Result;
use shuddhi::mine::{extract_vocabulary, mine_pairs, save_pairs, save_vocabulary};
use shuddhi::pipeline::{
    ChunkedRunner, CleanConfig, CleanPipeline, LogObserver, UnitFormat,
};
use shuddhi::script::Lexicon;

#[derive(Parser)]
#[command(name = "shuddhi", version, about = "Malayalam corpus normalization and cleaning")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Clean a corpus file: script normalization, structural cleanup,
    /// boilerplate removal.
    Clean {
        /// Input corpus (UTF-8 text).
        input: PathBuf,
        /// Output path. Written all-or-nothing.
        output: PathBuf,
        /// Chillu correction pairs (JSON, produced by `mine`).
        #[arg(long)]
        pairs: Option<PathBuf>,
        /// Legitimate visarga-final words (one per line).
        #[arg(long)]
        visarga_words: Option<PathBuf>,
        /// Worker count. Defaults to available cores minus one.
        #[arg(short, long)]
        workers: Option<usize>,
        /// How input lines map to processing units.
        #[arg(long, value_enum, default_value = "lines")]
        format: InputFormat,
        /// Re-escape newlines in document output (keep one doc per line).
        #[arg(long)]
        escape_output: bool,
        /// Drop units shorter than this after cleaning (0 disables).
        #[arg(long, default_value_t = 20)]
        min_chars: usize,
    },
    /// Mine validated chillu correction pairs from a corpus.
    Mine {
        /// Input corpus (UTF-8 text).
        input: PathBuf,
        /// Output mapping (JSON object, legacy word -> canonical word).
        output: PathBuf,
        /// Also write the extracted vocabulary, sorted, one word per line.
        #[arg(long)]
        vocab_out: Option<PathBuf>,
        /// Worker count. Defaults to available cores minus one.
        #[arg(short, long)]
        workers: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// One unit per line.
    Lines,
    /// One document per line, newlines escaped as `\n`.
    Docs,
    /// Documents separated by blank lines (sequential processing).
    StreamDocs,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Clean {
            input,
            output,
            pairs,
            visarga_words,
            workers,
            format,
            escape_output,
            min_chars,
        } => {
            let lexicon = Arc::new(Lexicon::load_or_default(
                pairs.as_deref(),
                visarga_words.as_deref(),
            ));
            let config = CleanConfig {
                min_output_chars: min_chars,
                ..CleanConfig::default()
            };
            let pipeline = CleanPipeline::new(lexicon, config);

            let unit_format = match format {
                InputFormat::Lines => UnitFormat::Lines,
                InputFormat::Docs => UnitFormat::EscapedDocs { escape_output },
                InputFormat::StreamDocs => UnitFormat::BlankLineDocs,
            };

            let runner = ChunkedRunner::new(workers.unwrap_or_else(ChunkedRunner::available_workers));
            info!(
                "cleaning {} -> {} ({} workers)",
                input.display(),
                output.display(),
                runner.workers()
            );

            let report = runner.run(&input, &output, &pipeline, unit_format, &LogObserver::new())?;
            print!("{report}");
            Ok(())
        }
        Command::Mine {
            input,
            output,
            vocab_out,
            workers,
        } => {
            let workers = workers.unwrap_or_else(ChunkedRunner::available_workers);
            info!("extracting vocabulary from {} ({workers} workers)", input.display());

            let vocabulary = extract_vocabulary(&input, workers)?;
            info!("vocabulary: {} candidate words", vocabulary.len());

            if let Some(path) = vocab_out {
                save_vocabulary(&path, &vocabulary)?;
                info!("vocabulary written to {}", path.display());
            }

            let pairs = mine_pairs(&vocabulary);
            info!("mined {} validated correction pairs", pairs.len());

            save_pairs(&output, &pairs)?;
            info!("mapping written to {}", output.display());
            Ok(())
        }
    }
}
