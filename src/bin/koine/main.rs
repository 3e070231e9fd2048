//! koine CLI tool
//!
//! Command-line interface for decoding morphological codes and aligning Greek New Testament
//! editions with koine-core.
//!
//! ## Commands
//!
//! - `decode <CODE>...`: Decode codes and print them as JSON
//! - `align <base> <overlay>`: Align two word streams and print every token's order assignment
//! - `census <stream>`: Survey the code shapes of a stream
//! - `classify --config <file>`: Run the full pipeline described by a config file
//!
//! Output goes to stdout as JSON Lines; logs go to stderr and respect `RUST_LOG`.

use clap::{Parser, Subcommand};
use koine_core::{
    align::{align_corpus, AlignConfig, AlignMode},
    config::TomlConfigProvider,
    decode::Decoder,
    pipeline::{census_of, run_with_provider},
    stream::{read_stream, Edition, StreamFormat},
    traits::TraitStore,
    KoineError,
};
use serde::Serialize;
use std::{
    io::{self, Write},
    path::PathBuf,
};

#[derive(Parser)]
#[command(name = "koine")]
#[command(author, version, about = "Decode Greek NT morphology codes and align editions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode one or more morphological codes
    Decode {
        /// Codes such as `V-2AAP-NSM`. Two codes joined by `/` are decoded as a pair.
        #[arg(required = true)]
        codes: Vec<String>,

        /// Trait table TOML (default: built-in Robinson-Pierpont table)
        #[arg(long)]
        tables: Option<PathBuf>,
    },

    /// Align two word streams verse by verse
    Align {
        /// Base edition stream
        base: PathBuf,

        /// Overlay edition stream
        overlay: PathBuf,

        /// Alignment mode: positional or identity
        #[arg(short, long, default_value = "positional")]
        mode: AlignMode,

        /// Identity mode only: bound on the resync lookahead
        #[arg(long)]
        max_lookahead: Option<usize>,

        /// Positional mode only: match words whose accents or breathings differ
        #[arg(long)]
        ignore_accents: bool,

        /// Format of the base stream
        #[arg(long, default_value = "verse_text")]
        base_format: StreamFormat,

        /// Format of the overlay stream
        #[arg(long, default_value = "verse_text")]
        overlay_format: StreamFormat,
    },

    /// Count codes per POS and per (POS, info length) shape
    Census {
        /// Stream to survey
        stream: PathBuf,

        /// Format of the stream
        #[arg(long, default_value = "verse_text")]
        format: StreamFormat,

        /// Trait table TOML to check abbreviations against (default: built-in table)
        #[arg(long)]
        tables: Option<PathBuf>,
    },

    /// Run the full classification pipeline
    Classify {
        /// Pipeline configuration file
        #[arg(short, long, default_value = "koine.toml")]
        config: PathBuf,
    },
}

fn print_json_lines<'t, T, I>(items: I) -> Result<(), KoineError>
where
    T: Serialize + 't,
    I: IntoIterator<Item = &'t T>,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for item in items {
        serde_json::to_writer(&mut out, item)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decode { codes, tables } => {
            let store = TraitStore::load(tables.as_deref())?;
            let decoder = Decoder::new(&store);
            let decoded: Vec<_> = codes
                .iter()
                .map(|code| match code.split_once('/') {
                    Some((first, second)) => decoder.decode_pair(first, Some(second)),
                    None => decoder.decode(code),
                })
                .collect();
            print_json_lines(&decoded)?;
        }
        Commands::Align {
            base,
            overlay,
            mode,
            max_lookahead,
            ignore_accents,
            base_format,
            overlay_format,
        } => {
            let base = read_stream(&base, base_format, Edition::Base)?;
            let overlay = read_stream(&overlay, overlay_format, Edition::Overlay)?;
            let config = AlignConfig::new(mode)
                .with_max_lookahead(max_lookahead)
                .with_ignore_accents(ignore_accents);
            let aligned = align_corpus(&config, base, overlay);
            print_json_lines(&aligned)?;
        }
        Commands::Census {
            stream,
            format,
            tables,
        } => {
            let store = TraitStore::load(tables.as_deref())?;
            let tokens = read_stream(&stream, format, Edition::Base)?;
            let census = census_of(&tokens);
            print_json_lines(&census.shapes())?;

            let unknown = census.unknown_pos(store.schema());
            if !unknown.is_empty() {
                eprintln!("POS abbreviations without a schema entry: {unknown:?}");
            }
            eprintln!("{} codes surveyed", census.total());
        }
        Commands::Classify { config } => {
            let provider = TomlConfigProvider::new(config);
            let report = run_with_provider(&provider)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.review.is_empty() {
                eprintln!(
                    "{} codes need review (see warnings above)",
                    report.review.len()
                );
            }
        }
    }

    Ok(())
}
