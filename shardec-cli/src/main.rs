//! Shardec CLI
//!
//! Split a file into k data + p parity fragment stores, or reassemble
//! it from any k survivors.
//!
//! # Commands
//! - `encode` - shard a file into `<file>.0 .. <file>.<m-1>` plus a manifest
//! - `decode` - rebuild the original file from the surviving stores
//!
//! Fragment geometry (k, p, fragment length, original size) is
//! recorded in `<prefix>.manifest` at encode time; decode reads it
//! from there instead of trusting repeated flags.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use shardec_core::params::{CodeParams, DEFAULT_DATA_FRAGMENTS, DEFAULT_PARITY_FRAGMENTS};
use shardec_store::{decode_file, encode_file, EncodeOptions};

#[derive(Parser)]
#[command(name = "shardec")]
#[command(about = "Erasure-coded file sharding")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a file into k data + p parity fragment stores
    Encode {
        /// File to encode
        file: PathBuf,

        /// Number of data fragments (k)
        #[arg(short = 'k', long = "data", default_value_t = DEFAULT_DATA_FRAGMENTS)]
        data: usize,

        /// Number of parity fragments (p)
        #[arg(short = 'p', long = "parity", default_value_t = DEFAULT_PARITY_FRAGMENTS)]
        parity: usize,

        /// Encode worker count (defaults to available parallelism)
        #[arg(long, env = "SHARDEC_WORKERS")]
        workers: Option<usize>,

        /// Prefix for the fragment stores (defaults to the input path)
        #[arg(short, long)]
        output_prefix: Option<PathBuf>,
    },

    /// Decode the original file from surviving fragment stores
    Decode {
        /// Fragment store prefix used at encode time
        prefix: PathBuf,

        /// Recovered output path (defaults to `<prefix>.out`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            file,
            data,
            parity,
            workers,
            output_prefix,
        } => {
            // Validate parameters before touching any file
            let params = CodeParams::new(data, parity)?;
            let mut options = EncodeOptions::default();
            if let Some(workers) = workers {
                options = options.with_workers(workers);
            }
            let prefix = output_prefix.unwrap_or_else(|| file.clone());

            let manifest = encode_file(&file, &prefix, &params, &options)?;
            println!(
                "encoded {} -> {} stores ({} blocks of {} bytes per fragment)",
                file.display(),
                params.total(),
                manifest.block_count,
                manifest.frag_len,
            );
        }

        Commands::Decode { prefix, output } => {
            let output = output.unwrap_or_else(|| {
                let mut name = prefix.as_os_str().to_os_string();
                name.push(".out");
                PathBuf::from(name)
            });

            decode_file(&prefix, &output)?;
            println!("decoded {} -> {}", prefix.display(), output.display());
        }
    }

    Ok(())
}
