//! protoc-gen-gendoc: render the comments of `.proto` files as documentation.
//!
//! Runs as a `protoc` plugin: a `CodeGeneratorRequest` is read from stdin and
//! a `CodeGeneratorResponse` is written to stdout.
//!
//! ```text
//! protoc --gendoc_out=docs --gendoc_opt=format=html,log api/*.proto
//! ```
//!
//! For debugging, a request saved to disk can be fed with `--request`.

mod model;
mod plugin;
mod render;
mod toc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use prost::Message;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "protoc-gen-gendoc",
    about = "protoc plugin that renders proto comments as documentation"
)]
struct Cli {
    /// Read the CodeGeneratorRequest from a file instead of stdin
    #[arg(long)]
    request: Option<PathBuf>,

    /// Output format: markdown (default), html, json
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,

    /// Name of the generated file (default: docs.<ext>)
    #[arg(short = 'o', long)]
    out: Option<String>,

    /// Also emit the walk log as gendoc.log
    #[arg(long)]
    log: bool,

    /// Log to stderr; repeat for more detail
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let input = read_input(&cli)?;
    let options = plugin::Options {
        format: cli.format,
        output: cli.out,
        include_log: cli.log,
    };
    let response = plugin::run(&input, options)?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&response.encode_to_vec())
        .context("failed to write CodeGeneratorResponse")?;
    stdout.flush().context("failed to flush stdout")?;
    Ok(())
}

/// stdout carries the response, so logs always go to stderr.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn read_input(cli: &Cli) -> Result<Vec<u8>> {
    match cli.request {
        Some(ref path) => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut input = Vec::new();
            io::stdin()
                .read_to_end(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}
