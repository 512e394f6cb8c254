//! pixenlarge - enlarge a Netpbm image by an integer factor
//!
//! Reads a PBM, PGM, PPM or PAM image from a file or standard input and
//! writes it enlarged to a file or standard output.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{debug, info};
use pixenlarge::Encoding;
use pixenlarge::io::{PnmReader, PnmWriter};
use pixenlarge::transform::{EnlargeSummary, ScaleFactor, enlarge};

/// Enlarge a Netpbm image by replicating every pixel into a SCALE x SCALE block
#[derive(Parser, Debug)]
#[command(name = "pixenlarge", version, about)]
struct Args {
    /// Integer scale factor, at least 1
    scale: u32,
    /// Input image, or "-" for standard input
    #[arg(default_value = "-")]
    input: PathBuf,
    /// Output image (default: standard output)
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Write plain (ASCII) PBM, PGM or PPM instead of raw
    #[arg(long)]
    plain: bool,
    /// Log the chosen enlargement path and image details
    #[arg(long, short)]
    verbose: bool,
}

impl Args {
    fn encoding(&self) -> Encoding {
        if self.plain {
            Encoding::Plain
        } else {
            Encoding::Raw
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let summary = run(&args)?;
    info!(
        "{}x{} -> {}x{}",
        summary.input.width, summary.input.height, summary.output.width, summary.output.height
    );
    Ok(())
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    if is_stdio(path) {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file =
        File::open(path).with_context(|| format!("failed to open input {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) if !is_stdio(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output {}", path.display()))?;
            Ok(Box::new(file))
        }
        _ => Ok(Box::new(io::stdout().lock())),
    }
}

fn run(args: &Args) -> Result<EnlargeSummary> {
    let factor = ScaleFactor::new(args.scale)
        .map_err(|_| anyhow!("Scale factor must be an integer at least 1"))?;

    let input = open_input(&args.input)?;
    let output_path = args.output.as_deref();
    let output = open_output(output_path)?;

    let mut reader = PnmReader::new(input);
    let mut writer = PnmWriter::with_encoding(BufWriter::new(output), args.encoding());
    let result = enlarge(&mut reader, &mut writer, factor)
        .with_context(|| format!("failed to enlarge {} by {}", args.input.display(), factor));

    if let (Err(_), Some(path)) = (&result, output_path.filter(|p| !is_stdio(p))) {
        drop(writer);
        if fs::remove_file(path).is_ok() {
            debug!("removed incomplete output {}", path.display());
        }
    }
    result
}
