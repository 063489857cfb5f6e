//! pdfoutline CLI - batch PDF outline extraction

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfoutline::batch::{self, BatchEvent, BatchOptions};
use pdfoutline::{GbdtModel, JsonFormat, OutlineConfig, OutlineExtractor, OutlineSource};

const DEFAULT_MODEL: &str = "model/heading_model.txt";

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract document titles and heading outlines from PDF files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract every PDF in a directory to one JSON file each
    Run {
        /// Directory containing PDF files
        #[arg(short, long, value_name = "DIR", env = "PDFOUTLINE_INPUT", default_value = "input")]
        input: PathBuf,

        /// Directory for JSON output
        #[arg(short, long, value_name = "DIR", env = "PDFOUTLINE_OUTPUT", default_value = "output")]
        output: PathBuf,

        /// Heading model (LightGBM text format)
        #[arg(short, long, value_name = "FILE", env = "PDFOUTLINE_MODEL", default_value = DEFAULT_MODEL)]
        model: PathBuf,

        /// Process one document at a time
        #[arg(long)]
        sequential: bool,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,

        /// Pipeline configuration (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Extract a single PDF
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Heading model (LightGBM text format)
        #[arg(short, long, value_name = "FILE", env = "PDFOUTLINE_MODEL", default_value = DEFAULT_MODEL)]
        model: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,

        /// Pipeline configuration (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            input,
            output,
            model,
            sequential,
            compact,
            config,
        } => cmd_run(
            &input,
            &output,
            &model,
            config.as_deref(),
            BatchOptions::new().with_format(json_format(compact)),
            sequential,
        ),
        Commands::Extract {
            input,
            model,
            output,
            compact,
            config,
        } => cmd_extract(
            &input,
            &model,
            output.as_deref(),
            config.as_deref(),
            json_format(compact),
        ),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

/// Load the model and configuration; any failure here aborts the process.
fn build_extractor(
    model_path: &Path,
    config_path: Option<&Path>,
) -> Result<OutlineExtractor, Box<dyn std::error::Error>> {
    let config = match config_path {
        Some(path) => {
            log::debug!("Using pipeline configuration from {}", path.display());
            OutlineConfig::load(path)?
        }
        None => OutlineConfig::default(),
    };
    let model = GbdtModel::load(model_path)?;
    Ok(OutlineExtractor::new(Arc::new(model), config)?)
}

fn cmd_run(
    input: &Path,
    output: &Path,
    model: &Path,
    config: Option<&Path>,
    options: BatchOptions,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let extractor = build_extractor(model, config)?;
    let options = if sequential {
        options.sequential()
    } else {
        options
    };

    if !input.is_dir() {
        return Err(format!("Input directory not found: {}", input.display()).into());
    }
    let files = batch::discover_pdfs(input)?;
    if files.is_empty() {
        println!("{} {}", "No PDF files found in".yellow(), input.display());
        return Ok(());
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let (tx, rx) = crossbeam_channel::unbounded();
    let report = std::thread::scope(|scope| {
        let extractor = &extractor;
        let files = &files;
        let worker =
            scope.spawn(move || batch::process_files(extractor, files, output, options, Some(tx)));

        for event in rx.iter() {
            match event {
                BatchEvent::Done(done) => pb.set_message(file_name(&done.input)),
                BatchEvent::Failed(failure) => pb.println(format!(
                    "{} {}: {}",
                    "Failed".red(),
                    file_name(&failure.input),
                    failure.error
                )),
            }
            pb.inc(1);
        }
        worker.join()
    })
    .map_err(|_| "batch worker panicked")??;

    pb.finish_with_message("Done!");

    println!(
        "\n{} {} of {} documents",
        "Processed".green().bold(),
        report.processed.len(),
        report.total()
    );
    for source in [
        OutlineSource::Bookmarks,
        OutlineSource::TableOfContents,
        OutlineSource::Inferred,
        OutlineSource::Empty,
    ] {
        let count = report.count_source(source);
        if count > 0 {
            println!("  {} {}: {}", "├─".dimmed(), source, count);
        }
    }
    println!("  {} output: {}", "└─".dimmed(), output.display());

    if !report.is_success() {
        println!("\n{} {} documents", "Failed".red().bold(), report.failed.len());
        for failure in &report.failed {
            println!("  {} {}", file_name(&failure.input), failure.error.dimmed());
        }
    }

    Ok(())
}

fn cmd_extract(
    input: &Path,
    model: &Path,
    output: Option<&Path>,
    config: Option<&Path>,
    format: JsonFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let extractor = build_extractor(model, config)?;
    let extraction = extractor.extract_file(input)?;
    let json = extraction.to_json(format)?;

    if let Some(out) = output {
        fs::write(out, format!("{}\n", json))?;
        eprintln!(
            "{} {} ({}, {} headings)",
            "Wrote".green(),
            out.display(),
            extraction.source,
            extraction.document.outline.len()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF title and heading outline extraction tool");
    println!();
    println!("Model format: LightGBM text (binary objective)");
    println!("License: MIT");
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
