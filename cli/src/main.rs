//! pdftranscript CLI - batch PDF transcription tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdftranscript::{
    collect_documents, BatchOptions, BatchRunner, BatchSummary, CleanupPreset, ExtractionOptions,
    OcrConfig, PollPolicy, ProcessingOutcome, RemoteOcrClient, RenderOptions, TranscribeOptions,
    Transcriber, YieldPolicy, MIN_CHARS_PER_PAGE, USABLE_PAGE_FRACTION,
};

#[derive(Parser)]
#[command(name = "pdftranscript")]
#[command(version)]
#[command(about = "Turn directories of PDFs into structured text transcripts", long_about = None)]
struct Cli {
    /// Directory of PDF files
    #[arg(value_name = "INPUT_DIR")]
    input: Option<PathBuf>,

    /// Output directory (defaults to INPUT_DIR/transcripts)
    #[arg(value_name = "OUTPUT_DIR")]
    output: Option<PathBuf>,

    #[command(flatten)]
    pipeline: PipelineArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Transcribe every PDF in a directory
    Batch {
        /// Directory of PDF files
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Output directory (defaults to INPUT_DIR/transcripts)
        #[arg(value_name = "OUTPUT_DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Transcribe a single PDF
    File {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Clean and reconstruct a raw text file
    Reconstruct {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Text cleanup preset
        #[arg(long, value_enum)]
        cleanup: Option<CleanupLevel>,

        /// Keep unmerged paragraph lines on separate lines
        #[arg(long)]
        preserve_line_breaks: bool,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone)]
struct PipelineArgs {
    /// Worker threads (defaults to available cores minus one)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Always use OCR, skipping local extraction
    #[arg(long)]
    force_ocr: bool,

    /// Treat a document as usable when any page has enough text
    #[arg(long)]
    strict_yield: bool,

    /// Characters a page needs to count as non-empty
    #[arg(long, default_value_t = MIN_CHARS_PER_PAGE)]
    min_chars: usize,

    /// Share of non-empty pages that must be exceeded to skip OCR
    #[arg(long, default_value_t = USABLE_PAGE_FRACTION)]
    usable_fraction: f64,

    /// Text cleanup preset
    #[arg(long, value_enum)]
    cleanup: Option<CleanupLevel>,

    /// Keep unmerged paragraph lines on separate lines
    #[arg(long)]
    preserve_line_breaks: bool,

    /// OCR analyze endpoint
    #[arg(long, env = "OCR_ENDPOINT")]
    ocr_endpoint: Option<String>,

    /// OCR subscription key
    #[arg(long, env = "OCR_API_KEY", hide_env_values = true)]
    ocr_key: Option<String>,

    /// OCR API version
    #[arg(long, env = "OCR_API_VERSION", default_value = pdftranscript::extract::DEFAULT_API_VERSION)]
    ocr_api_version: String,

    /// Delay between OCR status polls, in milliseconds
    #[arg(long, default_value_t = 1000)]
    poll_interval_ms: u64,

    /// Maximum OCR status polls per document
    #[arg(long, default_value_t = pdftranscript::extract::DEFAULT_MAX_POLLS, value_parser = clap::value_parser!(u32).range(1..))]
    max_polls: u32,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CleanupLevel {
    /// Minimal cleanup (page numbers, whitespace, control characters, NFC)
    Minimal,
    /// Standard cleanup (default)
    Standard,
    /// Aggressive cleanup (also PUA removal and bullet standardization)
    Aggressive,
}

impl From<CleanupLevel> for CleanupPreset {
    fn from(level: CleanupLevel) -> Self {
        match level {
            CleanupLevel::Minimal => CleanupPreset::Minimal,
            CleanupLevel::Standard => CleanupPreset::Standard,
            CleanupLevel::Aggressive => CleanupPreset::Aggressive,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Batch {
            input,
            output,
            pipeline,
        }) => cmd_batch(&input, output.as_deref(), &pipeline),
        Some(Commands::File {
            input,
            output,
            pipeline,
        }) => cmd_file(&input, output.as_deref(), &pipeline),
        Some(Commands::Reconstruct {
            input,
            output,
            cleanup,
            preserve_line_breaks,
        }) => cmd_reconstruct(&input, output.as_deref(), cleanup, preserve_line_breaks),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: batch over INPUT_DIR if provided
            if let Some(input) = cli.input {
                cmd_batch(&input, cli.output.as_deref(), &cli.pipeline)
            } else {
                println!(
                    "{}",
                    "Usage: pdftranscript <INPUT_DIR> [OUTPUT_DIR]".yellow()
                );
                println!("       pdftranscript --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn render_options(cleanup: Option<CleanupLevel>, preserve_line_breaks: bool) -> RenderOptions {
    let mut options = RenderOptions::new().with_line_breaks(preserve_line_breaks);
    if let Some(level) = cleanup {
        options = options.with_cleanup_preset(level.into());
    }
    options
}

fn build_transcriber(args: &PipelineArgs) -> Result<Transcriber, Box<dyn std::error::Error>> {
    if !(0.0..1.0).contains(&args.usable_fraction) {
        return Err(format!(
            "--usable-fraction must be in [0, 1), got {}",
            args.usable_fraction
        )
        .into());
    }

    let yield_policy = if args.strict_yield {
        YieldPolicy::AnyPage
    } else {
        YieldPolicy::Fraction(args.usable_fraction)
    };

    // Use lenient mode so one unreadable page does not sink the document
    let extraction = ExtractionOptions::new()
        .lenient()
        .with_min_chars(args.min_chars)
        .with_yield_policy(yield_policy)
        .with_force_ocr(args.force_ocr)
        .with_poll_policy(PollPolicy::new(
            Duration::from_millis(args.poll_interval_ms),
            args.max_polls,
        ));

    let options = TranscribeOptions::new()
        .with_extraction(extraction)
        .with_render(render_options(args.cleanup, args.preserve_line_breaks));

    let transcriber = Transcriber::new(options);

    match (&args.ocr_endpoint, &args.ocr_key) {
        (Some(endpoint), Some(key)) => {
            let config = OcrConfig::new(endpoint, key).with_api_version(&args.ocr_api_version);
            log::info!("OCR fallback enabled: {}", config.endpoint);
            Ok(transcriber.with_ocr(RemoteOcrClient::new(config)?))
        }
        (None, None) => {
            log::info!("No OCR backend configured; local extraction only");
            Ok(transcriber)
        }
        _ => Err("--ocr-endpoint and --ocr-key must be given together".into()),
    }
}

fn cmd_batch(
    input: &Path,
    output: Option<&Path>,
    args: &PipelineArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if !input.is_dir() {
        return Err(format!("Input directory not found: {}", input.display()).into());
    }
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| input.join("transcripts"));

    let transcriber = build_transcriber(args)?;
    let mut batch_options = BatchOptions::new();
    if let Some(workers) = args.workers {
        batch_options = batch_options.with_workers(workers);
    }
    let runner = BatchRunner::new(transcriber, batch_options);

    let documents = collect_documents(input)?;
    if documents.is_empty() {
        println!("{} {}", "No PDF files in".yellow(), input.display());
        return Ok(());
    }

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let summary = runner.process_documents(&documents, &output_dir, |report| {
        pb.set_message(report.name());
        pb.inc(1);
    })?;

    pb.finish_with_message("Done!");
    print_summary(&summary, &output_dir);

    Ok(())
}

fn print_summary(summary: &BatchSummary, output_dir: &Path) {
    println!("\n{}", "Batch summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Documents".bold(), summary.total());
    println!(
        "{}: {}",
        "Succeeded".bold(),
        summary.succeeded().to_string().green()
    );
    let failed = summary.failed().to_string();
    println!(
        "{}: {}",
        "Failed".bold(),
        if summary.failed() > 0 {
            failed.red()
        } else {
            failed.normal()
        }
    );
    println!("{}: {:.2?}", "Elapsed".bold(), summary.elapsed);
    println!("{}: {}", "Output".bold(), output_dir.display());

    let failures: Vec<_> = summary.failures().collect();
    for (i, report) in failures.iter().enumerate() {
        let branch = if i + 1 == failures.len() { "└─" } else { "├─" };
        if let ProcessingOutcome::Failed { error, .. } = &report.outcome {
            println!("  {} {}: {}", branch.dimmed(), report.name(), error);
        }
    }
}

fn cmd_file(
    input: &Path,
    output: Option<&Path>,
    args: &PipelineArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let transcriber = build_transcriber(args)?;
    let transcript = transcriber.transcribe_file(input)?;
    let rendered = transcript.render();

    if let Some(path) = output {
        fs::write(path, &rendered)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

fn cmd_reconstruct(
    input: &Path,
    output: Option<&Path>,
    cleanup: Option<CleanupLevel>,
    preserve_line_breaks: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = fs::read_to_string(input)?;
    let options = render_options(cleanup, preserve_line_breaks);
    let text = pdftranscript::reconstruct_text_with_options(&raw, &options);

    if let Some(path) = output {
        fs::write(path, &text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", text);
    }

    Ok(())
}

fn cmd_version() {
    println!(
        "{} {}",
        "pdftranscript".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("PDF transcription tool with OCR fallback");
    println!();
    println!("License: MIT");
}
