//! slidefill CLI - PowerPoint template filling tool
//!
//! Fills `{{TOKEN}}` placeholders in a PPTX template from a JSON or CSV file.

use clap::Parser;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use slidefill::{fill_presentation, BackupOutcome, FillOptions, FillSummary};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Fill placeholder tokens in a PowerPoint template from JSON or CSV data
#[derive(Parser)]
#[command(
    name = "slidefill",
    author = "iyulab",
    version,
    about = "Fill PPTX templates from JSON or CSV data",
    long_about = "slidefill - PowerPoint template filling tool.\n\n\
                  Replaces {{FIELD}} tokens in slide shapes with values from a data file.\n\
                  Records with a slide_index fill that slide; an image field replaces\n\
                  a shape containing {{IMAGE}} with the picture."
)]
struct Cli {
    /// Template presentation
    #[arg(long, value_name = "PATH")]
    pptx: PathBuf,

    /// JSON or CSV data file
    #[arg(long, value_name = "PATH")]
    data: PathBuf,

    /// Output presentation
    #[arg(long, value_name = "PATH", default_value = slidefill::options::DEFAULT_OUTPUT)]
    out: PathBuf,

    /// Copy the template to <PPTX>.bak unless that file exists
    #[arg(long)]
    backup: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Log debug details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = FillOptions::new(cli.pptx, cli.data)
        .with_output(cli.out)
        .with_backup(cli.backup);

    let pb = create_spinner("Filling presentation...");
    let result = fill_presentation(&options);
    pb.finish_and_clear();
    let summary = result?;
    tracing::info!(
        output = %summary.output.display(),
        mode = %summary.mode,
        lines = summary.report.len(),
        "fill finished"
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(summary: &FillSummary) {
    if let Some(BackupOutcome::Created(path)) = &summary.backup {
        println!("{} Backup created: {}", "✓".green().bold(), path.display());
    }
    println!(
        "{} Saved output: {}",
        "✓".green().bold(),
        summary.output.display()
    );
    println!();
    println!("{}", "Report:".cyan().bold());
    print!("{}", summary.report);
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
