use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;

use vidbrief_core::{AcquisitionPath, Pipeline, PipelineConfig, Stage, SummaryStyle, render_summary_pdf};

/// CLI wrapper for SummaryStyle (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliStyle {
    #[default]
    Bullets,
    Insights,
}

impl From<CliStyle> for SummaryStyle {
    fn from(cli: CliStyle) -> Self {
        match cli {
            CliStyle::Bullets => SummaryStyle::Bullets,
            CliStyle::Insights => SummaryStyle::Insights,
        }
    }
}

#[derive(Parser)]
#[command(name = "vidbrief")]
#[command(about = "Summarize a YouTube video or local video file with Gemini")]
struct Cli {
    /// YouTube URL or path to a local video file
    source: String,

    /// Summary style
    #[arg(short, long, default_value = "bullets")]
    style: CliStyle,

    /// Gemini model id
    #[arg(short, long)]
    model: Option<String>,

    /// Preferred caption languages (comma-separated)
    #[arg(short, long, default_value = "en")]
    languages: String,

    /// Write the summary as a PDF to this path
    #[arg(short, long)]
    pdf: Option<PathBuf>,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn stage_message(stage: Stage) -> &'static str {
    match stage {
        Stage::Classifying => "Classifying input...",
        Stage::AcquiringTranscript => "Fetching transcript...",
        Stage::Downloading => "No transcript, downloading video...",
        Stage::Uploading => "Uploading video...",
        Stage::Polling => "Waiting for video to become ready...",
        Stage::Summarizing => "Generating summary...",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Validate API key early
    let config = match PipelineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };
    let languages: Vec<String> = cli
        .languages
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    let mut config = config.with_style(cli.style.into()).with_languages(languages);
    if let Some(model) = cli.model {
        config = config.with_model(model);
    }

    println!(
        "\n{}  {}\n",
        style("vidbrief").cyan().bold(),
        style("Video Summarizer").dim()
    );

    let pipeline = Pipeline::new(config)?;

    let spinner = create_spinner(stage_message(Stage::Classifying));
    let summary = pipeline
        .run_with_progress(&cli.source, |stage| {
            spinner.set_message(stage_message(stage));
        })
        .await?;

    let path_label = match summary.path {
        AcquisitionPath::Captions => "via captions",
        AcquisitionPath::VideoUpload => "via video upload",
    };
    spinner.finish_with_message(format!(
        "{} Summary generated {}",
        style("✓").green().bold(),
        style(path_label).dim()
    ));

    println!("\n{}", style("─".repeat(60)).dim());
    println!("{}\n", summary.text);

    if let Some(pdf_path) = cli.pdf {
        let bytes = render_summary_pdf(&summary.text)?;
        fs::write(&pdf_path, bytes).await?;
        println!(
            "{} {}",
            style("Saved:").dim(),
            style(pdf_path.display()).cyan()
        );
    }

    Ok(())
}
