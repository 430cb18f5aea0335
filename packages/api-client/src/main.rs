// Command-line client for the sermon transcription API

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use api_client::{HttpJobsApi, JobsApi, PollOutcome, SermonAnalysis, StatusPoller};

#[derive(Parser)]
#[command(name = "sermonlens", about = "Submit sermon audio and fetch its analysis")]
struct Cli {
    /// Base URL of the transcription API
    #[arg(long, default_value = "http://localhost:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload an audio file and wait for the analysis
    Submit {
        /// Path to the audio file
        file: PathBuf,

        /// Print the job id and exit instead of waiting
        #[arg(long)]
        no_wait: bool,
    },
    /// Print a job's current status
    Status { job_id: Uuid },
    /// Wait for an existing job to finish and print its artifacts
    Watch { job_id: Uuid },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let api = Arc::new(HttpJobsApi::new(&cli.base_url));

    match cli.command {
        Command::Submit { file, no_wait } => {
            let audio = tokio::fs::read(&file)
                .await
                .with_context(|| format!("could not read {}", file.display()))?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "audio".to_string());

            let job_id = api.submit(&file_name, audio).await?;
            println!("job {job_id}");

            if !no_wait {
                watch(api, job_id).await?;
            }
        }
        Command::Status { job_id } => {
            let status = api.status(job_id).await?;
            println!("status:   {:?}", status.status);
            println!("progress: {}%", status.progress);
            if let Some(error) = status.error {
                println!("error:    {error}");
            }
        }
        Command::Watch { job_id } => {
            watch(api, job_id).await?;
        }
    }

    Ok(())
}

async fn watch(api: Arc<HttpJobsApi>, job_id: Uuid) -> Result<()> {
    let handle = StatusPoller::new(api).spawn(job_id);

    match handle.wait().await? {
        PollOutcome::Completed {
            transcript,
            analysis,
        } => {
            println!();
            println!("=== Transcript ===");
            println!("{}", transcript.text);
            println!();
            print_analysis(&analysis);
            Ok(())
        }
        PollOutcome::Failed { message } => Err(anyhow::anyhow!("job failed: {message}")),
        PollOutcome::Cancelled => Ok(()),
    }
}

fn print_analysis(analysis: &SermonAnalysis) {
    println!("=== Analysis ===");
    println!("{}", analysis.summary);

    if !analysis.key_points.is_empty() {
        println!();
        println!("Key points:");
        for point in &analysis.key_points {
            println!("  - {point}");
        }
    }

    if !analysis.biblical_references.is_empty() {
        println!();
        println!("Biblical references:");
        for r in &analysis.biblical_references {
            println!("  - {}: {}", r.reference, r.context);
        }
    }

    if !analysis.theological_themes.is_empty() {
        println!();
        println!("Themes:");
        for t in &analysis.theological_themes {
            println!("  - {}: {}", t.theme, t.explanation);
        }
    }

    if !analysis.application_points.is_empty() {
        println!();
        println!("Application:");
        for a in &analysis.application_points {
            println!("  - {} ({})", a.point, a.target_audience);
        }
    }

    if !analysis.suggested_resources.is_empty() {
        println!();
        println!("Suggested resources:");
        for s in &analysis.suggested_resources {
            println!("  - [{}] {}: {}", s.kind, s.title, s.description);
        }
    }
}
