//! stridecheck command-line interface.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use stridecheck_core::{extract_cases, CaseFile};
use stridecheck_runtime::{HttpAgentProvider, Runner, RunnerConfig, RunSummary};

#[derive(Parser)]
#[command(
    name = "stridecheck",
    version,
    about = "Evaluate recommendation-agent output against structured test cases"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the agent over the case set and score every output
    Run {
        /// Run only this case id instead of the whole set
        case_id: Option<u32>,

        /// Case file (JSON or YAML, by extension)
        #[arg(long, default_value = "cases.json")]
        cases: PathBuf,

        /// Directory for result files
        #[arg(long, default_value = "results")]
        results: PathBuf,

        /// Pause between agent invocations, e.g. "5s" or "500ms"
        #[arg(long, default_value = "5s")]
        delay: String,
    },

    /// Extract structured test cases from a free-form document
    Extract {
        /// Input text file
        input: PathBuf,

        /// Output case file (JSON)
        #[arg(short, long, default_value = "cases.json")]
        output: PathBuf,
    },
}

fn load_cases(path: &Path) -> Result<CaseFile> {
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );

    let file = if is_yaml {
        CaseFile::from_yaml_file(path)
    } else {
        CaseFile::from_json_file(path)
    };

    file.with_context(|| format!("failed to load case file {}", path.display()))
}

async fn cmd_run(
    case_id: Option<u32>,
    cases_path: &Path,
    results_dir: &Path,
    delay: &str,
) -> Result<()> {
    let case_file = load_cases(cases_path)?;
    tracing::info!(
        cases = case_file.cases.len(),
        file = %cases_path.display(),
        "loaded case set"
    );

    let provider = Arc::new(HttpAgentProvider::from_env()?);
    let config = RunnerConfig::default().with_delay_str(delay)?;
    let runner = Runner::new(provider, config);

    let reports = match case_id {
        Some(id) => vec![runner.run_one(&case_file.cases, id).await?],
        None => runner.run_all(&case_file.cases).await,
    };

    for report in &reports {
        let status = if report.error.is_some() {
            "ERROR"
        } else if report.verdict.hard_constraint_pass {
            "PASS"
        } else {
            "FAIL"
        };
        println!(
            "case {:>3} [{}] {} ({} matched, {} avoided)",
            report.case_id,
            report.category,
            status,
            report.verdict.matches.len(),
            report.verdict.correct_avoidance.len()
        );
        for violation in &report.verdict.violations {
            println!("         violation: {}", violation);
        }
        for note in &report.verdict.needs_verification {
            println!("         note: {}", note);
        }
    }

    let summary = RunSummary::from_reports(&reports);
    println!(
        "\n{} cases: {} passed hard constraints, {} matched references, {} need verification, {} errors",
        summary.total,
        summary.hard_constraint_passed,
        summary.reference_matched,
        summary.needs_verification,
        summary.invocation_errors
    );

    let path = Runner::persist(&reports, results_dir)?;
    println!("results written to {}", path.display());
    Ok(())
}

fn cmd_extract(input: &Path, output: &Path) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let description = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("extracted")
        .to_string();

    let case_file = extract_cases(&text, description);
    if case_file.cases.is_empty() {
        bail!("no cases found in {}", input.display());
    }

    std::fs::write(output, serde_json::to_string_pretty(&case_file)?)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "extracted {} cases to {}",
        case_file.cases.len(),
        output.display()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("stridecheck=info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            case_id,
            cases,
            results,
            delay,
        } => cmd_run(case_id, &cases, &results, &delay).await,
        Commands::Extract { input, output } => cmd_extract(&input, &output),
    }
}
