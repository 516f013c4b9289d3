//! # Labsmith CLI
//!
//! Reads an experiment description, asks the model to analyze it and to write
//! a solution, then saves the solution and its code blocks to disk.
//!
//! Usage:
//!   labsmith <INPUT_FILE> [-o DIR] [-k KEY] [--model M] [--base-url URL] [-v]
//!
//! Examples:
//!   labsmith lab1.txt
//!   labsmith -o out/lab2 -v lab2.docx
//!   DEEPSEEK_MODEL=deepseek-chat labsmith lab3.md

mod telemetry;

use clap::Parser;
use labsmith_core::{
    read_requirement, save, Analyzer, ChatClient, ClientConfig, ConfigOverrides, Generator, Result,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use telemetry::Telemetry;
use tracing::{error, info};

/// Root for output directories when none is given
const DEFAULT_OUTPUT_ROOT: &str = "experiment_output";

#[derive(Parser, Debug)]
#[command(name = "labsmith")]
#[command(author, version, about = "Labsmith - analyze experiment requirements and generate a solution")]
struct Cli {
    /// Experiment description (plain text, or a .docx Word document)
    #[arg(value_parser = existing_file)]
    input_file: PathBuf,

    /// Output directory [default: experiment_output/<input file name>]
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// DeepSeek API key (can also be set with DEEPSEEK_API_KEY)
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Model identifier (overrides DEEPSEEK_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// API base URL (overrides DEEPSEEK_API_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Show detailed logs
    #[arg(short, long)]
    verbose: bool,
}

fn existing_file(value: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("file '{}' does not exist", value))
    }
}

fn default_output_dir(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("experiment");
    Path::new(DEFAULT_OUTPUT_ROOT).join(stem)
}

async fn run(cli: Cli) -> Result<()> {
    let output_dir = cli
        .output_dir
        .unwrap_or_else(|| default_output_dir(&cli.input_file));

    let config = ClientConfig::resolve(ConfigOverrides {
        api_key: cli.api_key,
        base_url: cli.base_url,
        model: cli.model,
    })?;
    info!(?config, output_dir = %output_dir.display(), "configuration resolved");

    println!("Processing experiment requirements: {}", cli.input_file.display());
    let experiment_text = read_requirement(&cli.input_file)?;
    println!(
        "Extracted requirements ({} characters)",
        experiment_text.chars().count()
    );

    let client = ChatClient::new(config)?;
    info!(model = client.model(), "chat client ready");

    let analysis = Analyzer::new(&client).analyze(&experiment_text).await?;
    println!("Analysis complete: {}", analysis.experiment_type);

    let solution = Generator::new(&client)
        .generate(&analysis, &experiment_text)
        .await?;
    println!("Solution generated");

    let saved = save(&solution, &output_dir, &analysis.experiment_type)?;

    println!("\nSolution written to: {}", saved.document.display());
    if !saved.sources.is_empty() {
        println!("Source files: {}", saved.sources.len());
        for path in &saved.sources {
            println!("  - {}", path.display());
        }
    }
    println!("Experiment type: {}", analysis.experiment_type);
    println!("Experiment goal: {}", analysis.main_goal);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let telemetry = match Telemetry::init(Path::new("."), cli.verbose) {
        Ok(telemetry) => telemetry,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let code = match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("processing failed: {:?}", e);
            eprintln!("\nError: {}", e);
            ExitCode::FAILURE
        }
    };

    telemetry.finish();
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use labsmith_core::ErrorKind;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn completion(content: &str) -> serde_json::Value {
        json!({
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
    }

    fn cli_for(input: &Path, output: &Path, server: &MockServer) -> Cli {
        let uri = server.uri();
        Cli::try_parse_from([
            "labsmith",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-k",
            "sk-test",
            "--base-url",
            uri.as_str(),
        ])
        .unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("lab1.txt");
        fs::write(&input, "Implement quicksort.").unwrap();

        let cli = Cli::try_parse_from([
            "labsmith",
            input.to_str().unwrap(),
            "-o",
            "out",
            "-k",
            "sk-flag",
            "--model",
            "deepseek-chat",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.input_file, input);
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        assert_eq!(cli.api_key.as_deref(), Some("sk-flag"));
        assert_eq!(cli.model.as_deref(), Some("deepseek-chat"));
        assert_eq!(cli.base_url, None);
        assert!(cli.verbose);
    }

    #[test]
    fn test_missing_input_is_rejected() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        assert!(Cli::try_parse_from(["labsmith", missing.to_str().unwrap()]).is_err());
        assert!(Cli::try_parse_from(["labsmith"]).is_err());
    }

    #[test]
    fn test_default_output_dir() {
        assert_eq!(
            default_output_dir(Path::new("reqs/lab2.docx")),
            PathBuf::from("experiment_output/lab2")
        );
        assert_eq!(
            default_output_dir(Path::new("实验三.txt")),
            PathBuf::from("experiment_output/实验三")
        );
    }

    #[tokio::test]
    async fn test_run_writes_solution() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({ "max_tokens": 2000 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(
                r#"{"experiment_type": "sorting", "main_goal": "sort numbers", "key_requirements": ["use quicksort"], "programming_language": "Python"}"#,
            )))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({ "max_tokens": 4000 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(
                "## Solution\n\n```python\nprint(sorted([3, 1, 2]))\n```\n",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let input = dir.path().join("lab1.txt");
        fs::write(&input, "Implement quicksort.").unwrap();
        let out = dir.path().join("out");

        run(cli_for(&input, &out, &server)).await.unwrap();

        let document = fs::read_to_string(out.join("solution.md")).unwrap();
        assert!(document.starts_with("## Solution"));
        assert_eq!(
            fs::read_to_string(out.join("src").join("main.py")).unwrap(),
            "print(sorted([3, 1, 2]))"
        );
    }

    #[tokio::test]
    async fn test_run_stops_on_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let input = dir.path().join("lab1.txt");
        fs::write(&input, "Implement quicksort.").unwrap();
        let out = dir.path().join("out");

        let err = run(cli_for(&input, &out, &server)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ApiFailed);
        assert!(!out.exists());
    }
}
