use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use ingress_reconciler::config::{load_config, OperatorConfig, ParseFailurePolicy};
use ingress_reconciler::reconcile::render;
use ingress_reconciler::store::SourceResource;

#[derive(Parser)]
#[command(name = "ingress-reconciler-cli")]
#[command(about = "Inspection and dry-run CLI for the ingress reconciler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the last reconciliation pass of a running operator
    Status {
        #[arg(short, long, default_value = "http://localhost:8081")]
        url: String,
    },
    /// Render Ingresses from annotation payload files without touching a cluster
    Render {
        /// One routing annotation payload (YAML) per file
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Operator configuration supplying annotation keys and parse policy
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Skip malformed payloads instead of failing
        #[arg(long)]
        skip_malformed: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status { url } => {
            let res = reqwest::get(format!("{}/status", url)).await?;
            print_response(res).await?;
        }
        Commands::Render { files, config, skip_malformed } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => OperatorConfig::default(),
            };
            let policy = if skip_malformed {
                ParseFailurePolicy::Skip
            } else {
                config.reconcile.on_parse_error
            };

            let mut sources = Vec::with_capacity(files.len());
            for file in &files {
                let raw = fs::read_to_string(file)?;
                let name = file
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file.display().to_string());
                let mut annotations = std::collections::BTreeMap::new();
                annotations.insert(config.annotations.config_key.clone(), raw);
                sources.push(SourceResource { name, annotations });
            }

            let rendered = render(&sources, &config.annotations, policy)?;
            println!("{}", serde_json::to_string_pretty(&rendered)?);
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: admin endpoint returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
