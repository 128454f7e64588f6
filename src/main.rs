use clap::{Parser, ValueEnum};
use dossier::{to_base64, CoverLetterRequest, CvRequest, DocumentRenderer, EngineConfig, Error};
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DocumentKind {
    Cv,
    CoverLetter,
}

/// Renders a CV or cover letter from JSON on stdin and prints the PDF as base64.
///
/// Empty input renders the built-in sample document.
#[derive(Debug, Parser)]
#[command(name = "dossier", version)]
struct Cli {
    #[arg(value_enum)]
    kind: DocumentKind,

    /// Portrait image for the CV header (URL, path or data URI).
    #[arg(long)]
    portrait_url: Option<String>,

    /// Signature image placed above the name in a cover letter.
    #[arg(long)]
    signature_url: Option<String>,

    /// Footer date shown verbatim instead of today's date.
    #[arg(long)]
    creation_date: Option<String>,

    /// Write the raw PDF to this file instead of base64 to stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn read_input() -> Result<Option<Value>, Error> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    if input.trim().is_empty() {
        return Ok(None);
    }
    let value = serde_json::from_str(&input).map_err(dossier::InvalidPayloadError::from)?;
    Ok(Some(value))
}

async fn run(cli: Cli) -> Result<(), Error> {
    let input = read_input()?;
    let renderer = DocumentRenderer::from_config(&EngineConfig::from_env())?;

    let pdf = match cli.kind {
        DocumentKind::Cv => {
            let mut request = match input {
                Some(value) => CvRequest::from_value(value)?,
                None => CvRequest::sample(),
            };
            if cli.portrait_url.is_some() {
                request.portrait_url = cli.portrait_url;
            }
            if cli.creation_date.is_some() {
                request.creation_date = cli.creation_date;
            }
            renderer.render_cv(&request).await?
        }
        DocumentKind::CoverLetter => {
            let mut request = match input {
                Some(value) => CoverLetterRequest::from_value(value)?,
                None => CoverLetterRequest::sample(),
            };
            if cli.signature_url.is_some() {
                request.signature_url = cli.signature_url;
            }
            renderer.render_cover_letter(&request).await?
        }
    };

    match cli.output {
        Some(path) => {
            tokio::fs::write(&path, &pdf).await?;
            log::info!("Wrote {} bytes to {}", pdf.len(), path.display());
        }
        None => println!("{}", to_base64(&pdf)),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
