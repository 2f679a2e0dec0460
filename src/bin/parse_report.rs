//! Run the lab report pipeline from the command line
//!
//! Usage:
//!   cargo run --bin parse_report -- --text report.txt --pretty
//!   cargo run --bin parse_report -- --image report.png
//!
//! Prints the same `{"is_success": ..., "data": [...]}` envelope the HTTP
//! endpoint returns.

use anyhow::Result;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use labreport::{
    commands::parse_report::{parse_image_file, parse_text_file, render_json},
    config::Config,
};

#[derive(Parser)]
#[command(name = "parse_report")]
#[command(about = "Extract lab tests from a report image or its OCR text")]
#[command(group(ArgGroup::new("input").required(true).args(["text", "image"])))]
struct Args {
    /// Text file containing OCR output; skips text recognition
    #[arg(short, long)]
    text: Option<PathBuf>,

    /// PNG or JPEG report image to recognize with Tesseract
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Indent the JSON output
    #[arg(short, long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays pure JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let parser = config.parser()?;

    let response = match (args.text, args.image) {
        (Some(text_path), _) => parse_text_file(&text_path, &parser)?,
        (None, Some(image_path)) => parse_image_file(&image_path, config.ocr, &parser).await?,
        (None, None) => unreachable!("clap requires one of --text or --image"),
    };

    println!("{}", render_json(&response, args.pretty)?);
    Ok(())
}
