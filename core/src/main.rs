use clap::Parser;
use dicom::object::open_file;
use log::{error, info};
use privtag_core::cli::{Cli, OutputFormat};
use privtag_core::{PrivateTagPipeline, TextReport};
use std::process;

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    info!("Processing file: {}", cli.file.display());

    let dcm = match open_file(&cli.file) {
        Ok(obj) => obj,
        Err(e) => {
            error!("Failed to read DICOM file: {}", e);
            eprintln!("Error: Failed to read {}: {}", cli.file.display(), e);
            process::exit(1);
        }
    };

    let pipeline = PrivateTagPipeline::new();
    let (context, summary) = pipeline.process_dicom(&dcm);

    info!(
        "Extracted {} private tag record(s)",
        summary.records.len()
    );

    match cli.format {
        OutputFormat::Text => {
            println!("{}", TextReport::new(&context, &summary));
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match output_json(&context, &summary) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("Failed to serialize to JSON: {}", e);
                        eprintln!("Error: Failed to serialize to JSON: {}", e);
                        process::exit(1);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                process::exit(1);
            }
        }
    }
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Warn)
            .init();
    }
}

#[cfg(feature = "json")]
fn output_json(
    context: &privtag_core::ImageContext,
    summary: &privtag_core::ImageSummary,
) -> Result<String, serde_json::Error> {
    use serde::Serialize;

    #[derive(Serialize)]
    struct SummaryJson<'a> {
        context: &'a privtag_core::ImageContext,
        summary: &'a privtag_core::ImageSummary,
    }

    serde_json::to_string_pretty(&SummaryJson { context, summary })
}
