use crate::cli::ClassifyArgs;
use crate::commands::print_summary;
use crate::config::{DefaultsConfig, FileConfig};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use molscreen::core::io::tables::write_predictions;
use molscreen::{engine::progress::ProgressReporter, workflows};
use std::fs::File;
use std::io::BufWriter;
use tracing::info;

pub async fn run(args: ClassifyArgs, quiet: bool) -> Result<()> {
    if !args.input.exists() {
        return Err(CliError::InputNotFound(args.input.clone()));
    }

    let file_config = FileConfig::load_optional(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let run = file_config.merge_classify(&args, &DefaultsConfig::default())?;

    let progress_handler = if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!(
        "Invoking the classification workflow with {} model slot(s)...",
        run.config.slots.len()
    );
    let report = tokio::task::block_in_place(|| {
        workflows::classify::run(&args.input, &run.config, &reporter)
    })?;

    info!("Writing predictions to {:?}", &run.output);
    let labels = &run.config.labels;
    let rows = report
        .classifications
        .iter()
        .map(|c| (c.name.as_str(), labels.name(c.label)));
    write_predictions(BufWriter::new(File::create(&run.output)?), rows).map_err(|e| {
        CliError::FileWriting {
            path: run.output.clone(),
            source: e.into(),
        }
    })?;

    print_summary(report.classifications.len(), &report.skipped);
    println!("✓ Predictions written to: {}", run.output.display());
    Ok(())
}
