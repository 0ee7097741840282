use crate::cli::ConformersArgs;
use crate::commands::print_summary;
use crate::config::{DefaultsConfig, FileConfig};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use molscreen::{
    core::io::{
        notation::{MoleculeInput, read_notation_list},
        sdf::{SdfError, SdfRecord, SdfWriter},
    },
    engine::{outcome::SkippedEntity, progress::ProgressReporter},
    workflows,
};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{info, warn};

pub async fn run(args: ConformersArgs, quiet: bool) -> Result<()> {
    let inputs = read_inputs(&args)?;
    info!("Read {} molecule(s).", inputs.len());

    let file_config = FileConfig::load_optional(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let run = file_config.merge_conformers(&args, &DefaultsConfig::default())?;

    let progress_handler = if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the conformer workflow...");
    let report = tokio::task::block_in_place(|| {
        workflows::conformers::run(&inputs, &run.config, &reporter)
    });

    info!("Writing conformers to {:?}", &run.output);
    let (written, unwritable) = write_sdf(&run.output, report.written())?;

    let mut skipped: Vec<_> = report.skipped().cloned().collect();
    skipped.extend(unwritable);
    print_summary(written, &skipped);
    if written > 0 {
        println!("✓ Conformers written to: {}", run.output.display());
    }
    Ok(())
}

fn read_inputs(args: &ConformersArgs) -> Result<Vec<MoleculeInput>> {
    if let Some(smiles) = &args.smiles {
        return Ok(vec![MoleculeInput::new(
            MoleculeInput::default_name(1),
            smiles.as_str(),
        )]);
    }
    let Some(path) = &args.file else {
        return Err(CliError::MissingInput);
    };
    if !path.exists() {
        return Err(CliError::InputNotFound(path.clone()));
    }
    let file = File::open(path)?;
    read_notation_list(BufReader::new(file)).map_err(|e| CliError::FileParsing {
        path: path.clone(),
        source: e.into(),
    })
}

/// Writes one SD record per conformer. A record the format cannot hold is skipped with a
/// warning; only I/O failures abort the write.
fn write_sdf<'a>(
    path: &Path,
    conformers: impl Iterator<Item = &'a workflows::conformers::BestConformer>,
) -> Result<(usize, Vec<SkippedEntity>)> {
    let to_cli = |e: SdfError| CliError::FileWriting {
        path: path.to_path_buf(),
        source: e.into(),
    };

    let mut writer = SdfWriter::new(BufWriter::new(File::create(path)?));
    let mut skipped = Vec::new();
    for best in conformers {
        let record = SdfRecord {
            name: &best.name,
            notation: &best.notation,
            molecule: &best.molecule,
            conformer: &best.conformer,
        };
        match writer.write_record(&record) {
            Ok(()) => {}
            Err(e @ SdfError::Io(_)) => return Err(to_cli(e)),
            Err(e) => {
                warn!("Skipping '{}' in SD output: {}", best.name, e);
                skipped.push(SkippedEntity {
                    name: best.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
    writer.flush().map_err(to_cli)?;
    Ok((writer.records_written(), skipped))
}
