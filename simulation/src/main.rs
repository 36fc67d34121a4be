mod iteration;
mod log;
mod paramset;
mod settings;

use std::{
    error::Error,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use chrono::Utc;
use clap::Parser;
use iteration::Iteration;
use paramset::{ExperimentId, ParamSet, PARAMSET_CSV_COLUMNS};
use rayon::prelude::*;
use settings::GameSettings;

#[derive(Debug, Parser)]
#[command(name = "Lottery Simulation")]
struct Args {
    #[arg(short, long)]
    exp_id: ExperimentId,
    /// Json file path, on `GameSettings` format
    #[arg(short, long)]
    game_settings: PathBuf,
    #[arg(short, long)]
    outdir: String,
    #[arg(short, long)]
    num_threads: usize,
    #[arg(short, long)]
    from_paramset: Option<u16>,
    #[arg(short, long)]
    to_paramset: Option<u16>,
    #[arg(long, default_value = "plain")]
    log_format: log::LogFormat,
    #[arg(long, default_value = "stdout")]
    log_to: log::LogOutput,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let guard = log::config_tracing(args.log_format, &args.log_to)?;
    tracing::info!("Arguments: {:?}", args);

    if let Err(e) = run(args) {
        tracing::error!("error: {}", e);
        drop(guard);
        std::process::exit(1);
    }
    Ok(())
}

fn run(args: Args) -> anyhow::Result<()> {
    let Args {
        exp_id,
        game_settings,
        outdir,
        num_threads,
        from_paramset,
        to_paramset,
        log_format: _,
        log_to: _,
    } = args;

    let game = GameSettings::load(&game_settings)?;

    // Create a session directory to be renamed once all iterations are done
    anyhow::ensure!(
        Path::new(&outdir).is_dir(),
        "Output directory does not exist: {outdir}"
    );
    let subdir = format!(
        "__WIP__lottery_e{}_{}___DUR__",
        exp_id as u8,
        Utc::now().to_rfc3339()
    );
    std::fs::create_dir_all(format!("{outdir}/{subdir}"))?;

    let paramsets = ParamSet::new_all_paramsets(exp_id);

    let session_start_time = SystemTime::now();

    let mut iterations: Vec<Iteration> = Vec::new();
    for paramset in paramsets {
        if paramset.id < from_paramset.unwrap_or(0) {
            tracing::info!("ParamSet:{} skipped", paramset.id);
            continue;
        } else if paramset.id > to_paramset.unwrap_or(u16::MAX) {
            tracing::info!("ParamSets:{}~ skipped", paramset.id);
            break;
        }

        let paramset_dir = format!("{outdir}/{subdir}/paramset_{}", paramset.id);
        std::fs::create_dir_all(paramset_dir.as_str())?;
        save_paramset_info(&paramset, format!("{paramset_dir}/paramset.csv").as_str())
            .map_err(|e| anyhow::anyhow!("Failed to save paramset {}: {e}", paramset.id))?;

        for i in 0..paramset.num_iterations {
            iterations.push(Iteration {
                paramset: paramset.clone(),
                game: game.clone(),
                iteration_idx: i,
                paramset_dir: paramset_dir.clone(),
            });
        }
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()?;

    pool.install(|| {
        iterations
            .par_iter_mut()
            .try_for_each(|iteration| iteration.start())
    })?;

    let session_duration = SystemTime::now().duration_since(session_start_time)?;

    // Replace "__WIP__" and "__DUR__" in the subdir string
    let new_subdir = subdir
        .replace("__WIP__", "")
        .replace("__DUR__", &format_duration(session_duration));
    let old_path = format!("{}/{}", outdir, subdir);
    let new_path = format!("{}/{}", outdir, new_subdir);
    anyhow::ensure!(
        !Path::new(&new_path).exists(),
        "The new directory already exists: {new_path}"
    );
    std::fs::rename(&old_path, &new_path)?;

    tracing::info!("Session completed.");
    Ok(())
}

fn save_paramset_info(paramset: &ParamSet, path: &str) -> Result<(), Box<dyn Error>> {
    // Assert that the file does not already exist
    assert!(
        !Path::new(path).exists(),
        "File already exists at path: {path}",
    );

    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(PARAMSET_CSV_COLUMNS)?;
    wtr.write_record(paramset.as_csv_record())?;
    wtr.flush()?;

    Ok(())
}

pub(crate) fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d{}h{}m{}s", days, hours, minutes, seconds)
}
