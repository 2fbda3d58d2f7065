use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, bail, Context, Result};
use ensemble_engine::data::{write_ensemble_to_file, Ensemble};
use ensemble_engine::ingest::{assemble_ensemble, RecordColumns, ENSEMBLE_MEMBERS};
use log::{info, warn};
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct DatasetMetadata {
    source: String,
    sim_start: String,
    time_offset: i64,
    members: usize,
    lines: usize,
    points: usize,
    generated_at_epoch: u64,
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let usage = "usage: build_dataset <records.db> <sim_start YYYYMMDDHH> <time_offset hours>";
    let db_path = PathBuf::from(args.next().ok_or_else(|| anyhow!(usage))?);
    let sim_start = args.next().ok_or_else(|| anyhow!(usage))?;
    let time_offset: i64 = args
        .next()
        .ok_or_else(|| anyhow!(usage))?
        .parse()
        .context("time_offset must be an integer number of hours")?;
    if sim_start.len() != 10 || !sim_start.chars().all(|c| c.is_ascii_digit()) {
        bail!("sim_start must be YYYYMMDDHH, got {sim_start}");
    }

    let members = read_member_records(&db_path)
        .with_context(|| format!("failed to read records from {}", db_path.display()))?;
    if members.len() != ENSEMBLE_MEMBERS as usize {
        warn!(
            "expected {} ensemble members, found {}",
            ENSEMBLE_MEMBERS,
            members.len()
        );
    }

    let lines = assemble_ensemble(members.iter().map(|(m, cols)| (*m, cols)), time_offset)
        .context("failed to assemble lines")?;
    let ensemble = Ensemble {
        sim_start: sim_start.clone(),
        time_offset,
        lines,
    };

    let output_dir = PathBuf::from("data");
    fs::create_dir_all(&output_dir).context("failed to create data output directory")?;
    let dataset_path = output_dir.join("ensemble.bin");
    write_ensemble_to_file(&ensemble, &dataset_path)
        .with_context(|| format!("failed to write dataset to {}", dataset_path.display()))?;

    let metadata = DatasetMetadata {
        source: db_path.display().to_string(),
        sim_start,
        time_offset,
        members: members.len(),
        lines: ensemble.lines.len(),
        points: ensemble.lines.iter().map(|l| l.len()).sum(),
        generated_at_epoch: current_epoch_seconds(),
    };

    let metadata_path = output_dir.join("ensemble.meta.json");
    let metadata_json = serde_json::to_vec_pretty(&metadata)?;
    fs::write(&metadata_path, metadata_json)
        .with_context(|| format!("failed to write metadata to {}", metadata_path.display()))?;

    info!(
        "Wrote ensemble dataset to {} ({} members, {} lines, {} points)",
        dataset_path.display(),
        metadata.members,
        metadata.lines,
        metadata.points
    );

    Ok(())
}

/// Reads `records(member, line_id, date, latitude, longitude)` into one
/// column set per member, keeping row order within each member.
fn read_member_records(path: &Path) -> Result<BTreeMap<u32, RecordColumns>> {
    let conn = Connection::open(path)
        .with_context(|| format!("failed to open SQLite database at {}", path.display()))?;

    let mut stmt = conn.prepare(
        "SELECT member, line_id, date, latitude, longitude FROM records ORDER BY member, rowid",
    )?;
    let rows = stmt.query_map([], |row| {
        let member: i64 = row.get(0)?;
        let line_id: i64 = row.get(1)?;
        let date: i64 = row.get(2)?;
        let lat: f64 = row.get(3)?;
        let lon: f64 = row.get(4)?;
        Ok((member, line_id, date, lat, lon))
    })?;

    let mut members: BTreeMap<u32, RecordColumns> = BTreeMap::new();
    for row in rows {
        let (member, line_id, date, lat, lon) = row?;
        let Ok(member) = u32::try_from(member) else {
            warn!("skipping record with invalid member {member}");
            continue;
        };
        members.entry(member).or_default().push(line_id, date, lat, lon);
    }
    Ok(members)
}

fn current_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
