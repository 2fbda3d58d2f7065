use std::collections::HashSet;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use bincode::ErrorKind;
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::Line;

/// Ensemble bundles are written once and read on every cold start, so they
/// are compressed hard.
const ENSEMBLE_COMPRESSION_LEVEL: i32 = 19;

/// All lines of an ensemble at one time offset of one simulation run.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Ensemble {
    /// Simulation start as `YYYYMMDDHH`.
    pub sim_start: String,
    /// Hours since `sim_start`.
    pub time_offset: i64,
    pub lines: Vec<Line>,
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] Box<ErrorKind>),
    #[error("Compression error: {0}")]
    Compression(#[source] std::io::Error),
    #[error("duplicate line id {0}")]
    DuplicateLineId(String),
}

impl Ensemble {
    pub fn line(&self, id: &str) -> Option<&Line> {
        self.lines.iter().find(|l| l.id() == id)
    }

    /// Lines of one member, selected by the `"{member}|"` id prefix.
    pub fn member_lines(&self, member: u32) -> impl Iterator<Item = &Line> + '_ {
        let prefix = format!("{member}|");
        self.lines.iter().filter(move |l| l.id().starts_with(&prefix))
    }

    fn check_unique_ids(&self) -> Result<(), DataError> {
        let mut seen = HashSet::with_capacity(self.lines.len());
        for line in &self.lines {
            if !seen.insert(line.id()) {
                return Err(DataError::DuplicateLineId(line.id().to_string()));
            }
        }
        Ok(())
    }
}

pub fn serialize_ensemble(ensemble: &Ensemble) -> Result<Vec<u8>, DataError> {
    let encoded = bincode::serialize(ensemble)?;
    let mut cursor = Cursor::new(encoded);
    zstd::stream::encode_all(&mut cursor, ENSEMBLE_COMPRESSION_LEVEL)
        .map_err(DataError::Compression)
}

pub fn deserialize_ensemble(bytes: &[u8]) -> Result<Ensemble, DataError> {
    let mut cursor = Cursor::new(bytes);
    let decoded = zstd::stream::decode_all(&mut cursor).map_err(DataError::Compression)?;
    let ensemble: Ensemble = bincode::deserialize(&decoded)?;
    ensemble.check_unique_ids()?;
    Ok(ensemble)
}

pub fn write_ensemble_to_file<P: AsRef<Path>>(ensemble: &Ensemble, path: P) -> Result<(), DataError> {
    let bytes = serialize_ensemble(ensemble)?;
    fs::write(&path, &bytes)?;
    info!(
        "wrote {} lines ({} bytes) to {}",
        ensemble.lines.len(),
        bytes.len(),
        path.as_ref().display()
    );
    Ok(())
}

pub fn read_ensemble_from_file<P: AsRef<Path>>(path: P) -> Result<Ensemble, DataError> {
    let bytes = fs::read(&path)?;
    let ensemble = deserialize_ensemble(&bytes)?;
    info!(
        "loaded {} lines for {}+{}h from {}",
        ensemble.lines.len(),
        ensemble.sim_start,
        ensemble.time_offset,
        path.as_ref().display()
    );
    Ok(ensemble)
}
