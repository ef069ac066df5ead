//! Snapshot persistence
//!
//! Writes island and archipelago snapshots to disk as JSON or as versioned
//! bincode, and reads them back.

use serde::{de::DeserializeOwned, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use super::state::SNAPSHOT_VERSION;
use crate::error::SnapshotError;

const BINARY_MAGIC: &[u8; 4] = b"EVAR";

/// Format for snapshot serialization
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// JSON format (human-readable, larger)
    Json,
    /// Version header, magic bytes, then bincode
    #[default]
    Binary,
}

/// Save a snapshot to a file
pub fn save_snapshot<T: Serialize>(
    snapshot: &T,
    path: impl AsRef<Path>,
    format: SnapshotFormat,
) -> Result<(), SnapshotError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);

    match format {
        SnapshotFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, snapshot)
                .map_err(|e| SnapshotError::Serialization(e.to_string()))?;
        }
        SnapshotFormat::Binary => {
            writer.write_all(&SNAPSHOT_VERSION.to_le_bytes())?;
            writer.write_all(BINARY_MAGIC)?;
            bincode::serialize_into(&mut writer, snapshot)
                .map_err(|e| SnapshotError::Serialization(e.to_string()))?;
        }
    }

    writer.flush()?;
    tracing::debug!(path = %path.display(), ?format, "snapshot saved");
    Ok(())
}

/// Load a snapshot, detecting the format from its header
pub fn load_snapshot<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, SnapshotError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SnapshotError::NotFound(path.display().to_string()));
    }

    let mut bytes = Vec::new();
    BufReader::new(File::open(path)?).read_to_end(&mut bytes)?;

    if bytes.len() >= 8 && &bytes[4..8] == BINARY_MAGIC {
        let version = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if version > SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                found: version,
            });
        }
        bincode::deserialize(&bytes[8..]).map_err(|e| SnapshotError::Deserialization(e.to_string()))
    } else {
        serde_json::from_slice(&bytes).map_err(|e| SnapshotError::Deserialization(e.to_string()))
    }
}
