//! Snapshot files. The default container is the bincode encoding of a
//! [`SimSave`], compressed with lz4 and prefixed with its uncompressed size.
//! Files with a `.json` extension hold the same structure as plain JSON.

use crate::sim::SimSave;
use digforge_core::SaveError;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("Failed to encode: {0}")]
    Encode(bincode::Error),
    #[error("Failed to decode: {0}")]
    Decode(bincode::Error),
    #[error("Failed to decompress: {0}")]
    Decompress(#[from] lz4_flex::block::DecompressError),
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid snapshot: {0}")]
    Snapshot(#[from] SaveError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Compressed,
    Json,
}

impl SnapshotFormat {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SnapshotFormat::Json,
            _ => SnapshotFormat::Compressed,
        }
    }
}

pub fn encode(snapshot: &SimSave, format: SnapshotFormat) -> Result<Vec<u8>, ArchiveError> {
    match format {
        SnapshotFormat::Compressed => {
            let bytes = bincode::serialize(snapshot).map_err(ArchiveError::Encode)?;
            Ok(lz4_flex::compress_prepend_size(&bytes))
        }
        SnapshotFormat::Json => Ok(serde_json::to_vec(snapshot)?),
    }
}

pub fn decode(bytes: &[u8], format: SnapshotFormat) -> Result<SimSave, ArchiveError> {
    match format {
        SnapshotFormat::Compressed => {
            let decompressed = lz4_flex::decompress_size_prepended(bytes)?;
            bincode::deserialize(&decompressed).map_err(ArchiveError::Decode)
        }
        SnapshotFormat::Json => Ok(serde_json::from_slice(bytes)?),
    }
}

pub fn save(path: &Path, snapshot: &SimSave) -> Result<(), ArchiveError> {
    let format = SnapshotFormat::for_path(path);
    let bytes = encode(snapshot, format)?;

    let mut file = File::create(path)?;
    file.write_all(&bytes)?;
    file.flush()?;

    debug!(
        path = %path.display(),
        ?format,
        bytes = bytes.len(),
        blocks = snapshot.world.blocks.len(),
        diggers = snapshot.diggers.len(),
        "saved snapshot"
    );
    Ok(())
}

pub fn load(path: &Path) -> Result<SimSave, ArchiveError> {
    let format = SnapshotFormat::for_path(path);

    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;
    let snapshot = decode(&bytes, format)?;

    debug!(
        path = %path.display(),
        ?format,
        blocks = snapshot.world.blocks.len(),
        diggers = snapshot.diggers.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}
