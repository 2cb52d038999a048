use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};

use super::MazeGrid;

pub const MAZE_SNAPSHOT_VERSION: u32 = 1;

/// On-disk maze snapshot: the cell array plus declared exits, versioned.
/// A tooling surface over maze data, not session persistence.
#[derive(Serialize, Deserialize)]
pub struct MazeData {
    pub version: u32,
    pub grid: MazeGrid,
}

pub fn save_maze(path: &str, data: &MazeData) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let mut encoder = ZlibEncoder::new(writer, Compression::default());
    bincode::serialize_into(&mut encoder, data)?;
    encoder.finish()?;
    Ok(())
}

pub fn load_maze(path: &str) -> Result<MazeData, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut decoder = ZlibDecoder::new(reader);
    let data: MazeData = bincode::deserialize_from(&mut decoder)?;
    if data.version != MAZE_SNAPSHOT_VERSION {
        return Err(format!(
            "unsupported maze snapshot version {} (expected {})",
            data.version, MAZE_SNAPSHOT_VERSION
        )
        .into());
    }
    Ok(data)
}
