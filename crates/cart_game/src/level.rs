//! Level grid loading.
//!
//! A level is a rectangular grid of tile codes (see [`crate::world`] for the
//! code table). Two on-disk forms exist:
//!
//!  - `level{N}.json` — a JSON array-of-arrays of small integers. This is
//!    the authored form going forward.
//!  - `level{N}_data` — the legacy flat binary form: two little-endian u32
//!    dimensions (rows, cols) followed by `rows * cols` row-major u8 codes.
//!    `cart_levelconv` migrates these to JSON.
//!
//! The frame loop must never fail over level content, so `load` always
//! returns a usable grid: JSON first, then legacy binary, then an empty
//! 20x20 fallback with a warning. Ragged JSON rows are padded with empty
//! cells to the widest row rather than rejected.

use std::fs;
use std::path::PathBuf;

pub const TILE_SIZE: i32 = 50;
/// Fallback grid dimension; the shipped playfield is 20x20 tiles.
pub const GRID_DIM: usize = 20;

/// Rows of tile codes, top to bottom. Always rectangular after loading.
pub type LevelGrid = Vec<Vec<u8>>;

pub struct LevelStore {
    dir: PathBuf,
}

impl LevelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Grid for `level`, or the empty fallback if nothing loadable exists.
    pub fn load(&self, level: u32) -> LevelGrid {
        let json_path = self.dir.join(format!("level{level}.json"));
        match fs::read_to_string(&json_path) {
            Ok(raw) => match parse_level_json(&raw) {
                Ok(grid) => return grid,
                Err(err) => {
                    log::warn!("Ignoring {}: {err}", json_path.display());
                }
            },
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => {
                log::warn!("Failed to read {}: {err}", json_path.display());
            }
            Err(_) => {}
        }

        let legacy_path = self.dir.join(format!("level{level}_data"));
        match fs::read(&legacy_path) {
            Ok(bytes) => match parse_level_legacy(&bytes) {
                Ok(grid) => return grid,
                Err(err) => {
                    log::warn!("Ignoring {}: {err}", legacy_path.display());
                }
            },
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => {
                log::warn!("Failed to read {}: {err}", legacy_path.display());
            }
            Err(_) => {}
        }

        log::warn!(
            "No level data found for level {level} in {}; using empty grid",
            self.dir.display()
        );
        empty_grid(GRID_DIM)
    }
}

pub fn empty_grid(dim: usize) -> LevelGrid {
    vec![vec![0; dim]; dim]
}

/// Parse the JSON array-of-arrays form. Codes outside u8 range become empty
/// cells; ragged rows are padded to the widest row.
pub fn parse_level_json(raw: &str) -> Result<LevelGrid, String> {
    let rows: Vec<Vec<i64>> =
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse level JSON: {e}"))?;
    if rows.is_empty() {
        return Err("Level JSON has no rows".to_string());
    }

    let mut grid: LevelGrid = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|&code| u8::try_from(code).unwrap_or(0))
                .collect()
        })
        .collect();
    pad_ragged_rows(&mut grid);
    Ok(grid)
}

/// Parse the legacy binary form: u32-LE rows, u32-LE cols, row-major codes.
pub fn parse_level_legacy(bytes: &[u8]) -> Result<LevelGrid, String> {
    const MAX_DIM: u32 = 1024;

    if bytes.len() < 8 {
        return Err(format!("Legacy level truncated: {} bytes", bytes.len()));
    }
    let rows = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let cols = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if rows == 0 || cols == 0 || rows > MAX_DIM || cols > MAX_DIM {
        return Err(format!("Legacy level has implausible dimensions {rows}x{cols}"));
    }
    let expected = 8 + (rows as usize) * (cols as usize);
    if bytes.len() != expected {
        return Err(format!(
            "Legacy level payload is {} bytes, expected {expected} for {rows}x{cols}",
            bytes.len()
        ));
    }

    let grid = bytes[8..]
        .chunks_exact(cols as usize)
        .map(|row| row.to_vec())
        .collect();
    Ok(grid)
}

fn pad_ragged_rows(grid: &mut LevelGrid) {
    let widest = grid.iter().map(Vec::len).max().unwrap_or(0);
    let ragged = grid.iter().any(|row| row.len() != widest);
    if ragged {
        log::warn!("Level grid has ragged rows; padding to {widest} columns");
        for row in grid.iter_mut() {
            row.resize(widest, 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "cart_level_test_{}_{}_{}",
            name_hint,
            std::process::id(),
            nanos
        ));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn json_level_parses() {
        let grid = parse_level_json("[[2, 0, 8], [1, 1, 1]]").expect("valid JSON level");
        assert_eq!(grid, vec![vec![2, 0, 8], vec![1, 1, 1]]);
    }

    #[test]
    fn ragged_json_rows_are_padded_with_empty() {
        let grid = parse_level_json("[[2, 2], [1], [1, 1, 1]]").expect("ragged JSON level");
        assert_eq!(grid, vec![vec![2, 2, 0], vec![1, 0, 0], vec![1, 1, 1]]);
    }

    #[test]
    fn out_of_range_codes_become_empty() {
        let grid = parse_level_json("[[-3, 999, 7]]").expect("level with bad codes");
        assert_eq!(grid, vec![vec![0, 0, 7]]);
    }

    #[test]
    fn legacy_binary_round_trips() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&3u32.to_le_bytes());
        bytes.extend_from_slice(&[2, 0, 8, 1, 1, 1]);
        let grid = parse_level_legacy(&bytes).expect("valid legacy level");
        assert_eq!(grid, vec![vec![2, 0, 8], vec![1, 1, 1]]);
    }

    #[test]
    fn legacy_binary_rejects_short_payload() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&3u32.to_le_bytes());
        bytes.extend_from_slice(&[2, 0]);
        let err = parse_level_legacy(&bytes).expect_err("short payload should fail");
        assert!(err.contains("expected"));
    }

    #[test]
    fn store_prefers_json_over_legacy() {
        let dir = temp_dir("prefers_json");
        fs::write(dir.join("level1.json"), "[[7]]").expect("write json level");
        let mut legacy = Vec::new();
        legacy.extend_from_slice(&1u32.to_le_bytes());
        legacy.extend_from_slice(&1u32.to_le_bytes());
        legacy.push(3);
        fs::write(dir.join("level1_data"), legacy).expect("write legacy level");

        let grid = LevelStore::new(&dir).load(1);
        assert_eq!(grid, vec![vec![7]]);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn store_falls_back_to_legacy_then_empty() {
        let dir = temp_dir("fallbacks");
        let mut legacy = Vec::new();
        legacy.extend_from_slice(&1u32.to_le_bytes());
        legacy.extend_from_slice(&2u32.to_le_bytes());
        legacy.extend_from_slice(&[2, 8]);
        fs::write(dir.join("level2_data"), legacy).expect("write legacy level");

        let store = LevelStore::new(&dir);
        assert_eq!(store.load(2), vec![vec![2, 8]]);

        let fallback = store.load(9);
        assert_eq!(fallback.len(), GRID_DIM);
        assert!(fallback.iter().all(|row| row.iter().all(|&c| c == 0)));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn corrupt_json_falls_through_to_fallback() {
        let dir = temp_dir("corrupt");
        fs::write(dir.join("level1.json"), "not json").expect("write corrupt level");
        let grid = LevelStore::new(&dir).load(1);
        assert_eq!(grid.len(), GRID_DIM);
        let _ = fs::remove_dir_all(dir);
    }
}
