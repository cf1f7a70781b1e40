//! One-shot migration tool: legacy binary level files to JSON.
//!
//! Scans a directory for `level{N}_data` files (two little-endian u32
//! dimensions followed by row-major u8 tile codes) and writes a
//! `level{N}.json` array-of-arrays next to each one. Existing JSON files are
//! not overwritten unless `--force` is given; the legacy files are left in
//! place either way.

use std::fs;
use std::path::{Path, PathBuf};

const MAX_DIM: u32 = 1024;

fn usage() -> String {
    "Usage: cargo run -p cart_levelconv -- <levels_dir> [--force]\nExample: cargo run -p cart_levelconv -- assets/levels".to_string()
}

fn main() -> Result<(), String> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        return Err(usage());
    }
    let levels_dir = PathBuf::from(&args[1]);
    let force = match args.get(2).map(String::as_str) {
        None => false,
        Some("--force") => true,
        Some(other) => return Err(format!("Unknown option '{other}'\n{}", usage())),
    };

    let mut legacy_files: Vec<(u32, PathBuf)> = fs::read_dir(&levels_dir)
        .map_err(|e| format!("Failed to read levels dir '{}': {e}", levels_dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter_map(|path| legacy_level_number(&path).map(|n| (n, path)))
        .collect();
    legacy_files.sort();

    if legacy_files.is_empty() {
        return Err(format!(
            "No level*_data files found in '{}'",
            levels_dir.display()
        ));
    }

    let mut converted = 0usize;
    for (level, path) in legacy_files {
        let json_path = levels_dir.join(format!("level{level}.json"));
        if json_path.exists() && !force {
            println!(
                "Skipping level {level}: {} already exists (use --force to overwrite)",
                json_path.display()
            );
            continue;
        }

        let bytes =
            fs::read(&path).map_err(|e| format!("Failed to read '{}': {e}", path.display()))?;
        let grid = parse_legacy(&bytes)
            .map_err(|e| format!("Failed to parse '{}': {e}", path.display()))?;
        let json = serde_json::to_string(&grid)
            .map_err(|e| format!("Failed to serialize level {level}: {e}"))?;
        fs::write(&json_path, json)
            .map_err(|e| format!("Failed to write '{}': {e}", json_path.display()))?;
        println!(
            "Converted {} -> {} ({}x{})",
            path.display(),
            json_path.display(),
            grid.len(),
            grid.first().map(Vec::len).unwrap_or(0)
        );
        converted += 1;
    }

    println!("Done: {converted} level(s) converted.");
    Ok(())
}

/// `level{N}_data` -> `N`, anything else -> `None`.
fn legacy_level_number(path: &Path) -> Option<u32> {
    let name = path.file_name()?.to_str()?;
    name.strip_prefix("level")?
        .strip_suffix("_data")?
        .parse()
        .ok()
}

fn parse_legacy(bytes: &[u8]) -> Result<Vec<Vec<u8>>, String> {
    if bytes.len() < 8 {
        return Err(format!("truncated header: {} bytes", bytes.len()));
    }
    let rows = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let cols = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if rows == 0 || cols == 0 || rows > MAX_DIM || cols > MAX_DIM {
        return Err(format!("implausible dimensions {rows}x{cols}"));
    }
    let expected = 8 + (rows as usize) * (cols as usize);
    if bytes.len() != expected {
        return Err(format!(
            "payload is {} bytes, expected {expected} for {rows}x{cols}",
            bytes.len()
        ));
    }
    Ok(bytes[8..]
        .chunks_exact(cols as usize)
        .map(|row| row.to_vec())
        .collect())
}
