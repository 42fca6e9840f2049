use glob::{glob, Pattern};
use jwalk::WalkDir;
use log::debug;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::coco::CocoFile;
use crate::error::{PrepError, Result};

/// Read and parse a COCO annotation file, streaming from a buffered reader
pub fn read_coco_file(path: &Path) -> Result<CocoFile> {
    let file = File::open(path).map_err(|e| PrepError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| PrepError::json(path, e))
}

/// Write a COCO annotation file as compact JSON
pub fn write_coco_file(path: &Path, coco: &CocoFile) -> Result<()> {
    let file = File::create(path).map_err(|e| PrepError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, coco).map_err(|e| PrepError::json(path, e))?;
    writer.flush().map_err(|e| PrepError::io(path, e))
}

/// List the regular files directly inside `dir` with the given extension, sorted by path
pub fn list_files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PrepError::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        ));
    }
    let pattern = format!(
        "{}/*.{}",
        Pattern::escape(&dir.to_string_lossy()),
        extension
    );
    let mut files: Vec<PathBuf> = glob(&pattern)
        .map_err(|e| PrepError::Config(format!("invalid glob pattern {}: {}", pattern, e)))?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    debug!("Found {} .{} files in {}", files.len(), extension, dir.display());
    Ok(files)
}

/// Recursively collect every regular file under `root`, in sorted walk order
pub fn walk_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort(true)
        .skip_hidden(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path())
        .collect()
}

/// Copy a file, attaching the source path to any error
pub fn copy_file(source: &Path, destination: &Path) -> Result<()> {
    fs::copy(source, destination)
        .map(|_| ())
        .map_err(|e| PrepError::io(source, e))
}

/// Write a list of names, one per line
pub fn write_name_list(path: &Path, names: &[String]) -> Result<()> {
    let file = File::create(path).map_err(|e| PrepError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for name in names {
        writeln!(writer, "{}", name).map_err(|e| PrepError::io(path, e))?;
    }
    writer.flush().map_err(|e| PrepError::io(path, e))
}
