use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PrepError, Result};

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
            label
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

/// Create a directory (and its parents) unless it already exists
pub fn ensure_directory(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        debug!("Creating directory {}", path.display());
    }
    fs::create_dir_all(path).map_err(|e| PrepError::io(path, e))?;
    Ok(path.to_path_buf())
}

/// Drop the last extension of a file name, keeping any directory part.
///
/// Leading dots do not start an extension: `.hidden` stays `.hidden`.
pub fn strip_extension(file_name: &str) -> &str {
    let base_start = file_name.rfind(['/', '\\']).map_or(0, |i| i + 1);
    let base = &file_name[base_start..];
    match base.rfind('.') {
        Some(dot) if !base[..dot].trim_start_matches('.').is_empty() => {
            &file_name[..base_start + dot]
        }
        _ => file_name,
    }
}

/// Final path component of a file name as written in an annotation file
pub fn base_name(file_name: &str) -> &str {
    file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("52701_1_4.jpg"), "52701_1_4");
        assert_eq!(strip_extension("archive.tar.gz"), "archive.tar");
        assert_eq!(strip_extension("noext"), "noext");
        assert_eq!(strip_extension(".hidden"), ".hidden");
        assert_eq!(strip_extension("dir.v2/frame_1"), "dir.v2/frame_1");
        assert_eq!(strip_extension("dir/frame_1.png"), "dir/frame_1");
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("a.jpg"), "a.jpg");
        assert_eq!(base_name("sub/dir/a.jpg"), "a.jpg");
        assert_eq!(base_name("sub\\a.jpg"), "a.jpg");
    }

    #[test]
    fn test_ensure_directory_is_idempotent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("a/b");
        ensure_directory(&nested).unwrap();
        std::fs::write(nested.join("keep.txt"), "x").unwrap();
        ensure_directory(&nested).unwrap();
        assert!(nested.join("keep.txt").exists());
    }
}
