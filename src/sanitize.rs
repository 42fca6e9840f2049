use log::{debug, info, warn};
use rayon::prelude::*;
use std::fs;
use std::path::Path;

use crate::config::SanitizeOptions;
use crate::error::{PrepError, Result};
use crate::io::list_files_with_extension;
use crate::types::SanitizeStats;
use crate::utils::create_progress_bar;
use crate::yolo::{sanitize_line, DropReason, LineOutcome};

/// Sanitize every `.txt` label file directly inside `labels_dir`, in parallel
pub fn sanitize_label_dir(labels_dir: &Path, options: &SanitizeOptions) -> Result<SanitizeStats> {
    let label_files = list_files_with_extension(labels_dir, "txt")?;
    info!(
        "Sanitizing {} label files in {}",
        label_files.len(),
        labels_dir.display()
    );

    let pb = create_progress_bar(label_files.len() as u64, "Labels");
    let stats = label_files
        .par_iter()
        .map(|path| {
            let stats = sanitize_label_file(path, options);
            pb.inc(1);
            stats
        })
        .try_reduce(SanitizeStats::default, |a, b| Ok(a.merge(b)))?;
    pb.finish_with_message("Label sanitizing complete");

    info!("Annotation cleaning and validation completed!");
    Ok(stats)
}

/// Sanitize one label file in place.
///
/// All surviving lines are written back together. A file is deleted only when
/// it holds at least one well-formed line and none of them survive; empty
/// files (background images) and files with only malformed lines are left
/// as they are. Unchanged files are not rewritten.
pub fn sanitize_label_file(path: &Path, options: &SanitizeOptions) -> Result<SanitizeStats> {
    let content = fs::read_to_string(path).map_err(|e| PrepError::io(path, e))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mut stats = SanitizeStats {
        files_scanned: 1,
        ..Default::default()
    };
    let mut kept_lines = Vec::new();
    let mut evaluated = 0;

    for raw in content.lines().filter(|line| !line.trim().is_empty()) {
        let outcome = sanitize_line(raw, options.box_policy);
        if !matches!(outcome, LineOutcome::Dropped(DropReason::Malformed(_))) {
            evaluated += 1;
        }
        match outcome {
            LineOutcome::Kept {
                line,
                keypoints_zeroed,
                box_out_of_range,
            } => {
                if box_out_of_range {
                    stats.boxes_out_of_range += 1;
                    warn!("Bounding box out of range in {}: {}", file_name, raw.trim());
                }
                stats.keypoints_zeroed += keypoints_zeroed;
                stats.lines_kept += 1;
                kept_lines.push(line.to_string());
            }
            LineOutcome::Dropped(reason) => {
                match reason {
                    DropReason::Malformed(_) => stats.malformed_lines += 1,
                    DropReason::BoxOutOfRange => stats.boxes_out_of_range += 1,
                    DropReason::NoVisibleKeypoints => {}
                }
                stats.lines_dropped += 1;
                warn!("Removed invalid annotation from {} ({})", file_name, reason);
            }
        }
    }

    if evaluated == 0 {
        debug!("No label line to check in {}, left untouched", file_name);
        return Ok(stats);
    }

    if kept_lines.is_empty() {
        stats.files_deleted += 1;
        if !options.dry_run {
            fs::remove_file(path).map_err(|e| PrepError::io(path, e))?;
        }
        warn!("Removed annotation file with no valid keypoints: {}", file_name);
        return Ok(stats);
    }

    let mut corrected = kept_lines.join("\n");
    corrected.push('\n');
    if corrected != content {
        stats.files_rewritten += 1;
        if !options.dry_run {
            fs::write(path, corrected).map_err(|e| PrepError::io(path, e))?;
        }
        debug!("Rewrote {}", file_name);
    }

    Ok(stats)
}
