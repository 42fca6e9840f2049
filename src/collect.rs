use log::{debug, info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::CollectOptions;
use crate::error::{PrepError, Result};
use crate::io::{copy_file, read_coco_file, walk_files};
use crate::types::CollectStats;
use crate::utils::{base_name, create_progress_bar, ensure_directory};

/// Copy every image referenced by `ann_file` from the source trees into `target_dir`
pub fn collect_images(
    ann_file: &Path,
    source_dirs: &[PathBuf],
    target_dir: &Path,
    options: &CollectOptions,
) -> Result<CollectStats> {
    let coco = read_coco_file(ann_file)?;
    let wanted: HashSet<String> = coco
        .image_file_names()
        .map(|name| base_name(name).to_string())
        .collect();
    info!(
        "{} distinct image names referenced by {}",
        wanted.len(),
        ann_file.display()
    );
    collect_named_files(&wanted, source_dirs, target_dir, options)
}

/// Copy files whose base name is in `wanted` from anywhere under the source
/// trees into the flat `target_dir`.
///
/// A name present under several roots is copied each time, so the last
/// match in walk order ends up in the target.
pub fn collect_named_files(
    wanted: &HashSet<String>,
    source_dirs: &[PathBuf],
    target_dir: &Path,
    options: &CollectOptions,
) -> Result<CollectStats> {
    ensure_directory(target_dir)?;

    let mut matches: Vec<(PathBuf, String)> = Vec::new();
    for source_dir in source_dirs {
        if !source_dir.is_dir() {
            warn!("Source directory does not exist: {}", source_dir.display());
            continue;
        }
        for path in walk_files(source_dir) {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if wanted.contains(name) {
                let name = name.to_string();
                matches.push((path, name));
            }
        }
    }

    let mut stats = CollectStats {
        referenced: wanted.len(),
        ..Default::default()
    };
    let mut found: HashSet<&str> = HashSet::new();

    let pb = create_progress_bar(matches.len() as u64, "Copy");
    for (source, name) in &matches {
        let destination = target_dir.join(name);
        copy_file(source, &destination)?;
        info!("Copied {} -> {}", source.display(), destination.display());
        found.insert(name.as_str());
        stats.copied += 1;
        pb.inc(1);
    }
    pb.finish_with_message("Copy complete");

    stats.found = found.len();
    stats.missing = wanted.len() - stats.found;
    if stats.missing > 0 {
        for name in wanted.iter().filter(|name| !found.contains(name.as_str())) {
            debug!("Not found under any source directory: {}", name);
        }
        if options.strict {
            return Err(PrepError::MissingImages {
                count: stats.missing,
            });
        }
    }

    Ok(stats)
}
