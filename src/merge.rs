//! Merging of several COCO keypoint exports into one annotation set.
//!
//! Image and annotation identifiers are renumbered with two running counters
//! shared across all inputs, so exports that reuse the same ID ranges never
//! collide.

use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::coco::{CocoFile, IdCounter};
use crate::config::MergeOptions;
use crate::error::{PrepError, Result};
use crate::io::{read_coco_file, write_coco_file};
use crate::types::MergeStats;

/// Incremental merger. Feed it sets in order with [`CocoMerger::add`], then
/// call [`CocoMerger::finish`].
#[derive(Debug)]
pub struct CocoMerger {
    options: MergeOptions,
    merged: CocoFile,
    categories_set: bool,
    image_ids: IdCounter,
    annotation_ids: IdCounter,
    stats: MergeStats,
}

impl CocoMerger {
    pub fn new(options: MergeOptions) -> Self {
        Self {
            options,
            merged: CocoFile::default(),
            categories_set: false,
            image_ids: IdCounter::new(),
            annotation_ids: IdCounter::new(),
            stats: MergeStats::default(),
        }
    }

    /// Append one annotation set. `source` only labels log lines and errors.
    pub fn add(&mut self, source: &Path, data: CocoFile) -> Result<()> {
        if !self.categories_set {
            self.merged.categories = data.categories;
            self.categories_set = true;
        } else if data.categories != self.merged.categories {
            if self.options.strict_categories {
                return Err(PrepError::CategoryMismatch {
                    path: source.to_path_buf(),
                });
            }
            warn!(
                "Categories in {} differ from the first file; keeping the first file's categories",
                source.display()
            );
        }

        // Old -> new image IDs, scoped to this file
        let mut image_id_map: HashMap<u64, u64> = HashMap::with_capacity(data.images.len());
        for mut image in data.images {
            let new_id = self.image_ids.next_id();
            image_id_map.insert(image.id, new_id);
            image.id = new_id;
            self.merged.images.push(image);
        }

        let mut dropped = 0;
        for mut annotation in data.annotations {
            let Some(&new_image_id) = image_id_map.get(&annotation.image_id) else {
                dropped += 1;
                continue;
            };
            annotation.id = self.annotation_ids.next_id();
            annotation.image_id = new_image_id;
            self.merged.annotations.push(annotation);
        }

        if dropped > 0 {
            debug!(
                "Dropped {} annotation(s) from {} referencing unknown images",
                dropped,
                source.display()
            );
        }
        self.stats.dropped_annotations += dropped;
        self.stats.files_merged += 1;
        Ok(())
    }

    /// Drop unannotated images (unless configured otherwise) and return the merged set.
    pub fn finish(mut self) -> (CocoFile, MergeStats) {
        if self.options.drop_empty_images {
            let annotated: HashSet<u64> = self
                .merged
                .annotations
                .iter()
                .map(|annotation| annotation.image_id)
                .collect();
            let before = self.merged.images.len();
            self.merged
                .images
                .retain(|image| annotated.contains(&image.id));
            self.stats.dropped_empty_images = before - self.merged.images.len();
        }

        self.stats.images = self.merged.images.len();
        self.stats.annotations = self.merged.annotations.len();
        (self.merged, self.stats)
    }
}

/// Merge in-memory annotation sets, in order.
pub fn merge_coco_sets<I>(sets: I, options: MergeOptions) -> Result<(CocoFile, MergeStats)>
where
    I: IntoIterator<Item = (PathBuf, CocoFile)>,
{
    let mut merger = CocoMerger::new(options);
    for (source, data) in sets {
        merger.add(&source, data)?;
    }
    Ok(merger.finish())
}

/// Read every input file, merge them and write the result to `out`.
pub fn merge_annotation_files(
    ann_files: &[PathBuf],
    out: &Path,
    options: MergeOptions,
) -> Result<MergeStats> {
    if ann_files.is_empty() {
        return Err(PrepError::Config(
            "at least one annotation file is required".to_string(),
        ));
    }

    let mut merger = CocoMerger::new(options);
    for path in ann_files {
        info!("Reading {}", path.display());
        let data = read_coco_file(path)?;
        merger.add(path, data)?;
    }
    let (merged, stats) = merger.finish();

    write_coco_file(out, &merged)?;
    info!("Merged annotations written to: {}", out.display());
    Ok(stats)
}
