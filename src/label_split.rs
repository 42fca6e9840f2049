//! Video-aware split of a flat YOLO export directory
//!
//! An export holds `52807_1_44.txt` next to `52807_1_44.jpg`. Label and image
//! pairs are copied into `labels/<split>/` and `images/<split>/` under the
//! output root, with every frame of a video in the same split.

use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::config::LabelSplitOptions;
use crate::dataset::split_keys;
use crate::error::Result;
use crate::io::{copy_file, list_files_with_extension, write_name_list};
use crate::types::{Split, SplitCounts, SplitData, IMG_FORMATS};
use crate::utils::ensure_directory;
use crate::video::{UnderscoreKey, VideoGroups, VideoKey};

/// Find the image sharing a label's stem, trying extensions in priority order
pub fn find_image_for_label(folder: &Path, stem: &str) -> Option<PathBuf> {
    IMG_FORMATS
        .iter()
        .map(|ext| folder.join(format!("{}.{}", stem, ext)))
        .find(|path| path.is_file())
}

/// Group the label file names of an export folder by video key.
///
/// Files whose name does not yield a key are skipped, as are split list files.
pub fn group_label_files<K: VideoKey + ?Sized>(
    label_files: &[PathBuf],
    key: &K,
) -> VideoGroups<String> {
    let mut groups = VideoGroups::new();
    for path in label_files {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if Split::ALL
            .iter()
            .any(|split| name == format!("{}.txt", split.name()))
        {
            continue;
        }
        match key.video_key(name) {
            Some(video) => groups.insert(video, name.to_string()),
            None => warn!("Skipping {}: file name does not contain a video key", name),
        }
    }
    groups
}

// Copy one split's labels and their images, returning the number of images copied
fn copy_split_files(folder: &Path, out_root: &Path, split: Split, names: &[String]) -> Result<usize> {
    let labels_dir = ensure_directory(&out_root.join("labels").join(split.name()))?;
    let images_dir = ensure_directory(&out_root.join("images").join(split.name()))?;

    let mut images = 0;
    for label_name in names {
        copy_file(&folder.join(label_name), &labels_dir.join(label_name))?;

        let stem = Path::new(label_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(label_name.as_str());
        match find_image_for_label(folder, stem) {
            Some(image_path) => {
                if let Some(image_name) = image_path.file_name() {
                    copy_file(&image_path, &images_dir.join(image_name))?;
                    images += 1;
                }
            }
            None => warn!("Image file for {} not found", label_name),
        }
    }
    Ok(images)
}

/// Split the export in `folder` into `out_root/{images,labels}/{train,val,test}`.
///
/// With `copy_files` off nothing is copied and only the list files are written.
pub fn split_label_dir(
    folder: &Path,
    out_root: &Path,
    options: &LabelSplitOptions,
) -> Result<SplitData<SplitCounts>> {
    options.split.ratios.validate()?;

    let label_files = list_files_with_extension(folder, "txt")?;
    let groups = group_label_files(&label_files, &UnderscoreKey::new(options.split.key_tokens));
    info!(
        "Found {} label files from {} videos in {}",
        label_files.len(),
        groups.len(),
        folder.display()
    );

    let video_split = split_keys(
        groups.keys().to_vec(),
        &options.split.ratios,
        options.split.seed,
    );

    let mut counts = SplitData::<SplitCounts>::default();
    for (split, videos) in video_split.iter() {
        let mut split_counts = SplitCounts {
            videos: videos.len(),
            ..Default::default()
        };
        let names: Vec<String> = videos
            .iter()
            .flat_map(|video| groups.members(video).iter().cloned())
            .collect();
        split_counts.labels = names.len();

        if options.copy_files {
            split_counts.images = copy_split_files(folder, out_root, split, &names)?;
        }

        if options.write_lists {
            write_name_list(&out_root.join(format!("{}.txt", split.name())), &names)?;
        }

        if options.copy_files {
            info!(
                "{} set: {} label files and {} image files from {} videos",
                split.label(),
                split_counts.labels,
                split_counts.images,
                split_counts.videos
            );
        } else {
            info!(
                "{} set: {} files from {} videos",
                split.label(),
                split_counts.labels,
                split_counts.videos
            );
        }
        *counts.get_mut(split) = split_counts;
    }

    Ok(counts)
}
