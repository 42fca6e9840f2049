//! Video-aware train/val/test split of a merged COCO annotation set.

use log::info;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::coco::{CocoFile, IdCounter};
use crate::config::SplitOptions;
use crate::dataset::split_keys;
use crate::error::Result;
use crate::io::{read_coco_file, write_coco_file};
use crate::types::{Split, SplitData};
use crate::utils::ensure_directory;
use crate::video::{UnderscoreKey, VideoGroups, VideoKey};

/// One output partition together with the video keys it was built from
#[derive(Debug, Clone, PartialEq)]
pub struct SplitSubset {
    pub videos: Vec<String>,
    pub coco: CocoFile,
}

/// Group the image IDs of a set by video key, in first-seen order.
pub fn group_images_by_video<K: VideoKey + ?Sized>(coco: &CocoFile, key: &K) -> VideoGroups<u64> {
    let mut groups = VideoGroups::new();
    for image in &coco.images {
        groups.insert(key.video_key_or_stem(&image.file_name), image.id);
    }
    groups
}

/// Keep only the listed images and their annotations, renumbered from 1.
///
/// Metadata (licenses, info, categories) is copied unchanged.
pub fn build_subset(coco: &CocoFile, image_ids: &HashSet<u64>) -> CocoFile {
    let mut subset = coco.with_same_metadata();

    let mut image_counter = IdCounter::new();
    let mut image_id_map: HashMap<u64, u64> = HashMap::new();
    for image in coco.images.iter().filter(|image| image_ids.contains(&image.id)) {
        let mut image = image.clone();
        let new_id = image_counter.next_id();
        image_id_map.insert(image.id, new_id);
        image.id = new_id;
        subset.images.push(image);
    }

    let mut annotation_counter = IdCounter::new();
    for annotation in &coco.annotations {
        if let Some(&new_image_id) = image_id_map.get(&annotation.image_id) {
            let mut annotation = annotation.clone();
            annotation.id = annotation_counter.next_id();
            annotation.image_id = new_image_id;
            subset.annotations.push(annotation);
        }
    }

    subset
}

/// Partition a set into train, val and test so that every video lands in exactly one split.
pub fn split_coco_by_video<K: VideoKey + ?Sized>(
    coco: &CocoFile,
    options: &SplitOptions,
    key: &K,
) -> Result<SplitData<SplitSubset>> {
    options.ratios.validate()?;

    let groups = group_images_by_video(coco, key);
    let video_split = split_keys(groups.keys().to_vec(), &options.ratios, options.seed);

    Ok(video_split.map(|_, videos| {
        let image_ids: HashSet<u64> = videos
            .iter()
            .flat_map(|video| groups.members(video).iter().copied())
            .collect();
        let coco = build_subset(coco, &image_ids);
        SplitSubset { videos, coco }
    }))
}

/// Output file name of a split, e.g. `train_coco.json`
pub fn split_file_name(split: Split) -> String {
    format!("{}_coco.json", split.name())
}

/// Split a merged annotation file and write the three subsets into `out_dir`.
///
/// Ratios are checked before anything is read.
pub fn split_annotation_file(
    merged_coco: &Path,
    out_dir: &Path,
    options: &SplitOptions,
) -> Result<SplitData<PathBuf>> {
    options.ratios.validate()?;

    let merged = read_coco_file(merged_coco)?;
    let subsets = split_coco_by_video(&merged, options, &UnderscoreKey::new(options.key_tokens))?;

    ensure_directory(out_dir)?;
    let mut written = SplitData::<PathBuf>::default();
    for (split, subset) in subsets.iter() {
        let path = out_dir.join(split_file_name(split));
        write_coco_file(&path, &subset.coco)?;
        info!(
            "{} set: {} images, {} annotations from {} videos => {}",
            split.label(),
            subset.coco.images.len(),
            subset.coco.annotations.len(),
            subset.videos.len(),
            path.display()
        );
        *written.get_mut(split) = path;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coco::{Annotation, Image};
    use crate::config::SplitRatios;
    use crate::error::PrepError;

    fn merged() -> CocoFile {
        CocoFile {
            images: vec![
                Image::new(1, "v1_1_0.jpg"),
                Image::new(2, "v1_1_1.jpg"),
                Image::new(3, "v2_1_0.jpg"),
            ],
            annotations: vec![
                Annotation::new(1, 1),
                Annotation::new(2, 2),
                Annotation::new(3, 3),
                Annotation::new(4, 3),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_group_images_by_video() {
        let groups = group_images_by_video(&merged(), &UnderscoreKey::default());
        assert_eq!(groups.keys(), &["v1_1".to_string(), "v2_1".to_string()]);
        assert_eq!(groups.members("v1_1"), &[1, 2]);
        assert_eq!(groups.members("v2_1"), &[3]);
    }

    #[test]
    fn test_build_subset_renumbers_locally() {
        let subset = build_subset(&merged(), &HashSet::from([3]));
        assert_eq!(subset.images.len(), 1);
        assert_eq!(subset.images[0].id, 1);
        assert_eq!(subset.images[0].file_name, "v2_1_0.jpg");
        let annotations: Vec<_> = subset.annotations.iter().map(|a| (a.id, a.image_id)).collect();
        assert_eq!(annotations, vec![(1, 1), (2, 1)]);
    }

    #[test]
    fn test_two_videos_go_to_train_and_test() {
        let subsets =
            split_coco_by_video(&merged(), &SplitOptions::default(), &UnderscoreKey::default())
                .unwrap();
        assert_eq!(subsets.train.videos.len(), 1);
        assert!(subsets.val.videos.is_empty());
        assert!(subsets.val.coco.images.is_empty());
        assert_eq!(subsets.test.videos.len(), 1);
        assert_ne!(subsets.train.videos, subsets.test.videos);

        let total_images: usize = subsets.iter().map(|(_, s)| s.coco.images.len()).sum();
        assert_eq!(total_images, 3);
    }

    #[test]
    fn test_bad_ratios_are_rejected() {
        let options = SplitOptions {
            ratios: SplitRatios::new(0.5, 0.5, 0.5),
            ..Default::default()
        };
        let result = split_coco_by_video(&merged(), &options, &UnderscoreKey::default());
        assert!(matches!(result, Err(PrepError::Config(_))));
    }

    #[test]
    fn test_bad_ratios_fail_before_reading() {
        let temp_dir = tempfile::tempdir().unwrap();
        let options = SplitOptions {
            ratios: SplitRatios::new(0.5, 0.5, 0.5),
            ..Default::default()
        };
        // The input does not exist; the ratio error must win
        let result = split_annotation_file(
            &temp_dir.path().join("missing.json"),
            &temp_dir.path().join("out"),
            &options,
        );
        assert!(matches!(result, Err(PrepError::Config(_))));
        assert!(!temp_dir.path().join("out").exists());
    }
}
