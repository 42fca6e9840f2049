use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{PrepError, Result};

/// Allowed drift between the sum of the split ratios and 1.0.
pub const RATIO_TOLERANCE: f64 = 1e-6;

/// Merge several COCO keypoint annotation exports into a single file.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct MergeArgs {
    /// COCO annotation JSON files to merge, in order
    #[arg(long = "ann_files", num_args = 1.., required = true)]
    pub ann_files: Vec<PathBuf>,

    /// Path of the merged COCO JSON file
    #[arg(long = "out")]
    pub out: PathBuf,

    /// Keep images that end up without any annotation
    #[arg(long = "keep_empty_images")]
    pub keep_empty_images: bool,

    /// Fail when a later file's categories differ from the first file's
    #[arg(long = "strict_categories")]
    pub strict_categories: bool,
}

impl MergeArgs {
    pub fn to_merge_options(&self) -> MergeOptions {
        MergeOptions {
            drop_empty_images: !self.keep_empty_images,
            strict_categories: self.strict_categories,
        }
    }
}

/// Split a merged COCO file into train/val/test sets, keeping video frames together.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct SplitArgs {
    /// Merged COCO JSON file
    #[arg(long = "merged_coco")]
    pub merged_coco: PathBuf,

    /// Directory receiving train_coco.json, val_coco.json and test_coco.json
    #[arg(long = "out_dir")]
    pub out_dir: PathBuf,

    /// Proportion of videos used for training
    #[arg(long = "train_ratio", default_value_t = 0.7, value_parser = validate_ratio)]
    pub train_ratio: f64,

    /// Proportion of videos used for validation
    #[arg(long = "val_ratio", default_value_t = 0.15, value_parser = validate_ratio)]
    pub val_ratio: f64,

    /// Proportion of videos used for testing
    #[arg(long = "test_ratio", default_value_t = 0.15, value_parser = validate_ratio)]
    pub test_ratio: f64,

    /// Seed for random shuffling of the video keys
    #[arg(long = "seed", default_value_t = 42)]
    pub seed: u64,

    /// Number of leading underscore-separated file name tokens forming the video key
    #[arg(long = "key_tokens", default_value_t = 2, value_parser = validate_key_tokens)]
    pub key_tokens: usize,
}

impl SplitArgs {
    pub fn to_split_options(&self) -> SplitOptions {
        SplitOptions {
            ratios: SplitRatios::new(self.train_ratio, self.val_ratio, self.test_ratio),
            seed: self.seed,
            key_tokens: self.key_tokens,
        }
    }
}

/// Copy the images referenced by a COCO file from source trees into one directory.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct CollectArgs {
    /// COCO JSON file listing the wanted images
    #[arg(long = "ann_file")]
    pub ann_file: PathBuf,

    /// Directory trees searched recursively for the images
    #[arg(long = "source_dirs", num_args = 1.., required = true)]
    pub source_dirs: Vec<PathBuf>,

    /// Flat directory receiving the copies
    #[arg(long = "target_dir")]
    pub target_dir: PathBuf,

    /// Fail when a referenced image is not found under any source directory
    #[arg(long = "strict")]
    pub strict: bool,
}

impl CollectArgs {
    pub fn to_collect_options(&self) -> CollectOptions {
        CollectOptions {
            strict: self.strict,
        }
    }
}

/// Repair out-of-range keypoints in a directory of YOLO pose label files.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct SanitizeArgs {
    /// Directory containing YOLO pose .txt label files
    #[arg(short = 'd', long = "labels_dir")]
    pub labels_dir: PathBuf,

    /// What to do with a line whose bounding box lies outside [0, 1]
    #[arg(long = "box_policy", value_enum, default_value = "keep")]
    pub box_policy: BoxPolicy,

    /// Report changes without rewriting or deleting any file
    #[arg(long = "dry_run")]
    pub dry_run: bool,
}

impl SanitizeArgs {
    pub fn to_sanitize_options(&self) -> SanitizeOptions {
        SanitizeOptions {
            box_policy: self.box_policy,
            dry_run: self.dry_run,
        }
    }
}

/// Split a flat YOLO export (labels and images side by side) into train/val/test by video.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct LabelSplitArgs {
    /// Directory holding the exported .txt labels and their images
    #[arg(short = 'd', long = "folder")]
    pub folder: PathBuf,

    /// Root for the images/ and labels/ trees, defaults to the export folder
    #[arg(long = "out_dir")]
    pub out_dir: Option<PathBuf>,

    /// Proportion of videos used for training
    #[arg(long = "train_ratio", default_value_t = 0.7, value_parser = validate_ratio)]
    pub train_ratio: f64,

    /// Proportion of videos used for validation
    #[arg(long = "val_ratio", default_value_t = 0.15, value_parser = validate_ratio)]
    pub val_ratio: f64,

    /// Proportion of videos used for testing
    #[arg(long = "test_ratio", default_value_t = 0.15, value_parser = validate_ratio)]
    pub test_ratio: f64,

    /// Seed for random shuffling of the video keys
    #[arg(long = "seed", default_value_t = 42)]
    pub seed: u64,

    /// Number of leading underscore-separated file name tokens forming the video key
    #[arg(long = "key_tokens", default_value_t = 2, value_parser = validate_key_tokens)]
    pub key_tokens: usize,

    /// Also write train.txt, val.txt and test.txt listing each split's label files
    #[arg(long = "write_lists")]
    pub write_lists: bool,

    /// Only write the split lists; leave the export's files where they are
    #[arg(long = "lists_only")]
    pub lists_only: bool,
}

impl LabelSplitArgs {
    pub fn to_label_split_options(&self) -> LabelSplitOptions {
        LabelSplitOptions {
            split: SplitOptions {
                ratios: SplitRatios::new(self.train_ratio, self.val_ratio, self.test_ratio),
                seed: self.seed,
                key_tokens: self.key_tokens,
            },
            write_lists: self.write_lists || self.lists_only,
            copy_files: !self.lists_only,
        }
    }

    pub fn output_root(&self) -> PathBuf {
        self.out_dir.clone().unwrap_or_else(|| self.folder.clone())
    }
}

// Policy for lines whose bounding box is out of range
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum BoxPolicy {
    /// Keep the line unchanged and log a warning
    #[default]
    Keep,
    /// Drop the whole line
    Drop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    pub drop_empty_images: bool,
    pub strict_categories: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            drop_empty_images: true,
            strict_categories: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitRatios {
    pub train: f64,
    pub val: f64,
    pub test: f64,
}

impl SplitRatios {
    pub fn new(train: f64, val: f64, test: f64) -> Self {
        Self { train, val, test }
    }

    /// Check every ratio lies in [0, 1] and that they sum to 1.0.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("train", self.train), ("val", self.val), ("test", self.test)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PrepError::Config(format!(
                    "{}_ratio must be between 0.0 and 1.0, got {}",
                    name, value
                )));
            }
        }
        let sum = self.train + self.val + self.test;
        if (sum - 1.0).abs() > RATIO_TOLERANCE {
            return Err(PrepError::Config(format!(
                "train_ratio + val_ratio + test_ratio must equal 1.0, got {}",
                sum
            )));
        }
        Ok(())
    }
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self::new(0.7, 0.15, 0.15)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitOptions {
    pub ratios: SplitRatios,
    pub seed: u64,
    pub key_tokens: usize,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            ratios: SplitRatios::default(),
            seed: 42,
            key_tokens: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollectOptions {
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SanitizeOptions {
    pub box_policy: BoxPolicy,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelSplitOptions {
    pub split: SplitOptions,
    pub write_lists: bool,
    pub copy_files: bool,
}

impl Default for LabelSplitOptions {
    fn default() -> Self {
        Self {
            split: SplitOptions::default(),
            write_lists: false,
            copy_files: true,
        }
    }
}

// Validate that a ratio is between 0.0 and 1.0
pub(crate) fn validate_ratio(s: &str) -> std::result::Result<f64, String> {
    match f64::from_str(s) {
        Ok(val) if (0.0..=1.0).contains(&val) => Ok(val),
        _ => Err("RATIO must be between 0.0 and 1.0".to_string()),
    }
}

fn validate_key_tokens(s: &str) -> std::result::Result<usize, String> {
    match usize::from_str(s) {
        Ok(val) if val >= 1 => Ok(val),
        _ => Err("KEY_TOKENS must be a positive integer".to_string()),
    }
}
