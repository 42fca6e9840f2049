//! Pose dataset preparation tools
//!
//! This library backs a set of batch tools for COCO keypoint and YOLO pose
//! datasets: merging COCO exports, splitting them by source video, collecting
//! the referenced images, sanitizing YOLO pose labels and splitting flat YOLO
//! exports.

pub mod coco;
pub mod collect;
pub mod config;
pub mod dataset;
pub mod error;
pub mod io;
pub mod label_split;
pub mod merge;
pub mod sanitize;
pub mod split;
pub mod types;
pub mod utils;
pub mod video;
pub mod yolo;

// Re-export commonly used types and functions
pub use coco::{Annotation, CocoFile, Image};
pub use config::{
    BoxPolicy, CollectArgs, LabelSplitArgs, MergeArgs, SanitizeArgs, SplitArgs, SplitRatios,
};
pub use error::{PrepError, Result};
pub use types::{Split, SplitData};
pub use video::{UnderscoreKey, VideoKey};

pub use collect::collect_images;
pub use label_split::split_label_dir;
pub use merge::{merge_annotation_files, merge_coco_sets};
pub use sanitize::sanitize_label_dir;
pub use split::{split_annotation_file, split_coco_by_video};
