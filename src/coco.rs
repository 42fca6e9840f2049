//! COCO keypoint annotation structures
//!
//! Only the identifier fields the tools rewrite are typed. Everything else an
//! export carries (keypoints, bbox, area, width, height, ...) is kept as raw
//! JSON and written back untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// COCO image entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: u64,
    // Absent in some exports; an empty name is not written back
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Image {
    pub fn new(id: u64, file_name: impl Into<String>) -> Self {
        Self {
            id,
            file_name: file_name.into(),
            extra: Map::new(),
        }
    }
}

/// COCO annotation entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: u64,
    pub image_id: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Annotation {
    pub fn new(id: u64, image_id: u64) -> Self {
        Self {
            id,
            image_id,
            extra: Map::new(),
        }
    }
}

/// Complete COCO dataset structure
///
/// `images` and `annotations` are required; a file without them is rejected
/// at parse time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoFile {
    #[serde(default)]
    pub licenses: Vec<Value>,
    #[serde(default = "empty_info")]
    pub info: Value,
    #[serde(default)]
    pub categories: Vec<Value>,
    pub images: Vec<Image>,
    pub annotations: Vec<Annotation>,
}

fn empty_info() -> Value {
    Value::Object(Map::new())
}

impl Default for CocoFile {
    fn default() -> Self {
        Self {
            licenses: Vec::new(),
            info: empty_info(),
            categories: Vec::new(),
            images: Vec::new(),
            annotations: Vec::new(),
        }
    }
}

impl CocoFile {
    /// An empty set sharing this set's metadata (licenses, info, categories).
    pub fn with_same_metadata(&self) -> Self {
        Self {
            licenses: self.licenses.clone(),
            info: self.info.clone(),
            categories: self.categories.clone(),
            images: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// File names of every image in the set that has one.
    pub fn image_file_names(&self) -> impl Iterator<Item = &str> {
        self.images
            .iter()
            .map(|image| image.file_name.as_str())
            .filter(|name| !name.is_empty())
    }
}

/// Hands out dense 1-based identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdCounter {
    last: u64,
}

impl IdCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> u64 {
        self.last += 1;
        self.last
    }
}
