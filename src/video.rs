//! Grouping of frames by the video they were extracted from.
//!
//! Frame files are named after their source video, e.g. `52701_1_4.jpg` is
//! frame 4 of video `52701_1`. The rule is pluggable through [`VideoKey`] so
//! other naming schemes can be used without touching the split logic.

use std::collections::HashMap;

use crate::utils::strip_extension;

/// Derives a video key from a frame's file name.
pub trait VideoKey {
    /// Returns `None` when the file name does not follow the naming scheme.
    fn video_key(&self, file_name: &str) -> Option<String>;

    /// Key used when every file must land in some group: names that do not
    /// follow the scheme form a group of their own, keyed by the bare stem.
    fn video_key_or_stem(&self, file_name: &str) -> String {
        self.video_key(file_name)
            .unwrap_or_else(|| strip_extension(file_name).to_string())
    }
}

impl<F> VideoKey for F
where
    F: Fn(&str) -> Option<String>,
{
    fn video_key(&self, file_name: &str) -> Option<String> {
        self(file_name)
    }
}

/// Joins the first `tokens` underscore-separated parts of the extension-less name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnderscoreKey {
    pub tokens: usize,
}

impl UnderscoreKey {
    pub fn new(tokens: usize) -> Self {
        Self { tokens }
    }
}

impl Default for UnderscoreKey {
    fn default() -> Self {
        Self::new(2)
    }
}

impl VideoKey for UnderscoreKey {
    fn video_key(&self, file_name: &str) -> Option<String> {
        let stem = strip_extension(file_name);
        let parts: Vec<&str> = stem.split('_').collect();
        if parts.len() >= self.tokens {
            Some(parts[..self.tokens].join("_"))
        } else {
            None
        }
    }
}

/// Groups of items keyed by video, in first-seen key order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VideoGroups<T> {
    keys: Vec<String>,
    members: HashMap<String, Vec<T>>,
}

impl<T> VideoGroups<T> {
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            members: HashMap::new(),
        }
    }

    pub fn insert(&mut self, key: String, item: T) {
        match self.members.get_mut(&key) {
            Some(items) => items.push(item),
            None => {
                self.keys.push(key.clone());
                self.members.insert(key, vec![item]);
            }
        }
    }

    /// Distinct keys in the order they were first seen
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn members(&self, key: &str) -> &[T] {
        self.members.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
