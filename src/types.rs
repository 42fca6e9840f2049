use std::fmt;

// Image extensions looked up next to an exported label file, in priority order
pub const IMG_FORMATS: &[&str] = &["jpg", "jpeg", "png"];

// Dataset partitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Val,
    Test,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Val, Split::Test];

    pub fn name(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
        }
    }

    /// Display label used in log lines and progress bars
    pub fn label(self) -> &'static str {
        match self {
            Split::Train => "Train",
            Split::Val => "Val",
            Split::Test => "Test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// One value per partition
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SplitData<T> {
    pub train: T,
    pub val: T,
    pub test: T,
}

impl<T> SplitData<T> {
    pub(crate) fn get(&self, split: Split) -> &T {
        match split {
            Split::Train => &self.train,
            Split::Val => &self.val,
            Split::Test => &self.test,
        }
    }

    pub fn get_mut(&mut self, split: Split) -> &mut T {
        match split {
            Split::Train => &mut self.train,
            Split::Val => &mut self.val,
            Split::Test => &mut self.test,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Split, &T)> {
        Split::ALL.into_iter().map(move |split| (split, self.get(split)))
    }

    pub fn map<U>(self, mut f: impl FnMut(Split, T) -> U) -> SplitData<U> {
        SplitData {
            train: f(Split::Train, self.train),
            val: f(Split::Val, self.val),
            test: f(Split::Test, self.test),
        }
    }
}

// Counters reported by the merger
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeStats {
    pub files_merged: usize,
    pub images: usize,
    pub annotations: usize,
    pub dropped_annotations: usize,
    pub dropped_empty_images: usize,
}

impl MergeStats {
    pub fn print_summary(&self) {
        log::info!("=== Merge Summary ===");
        log::info!("Files merged: {}", self.files_merged);
        log::info!("Total images (with annotations): {}", self.images);
        log::info!("Total annotations: {}", self.annotations);
        log::info!("Images dropped (no annotations): {}", self.dropped_empty_images);
        if self.dropped_annotations > 0 {
            log::warn!(
                "Annotations dropped (image not found in the same file): {}",
                self.dropped_annotations
            );
        }
    }
}

// Counters reported by the image collector
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollectStats {
    pub referenced: usize,
    pub copied: usize,
    pub found: usize,
    pub missing: usize,
}

impl CollectStats {
    pub fn print_summary(&self) {
        log::info!("=== Collect Summary ===");
        log::info!("Images referenced: {}", self.referenced);
        log::info!("Images found: {}", self.found);
        log::info!("Files copied: {}", self.copied);
        log::info!("Images not found: {}", self.missing);
    }
}

// Counters reported by the label sanitizer
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SanitizeStats {
    pub files_scanned: usize,
    pub files_rewritten: usize,
    pub files_deleted: usize,
    pub lines_kept: usize,
    pub lines_dropped: usize,
    pub malformed_lines: usize,
    pub keypoints_zeroed: usize,
    pub boxes_out_of_range: usize,
}

impl SanitizeStats {
    pub fn merge(self, other: Self) -> Self {
        Self {
            files_scanned: self.files_scanned + other.files_scanned,
            files_rewritten: self.files_rewritten + other.files_rewritten,
            files_deleted: self.files_deleted + other.files_deleted,
            lines_kept: self.lines_kept + other.lines_kept,
            lines_dropped: self.lines_dropped + other.lines_dropped,
            malformed_lines: self.malformed_lines + other.malformed_lines,
            keypoints_zeroed: self.keypoints_zeroed + other.keypoints_zeroed,
            boxes_out_of_range: self.boxes_out_of_range + other.boxes_out_of_range,
        }
    }

    pub fn print_summary(&self) {
        log::info!("=== Sanitize Summary ===");
        log::info!("Label files scanned: {}", self.files_scanned);
        log::info!("Label files rewritten: {}", self.files_rewritten);
        log::info!("Label files deleted: {}", self.files_deleted);
        log::info!("Lines kept: {}", self.lines_kept);
        log::info!("Lines dropped: {}", self.lines_dropped);
        log::info!("Keypoints zeroed: {}", self.keypoints_zeroed);
        if self.malformed_lines > 0 {
            log::warn!("Malformed lines skipped: {}", self.malformed_lines);
        }
        if self.boxes_out_of_range > 0 {
            log::warn!(
                "Lines with an out-of-range bounding box: {}",
                self.boxes_out_of_range
            );
        }
    }
}

// Per-split counters reported by the YOLO export splitter
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SplitCounts {
    pub videos: usize,
    pub labels: usize,
    pub images: usize,
}
