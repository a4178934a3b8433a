use serde::{Deserialize, Deserializer};

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            size: 20,
            infinite_scroll: true,
            threshold: 0.1,
        }
    }
}

/// Parameters shared by both pagination engines.
///
/// - `size`: number of items requested per page.
/// - `infinite_scroll`: accumulate pages into one list and arm the
///   continuation trigger. When disabled every load replaces the list.
/// - `threshold`: visible fraction of the sentinel that counts as
///   "reached the end", in `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaginationParams {
    pub size: u32,
    pub infinite_scroll: bool,
    #[serde(deserialize_with = "deserialize_threshold")]
    pub threshold: f32,
}

impl PaginationParams {
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_infinite_scroll(mut self, infinite_scroll: bool) -> Self {
        self.infinite_scroll = infinite_scroll;
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = clamp_threshold(threshold);
        self
    }
}

/// Maps a threshold into `[0.0, 1.0]`; NaN becomes `0.0`.
pub(crate) fn clamp_threshold(threshold: f32) -> f32 {
    if threshold.is_nan() {
        0.0
    } else {
        threshold.clamp(0.0, 1.0)
    }
}

fn deserialize_threshold<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    f32::deserialize(deserializer).map(clamp_threshold)
}

impl From<&PaginationParams> for PaginationParams {
    fn from(value: &PaginationParams) -> Self {
        value.clone()
    }
}

// region:    --- Tests


// endregion: --- Tests
