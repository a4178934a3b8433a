use std::sync::Arc;

use tokio::sync::watch;

/// The observation target placed at the end of a rendered list.
///
/// The host reports how much of the target is visible with [`Sentinel::report`].
/// Clones refer to the same target. Once every clone is dropped the target
/// counts as removed from the document and observations of it end.
#[derive(Debug, Clone)]
pub struct Sentinel {
    visibility: Arc<watch::Sender<f32>>,
}

impl Default for Sentinel {
    fn default() -> Self {
        Self::new()
    }
}

impl Sentinel {
    pub fn new() -> Self {
        let (visibility, _) = watch::channel(0.0);

        Self {
            visibility: Arc::new(visibility),
        }
    }

    /// Reports the visible fraction of the target, clamped into `[0.0, 1.0]`.
    pub fn report(&self, ratio: f32) {
        let ratio = if ratio.is_nan() {
            0.0
        } else {
            ratio.clamp(0.0, 1.0)
        };

        self.visibility.send_replace(ratio);
    }

    pub fn visible_ratio(&self) -> f32 {
        *self.visibility.borrow()
    }

    pub(crate) fn observe(&self) -> watch::Receiver<f32> {
        self.visibility.subscribe()
    }
}
