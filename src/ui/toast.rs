use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::task::JoinHandle;

use crate::state::lock;

impl Default for ToastParams {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastParams {
    pub duration: Duration,
}

#[derive(Debug, Default)]
struct ToastState {
    message: String,
    visible: bool,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl ToastState {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

/// A single toast slot that hides itself after a delay.
///
/// Showing a new toast replaces the current one and restarts the timer.
#[derive(Debug, Clone, Default)]
pub struct Toast {
    params: ToastParams,
    state: Arc<Mutex<ToastState>>,
}

impl Toast {
    pub fn new(params: ToastParams) -> Self {
        Self {
            params,
            state: Arc::default(),
        }
    }

    /// # Panics
    ///
    /// Panics when called outside of a Tokio runtime.
    pub fn show(&self, message: impl Into<String>) {
        self.show_for(message, self.params.duration);
    }

    /// # Panics
    ///
    /// Panics when called outside of a Tokio runtime.
    pub fn show_for(&self, message: impl Into<String>, duration: Duration) {
        let mut state = lock(&self.state);

        state.cancel_timer();
        state.message = message.into();
        state.visible = true;
        state.generation = state.generation.wrapping_add(1);

        let generation = state.generation;
        let slot = self.state.clone();

        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;

            let mut state = lock(&slot);
            // A newer toast owns the slot.
            if state.generation == generation {
                state.visible = false;
                state.timer = None;
            }
        }));
    }

    pub fn hide(&self) {
        let mut state = lock(&self.state);

        state.cancel_timer();
        state.visible = false;
    }

    /// The message currently on screen, if any.
    pub fn current(&self) -> Option<String> {
        let state = lock(&self.state);

        state.visible.then(|| state.message.clone())
    }
}

// region:    --- Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_toast_hides_after_duration() {
        let toast = Toast::default();

        toast.show("Copied");
        assert_eq!(Some("Copied".to_string()), toast.current());

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert_eq!(Some("Copied".to_string()), toast.current());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(None, toast.current());
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_replacement_restarts_timer() {
        let toast = Toast::new(ToastParams {
            duration: Duration::from_secs(1),
        });

        toast.show("first");
        tokio::time::sleep(Duration::from_millis(800)).await;
        toast.show("second");

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(Some("second".to_string()), toast.current());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(None, toast.current());
    }

    #[tokio::test]
    async fn test_toast_hide() {
        let toast = Toast::default();

        toast.show("bye");
        toast.hide();

        assert_eq!(None, toast.current());
    }
}

// endregion: --- Tests
