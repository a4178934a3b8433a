//! Viewport continuation trigger
//!
//! A trigger watches a [`Sentinel`] and asks its paged list for the next page
//! when the sentinel's visible fraction crosses the configured threshold. It
//! never loads while the list reports a fetch in flight or no remaining data,
//! and it never cancels a load it started.
//!
//! # Modules
//!
//! - `sentinel`: The observation target the host reports visibility into.

mod sentinel;

pub use sentinel::Sentinel;

use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, warn};

use crate::{params::clamp_threshold, Paginate, PaginationParams};

/// Loads the next page of `P` whenever the observed sentinel comes into view.
///
/// At most one observation is active. Arming against a new sentinel tears the
/// previous observation down first. Dropping the trigger stops observing.
pub struct ContinuationTrigger<P> {
    list: P,
    threshold: f32,
    enabled: bool,
    observation: Option<JoinHandle<()>>,
}

impl<P> ContinuationTrigger<P>
where
    P: Paginate + Clone + 'static,
{
    /// Creates a disarmed trigger. It stays inert when
    /// [`PaginationParams::infinite_scroll`] is disabled. The threshold is
    /// clamped into `[0.0, 1.0]`.
    pub fn new(list: P, params: &PaginationParams) -> Self {
        Self {
            list,
            threshold: clamp_threshold(params.threshold),
            enabled: params.infinite_scroll,
            observation: None,
        }
    }

    /// Starts observing `sentinel`, replacing any current observation.
    ///
    /// The current visibility is evaluated immediately, so a sentinel that is
    /// already in view triggers a load right away.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a Tokio runtime.
    pub fn arm(&mut self, sentinel: &Sentinel) {
        if !self.enabled {
            return;
        }

        self.disarm();

        debug!("Arming continuation trigger: threshold={}", self.threshold);

        let observation = observe(self.list.clone(), sentinel.observe(), self.threshold);
        self.observation = Some(tokio::spawn(observation));
    }

    /// Follows a target reference: arms against a new target, disarms when it
    /// is cleared.
    pub fn set_target(&mut self, target: Option<&Sentinel>) {
        match target {
            Some(sentinel) => self.arm(sentinel),
            None => self.disarm(),
        }
    }
}

impl<P> ContinuationTrigger<P> {
    /// Stops observing. Loads already started keep running.
    pub fn disarm(&mut self) {
        if let Some(observation) = self.observation.take() {
            debug!("Disarming continuation trigger");
            observation.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.observation
            .as_ref()
            .is_some_and(|observation| !observation.is_finished())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn list(&self) -> &P {
        &self.list
    }
}

impl<P> Drop for ContinuationTrigger<P> {
    fn drop(&mut self) {
        self.disarm();
    }
}

fn is_intersecting(ratio: f32, threshold: f32) -> bool {
    ratio > 0.0 && ratio >= threshold
}

async fn observe<P>(list: P, mut visibility: watch::Receiver<f32>, threshold: f32)
where
    P: Paginate + Clone + 'static,
{
    let mut intersecting = false;

    loop {
        let ratio = *visibility.borrow_and_update();
        let now = is_intersecting(ratio, threshold);

        if now && !intersecting {
            continue_loading(&list);
        }
        intersecting = now;

        if visibility.changed().await.is_err() {
            debug!("Sentinel removed, continuation observation ended");
            break;
        }
    }
}

fn continue_loading<P>(list: &P)
where
    P: Paginate + Clone + 'static,
{
    if list.is_loading() || !list.has_more() {
        return;
    }

    let list = list.clone();

    tokio::spawn(async move {
        if let Err(err) = list.load().await {
            warn!("Continuation load failed: {err}");
        }
    });
}

// region:    --- Tests

#[cfg(test)]
mod tests {
    type Result<T> = core::result::Result<T, crate::Error>; // For tests.

    use std::sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    };

    use async_trait::async_trait;

    use crate::LoadOutcome;

    use super::*;

    #[derive(Clone, Default)]
    struct FakeList {
        loads: Arc<AtomicUsize>,
        loading: Arc<AtomicBool>,
        exhausted: Arc<AtomicBool>,
    }

    impl FakeList {
        fn loads(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Paginate for FakeList {
        async fn load(&self) -> Result<LoadOutcome> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(LoadOutcome::Loaded { received: 1 })
        }

        fn reset(&self) {}

        fn is_loading(&self) -> bool {
            self.loading.load(Ordering::SeqCst)
        }

        fn has_more(&self) -> bool {
            !self.exhausted.load(Ordering::SeqCst)
        }
    }

    /// Lets spawned observation and load tasks run to their next suspension point.
    async fn settle() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    fn armed(fake: &FakeList, sentinel: &Sentinel) -> ContinuationTrigger<FakeList> {
        let mut trigger = ContinuationTrigger::new(fake.clone(), &PaginationParams::default());
        trigger.arm(sentinel);
        trigger
    }

    #[tokio::test]
    async fn test_trigger_fires_on_threshold_crossing() {
        let fake = FakeList::default();
        let sentinel = Sentinel::new();
        let _trigger = armed(&fake, &sentinel);

        settle().await;
        assert_eq!(0, fake.loads());

        sentinel.report(0.05);
        settle().await;
        assert_eq!(0, fake.loads());

        sentinel.report(0.5);
        settle().await;
        assert_eq!(1, fake.loads());

        // Staying in view is not a new crossing.
        sentinel.report(0.9);
        settle().await;
        assert_eq!(1, fake.loads());

        sentinel.report(0.0);
        settle().await;
        sentinel.report(0.2);
        settle().await;
        assert_eq!(2, fake.loads());
    }

    #[tokio::test]
    async fn test_trigger_fires_when_visible_at_arm() {
        let fake = FakeList::default();
        let sentinel = Sentinel::new();
        sentinel.report(1.0);

        let _trigger = armed(&fake, &sentinel);
        settle().await;

        assert_eq!(1, fake.loads());
    }

    #[tokio::test]
    async fn test_trigger_suspended_while_loading_or_exhausted() {
        let fake = FakeList::default();
        let sentinel = Sentinel::new();
        let _trigger = armed(&fake, &sentinel);

        fake.loading.store(true, Ordering::SeqCst);
        sentinel.report(1.0);
        settle().await;
        assert_eq!(0, fake.loads());

        fake.loading.store(false, Ordering::SeqCst);
        fake.exhausted.store(true, Ordering::SeqCst);
        sentinel.report(0.0);
        settle().await;
        sentinel.report(1.0);
        settle().await;
        assert_eq!(0, fake.loads());
    }

    #[tokio::test]
    async fn test_trigger_out_of_range_threshold_still_fires() {
        let fake = FakeList::default();
        let sentinel = Sentinel::new();

        let params = PaginationParams {
            threshold: 5.0,
            ..Default::default()
        };
        let mut trigger = ContinuationTrigger::new(fake.clone(), &params);
        assert_eq!(1.0, trigger.threshold());

        trigger.arm(&sentinel);
        sentinel.report(1.0);
        settle().await;

        assert_eq!(1, fake.loads());
    }

    #[tokio::test]
    async fn test_trigger_inert_without_infinite_scroll() {
        let fake = FakeList::default();
        let sentinel = Sentinel::new();
        sentinel.report(1.0);

        let params = PaginationParams::default().with_infinite_scroll(false);
        let mut trigger = ContinuationTrigger::new(fake.clone(), &params);
        trigger.arm(&sentinel);
        settle().await;

        assert!(!trigger.is_enabled());
        assert!(!trigger.is_armed());
        assert_eq!(0, fake.loads());
    }

    #[tokio::test]
    async fn test_trigger_disarm_and_drop_stop_observing() {
        let fake = FakeList::default();
        let sentinel = Sentinel::new();

        let mut trigger = armed(&fake, &sentinel);
        settle().await;
        trigger.disarm();
        assert!(!trigger.is_armed());

        sentinel.report(1.0);
        settle().await;
        assert_eq!(0, fake.loads());

        sentinel.report(0.0);
        let trigger = armed(&fake, &sentinel);
        settle().await;
        drop(trigger);

        sentinel.report(1.0);
        settle().await;
        assert_eq!(0, fake.loads());
    }

    #[tokio::test]
    async fn test_trigger_rearm_follows_new_target() {
        let fake = FakeList::default();
        let old_target = Sentinel::new();
        let new_target = Sentinel::new();

        let mut trigger = armed(&fake, &old_target);
        settle().await;
        trigger.set_target(Some(&new_target));
        settle().await;

        old_target.report(1.0);
        settle().await;
        assert_eq!(0, fake.loads());

        new_target.report(1.0);
        settle().await;
        assert_eq!(1, fake.loads());

        trigger.set_target(None);
        assert!(!trigger.is_armed());
    }

    #[tokio::test]
    async fn test_trigger_ends_when_sentinel_removed() {
        let fake = FakeList::default();
        let sentinel = Sentinel::new();

        let mut trigger = armed(&fake, &sentinel);
        settle().await;
        assert!(trigger.is_armed());

        drop(sentinel);
        settle().await;
        assert!(!trigger.is_armed());

        // Re-arming against a fresh target still works.
        let replacement = Sentinel::new();
        trigger.arm(&replacement);
        replacement.report(1.0);
        settle().await;
        assert_eq!(1, fake.loads());
    }

    #[cfg(feature = "cursor")]
    #[tokio::test]
    async fn test_trigger_drives_cursor_engine() -> Result<()> {
        use crate::{cursor::CursorPagination, ApiResponse, Cursor, CursorPage, CursorRequest};

        let feed = CursorPagination::new(|request: CursorRequest| async move {
            let start = match request.cursor {
                Some(Cursor::Id(id)) => id,
                _ => 0,
            };

            Result::Ok(ApiResponse::success(CursorPage {
                content: vec![start, start + 1],
                next_cursor: Some(Cursor::Id(start + 2)),
                has_next: start < 2,
                size: request.size,
            }))
        });

        let sentinel = Sentinel::new();
        let mut trigger = feed.continuation();
        trigger.set_target(Some(&sentinel));

        sentinel.report(1.0);
        settle().await;
        assert_eq!(vec![0, 1], feed.items());

        sentinel.report(0.0);
        settle().await;
        sentinel.report(1.0);
        settle().await;
        assert_eq!(vec![0, 1, 2, 3], feed.items());
        assert!(!feed.has_more());

        // Exhausted: further crossings do nothing.
        sentinel.report(0.0);
        settle().await;
        sentinel.report(1.0);
        settle().await;
        assert_eq!(4, feed.len());

        Ok(())
    }

    #[cfg(feature = "offset")]
    #[tokio::test]
    async fn test_trigger_mounted_on_offset_engine() -> Result<()> {
        use crate::{offset::OffsetPagination, ApiResponse, OffsetPage, OffsetRequest};

        let list = OffsetPagination::new(|request: OffsetRequest| async move {
            Result::Ok(ApiResponse::success(OffsetPage {
                content: vec![request.page],
                page: request.page,
                size: request.size,
                total_elements: 3,
                total_pages: 3,
                has_next: request.page < 2,
                has_previous: request.page > 0,
            }))
        });

        let sentinel = Sentinel::new();
        sentinel.report(1.0);

        let trigger = list.mount(Some(&sentinel));
        settle().await;
        assert!(trigger.is_armed());
        assert_eq!(vec![0], list.items());

        drop(trigger);
        sentinel.report(0.0);
        sentinel.report(1.0);
        settle().await;
        assert_eq!(vec![0], list.items());

        let unmounted = list.mount(None);
        assert!(!unmounted.is_armed());

        Ok(())
    }
}

// endregion: --- Tests
