use std::{
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
};

use serde::Serialize;
use tokio::sync::oneshot;

use crate::{state::lock, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalKind {
    Alert,
    Confirm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalEntry {
    pub id: u64,
    pub kind: ModalKind,
    pub title: String,
    pub message: String,
}

#[derive(Debug)]
struct PendingModal {
    entry: ModalEntry,
    reply: oneshot::Sender<bool>,
}

/// Stack of open alert and confirm dialogs.
///
/// Opening a dialog returns a future that resolves once the view closes it.
/// Dialogs dropped without being closed resolve with [`Error::Closed`].
#[derive(Debug, Default)]
pub struct ModalStack {
    next_id: AtomicU64,
    modals: Mutex<Vec<PendingModal>>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, kind: ModalKind, title: &str, message: &str) -> oneshot::Receiver<bool> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let (reply, confirmed) = oneshot::channel();

        lock(&self.modals).push(PendingModal {
            entry: ModalEntry {
                id,
                kind,
                title: title.to_string(),
                message: message.to_string(),
            },
            reply,
        });

        confirmed
    }

    /// Opens an alert. The future resolves when the alert is closed, however it was closed.
    pub fn alert(&self, title: &str, message: &str) -> impl Future<Output = Result<()>> {
        let confirmed = self.push(ModalKind::Alert, title, message);

        async move { confirmed.await.map(|_| ()).map_err(|_| Error::Closed) }
    }

    /// Opens a confirm dialog. The future resolves with the user's choice.
    pub fn confirm(&self, title: &str, message: &str) -> impl Future<Output = Result<bool>> {
        let confirmed = self.push(ModalKind::Confirm, title, message);

        async move { confirmed.await.map_err(|_| Error::Closed) }
    }

    /// Closes the dialog with `id`, resolving its future with `confirmed`.
    /// Returns `false` when no such dialog is open.
    pub fn close(&self, id: u64, confirmed: bool) -> bool {
        let pending = {
            let mut modals = lock(&self.modals);
            let Some(index) = modals.iter().position(|m| m.entry.id == id) else {
                return false;
            };
            modals.remove(index)
        };

        // The opener may have stopped waiting.
        _ = pending.reply.send(confirmed);

        true
    }

    /// Drops every open dialog; their futures resolve with [`Error::Closed`].
    pub fn clear(&self) {
        lock(&self.modals).clear();
    }

    pub fn top(&self) -> Option<ModalEntry> {
        lock(&self.modals).last().map(|m| m.entry.clone())
    }

    pub fn list(&self) -> Vec<ModalEntry> {
        lock(&self.modals).iter().map(|m| m.entry.clone()).collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.modals).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.modals).is_empty()
    }
}

// region:    --- Tests

#[cfg(test)]
mod tests {
    type Result<T> = core::result::Result<T, crate::Error>; // For tests.

    use super::*;

    #[tokio::test]
    async fn test_modal_confirm_resolves_choice() -> Result<()> {
        let modals = ModalStack::new();

        let first = modals.confirm("Delete", "Delete this coupon?");
        let second = modals.confirm("Leave", "Discard changes?");

        let ids: Vec<u64> = modals.list().iter().map(|m| m.id).collect();
        assert_eq!(vec![1, 2], ids);
        assert_eq!(Some(2), modals.top().map(|m| m.id));

        assert!(modals.close(2, false));
        assert!(modals.close(1, true));
        assert!(!modals.close(1, true));

        assert!(first.await?);
        assert!(!second.await?);
        assert!(modals.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_modal_alert_resolves_on_close() -> Result<()> {
        let modals = ModalStack::new();

        let alert = modals.alert("Error", "Network unavailable");
        let entry = modals.top().unwrap();
        assert_eq!(ModalKind::Alert, entry.kind);

        modals.close(entry.id, false);
        alert.await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_modal_cleared_resolves_closed() {
        let modals = ModalStack::new();
        let confirm = modals.confirm("Title", "Message");

        modals.clear();

        assert!(matches!(confirm.await, Err(Error::Closed)));
    }
}

// endregion: --- Tests
