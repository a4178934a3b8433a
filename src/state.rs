//! Loading gate shared by both engines.
//!
//! A gate owns the three flags every paged list needs: whether a fetch is in
//! flight, whether the server reported more data, and the generation counter
//! that invalidates responses issued before a reset.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks an engine state, recovering the data from a poisoned mutex.
pub(crate) fn lock<S>(state: &Mutex<S>) -> MutexGuard<'_, S> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Proof that a fetch was admitted by the gate, tagged with the generation
/// it was issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ticket {
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Gate {
    is_loading: bool,
    has_more: bool,
    generation: u64,
}

impl Default for Gate {
    fn default() -> Self {
        Self {
            is_loading: false,
            has_more: true,
            generation: 0,
        }
    }
}

impl Gate {
    pub(crate) fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub(crate) fn has_more(&self) -> bool {
        self.has_more
    }

    pub(crate) fn set_has_more(&mut self, has_more: bool) {
        self.has_more = has_more;
    }

    /// Admits a continuation fetch unless one is in flight or the list is exhausted.
    pub(crate) fn try_begin(&mut self) -> Option<Ticket> {
        if !self.has_more {
            return None;
        }

        self.try_begin_any()
    }

    /// Admits a fetch unless one is in flight, regardless of exhaustion.
    pub(crate) fn try_begin_any(&mut self) -> Option<Ticket> {
        if self.is_loading {
            return None;
        }

        self.is_loading = true;

        Some(Ticket {
            generation: self.generation,
        })
    }

    /// Whether a response for `ticket` may still be written into the state.
    pub(crate) fn is_current(&self, ticket: Ticket) -> bool {
        self.generation == ticket.generation
    }

    /// Restores `has_more` and starts a new generation. Leaves `is_loading` alone.
    pub(crate) fn reset(&mut self) {
        self.has_more = true;
        self.generation = self.generation.wrapping_add(1);
    }

    fn finish(&mut self) {
        self.is_loading = false;
    }
}

/// Clears the loading flag when dropped.
///
/// Held for the duration of a fetch so the flag is released on success,
/// failure and when the load future itself is dropped mid-flight.
pub(crate) struct LoadingGuard<'a, S>
where
    S: AsMut<Gate>,
{
    state: &'a Mutex<S>,
}

impl<'a, S> LoadingGuard<'a, S>
where
    S: AsMut<Gate>,
{
    pub(crate) fn new(state: &'a Mutex<S>) -> Self {
        Self { state }
    }
}

impl<S> Drop for LoadingGuard<'_, S>
where
    S: AsMut<Gate>,
{
    fn drop(&mut self) {
        lock(self.state).as_mut().finish();
    }
}

// region:    --- Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Holder {
        gate: Gate,
    }

    impl AsMut<Gate> for Holder {
        fn as_mut(&mut self) -> &mut Gate {
            &mut self.gate
        }
    }

    #[test]
    fn test_gate_single_admission() {
        let mut gate = Gate::default();

        assert!(gate.try_begin().is_some());
        assert!(gate.try_begin().is_none());
        assert!(gate.try_begin_any().is_none());
    }

    #[test]
    fn test_gate_exhausted() {
        let mut gate = Gate::default();
        gate.set_has_more(false);

        assert!(gate.try_begin().is_none());
        assert!(!gate.is_loading());
        assert!(gate.try_begin_any().is_some());
    }

    #[test]
    fn test_gate_reset_invalidates_ticket() {
        let mut gate = Gate::default();
        let ticket = gate.try_begin().unwrap();
        gate.set_has_more(false);

        gate.reset();

        assert!(!gate.is_current(ticket));
        assert!(gate.has_more());
        assert!(gate.is_loading());
    }

    #[test]
    fn test_loading_guard_clears_flag() {
        let state = Mutex::new(Holder::default());
        assert!(lock(&state).gate.try_begin().is_some());

        {
            let _guard = LoadingGuard::new(&state);
            assert!(lock(&state).gate.is_loading());
        }

        assert!(!lock(&state).gate.is_loading());
    }
}

// endregion: --- Tests
