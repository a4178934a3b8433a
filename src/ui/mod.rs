//! Shared UI state registries
//!
//! This module provides the small pieces of view state several screens share:
//! a dialog stack, a bottom-sheet stack, a toast slot and the embedding
//! context. They are built once through [`AppState`] and handed to consumers
//! by reference instead of living in globals.
//!
//! # Modules
//!
//! - `modal`: `ModalStack` for alert and confirm dialogs.
//! - `sheet`: `SheetStack` for bottom sheets.
//! - `toast`: `Toast`, a self-hiding single message slot.
//! - `embed`: `EmbedContext`, iframe detection and the parent-window bridge.

// region:    --- Modules

mod embed;
mod modal;
mod sheet;
mod toast;

pub use embed::{EmbedContext, EmbedFlags, EmbedMessage, Messenger};
pub use modal::{ModalEntry, ModalKind, ModalStack};
pub use sheet::{SheetEntry, SheetParams, SheetStack};
pub use toast::{Toast, ToastParams};

// endregion: --- Modules

use std::sync::Arc;

/// Application-wide UI state, created once at start-up and shared by `Arc`.
#[derive(Debug)]
pub struct AppState {
    pub modals: ModalStack,
    pub sheets: SheetStack,
    pub toast: Toast,
    pub embed: EmbedContext,
}

impl AppState {
    pub fn new(messenger: impl Messenger + 'static) -> Arc<Self> {
        Self::with_params(messenger, SheetParams::default(), ToastParams::default())
    }

    pub fn with_params(
        messenger: impl Messenger + 'static,
        sheet_params: SheetParams,
        toast_params: ToastParams,
    ) -> Arc<Self> {
        Arc::new(Self {
            modals: ModalStack::new(),
            sheets: SheetStack::new(sheet_params),
            toast: Toast::new(toast_params),
            embed: EmbedContext::new(messenger),
        })
    }
}
