use std::sync::OnceLock;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::Result;

/// Envelope posted to the embedding window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Value,
}

/// Cross-window bridge to the page embedding this application.
pub trait Messenger: Send + Sync {
    fn post(&self, message: &EmbedMessage) -> Result<()>;
}

impl<F> Messenger for F
where
    F: Fn(&EmbedMessage) -> Result<()> + Send + Sync,
{
    fn post(&self, message: &EmbedMessage) -> Result<()> {
        (self)(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedFlags {
    pub is_iframe: bool,
    pub is_fullpage: bool,
}

/// Whether the application runs inside a third-party frame, and the bridge
/// used to talk to that frame's parent.
///
/// The flags are unknown until [`EmbedContext::detect`] runs. Detection
/// happens once; later calls return the first result.
pub struct EmbedContext {
    flags: OnceLock<EmbedFlags>,
    messenger: Box<dyn Messenger>,
}

impl EmbedContext {
    pub fn new(messenger: impl Messenger + 'static) -> Self {
        Self {
            flags: OnceLock::new(),
            messenger: Box::new(messenger),
        }
    }

    /// Records the host facts: whether the window is nested in another one,
    /// and the page query string (`isFullpage=true` marks full-page mode).
    pub fn detect(&self, is_nested: bool, query: &str) -> EmbedFlags {
        *self.flags.get_or_init(|| {
            let flags = EmbedFlags {
                is_iframe: is_nested,
                is_fullpage: query.contains("isFullpage=true"),
            };
            debug!("Embedding detected: {flags:?}");
            flags
        })
    }

    pub fn flags(&self) -> Option<EmbedFlags> {
        self.flags.get().copied()
    }

    pub fn is_iframe(&self) -> Option<bool> {
        self.flags().map(|f| f.is_iframe)
    }

    pub fn is_fullpage(&self) -> Option<bool> {
        self.flags().map(|f| f.is_fullpage)
    }

    /// Posts `{ type, data }` to the parent window when embedded.
    ///
    /// Returns whether a message was handed to the messenger. Messenger
    /// failures are logged and swallowed.
    pub fn post_message(&self, kind: &str, data: Value) -> bool {
        if self.is_iframe() != Some(true) {
            return false;
        }

        let message = EmbedMessage {
            kind: kind.to_string(),
            data,
        };

        if let Err(err) = self.messenger.post(&message) {
            warn!("Post message failed: {err}");
            return false;
        }

        true
    }
}

impl std::fmt::Debug for EmbedContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbedContext")
            .field("flags", &self.flags.get())
            .finish_non_exhaustive()
    }
}

// region:    --- Tests

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use crate::Error;

    use super::*;

    fn recording() -> (EmbedContext, Arc<Mutex<Vec<EmbedMessage>>>) {
        let sent: Arc<Mutex<Vec<EmbedMessage>>> = Arc::default();
        let sink = sent.clone();

        let context = EmbedContext::new(move |message: &EmbedMessage| -> Result<()> {
            sink.lock().unwrap().push(message.clone());
            Ok(())
        });

        (context, sent)
    }

    #[test]
    fn test_embed_detect_once() {
        let (context, _) = recording();
        assert_eq!(None, context.flags());

        let flags = context.detect(true, "?isFullpage=true&lang=ko");
        let again = context.detect(false, "");

        assert_eq!(flags, again);
        assert_eq!(Some(true), context.is_iframe());
        assert_eq!(Some(true), context.is_fullpage());
    }

    #[test]
    fn test_embed_post_only_when_embedded() {
        let (top_level, sent) = recording();
        assert!(!top_level.post_message("resize", json!({ "height": 640 })));

        top_level.detect(false, "");
        assert!(!top_level.post_message("resize", json!({ "height": 640 })));
        assert!(sent.lock().unwrap().is_empty());

        let (embedded, sent) = recording();
        embedded.detect(true, "");
        assert!(embedded.post_message("resize", json!({ "height": 640 })));

        let sent = sent.lock().unwrap();
        assert_eq!("resize", sent[0].kind);
        assert_eq!(
            r#"{"type":"resize","data":{"height":640}}"#,
            serde_json::to_string(&sent[0]).unwrap()
        );
    }

    #[test]
    fn test_embed_messenger_failure_swallowed() {
        let context = EmbedContext::new(|_: &EmbedMessage| -> Result<()> {
            Err(Error::network("parent gone"))
        });
        context.detect(true, "");

        assert!(!context.post_message("close", Value::Null));
    }
}

// endregion: --- Tests
