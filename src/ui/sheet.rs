use std::sync::{
    atomic::{AtomicU64, Ordering},
    Mutex,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::lock;

impl Default for SheetParams {
    fn default() -> Self {
        Self { default_height: 50 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SheetParams {
    /// Height used when a sheet is opened without one, in viewport percent.
    pub default_height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetEntry {
    pub id: u64,
    pub kind: String,
    pub props: Value,
    pub height: u32,
}

/// Stack of open bottom sheets. The most recently opened sheet is on top.
#[derive(Debug, Default)]
pub struct SheetStack {
    params: SheetParams,
    next_id: AtomicU64,
    sheets: Mutex<Vec<SheetEntry>>,
}

impl SheetStack {
    pub fn new(params: SheetParams) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    /// Opens a sheet and returns its id. Missing props default to an empty object.
    pub fn open(&self, kind: impl Into<String>, props: Option<Value>, height: Option<u32>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;

        lock(&self.sheets).push(SheetEntry {
            id,
            kind: kind.into(),
            props: props.unwrap_or_else(|| Value::Object(Default::default())),
            height: height.unwrap_or(self.params.default_height),
        });

        id
    }

    pub fn close(&self, id: u64) -> bool {
        let mut sheets = lock(&self.sheets);
        let Some(index) = sheets.iter().position(|s| s.id == id) else {
            return false;
        };

        sheets.remove(index);
        true
    }

    /// Closes the topmost sheet, returning it.
    pub fn close_top(&self) -> Option<SheetEntry> {
        lock(&self.sheets).pop()
    }

    pub fn top(&self) -> Option<SheetEntry> {
        lock(&self.sheets).last().cloned()
    }

    pub fn has_sheet(&self) -> bool {
        !lock(&self.sheets).is_empty()
    }

    pub fn list(&self) -> Vec<SheetEntry> {
        lock(&self.sheets).clone()
    }
}

// region:    --- Tests

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_sheet_open_defaults() {
        let sheets = SheetStack::new(SheetParams { default_height: 70 });

        let id = sheets.open("comment", None, None);
        let sheet = sheets.top().unwrap();

        assert_eq!(id, sheet.id);
        assert_eq!(json!({}), sheet.props);
        assert_eq!(70, sheet.height);
    }

    #[test]
    fn test_sheet_close_top_pops_latest() {
        let sheets = SheetStack::default();
        let comment = sheets.open("comment", Some(json!({ "postId": 3 })), None);
        let like = sheets.open("like", None, Some(30));

        assert_eq!(Some(like), sheets.close_top().map(|s| s.id));
        assert_eq!(Some(comment), sheets.top().map(|s| s.id));

        assert!(sheets.close(comment));
        assert!(!sheets.close(comment));
        assert!(!sheets.has_sheet());
        assert_eq!(None, sheets.close_top());
    }
}

// endregion: --- Tests
