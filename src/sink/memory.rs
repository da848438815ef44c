//! In-memory sink, shareable between the client actor and its observers

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use super::{DisplaySink, Panel};

#[derive(Debug, Default)]
struct Inner {
    /// Newest first, like a prepended log
    notices: Vec<String>,
    panels: HashMap<Panel, String>,
    panel_updates: HashMap<Panel, usize>,
}

/// Sink that keeps the latest panel contents and the notification log
///
/// Clones share the same storage, so a clone handed to the client can be
/// inspected from elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    inner: Arc<Mutex<Inner>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notification log, newest first
    pub fn notices(&self) -> Vec<String> {
        self.inner.lock().notices.clone()
    }

    pub fn panel(&self, panel: Panel) -> Option<String> {
        self.inner.lock().panels.get(&panel).cloned()
    }

    /// How many times a panel has been written
    pub fn update_count(&self, panel: Panel) -> usize {
        self.inner.lock().panel_updates.get(&panel).copied().unwrap_or(0)
    }
}

impl DisplaySink for MemorySink {
    fn show_connected(&mut self, message: &str) {
        let mut inner = self.inner.lock();
        inner.notices.clear();
        inner.notices.push(message.to_string());
    }

    fn notify(&mut self, message: &str) {
        self.inner.lock().notices.insert(0, message.to_string());
    }

    fn show(&mut self, panel: Panel, content: &str) {
        let mut inner = self.inner.lock();
        inner.panels.insert(panel, content.to_string());
        *inner.panel_updates.entry(panel).or_default() += 1;
    }
}
