use std::sync::{Arc, Mutex};

/// Append-only text consumer for device and session output.
///
/// Called from both the foreground and the background task, so
/// implementations handle their own synchronization.
pub trait Sink: Send + Sync {
    fn show(&self, text: &str);
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn show(&self, text: &str) {
        (**self).show(text)
    }
}

/// Sink that keeps everything it is shown, one entry per call.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn contents(&self) -> String {
        self.entries().concat()
    }
}

impl Sink for MemorySink {
    fn show(&self, text: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(text.to_string());
        }
    }
}
