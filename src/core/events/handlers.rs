use crate::core::events::event::{EventArgs, EventKind};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::warn;

/// Callback invoked with the raw line, the event kind and its payload.
pub type EventHandler =
    Box<dyn Fn(&str, EventKind, &EventArgs) -> anyhow::Result<()> + Send + Sync>;

/// Ordered handler lists, one per [`EventKind`].
#[derive(Default)]
pub struct HandlerRegistry {
    stream: Vec<EventHandler>,
    change: Vec<EventHandler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, kind: EventKind) -> &Vec<EventHandler> {
        match kind {
            EventKind::Stream => &self.stream,
            EventKind::Change => &self.change,
        }
    }

    fn slot_mut(&mut self, kind: EventKind) -> &mut Vec<EventHandler> {
        match kind {
            EventKind::Stream => &mut self.stream,
            EventKind::Change => &mut self.change,
        }
    }

    /// Append a handler; handlers run in the order they were registered.
    pub fn register<F>(&mut self, kind: EventKind, handler: F)
    where
        F: Fn(&str, EventKind, &EventArgs) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.slot_mut(kind).push(Box::new(handler));
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<F>(mut self, kind: EventKind, handler: F) -> Self
    where
        F: Fn(&str, EventKind, &EventArgs) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(kind, handler);
        self
    }

    pub fn len(&self, kind: EventKind) -> usize {
        self.slot(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.stream.is_empty() && self.change.is_empty()
    }

    /// Run every handler for `kind`, returning how many failed.
    ///
    /// Each call is isolated: an error or a panic is logged and the next
    /// handler still runs.
    pub fn dispatch(&self, line: &str, kind: EventKind, args: &EventArgs) -> usize {
        let mut failures = 0;

        for (position, handler) in self.slot(kind).iter().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| handler(line, kind, args))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    failures += 1;
                    warn!("{} handler #{} failed on {:?}: {:#}", kind, position, line, e);
                }
                Err(panic) => {
                    failures += 1;
                    warn!(
                        "{} handler #{} panicked on {:?}: {}",
                        kind,
                        position,
                        line,
                        panic_message(panic.as_ref())
                    );
                }
            }
        }

        failures
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("stream", &self.stream.len())
            .field("change", &self.change.len())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder(log: &Arc<Mutex<Vec<String>>>, name: &'static str) -> EventHandler {
        let log = Arc::clone(log);
        Box::new(move |line, kind, args| {
            log.lock().unwrap().push(format!("{}:{}:{}:{}:{}", name, kind, line, args.index, args.value));
            Ok(())
        })
    }

    #[test]
    fn test_registration_order_is_execution_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HandlerRegistry::new();
        registry.register(EventKind::Stream, recorder(&log, "first"));
        registry.register(EventKind::Stream, recorder(&log, "second"));

        let args = EventArgs { index: 1, value: 0.5 };
        assert_eq!(registry.dispatch("^^stream(1,0.5)", EventKind::Stream, &args), 0);
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "first:stream:^^stream(1,0.5):1:0.5",
                "second:stream:^^stream(1,0.5):1:0.5",
            ]
        );
    }

    #[test]
    fn test_kinds_are_separate() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = HandlerRegistry::new().with(EventKind::Change, recorder(&log, "c"));

        let args = EventArgs { index: 1, value: 1.0 };
        registry.dispatch("^^stream(1,1)", EventKind::Stream, &args);
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(registry.len(EventKind::Change), 1);
        assert_eq!(registry.len(EventKind::Stream), 0);
    }

    #[test]
    fn test_failing_handler_does_not_stop_siblings() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = HandlerRegistry::new()
            .with(EventKind::Change, |_: &str, _: EventKind, _: &EventArgs| {
                Err(anyhow::anyhow!("capture pane closed"))
            })
            .with(EventKind::Change, recorder(&log, "after-error"));

        let args = EventArgs { index: 2, value: 1.0 };
        assert_eq!(registry.dispatch("^^change(2,1)", EventKind::Change, &args), 1);
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_panicking_handler_does_not_stop_siblings() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = HandlerRegistry::new()
            .with(EventKind::Change, |_: &str, _: EventKind, _: &EventArgs| -> anyhow::Result<()> {
                panic!("handler bug")
            })
            .with(EventKind::Change, recorder(&log, "after-panic"));

        let args = EventArgs { index: 1, value: 0.0 };
        assert_eq!(registry.dispatch("^^change(1,0)", EventKind::Change, &args), 1);
        assert_eq!(registry.dispatch("^^change(1,0)", EventKind::Change, &args), 1);
        assert_eq!(log.lock().unwrap().len(), 2);
    }
}
