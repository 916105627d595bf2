//! Call logs and call counters

use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use weave_composition::Invocation;
use weave_core::WeaveResult;

/// Render a method argument for a log line: strings bare, everything else as JSON
pub fn arg_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Shared, ordered log of method calls
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line
    pub fn push(&self, line: impl Into<String>) {
        self.entries.lock().push(line.into());
    }

    /// Copy of all lines so far
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Drop every line
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True when nothing has been logged
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Method body that logs `"<tag>=<first arg>"` and returns null
    pub fn recorder(
        &self,
        tag: &str,
    ) -> impl Fn(&Invocation<'_>, &[Value]) -> WeaveResult<Value> + Send + Sync + 'static {
        let log = self.clone();
        let tag = tag.to_string();
        move |_inv, args| {
            let x = args.first().map(arg_text).unwrap_or_default();
            log.push(format!("{tag}={x}"));
            Ok(Value::Null)
        }
    }
}

/// Counts how many times a method body ran
#[derive(Debug, Clone, Default)]
pub struct CallCounter {
    hits: Arc<AtomicUsize>,
}

impl CallCounter {
    /// Counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Method body that bumps the counter and returns null
    pub fn method(
        &self,
    ) -> impl Fn(&Invocation<'_>, &[Value]) -> WeaveResult<Value> + Send + Sync + 'static {
        let hits = self.hits.clone();
        move |_inv, _args| {
            hits.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Null)
        }
    }
}
