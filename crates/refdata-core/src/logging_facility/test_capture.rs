//! In-memory event capture.
//!
//! Tests assert on captured lifecycle events. The same capture feeds the
//! `logging.txt` blob: a test drains the events of its own targets with
//! [`TestCapture::take_log_lines`] and stores the rendering next to its
//! generated files.

use crate::schema::field;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

type Sink = Arc<Mutex<Vec<CapturedEvent>>>;

/// One captured event. Every field value is stored in its display form.
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub component: Option<String>,
    pub op: Option<String>,
    pub event: Option<String>,
    pub message: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

#[derive(Default)]
struct FieldMap(HashMap<String, String>);

impl Visit for FieldMap {
    fn record_str(&mut self, f: &Field, value: &str) {
        self.0.insert(f.name().to_string(), value.to_string());
    }

    // Integers and bools arrive here too; their Debug form is their value.
    fn record_debug(&mut self, f: &Field, value: &dyn std::fmt::Debug) {
        self.0.insert(f.name().to_string(), format!("{:?}", value));
    }
}

/// Layer pushing every event into a shared sink.
pub struct TestCaptureLayer {
    sink: Sink,
}

impl TestCaptureLayer {
    pub fn new() -> (Self, TestCapture) {
        let sink: Sink = Arc::default();
        (Self { sink: sink.clone() }, TestCapture { sink })
    }
}

impl<S> Layer<S> for TestCaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, ev: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut map = FieldMap::default();
        ev.record(&mut map);
        let fields = map.0;
        let meta = ev.metadata();

        let captured = CapturedEvent {
            level: *meta.level(),
            target: meta.target().to_string(),
            component: fields.get(field::COMPONENT).cloned(),
            op: fields.get(field::OP).cloned(),
            event: fields.get(field::EVENT).cloned(),
            message: fields.get(field::MESSAGE).cloned(),
            fields,
        };
        if let Ok(mut events) = self.sink.lock() {
            events.push(captured);
        }
    }
}

/// Handle on the captured events.
#[derive(Clone)]
pub struct TestCapture {
    sink: Sink,
}

impl TestCapture {
    fn lock(&self) -> Option<MutexGuard<'_, Vec<CapturedEvent>>> {
        self.sink.lock().ok()
    }

    /// Snapshot of every event captured so far.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// # Panics
    ///
    /// Panics if no event has both `op` and `event`.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let events = self.events();
        assert!(
            events
                .iter()
                .any(|e| e.op.as_deref() == Some(op) && e.event.as_deref() == Some(event)),
            "no {} event for op {} among {} captured events",
            event,
            op,
            events.len()
        );
    }

    pub fn clear(&self) {
        if let Some(mut events) = self.lock() {
            events.clear();
        }
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.lock()
            .map(|e| e.iter().filter(|ev| predicate(ev)).count())
            .unwrap_or(0)
    }

    /// Remove the events whose target starts with `target_prefix` and render
    /// them for `logging.txt`. Other events stay captured.
    pub fn take_log_lines(&self, target_prefix: &str) -> String {
        let taken: Vec<CapturedEvent> = match self.lock() {
            Some(mut events) => {
                let (taken, kept) = events
                    .drain(..)
                    .partition(|e| e.target.starts_with(target_prefix));
                *events = kept;
                taken
            }
            None => Vec::new(),
        };
        render_log_lines(&taken)
    }
}

/// One `LEVEL  target  message` line per event, level padded to 7 columns.
pub fn render_log_lines(events: &[CapturedEvent]) -> String {
    events
        .iter()
        .map(|e| {
            format!(
                "{:7}  {}  {}\n",
                e.level.as_str(),
                e.target,
                e.message.as_deref().unwrap_or_default()
            )
        })
        .collect()
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer as the global subscriber (once per process)
/// and return a handle to it.
///
/// ```
/// use refdata_core::logging_facility::init_test_capture;
/// use refdata_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("compare_paths");
/// capture.assert_event_exists("compare_paths", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let (layer, capture) = TestCaptureLayer::new();
            if tracing_subscriber::registry().with(layer).try_init().is_err() {
                tracing::debug!("global subscriber already set, capture stays empty");
            }
            capture
        })
        .clone()
}
