#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use toolflow_core::executor::{OutputRendererPlugin, RenderEvent};
use toolflow_core::ToolInvocation;

pub fn inv(id: &str, deps: &[&str]) -> ToolInvocation {
    ToolInvocation::new(id, "work").depends_on(deps.iter().copied())
}

/// Shared bookkeeping for tool bodies: in-flight counter, peak, and
/// start/end timestamps per invocation.
#[derive(Clone, Default)]
pub struct Recorder {
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    calls: Arc<AtomicUsize>,
    windows: Arc<Mutex<HashMap<String, (Instant, Instant)>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated I/O-bound tool: sleeps, then returns the lowercase id.
    pub async fn run(&self, invocation: ToolInvocation, delay: Duration) -> Result<Value, String> {
        let started = Instant::now();
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if let Ok(mut windows) = self.windows.lock() {
            windows.insert(invocation.invocation_id.clone(), (started, Instant::now()));
        }
        Ok(json!(invocation.invocation_id.to_lowercase()))
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn window(&self, id: &str) -> (Instant, Instant) {
        self.windows.lock().unwrap()[id]
    }

    /// True when `first` finished before `second` started.
    pub fn finished_before(&self, first: &str, second: &str) -> bool {
        self.window(first).1 <= self.window(second).0
    }
}

/// Renderer that keeps a compact log of every event.
#[derive(Default)]
pub struct RecordingRenderer {
    pub events: Mutex<Vec<String>>,
}

impl RecordingRenderer {
    pub fn log(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl OutputRendererPlugin for RecordingRenderer {
    fn name(&self) -> &str {
        "recording"
    }

    fn format(&self) -> &str {
        "test"
    }

    fn render(&self, event: &RenderEvent) {
        let line = match event {
            RenderEvent::RunStart { .. } => "run.start".to_string(),
            RenderEvent::Plan { .. } => "plan".to_string(),
            RenderEvent::LevelStart { level, .. } => format!("level.start:{level}"),
            RenderEvent::InvocationStart { invocation_id, .. } => {
                format!("invocation.start:{invocation_id}")
            }
            RenderEvent::InvocationComplete { result, .. } => {
                format!("invocation.end:{}", result.invocation_id)
            }
            RenderEvent::LevelEnd { level, .. } => format!("level.end:{level}"),
            RenderEvent::RunEnd { .. } => "run.end".to_string(),
        };
        self.events.lock().unwrap().push(line);
    }
}
