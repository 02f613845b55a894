use std::collections::HashMap;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Terminal progress for one batch: a bar over all invocations plus a
/// spinner per running invocation. A disabled monitor draws nothing.
pub struct ProgressMonitor {
    bars: Option<Bars>,
}

struct Bars {
    multi: MultiProgress,
    overall: ProgressBar,
    running: HashMap<String, ProgressBar>,
    spinner_style: ProgressStyle,
}

impl ProgressMonitor {
    pub fn new(total_invocations: usize, enabled: bool) -> Self {
        if !enabled {
            return Self { bars: None };
        }

        let multi = MultiProgress::new();
        let overall = multi.add(ProgressBar::new(total_invocations as u64));
        overall.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.green/white} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        overall.set_message("planning");

        let spinner_style = ProgressStyle::default_spinner()
            .template("  {spinner:.yellow} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(SPINNER_FRAMES);

        Self {
            bars: Some(Bars {
                multi,
                overall,
                running: HashMap::new(),
                spinner_style,
            }),
        }
    }

    pub fn add_invocation(&mut self, invocation_id: &str) {
        let Some(bars) = self.bars.as_mut() else {
            return;
        };

        let spinner = bars.multi.add(ProgressBar::new_spinner());
        spinner.set_style(bars.spinner_style.clone());
        spinner.set_message(invocation_id.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        bars.running.insert(invocation_id.to_string(), spinner);
    }

    pub fn complete_invocation(&mut self, invocation_id: &str, success: bool, duration_ms: u64) {
        let Some(bars) = self.bars.as_mut() else {
            return;
        };

        if let Some(spinner) = bars.running.remove(invocation_id) {
            let mark = if success { "ok" } else { "failed" };
            spinner.finish_with_message(format!("{invocation_id} {mark} ({duration_ms}ms)"));
        }
        bars.overall.inc(1);
    }

    pub fn update_level(&self, level: usize, total_levels: usize) {
        if let Some(bars) = &self.bars {
            bars.overall
                .set_message(format!("level {}/{}", level + 1, total_levels));
        }
    }

    pub fn finish(&self, success: bool) {
        if let Some(bars) = &self.bars {
            let msg = if success { "done" } else { "done with failures" };
            bars.overall.finish_with_message(msg);
        }
    }

    #[cfg(test)]
    fn running(&self) -> usize {
        self.bars.as_ref().map_or(0, |bars| bars.running.len())
    }
}

impl Drop for ProgressMonitor {
    fn drop(&mut self) {
        if let Some(bars) = self.bars.as_mut() {
            for (_, spinner) in bars.running.drain() {
                spinner.finish_and_clear();
            }
        }
    }
}
