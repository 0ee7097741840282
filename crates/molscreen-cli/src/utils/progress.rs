use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use molscreen::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

struct BarState {
    bar: ProgressBar,
    phase: String,
    skipped: usize,
}

impl BarState {
    fn refresh_message(&self) {
        if self.skipped == 0 {
            self.bar.set_message(self.phase.clone());
        } else {
            self.bar
                .set_message(format!("{} ({} skipped)", self.phase, self.skipped));
        }
    }

    fn handle(&mut self, progress: Progress) {
        match progress {
            Progress::PhaseStart { name } => {
                self.phase = name.to_string();
                self.skipped = 0;
                self.bar.reset();
                self.bar.set_length(0);
                self.bar.set_style(spinner_style());
                self.bar
                    .enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                self.refresh_message();
            }
            Progress::PhaseFinish => {
                self.bar.disable_steady_tick();
                self.bar.finish_with_message(format!("✓ {}", self.phase));
            }
            Progress::TaskStart { total_steps } => {
                self.bar.disable_steady_tick();
                self.bar.reset();
                self.bar.set_length(total_steps);
                self.bar.set_position(0);
                self.bar.set_style(bar_style());
            }
            Progress::TaskIncrement => self.bar.inc(1),
            Progress::TaskFinish => {
                let length = self.bar.length().unwrap_or(0);
                if self.bar.position() < length {
                    self.bar.set_position(length);
                }
                self.bar.finish();
            }
            Progress::EntitySkipped { name, reason } => {
                self.skipped += 1;
                self.bar.println(format!("  ⚠ {}: {}", name, reason));
                self.refresh_message();
            }
        }
    }
}

/// Renders workflow [`Progress`] events as one stderr spinner/bar, counting skipped
/// entities as they are reported.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<BarState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::new(0).with_style(spinner_style());
        bar.set_draw_target(target);
        bar.finish_and_clear();

        Self {
            state: Arc::new(Mutex::new(BarState {
                bar,
                phase: String::new(),
                skipped: 0,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();
        Box::new(move |progress: Progress| {
            let Ok(mut guard) = state.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };
            guard.handle(progress);
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<32} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key(
            "eta",
            |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
            },
        )
        .progress_chars("##-")
}
