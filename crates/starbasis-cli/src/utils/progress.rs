use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use starbasis::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const SPINNER_TICK_MS: u64 = 80;
const SPINNER_TEMPLATE: &str = "{spinner:.green} {prefix:.bold} {msg}";
const WAVE_BAR_TEMPLATE: &str =
    "  {prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} waves ({per_sec})";

struct ActivePhase {
    name: &'static str,
    started: Instant,
}

/// Renders domain setup and field conversion on stderr.
///
/// Each phase is a spinner labelled with the phase name. Wave classification
/// inside star construction switches it to a bar counting classified waves.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: ProgressBar,
    phase: Arc<Mutex<Option<ActivePhase>>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(spinner_style());
        Self {
            bar,
            phase: Arc::new(Mutex::new(None)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let handler = self.clone();
        Box::new(move |progress: Progress| handler.handle(progress))
    }

    fn handle(&self, progress: Progress) {
        let Ok(mut phase) = self.phase.lock() else {
            warn!("Progress state mutex was poisoned. Cannot update progress.");
            return;
        };

        match progress {
            Progress::PhaseStart { name } => {
                *phase = Some(ActivePhase {
                    name,
                    started: Instant::now(),
                });
                self.bar.reset();
                self.bar.set_length(0);
                self.bar.set_style(spinner_style());
                self.bar.set_prefix(name);
                self.bar.set_message("");
                self.bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
            }
            Progress::PhaseFinish => {
                self.bar.disable_steady_tick();
                let message = match phase.take() {
                    Some(done) => {
                        let elapsed = done.started.elapsed();
                        debug!(phase = done.name, elapsed = ?elapsed, "Phase finished.");
                        format!("✓ {:.2?}", elapsed)
                    }
                    None => "✓".to_string(),
                };
                self.bar.set_style(spinner_style());
                self.bar.finish_with_message(message);
            }
            Progress::TaskStart { total_steps } => {
                self.bar.disable_steady_tick();
                self.bar.set_style(wave_bar_style());
                self.bar.set_length(total_steps);
                self.bar.set_position(0);
            }
            Progress::TaskAdvance { steps } => self.bar.inc(steps),
            Progress::TaskFinish => {
                if let Some(total) = self.bar.length() {
                    self.bar.set_position(total);
                }
            }
            Progress::Message(message) => self.bar.println(format!("  {message}")),
        }
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn wave_bar_style() -> ProgressStyle {
    ProgressStyle::with_template(WAVE_BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn hidden() -> CliProgressHandler {
        CliProgressHandler::with_target(ProgressDrawTarget::hidden())
    }

    #[test]
    fn star_construction_counts_classified_waves() {
        let handler = hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "Star construction",
        });
        assert_eq!(handler.bar.prefix(), "Star construction");
        assert!(handler.phase.lock().unwrap().is_some());

        callback(Progress::TaskStart { total_steps: 144 });
        callback(Progress::TaskAdvance { steps: 12 });
        callback(Progress::TaskAdvance { steps: 6 });
        assert_eq!(handler.bar.length(), Some(144));
        assert_eq!(handler.bar.position(), 18);

        callback(Progress::TaskFinish);
        assert_eq!(handler.bar.position(), 144);
        assert!(!handler.bar.is_finished());

        callback(Progress::PhaseFinish);
        assert!(handler.bar.is_finished());
        assert!(handler.bar.message().starts_with('✓'));
        assert!(handler.phase.lock().unwrap().is_none());
    }

    #[test]
    fn next_phase_restarts_the_spinner() {
        let handler = hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "Reading basis field",
        });
        callback(Progress::PhaseFinish);
        callback(Progress::PhaseStart {
            name: "Synthesizing DFT",
        });
        assert!(!handler.bar.is_finished());
        assert_eq!(handler.bar.prefix(), "Synthesizing DFT");
        assert_eq!(handler.bar.message(), "");
    }

    #[test]
    fn callback_can_be_sent_to_worker_threads() {
        let handler = hidden();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart {
                name: "Writing k-grid field",
            });
            callback(Progress::Message("320 slots".to_string()));
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        assert!(handler.bar.is_finished());
        assert_eq!(handler.bar.prefix(), "Writing k-grid field");
    }
}
