use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use pepsurf::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

struct BarState {
    pb: ProgressBar,
    phase: Option<&'static str>,
}

/// Renders engine progress events on stderr: a spinner per phase, and a bar
/// for any counted task inside it.
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
        let pb = ProgressBar::new(0).with_style(Self::spinner_style());
        pb.set_draw_target(target);
        pb.finish_and_clear();

        Self {
            state: Arc::new(Mutex::new(BarState { pb, phase: None })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = Arc::clone(&self.state);

        Box::new(move |progress: Progress| {
            let Ok(mut guard) = state.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };
            let BarState { pb, phase } = &mut *guard;

            match progress {
                Progress::PhaseStart { name } => {
                    *phase = Some(name);
                    pb.reset();
                    pb.set_length(0);
                    pb.set_style(Self::spinner_style());
                    pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb.set_message(name);
                }
                Progress::PhaseFinish => {
                    pb.disable_steady_tick();
                    let label = phase.take().unwrap_or("Done");
                    pb.finish_with_message(format!("✓ {label}"));
                }
                Progress::TaskStart { total_steps } => {
                    pb.disable_steady_tick();
                    pb.reset();
                    pb.set_length(total_steps);
                    pb.set_position(0);
                    pb.set_style(Self::bar_style());
                    pb.set_message(phase.unwrap_or("Working"));
                }
                Progress::TaskIncrement => pb.inc(1),
                Progress::TaskFinish => {
                    let length = pb.length().unwrap_or(0);
                    if pb.position() < length {
                        pb.set_position(length);
                    }
                    pb.finish();
                }
                Progress::Message(msg) => {
                    if pb.is_finished() {
                        pb.set_message(msg);
                    } else {
                        pb.println(format!("  {msg}"));
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<20} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key("eta", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
            })
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn snapshot(handler: &CliProgressHandler) -> (Option<u64>, u64, bool, String) {
        let guard = handler.state.lock().unwrap();
        (
            guard.pb.length(),
            guard.pb.position(),
            guard.pb.is_finished(),
            guard.pb.message(),
        )
    }

    #[test]
    fn handler_initializes_in_a_clean_state() {
        let handler = CliProgressHandler::hidden();
        let (length, _, finished, _) = snapshot(&handler);
        assert_eq!(length, Some(0));
        assert!(finished);
    }

    #[test]
    fn scoring_phase_drives_the_bar() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "Peptide Scoring",
        });
        let (length, _, finished, message) = snapshot(&handler);
        assert_eq!(message, "Peptide Scoring");
        assert!(!finished);
        assert_eq!(length, Some(0));

        callback(Progress::TaskStart { total_steps: 3 });
        assert_eq!(snapshot(&handler).0, Some(3));
        assert_eq!(snapshot(&handler).3, "Peptide Scoring");

        callback(Progress::TaskIncrement);
        assert_eq!(snapshot(&handler).1, 1);

        callback(Progress::TaskFinish);
        let (_, position, finished, _) = snapshot(&handler);
        assert!(finished);
        assert_eq!(position, 3);

        callback(Progress::PhaseFinish);
        assert_eq!(snapshot(&handler).3, "✓ Peptide Scoring");
    }

    #[test]
    fn callback_is_thread_safe() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart {
                name: "Binding Pockets",
            });
            callback(Progress::TaskIncrement);
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        let (_, _, finished, message) = snapshot(&handler);
        assert!(finished);
        assert_eq!(message, "✓ Binding Pockets");
    }
}
