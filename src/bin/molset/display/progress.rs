use std::io::{self, Write};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

const SPINNER_TEMPLATE: &str = "  {spinner:.cyan} {msg}";

pub struct StepSpinner {
    bar: Option<ProgressBar>,
    start: Instant,
    step: u8,
    total_steps: u8,
    step_start: Instant,
}

impl StepSpinner {
    pub fn new(total_steps: u8) -> Self {
        let now = Instant::now();
        Self {
            bar: None,
            start: now,
            step: 0,
            total_steps,
            step_start: now,
        }
    }

    pub fn step(&mut self, description: &str) {
        self.clear();
        self.step += 1;
        self.step_start = Instant::now();

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template(SPINNER_TEMPLATE) {
            bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        bar.enable_steady_tick(Duration::from_millis(80));
        bar.set_message(format!(
            "[{}/{}] {}...",
            self.step, self.total_steps, description
        ));
        self.bar = Some(bar);
    }

    pub fn complete_step(&mut self, description: &str, details: &[String]) {
        self.clear();

        let elapsed = self.step_start.elapsed();
        let mut stderr = io::stderr().lock();
        let _ = writeln!(
            stderr,
            "  \x1b[32m✓\x1b[0m {:<44} {:>5.1}s",
            description,
            elapsed.as_secs_f64()
        );
        for detail in details {
            let _ = writeln!(stderr, "      \x1b[2m·\x1b[0m {}", detail);
        }
    }

    pub fn finish(mut self, label: &str) {
        self.clear();

        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr);
        let _ = writeln!(
            stderr,
            "  \x1b[32m✓\x1b[0m {:<20} {:>30}",
            label,
            format!("Total: {:.2}s", self.start.elapsed().as_secs_f64())
        );
        let _ = writeln!(stderr);
    }

    fn clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// Step reporting that shows spinners on a terminal and nothing otherwise.
pub enum Progress {
    Interactive(StepSpinner),
    Silent,
}

impl Progress {
    pub fn new(interactive: bool, total_steps: u8) -> Self {
        if interactive {
            Self::Interactive(StepSpinner::new(total_steps))
        } else {
            Self::Silent
        }
    }

    pub fn step(&mut self, description: &str) {
        if let Self::Interactive(s) = self {
            s.step(description);
        }
    }

    pub fn complete_step(&mut self, description: &str, details: &[String]) {
        if let Self::Interactive(s) = self {
            s.complete_step(description, details);
        }
    }

    pub fn finish(self, label: &str) {
        if let Self::Interactive(s) = self {
            s.finish(label);
        }
    }
}
