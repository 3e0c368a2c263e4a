use std::sync::OnceLock;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

const TICK_INTERVAL: Duration = Duration::from_millis(100);

static SPINNER: OnceLock<ProgressBar> = OnceLock::new();

pub fn get_spinner() -> &'static ProgressBar {
    SPINNER.get_or_init(init_spinner)
}

fn init_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ]));
    }
    pb
}

/// Shows the spinner until [`stop`] is called.
pub fn start(remaining: Duration) {
    let pb = get_spinner();
    pb.enable_steady_tick(TICK_INTERVAL);
    pb.set_message(format!(
        "Listening for {:.1}s, press {} to finish early",
        remaining.as_secs_f64(),
        "Ctrl-C".bold()
    ));
}

pub fn report_progress(discoveries: usize, errors: usize) {
    let mut msg = format!("Collected {} responses so far...", discoveries.to_string().green().bold());
    if errors > 0 {
        msg.push_str(&format!(" ({} errors)", errors.to_string().red()));
    }
    get_spinner().set_message(msg);
}

pub fn stop() {
    get_spinner().finish_and_clear();
}

/// Writes to stdout without tearing the spinner.
pub fn println_out(msg: &str) {
    get_spinner().suspend(|| println!("{msg}"));
}

/// Writes to stderr without tearing the spinner.
pub fn println_err(msg: &str) {
    get_spinner().suspend(|| eprintln!("{msg}"));
}

/// Log sink for the tracing subscriber.
pub struct SpinnerWriter;

impl std::io::Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf);
        println_err(msg.trim_end());
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
