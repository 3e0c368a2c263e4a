use std::time::Duration;

use colored::*;
use lanprobe_common::error::ScanError;
use unicode_width::UnicodeWidthStr;

use crate::terminal::{colors, spinner};

pub const TOTAL_WIDTH: usize = 64;

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg.to_uppercase());
    let msg_len: usize = UnicodeWidthStr::width(formatted.as_str());

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: String = format!(
        "{}{}{}",
        "─".repeat(left).color(colors::SEPARATOR),
        formatted.color(colors::PRIMARY),
        "─".repeat(right).color(colors::SEPARATOR)
    );
    spinner::println_err(&line);
}

/// One result line on stdout, exactly as the scanner formatted it.
pub fn discovery(message: &str) {
    spinner::println_out(message);
}

pub fn error(err: &ScanError) {
    spinner::println_out(&format!("{} {}", "Error:".color(colors::ERROR).bold(), err));
}

pub fn summary(discoveries: usize, errors: usize, elapsed: Duration) {
    let found: ColoredString = format!("{discoveries} responses").bold().color(colors::PRIMARY);
    let took: ColoredString = format!("{:.2}s", elapsed.as_secs_f64()).bold().color(colors::ACCENT);
    let mut output: String = format!("Scan complete: {found} in {took}");
    if errors > 0 {
        output.push_str(&format!(", {} errors", errors.to_string().color(colors::ERROR)));
    }

    spinner::println_err(&format!("{}", "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR)));
    spinner::println_err(&output.color(colors::TEXT_DEFAULT).to_string());
}
