//! Terminal output for pipeline stages.
//!
//! Status lines go to stderr so that stdout stays reserved for the upload
//! request/response dump and command results.

use std::io::Write;
use std::time::Duration;

use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};

/// Print a right-aligned stage label followed by a message:
/// `   Packaging 24 entries (3112 bytes)`
pub fn status(label: &str, message: &str) {
    print_status(Style::new().green().bold(), label, message);
}

/// Informational status line (cyan label); nothing was changed on disk.
pub fn status_info(label: &str, message: &str) {
    print_status(Style::new().cyan().bold(), label, message);
}

/// Warning status line (yellow label).
pub fn status_warn(label: &str, message: &str) {
    print_status(Style::new().yellow().bold(), label, message);
}

fn print_status(style: Style, label: &str, message: &str) {
    let _ = writeln!(std::io::stderr(), "{:>12} {message}", style.apply_to(label));
}

/// Spinner for work of unknown length, such as running the signer.
///
/// Hidden when stderr is not a terminal so CI logs stay free of redraws.
/// Finish it with [`ProgressBar::finish_and_clear`].
pub fn spinner(message: &str) -> ProgressBar {
    if !Term::stderr().is_term() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
