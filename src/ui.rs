// UI module for consistent terminal output with progress bars and styling

#![allow(clippy::print_stdout, clippy::print_stderr)]

use console::{Term, style};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Check if stderr is a TTY (for interactive output)
fn is_tty() -> bool {
    Term::stderr().is_term()
}

fn hidden_unless_tty(pb: ProgressBar) -> ProgressBar {
    if !is_tty() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb
}

fn template(style: ProgressStyle, template: &str) -> ProgressStyle {
    // Templates are static strings; fall back to the plain style if one is rejected
    match style.clone().template(template) {
        Ok(styled) => styled,
        Err(_) => style,
    }
}

/// Progress bar for a download; indeterminate when the size is unknown
pub fn download_bar(name: &str, total_size: Option<u64>) -> ProgressBar {
    let pb = match total_size {
        Some(total) => {
            let pb = hidden_unless_tty(ProgressBar::new(total));
            pb.set_style(
                template(
                    ProgressStyle::default_bar(),
                    "{spinner:.cyan} {msg} [{bar:25.cyan/dim}] {bytes}/{total_bytes} ({bytes_per_sec})",
                )
                .tick_chars(SPINNER_CHARS)
                .progress_chars("━━╺"),
            );
            pb
        }
        None => {
            let pb = hidden_unless_tty(ProgressBar::new_spinner());
            pb.set_style(template(
                ProgressStyle::default_spinner().tick_chars(SPINNER_CHARS),
                "{spinner:.cyan} {msg} {bytes} ({bytes_per_sec})",
            ));
            pb
        }
    };
    pb.set_message(name.to_string());
    if is_tty() {
        pb.enable_steady_tick(Duration::from_millis(80));
    }
    pb
}

/// Print a success message with checkmark
pub fn success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Print an info/action message with arrow
pub fn action(message: &str) {
    println!("{} {}", style("→").cyan(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red(), message);
}

/// Print a dimmed/secondary message
pub fn dim(message: &str) {
    println!("{}", style(message).dim());
}

/// Print a status message (for dry-run, etc.)
pub fn status(prefix: &str, message: &str) {
    println!("{} {}", style(prefix).cyan().bold(), message);
}

/// Finish a download bar with success
pub fn finish_download_success(pb: &ProgressBar, file_name: &str) {
    let msg = format!(
        "{} {} {}",
        style("✓").green(),
        file_name,
        style("downloaded").dim()
    );
    if is_tty() {
        pb.set_style(template(ProgressStyle::default_spinner(), "{msg}"));
        pb.finish_with_message(msg);
    } else {
        pb.finish_and_clear();
        println!("{}", msg);
    }
}

/// Clear a progress bar without leaving a message
pub fn clear_bar(pb: &ProgressBar) {
    pb.finish_and_clear();
}
