use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Create a progress bar for determinate progress
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{msg}\n[{bar:40.cyan/blue}] {pos}/{len} ({percent}%) ETA: {eta}")
    {
        pb.set_style(style.progress_chars("█▓▒░ "));
    }
    pb.set_message(message.to_string());
    pb
}

/// Progress bar for a search over `total` points, hidden in JSON mode
pub fn search_progress(total: usize, visible: bool) -> ProgressBar {
    if visible {
        create_progress_bar(total as u64, "Finding nearest neighbours")
    } else {
        ProgressBar::hidden()
    }
}

/// Spinner for a load phase, hidden in JSON mode
pub fn load_spinner(message: &str, visible: bool) -> ProgressBar {
    if visible {
        create_spinner(message)
    } else {
        ProgressBar::hidden()
    }
}

/// Finish a progress bar with success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {}", message));
}

/// Finish a progress bar with error message
pub fn finish_error(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✗ {}", message));
}
