//! Progress bar helpers.

use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar over the file batch, or None when disabled.
pub fn create_file_progress(total: usize, enabled: bool) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }

    let bar = ProgressBar::new(total as u64);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");
    bar.set_style(style);
    Some(bar)
}

/// Create a progress bar over the windows of one file, or None when disabled.
pub fn create_segment_progress(total: usize, enabled: bool) -> Option<ProgressBar> {
    if !enabled || total == 0 {
        return None;
    }

    let bar = ProgressBar::new(total as u64);
    let style =
        ProgressStyle::with_template("  [{bar:40.cyan/blue}] {pos}/{len} windows")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
    bar.set_style(style);
    Some(bar)
}

/// Advance the bar by one file.
pub fn inc_progress(bar: Option<&ProgressBar>) {
    if let Some(bar) = bar {
        bar.inc(1);
    }
}

/// Finish the bar with a final message.
pub fn finish_progress(bar: Option<ProgressBar>, message: &'static str) {
    if let Some(bar) = bar {
        bar.finish_with_message(message);
    }
}

/// Remove the bar without leaving a final line.
pub fn clear_progress(bar: Option<ProgressBar>) {
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_progress_is_none() {
        assert!(create_file_progress(10, false).is_none());
        assert!(create_segment_progress(10, false).is_none());
    }

    #[test]
    fn empty_segment_progress_is_none() {
        assert!(create_segment_progress(0, true).is_none());
    }

    #[test]
    fn helpers_accept_none() {
        inc_progress(None);
        finish_progress(None, "done");
        clear_progress(None);
    }
}
