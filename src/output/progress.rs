//! Page progress indicator.
//!
//! [`render`] is a pure function of the page counters; the merge engine owns
//! a [`ProgressState`] and the caller decides where the rendered line goes.
//!
//! # Examples
//!
//! ```
//! use pdfjoin::output::progress::render;
//!
//! assert_eq!(render(1, 4), "\r|======                   |  25%");
//! ```

/// Number of ticks in a full bar.
pub const BAR_WIDTH: usize = 25;

/// Page counters for one merge run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressState {
    /// Pages copied so far.
    pub processed_pages: usize,
    /// Pages to copy in total.
    pub total_pages: usize,
}

impl ProgressState {
    /// Start a run over `total_pages` pages.
    pub fn new(total_pages: usize) -> Self {
        Self {
            processed_pages: 0,
            total_pages,
        }
    }

    /// Count one more processed page, never exceeding the total.
    pub fn advance(&mut self) {
        self.processed_pages = (self.processed_pages + 1).min(self.total_pages);
    }

    /// Render the bar for the current counters, or `None` when there are no pages.
    pub fn render(&self) -> Option<String> {
        (self.total_pages > 0).then(|| render(self.processed_pages, self.total_pages))
    }
}

/// Render a progress bar line such as `"\r|=====     |  50%"`.
///
/// The leading carriage return makes repeated writes overwrite the same
/// terminal line. `total` must be at least 1.
pub fn render(current: usize, total: usize) -> String {
    let fraction = current as f64 / total as f64;
    let filled = ((fraction * BAR_WIDTH as f64).floor() as usize).min(BAR_WIDTH);
    let empty = BAR_WIDTH - filled;
    let percent = (fraction * 100.0).round() as usize;

    format!("\r|{}{}| {percent:>3}%", "=".repeat(filled), " ".repeat(empty))
}
