//! Progress display for label rendering.

use indicatif::{ProgressBar, ProgressStyle};

use super::context::UiContext;

/// Bar shown while labels render one by one. Hidden off a TTY.
pub fn label_bar(ctx: &UiContext, total: usize) -> ProgressBar {
    if !ctx.allows_animation() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total as u64);
    let style = ProgressStyle::with_template("{bar:30} {pos}/{len} labels {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}
