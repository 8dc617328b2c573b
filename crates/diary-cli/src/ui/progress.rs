//! Spinners for network round trips, using indicatif.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::context::UiContext;

/// A spinner for indeterminate progress. Silent when animation is not allowed.
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    pub fn new(ctx: &UiContext, message: &str) -> Self {
        if !ctx.allows_animation() {
            return Self { bar: None };
        }

        let template = if ctx.unicode {
            "{spinner:.cyan} {msg}..."
        } else {
            "{spinner} {msg}..."
        };
        let style = match ProgressStyle::default_spinner().template(template) {
            Ok(style) => style,
            Err(_) => ProgressStyle::default_spinner(),
        };
        let style = if ctx.unicode {
            style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", ""])
        } else {
            style.tick_strings(&["|", "/", "-", "\\", ""])
        };

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar: Some(bar) }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.finish();
    }
}
